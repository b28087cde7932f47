//! Depth-first topological ordering of the working graph.
//!
//! Every node's dependencies are emitted before the node itself, so the
//! output is back-to-front draw order. Nodes are marked visited when they
//! are first entered; a cycle left behind by the cycle breaker therefore
//! cannot loop; the edge that closes it is simply not honoured.

use crate::sorting::working::WorkingGraph;

/// Reusable scratch state for topological sorting.
#[derive(Debug, Default)]
pub struct TopologicalOrderer {
    visited: Vec<bool>,
    stack: Vec<(u32, usize)>,
}

impl TopologicalOrderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write all nodes of `graph` to `out` in draw order.
    ///
    /// Roots are visited in node order, which makes the result deterministic
    /// for a given graph.
    pub fn sort(&mut self, graph: &WorkingGraph, out: &mut Vec<u32>) {
        out.clear();
        self.stack.clear();
        self.visited.clear();
        self.visited.resize(graph.len(), false);

        for root in 0..graph.len() as u32 {
            if self.visited[root as usize] {
                continue;
            }
            self.visited[root as usize] = true;
            self.stack.push((root, 0));

            while let Some((node, next)) = self.stack.last_mut() {
                let node = *node;
                let deps = graph.dependencies(node);
                if *next == deps.len() {
                    self.stack.pop();
                    out.push(node);
                    continue;
                }
                let dep = deps[*next];
                *next += 1;
                if !self.visited[dep as usize] {
                    self.visited[dep as usize] = true;
                    self.stack.push((dep, 0));
                }
            }
        }
    }
}
