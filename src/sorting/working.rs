//! Per-pass dependency graph over the working set.
//!
//! Nodes are dense indices `0..len()` into the current working set. Node
//! `n`'s dependency list holds the nodes that must be drawn before it. The
//! cycle breaker removes entries from these lists; the registered graph in
//! [`crate::sorting::graph`] is never touched, so static edges survive
//! repairs made for a single frame.

use smallvec::SmallVec;

use crate::sorting::graph::EdgeList;

/// Per-node data the cycle breaker uses to pick the weakest edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Horizontal position of the footprint centroid.
    pub x: f32,
    pub is_point: bool,
}

impl Anchor {
    pub fn point(x: f32) -> Self {
        Self { x, is_point: true }
    }

    pub fn line(x: f32) -> Self {
        Self { x, is_point: false }
    }
}

/// Dense adjacency lists that are reused from pass to pass.
#[derive(Debug, Default)]
pub struct WorkingGraph {
    deps: Vec<EdgeList>,
    anchors: Vec<Anchor>,
    len: usize,
}

impl WorkingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all nodes while keeping the allocated lists.
    pub fn clear(&mut self) {
        self.len = 0;
        self.anchors.clear();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn add_node(&mut self, anchor: Anchor) -> u32 {
        let node = self.len;
        if node < self.deps.len() {
            self.deps[node].clear();
        } else {
            self.deps.push(SmallVec::new());
        }
        self.anchors.push(anchor);
        self.len += 1;
        node as u32
    }

    /// Record that `from` is drawn before `to`.
    pub fn add_edge(&mut self, from: u32, to: u32) {
        debug_assert!((from as usize) < self.len && (to as usize) < self.len);
        self.deps[to as usize].push(from);
    }

    /// Remove the edge `from -> to`, returning whether it existed.
    pub fn remove_edge(&mut self, from: u32, to: u32) -> bool {
        let deps = &mut self.deps[to as usize];
        match deps.iter().position(|&d| d == from) {
            Some(i) => {
                deps.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove the `index`-th dependency of `node`.
    pub(crate) fn remove_dependency_at(&mut self, node: u32, index: usize) -> u32 {
        self.deps[node as usize].remove(index)
    }

    /// Nodes that must be drawn before `node`.
    #[inline]
    pub fn dependencies(&self, node: u32) -> &[u32] {
        &self.deps[node as usize]
    }

    #[inline]
    pub fn anchor(&self, node: u32) -> Anchor {
        self.anchors[node as usize]
    }

    pub fn edge_count(&self) -> usize {
        self.deps[..self.len].iter().map(|d| d.len()).sum()
    }

    /// Every edge as a `(from, to)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.deps[..self.len]
            .iter()
            .enumerate()
            .flat_map(|(to, deps)| deps.iter().map(move |&from| (from, to as u32)))
    }

    /// Whether any cycle remains. Uses a fresh colouring, so it is meant for
    /// diagnostics and tests rather than the per-frame path.
    pub fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Open,
            Closed,
        }

        let mut marks = vec![Mark::New; self.len];
        let mut stack: Vec<(u32, usize)> = Vec::new();
        for root in 0..self.len as u32 {
            if marks[root as usize] != Mark::New {
                continue;
            }
            marks[root as usize] = Mark::Open;
            stack.push((root, 0));
            while let Some((node, next)) = stack.last_mut() {
                let deps = self.dependencies(*node);
                if *next == deps.len() {
                    marks[*node as usize] = Mark::Closed;
                    stack.pop();
                    continue;
                }
                let dep = deps[*next];
                *next += 1;
                let mark = marks[dep as usize];
                match mark {
                    Mark::Open => return true,
                    Mark::New => {
                        marks[dep as usize] = Mark::Open;
                        stack.push((dep, 0));
                    }
                    Mark::Closed => {}
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_node_lists_usable() {
        let mut g = WorkingGraph::new();
        let a = g.add_node(Anchor::point(0.0));
        let b = g.add_node(Anchor::point(1.0));
        g.add_edge(a, b);
        assert_eq!(g.edge_count(), 1);

        g.clear();
        assert!(g.is_empty());
        let c = g.add_node(Anchor::line(2.0));
        assert_eq!(c, 0);
        assert!(g.dependencies(c).is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn has_cycle_detects_triangle() {
        let mut g = WorkingGraph::new();
        for x in 0..3 {
            g.add_node(Anchor::point(x as f32));
        }
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        assert!(!g.has_cycle());
        g.add_edge(2, 0);
        assert!(g.has_cycle());
        assert!(g.remove_edge(1, 2));
        assert!(!g.has_cycle());
        assert!(!g.remove_edge(1, 2));
    }

    #[test]
    fn edges_lists_every_pair() {
        let mut g = WorkingGraph::new();
        for x in 0..3 {
            g.add_node(Anchor::point(x as f32));
        }
        g.add_edge(0, 2);
        g.add_edge(1, 2);
        let mut edges: Vec<_> = g.edges().collect();
        edges.sort();
        assert_eq!(edges, vec![(0, 2), (1, 2)]);
    }
}
