//! Cycle breaking for the per-pass working graph.
//!
//! Line comparisons are heuristic, so "drawn before" is not always
//! transitive and the working graph can contain cycles. Each pass runs a
//! depth-first search over every node; when it reaches a node that is still
//! on the search stack, the stack suffix from that node forms a cycle and
//! exactly one edge of it is removed:
//!
//! 1. among consecutive pairs where both sprites are points, the pair with
//!    the greatest horizontal distance
//! 2. otherwise the pair with the greatest horizontal distance overall
//!
//! Sprites far apart horizontally rarely overlap much on screen, so their
//! relative order is the least visible one to give up.
//!
//! Passes repeat until one removes nothing or the pass budget runs out. A
//! graph that still has cycles after the budget is accepted as is.

use log::trace;

use crate::sorting::working::WorkingGraph;

/// Default number of passes per frame.
pub const DEFAULT_MAX_PASSES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnStack,
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: u32,
    /// Index of the next dependency to explore.
    next: usize,
}

/// Result of [`CycleBreaker::break_cycles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub passes: u32,
    pub edges_removed: usize,
    /// The last pass found no cycle.
    pub converged: bool,
}

/// Reusable scratch state for cycle breaking.
#[derive(Debug, Default)]
pub struct CycleBreaker {
    state: Vec<Visit>,
    stack: Vec<Frame>,
    /// Stack depth of each node while it is `OnStack`.
    depth: Vec<usize>,
}

impl CycleBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove edges from `graph` until it is acyclic or `max_passes` passes ran.
    pub fn break_cycles(&mut self, graph: &mut WorkingGraph, max_passes: u32) -> CycleReport {
        let mut report = CycleReport::default();
        while report.passes < max_passes {
            report.passes += 1;
            let removed = self.run_pass(graph);
            report.edges_removed += removed;
            if removed == 0 {
                report.converged = true;
                break;
            }
        }
        report
    }

    fn run_pass(&mut self, graph: &mut WorkingGraph) -> usize {
        let n = graph.len();
        self.state.clear();
        self.state.resize(n, Visit::Unvisited);
        self.depth.clear();
        self.depth.resize(n, 0);
        self.stack.clear();

        let mut removed = 0;
        for root in 0..n as u32 {
            if self.state[root as usize] != Visit::Unvisited {
                continue;
            }
            self.push(root);

            while let Some(frame) = self.stack.last_mut() {
                let node = frame.node;
                let deps = graph.dependencies(node);
                if frame.next >= deps.len() {
                    self.stack.pop();
                    self.state[node as usize] = Visit::Done;
                    continue;
                }
                let dep = deps[frame.next];
                frame.next += 1;

                let visit = self.state[dep as usize];
                match visit {
                    Visit::Unvisited => self.push(dep),
                    Visit::Done => {}
                    Visit::OnStack => {
                        self.remove_weakest_edge(graph, dep);
                        removed += 1;
                    }
                }
            }
        }
        removed
    }

    fn push(&mut self, node: u32) {
        self.state[node as usize] = Visit::OnStack;
        self.depth[node as usize] = self.stack.len();
        self.stack.push(Frame { node, next: 0 });
    }

    /// `closing` is on the stack and is a dependency of the top frame's node.
    ///
    /// The cycle is `stack[depth(closing)..]` plus the closing pair
    /// `(top, closing)`. One pair is removed; if it is not the closing pair,
    /// the frames above it are unwound and may be explored again later in
    /// this pass.
    fn remove_weakest_edge(&mut self, graph: &mut WorkingGraph, closing: u32) {
        let start = self.depth[closing as usize];
        let top = self.stack.len() - 1;

        // Pair k is (stack[k], stack[k + 1]); pair `top` is the closing pair.
        let pair = |k: usize| -> (u32, u32) {
            let u = self.stack[k].node;
            let v = if k == top { closing } else { self.stack[k + 1].node };
            (u, v)
        };

        let mut best: Option<(usize, bool, f32)> = None;
        for k in start..=top {
            let (u, v) = pair(k);
            let (au, av) = (graph.anchor(u), graph.anchor(v));
            let both_points = au.is_point && av.is_point;
            let distance = (au.x - av.x).abs();
            let better = match best {
                None => true,
                Some((_, best_points, best_distance)) => {
                    (both_points && !best_points)
                        || (both_points == best_points && distance > best_distance)
                }
            };
            if better {
                best = Some((k, both_points, distance));
            }
        }

        let Some((k, _, _)) = best else {
            return;
        };
        let (u, v) = pair(k);

        // The edge to `v` is the one most recently explored from frame k.
        let frame = &mut self.stack[k];
        frame.next -= 1;
        let removed = graph.remove_dependency_at(u, frame.next);
        debug_assert_eq!(removed, v);
        trace!("Removed cycle edge {} -> {}", v, u);

        for frame in self.stack.drain(k + 1..) {
            self.state[frame.node as usize] = Visit::Unvisited;
        }
    }
}
