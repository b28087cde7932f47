//! The sorting context that ties the pieces together.
//!
//! [`IsoSortingManager`] owns the registered sprites, the scratch buffers of
//! the ordering pass and the configuration. A pass runs these steps:
//!
//! 1. build the working set from visible (or forced) static and dynamic
//!    sprites, statics first
//! 2. rebuild the moving edges for the visible dynamic sprites
//! 3. copy the edges between working-set members into the [`WorkingGraph`]
//! 4. break cycles
//! 5. sort topologically
//! 6. hand out draw orders to the host, background band first
//!
//! All buffers are cleared at the start of the pass and reused, so a steady
//! scene does not allocate per frame.

use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};
use serde::Serialize;

use crate::coords::Bounds2D;
use crate::resources::sortconfig::SortConfig;
use crate::sorting::cycles::{CycleBreaker, DEFAULT_MAX_PASSES};
use crate::sorting::error::SortError;
use crate::sorting::footprint::Footprint;
use crate::sorting::graph::{Bucket, DependencyGraph, SpriteDescriptor, SpriteId};
use crate::sorting::order::OrderBands;
use crate::sorting::topo::TopologicalOrderer;
use crate::sorting::working::{Anchor, WorkingGraph};

const NOT_IN_WORKING_SET: u32 = u32::MAX;

/// What the sorter needs from the rendering side.
pub trait SortHost<K> {
    /// Whether the sprite is currently on screen.
    fn is_visible(&self, key: K) -> bool;
    /// Store the computed draw order of a sprite.
    fn apply_draw_order(&mut self, key: K, order: i32);
}

/// Summary of one ordering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub working_set: usize,
    pub background: usize,
    pub static_edges: usize,
    pub moving_edges: usize,
    pub cycle_passes: u32,
    pub edges_removed: usize,
    /// Cycle breaking finished within its pass budget.
    pub converged: bool,
}

/// Owner of the sorting state for one scene.
#[derive(Debug)]
pub struct IsoSortingManager<K> {
    graph: DependencyGraph<K>,
    max_cycle_passes: u32,
    sort_range: Option<f32>,
    bands: OrderBands,
    /// Horizontal position the sort range is measured from.
    focus_x: Option<f32>,

    visible_statics: Vec<u32>,
    visible_dynamics: Vec<u32>,
    /// Slot index to working-set node, `NOT_IN_WORKING_SET` outside a pass.
    slot_to_node: Vec<u32>,
    /// Working-set node to slot index.
    node_to_slot: Vec<u32>,
    node_keys: Vec<K>,
    working: WorkingGraph,
    cycle_breaker: CycleBreaker,
    orderer: TopologicalOrderer,
    sorted: Vec<u32>,

    last_order: Vec<K>,
    last_stats: PassStats,
}

impl<K: Copy + Eq + Hash + Debug> Default for IsoSortingManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Debug> IsoSortingManager<K> {
    /// Manager with the default configuration.
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            max_cycle_passes: DEFAULT_MAX_PASSES,
            sort_range: None,
            bands: OrderBands::default(),
            focus_x: None,
            visible_statics: Vec::new(),
            visible_dynamics: Vec::new(),
            slot_to_node: Vec::new(),
            node_to_slot: Vec::new(),
            node_keys: Vec::new(),
            working: WorkingGraph::new(),
            cycle_breaker: CycleBreaker::new(),
            orderer: TopologicalOrderer::new(),
            sorted: Vec::new(),
            last_order: Vec::new(),
            last_stats: PassStats::default(),
        }
    }

    /// Manager built from a validated configuration.
    pub fn with_config(config: &SortConfig) -> Result<Self, SortError> {
        let mut manager = Self::new();
        manager.apply_config(config)?;
        Ok(manager)
    }

    /// Replace the tunables. Takes effect on the next pass.
    pub fn apply_config(&mut self, config: &SortConfig) -> Result<(), SortError> {
        config.validate()?;
        self.max_cycle_passes = config.max_cycle_passes;
        self.sort_range = config.sort_range.filter(|r| *r > 0.0);
        self.bands = config.bands();
        Ok(())
    }

    pub fn max_cycle_passes(&self) -> u32 {
        self.max_cycle_passes
    }

    pub fn sort_range(&self) -> Option<f32> {
        self.sort_range
    }

    pub fn bands(&self) -> OrderBands {
        self.bands
    }

    /// Set the horizontal point the sort range is measured from.
    pub fn set_focus(&mut self, focus_x: Option<f32>) {
        self.focus_x = focus_x;
    }

    pub fn graph(&self) -> &DependencyGraph<K> {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.graph.contains(key)
    }

    pub fn register(&mut self, key: K, descriptor: SpriteDescriptor) -> Result<SpriteId, SortError> {
        self.graph.register(key, descriptor)
    }

    /// Remove a sprite. Returns `false` if it was not registered.
    pub fn unregister(&mut self, key: K) -> bool {
        let removed = self.graph.unregister(key);
        if !removed {
            warn!("Tried to unregister unknown sprite {:?}", key);
        }
        removed
    }

    /// Replace a sprite's geometry after it moved.
    ///
    /// A static sprite is included in the next pass regardless of
    /// visibility, since its stored edges changed. A dynamic sprite goes
    /// through the usual visibility and range tests.
    pub fn update_sprite(
        &mut self,
        key: K,
        footprint: Footprint,
        bounds: Bounds2D,
    ) -> Result<(), SortError> {
        match self.graph.update_geometry(key, footprint, bounds) {
            Ok(Bucket::Static) => {
                self.graph.set_force_sort(key);
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(err) => {
                if err == SortError::UnknownSprite {
                    warn!("Tried to update unknown sprite {:?}", key);
                }
                Err(err)
            }
        }
    }

    /// Include a sprite in the next pass even if it is not visible.
    pub fn force_sort(&mut self, key: K) -> bool {
        let found = self.graph.set_force_sort(key);
        if !found {
            warn!("Tried to force sort of unknown sprite {:?}", key);
        }
        found
    }

    /// Keys of the last pass, back to front: background list, then the
    /// sorted working set.
    pub fn last_order(&self) -> &[K] {
        &self.last_order
    }

    pub fn last_stats(&self) -> PassStats {
        self.last_stats
    }

    /// Edges of the last pass that survived cycle breaking, as
    /// `(drawn first, drawn second)` pairs.
    pub fn working_edges(&self) -> Vec<(K, K)> {
        self.working
            .edges()
            .map(|(from, to)| (self.node_keys[from as usize], self.node_keys[to as usize]))
            .collect()
    }

    /// Drop every sprite and all pass state.
    pub fn shutdown(&mut self) {
        debug!("Shutting down sorter with {} sprites", self.graph.len());
        self.graph.clear();
        self.visible_statics.clear();
        self.visible_dynamics.clear();
        self.slot_to_node.clear();
        self.node_to_slot.clear();
        self.node_keys.clear();
        self.working.clear();
        self.sorted.clear();
        self.last_order.clear();
        self.last_stats = PassStats::default();
    }

    /// Order every sprite in the working set and report the orders to `host`.
    pub fn run_ordering_pass<H: SortHost<K>>(&mut self, host: &mut H) -> PassStats {
        self.collect_working_set(host);
        self.graph
            .rebuild_dynamic(&self.visible_dynamics, &self.visible_statics);
        self.build_working_graph();

        let report = self
            .cycle_breaker
            .break_cycles(&mut self.working, self.max_cycle_passes);
        if report.edges_removed > 0 {
            debug!(
                "Removed {} cycle edges in {} passes",
                report.edges_removed, report.passes
            );
        }
        if !report.converged && self.working.has_cycle() {
            warn!(
                "Cycles remain after {} cycle-break passes; order may violate some overlaps",
                report.passes
            );
        }

        self.orderer.sort(&self.working, &mut self.sorted);
        self.assign_orders(host);

        for &slot in &self.node_to_slot {
            self.slot_to_node[slot as usize] = NOT_IN_WORKING_SET;
        }

        self.last_stats = PassStats {
            working_set: self.working.len(),
            background: self.graph.background().len(),
            static_edges: self.graph.static_edge_count(),
            moving_edges: self.graph.moving_edge_count(),
            cycle_passes: report.passes,
            edges_removed: report.edges_removed,
            converged: report.converged,
        };
        self.last_stats
    }

    fn collect_working_set<H: SortHost<K>>(&mut self, host: &H) {
        self.visible_statics.clear();
        self.visible_dynamics.clear();

        for i in 0..self.graph.statics().len() {
            let slot = self.graph.statics()[i];
            if self.admit(slot, host) {
                self.visible_statics.push(slot);
            }
        }
        for i in 0..self.graph.dynamics().len() {
            let slot = self.graph.dynamics()[i];
            if self.admit(slot, host) {
                self.visible_dynamics.push(slot);
            }
        }
    }

    /// Forced sprites are always admitted and lose their force flag here.
    fn admit<H: SortHost<K>>(&mut self, slot: u32, host: &H) -> bool {
        if self.graph.take_force_sort(slot) {
            return true;
        }
        let record = self.graph.record(slot);
        if !host.is_visible(record.key) {
            return false;
        }
        match (self.sort_range, self.focus_x) {
            (Some(range), Some(focus)) => (record.anchor.x - focus).abs() <= range,
            _ => true,
        }
    }

    fn build_working_graph(&mut self) {
        self.working.clear();
        self.node_to_slot.clear();
        self.node_keys.clear();
        if self.slot_to_node.len() < self.graph.slot_capacity() {
            self.slot_to_node
                .resize(self.graph.slot_capacity(), NOT_IN_WORKING_SET);
        }

        for &slot in self.visible_statics.iter().chain(&self.visible_dynamics) {
            let record = self.graph.record(slot);
            let anchor = if record.footprint.is_point() {
                Anchor::point(record.anchor.x)
            } else {
                Anchor::line(record.anchor.x)
            };
            let node = self.working.add_node(anchor);
            self.slot_to_node[slot as usize] = node;
            self.node_to_slot.push(slot);
            self.node_keys.push(record.key);
        }

        for node in 0..self.node_to_slot.len() {
            let record = self.graph.record(self.node_to_slot[node]);
            for &from in record.static_deps.iter().chain(&record.moving_deps) {
                let from_node = self.slot_to_node[from as usize];
                if from_node != NOT_IN_WORKING_SET {
                    self.working.add_edge(from_node, node as u32);
                }
            }
        }
    }

    fn assign_orders<H: SortHost<K>>(&mut self, host: &mut H) {
        self.last_order.clear();

        let background = self.graph.background();
        for (i, &slot) in background.iter().enumerate() {
            let key = self.graph.key_of(slot);
            host.apply_draw_order(key, self.bands.background(i, background.len()));
            self.last_order.push(key);
        }

        for (i, &node) in self.sorted.iter().enumerate() {
            let key = self.node_keys[node as usize];
            host.apply_draw_order(key, self.bands.main(i));
            self.last_order.push(key);
        }
    }
}
