//! Arena-backed sprite store and dependency graph.
//!
//! Sprites live in a dense slot array; every edge is a pair of slot indices.
//! An edge `from -> to` means `from` is drawn before `to`, and is stored in
//! `to`'s dependency list (the things that must be drawn first).
//!
//! Sprites fall into one of three buckets:
//! - **background** – excluded from the graph, kept in a simple list ordered
//!   by the comparator
//! - **static** – edges against other static sprites are computed once at
//!   registration and stored on both endpoints so removal only touches the
//!   sprite's neighbours
//! - **dynamic** – edges against everything visible are rebuilt every pass
//!   by [`DependencyGraph::rebuild_dynamic`]

use std::fmt::Debug;
use std::hash::Hash;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::coords::{Bounds2D, Vec2};
use crate::sorting::comparator::{DrawOrder, compare};
use crate::sorting::error::SortError;
use crate::sorting::footprint::Footprint;

pub(crate) type EdgeList = SmallVec<[u32; 8]>;

/// Generation-checked handle to a registered sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId {
    index: u32,
    generation: u32,
}

impl SpriteId {
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Which part of the sorter a sprite belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Background,
    Static,
    Dynamic,
}

/// Everything the sorter needs to know about a sprite when it is registered.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDescriptor {
    pub footprint: Footprint,
    pub bounds: Bounds2D,
    /// Immobile between registration and unregistration.
    pub is_static: bool,
    /// Render below every non-background sprite.
    pub force_always_behind: bool,
}

impl SpriteDescriptor {
    pub fn new(footprint: Footprint, bounds: Bounds2D) -> Self {
        Self {
            footprint,
            bounds,
            is_static: false,
            force_always_behind: false,
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_always_behind(mut self, force_always_behind: bool) -> Self {
        self.force_always_behind = force_always_behind;
        self
    }

    pub fn bucket(&self) -> Bucket {
        if self.force_always_behind {
            Bucket::Background
        } else if self.is_static {
            Bucket::Static
        } else {
            Bucket::Dynamic
        }
    }

    pub fn validate(&self) -> Result<(), SortError> {
        self.footprint.validate()?;
        if self.bounds.is_finite() {
            Ok(())
        } else {
            Err(SortError::NonFiniteCoordinate)
        }
    }
}

#[derive(Debug)]
pub(crate) struct SpriteRecord<K> {
    pub key: K,
    pub footprint: Footprint,
    pub bounds: Bounds2D,
    /// Footprint centroid, cached for range tests and cycle breaking.
    pub anchor: Vec2,
    pub bucket: Bucket,
    /// Position inside the bucket's member list (static/dynamic only).
    bucket_pos: usize,
    pub force_sort: bool,
    /// Static sprites drawn before this one.
    pub static_deps: EdgeList,
    /// Static sprites that list this one in their `static_deps`.
    pub static_dependents: EdgeList,
    /// Sprites drawn before this one, recomputed every pass.
    pub moving_deps: EdgeList,
    /// Sprites that list this one in their `moving_deps`.
    pub moving_dependents: EdgeList,
}

#[derive(Debug)]
struct Slot<K> {
    generation: u32,
    record: Option<SpriteRecord<K>>,
}

/// Sprite store plus the static and per-pass dependency edges between sprites.
#[derive(Debug)]
pub struct DependencyGraph<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
    lookup: FxHashMap<K, SpriteId>,
    statics: Vec<u32>,
    dynamics: Vec<u32>,
    background: Vec<u32>,
    /// Slots that gained moving edges since the last clear. May still list
    /// slots freed in the meantime.
    moving_dirty: Vec<u32>,
    static_edge_count: usize,
    moving_edge_count: usize,
}

impl<K> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            lookup: FxHashMap::default(),
            statics: Vec::new(),
            dynamics: Vec::new(),
            background: Vec::new(),
            moving_dirty: Vec::new(),
            static_edge_count: 0,
            moving_edge_count: 0,
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> DependencyGraph<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.lookup.contains_key(&key)
    }

    pub fn id_of(&self, key: K) -> Option<SpriteId> {
        self.lookup.get(&key).copied()
    }

    /// Number of slots ever allocated; slot indices are below this.
    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn static_edge_count(&self) -> usize {
        self.static_edge_count
    }

    pub fn moving_edge_count(&self) -> usize {
        self.moving_edge_count
    }

    /// Add a sprite. Static sprites get their edges against every
    /// intersecting static sprite immediately.
    pub fn register(&mut self, key: K, descriptor: SpriteDescriptor) -> Result<SpriteId, SortError> {
        descriptor.validate()?;
        if self.lookup.contains_key(&key) {
            return Err(SortError::AlreadyRegistered);
        }

        let bucket = descriptor.bucket();
        let record = SpriteRecord {
            key,
            anchor: descriptor.footprint.centroid(),
            footprint: descriptor.footprint,
            bounds: descriptor.bounds,
            bucket,
            bucket_pos: 0,
            force_sort: true,
            static_deps: EdgeList::new(),
            static_dependents: EdgeList::new(),
            moving_deps: EdgeList::new(),
            moving_dependents: EdgeList::new(),
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.record = Some(record);
                SpriteId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    record: Some(record),
                });
                SpriteId {
                    index,
                    generation: 0,
                }
            }
        };
        self.lookup.insert(key, id);

        match bucket {
            Bucket::Background => self.insert_background(id.index),
            Bucket::Static => {
                self.push_member(id.index);
                self.setup_static_dependencies(id.index);
            }
            Bucket::Dynamic => self.push_member(id.index),
        }

        debug!("Registered {:?} sprite {:?} in slot {}", bucket, key, id.index);
        Ok(id)
    }

    /// Remove a sprite and every edge that references it.
    pub fn unregister(&mut self, key: K) -> bool {
        let Some(id) = self.lookup.remove(&key) else {
            return false;
        };
        let slot = id.index;

        self.purge_moving_references(slot);
        let bucket = self.record(slot).bucket;
        match bucket {
            Bucket::Background => self.background.retain(|s| *s != slot),
            Bucket::Static => {
                self.remove_static_dependencies(slot);
                self.remove_member(slot);
            }
            Bucket::Dynamic => self.remove_member(slot),
        }

        let entry = &mut self.slots[slot as usize];
        entry.record = None;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);

        debug!("Unregistered {:?} sprite {:?} from slot {}", bucket, key, slot);
        true
    }

    /// Replace a sprite's geometry. Static edges are recomputed and the
    /// background list is re-sorted as needed. Returns the sprite's bucket.
    pub fn update_geometry(
        &mut self,
        key: K,
        footprint: Footprint,
        bounds: Bounds2D,
    ) -> Result<Bucket, SortError> {
        footprint.validate()?;
        if !bounds.is_finite() {
            return Err(SortError::NonFiniteCoordinate);
        }
        let slot = self.lookup.get(&key).ok_or(SortError::UnknownSprite)?.index;

        let record = self.record_mut(slot);
        record.anchor = footprint.centroid();
        record.footprint = footprint;
        record.bounds = bounds;
        let bucket = record.bucket;
        match bucket {
            Bucket::Background => {
                self.background.retain(|s| *s != slot);
                self.insert_background(slot);
            }
            Bucket::Static => {
                self.remove_static_dependencies(slot);
                self.setup_static_dependencies(slot);
            }
            Bucket::Dynamic => {}
        }
        Ok(bucket)
    }

    pub fn set_force_sort(&mut self, key: K) -> bool {
        let Some(slot) = self.lookup.get(&key).map(|id| id.index) else {
            return false;
        };
        self.record_mut(slot).force_sort = true;
        true
    }

    /// Clear the force flag of a slot, returning whether it was set.
    pub(crate) fn take_force_sort(&mut self, slot: u32) -> bool {
        std::mem::take(&mut self.record_mut(slot).force_sort)
    }

    /// Static sprites in registration order (modulo removals).
    pub fn statics(&self) -> &[u32] {
        &self.statics
    }

    pub fn dynamics(&self) -> &[u32] {
        &self.dynamics
    }

    /// Background sprites, back to front.
    pub fn background(&self) -> &[u32] {
        &self.background
    }

    pub fn key_of(&self, slot: u32) -> K {
        self.record(slot).key
    }

    pub fn bounds_of(&self, slot: u32) -> Bounds2D {
        self.record(slot).bounds
    }

    pub fn footprint_of(&self, slot: u32) -> &Footprint {
        &self.record(slot).footprint
    }

    pub(crate) fn record(&self, slot: u32) -> &SpriteRecord<K> {
        self.slots[slot as usize]
            .record
            .as_ref()
            .unwrap_or_else(|| unreachable!("slot {} is free", slot))
    }

    fn record_mut(&mut self, slot: u32) -> &mut SpriteRecord<K> {
        self.slots[slot as usize]
            .record
            .as_mut()
            .unwrap_or_else(|| unreachable!("slot {} is free", slot))
    }

    /// Whether `id` still refers to the sprite it was issued for.
    pub fn is_live(&self, id: SpriteId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|s| s.generation == id.generation && s.record.is_some())
    }

    /// Recompute all edges that involve a dynamic sprite.
    ///
    /// Previously computed moving edges are cleared first. Then every
    /// (dynamic, static) and (dynamic, dynamic) pair with intersecting bounds
    /// gets an edge when the comparator gives a definite answer. Static to
    /// static edges are left alone.
    pub fn rebuild_dynamic(&mut self, visible_dynamics: &[u32], visible_statics: &[u32]) {
        self.clear_moving_dependencies();

        for (i, &moving) in visible_dynamics.iter().enumerate() {
            for &other in visible_statics.iter().chain(&visible_dynamics[i + 1..]) {
                self.link_if_overlapping(moving, other, false);
            }
        }
    }

    pub fn clear_moving_dependencies(&mut self) {
        for i in 0..self.moving_dirty.len() {
            let slot = self.moving_dirty[i];
            if let Some(record) = self.slots[slot as usize].record.as_mut() {
                record.moving_deps.clear();
                record.moving_dependents.clear();
            }
        }
        self.moving_dirty.clear();
        self.moving_edge_count = 0;
    }

    /// All static edges as `(from, to)` key pairs.
    pub fn static_edges(&self) -> FxHashSet<(K, K)> {
        let mut edges = FxHashSet::default();
        for &to in &self.statics {
            let record = self.record(to);
            for &from in &record.static_deps {
                edges.insert((self.key_of(from), record.key));
            }
        }
        edges
    }

    /// All moving edges from the last [`rebuild_dynamic`](Self::rebuild_dynamic).
    pub fn moving_edges(&self) -> FxHashSet<(K, K)> {
        let mut edges = FxHashSet::default();
        for &to in &self.moving_dirty {
            let Some(record) = self.slots[to as usize].record.as_ref() else {
                continue;
            };
            for &from in &record.moving_deps {
                edges.insert((self.key_of(from), record.key));
            }
        }
        edges
    }

    /// Drop every sprite and edge.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn push_member(&mut self, slot: u32) {
        let bucket = self.record(slot).bucket;
        let list = match bucket {
            Bucket::Static => &mut self.statics,
            Bucket::Dynamic => &mut self.dynamics,
            Bucket::Background => return,
        };
        let pos = list.len();
        list.push(slot);
        self.record_mut(slot).bucket_pos = pos;
    }

    fn remove_member(&mut self, slot: u32) {
        let record = self.record(slot);
        let (pos, bucket) = (record.bucket_pos, record.bucket);
        let list = match bucket {
            Bucket::Static => &mut self.statics,
            Bucket::Dynamic => &mut self.dynamics,
            Bucket::Background => return,
        };
        list.swap_remove(pos);
        if let Some(&moved) = list.get(pos) {
            self.record_mut(moved).bucket_pos = pos;
        }
    }

    /// Insert before the first background sprite the new one must be drawn
    /// before. Insertion keeps the list stable for indeterminate pairs.
    fn insert_background(&mut self, slot: u32) {
        let footprint = &self.record(slot).footprint;
        let pos = self
            .background
            .iter()
            .position(|&other| compare(footprint, &self.record(other).footprint) == DrawOrder::ABeforeB)
            .unwrap_or(self.background.len());
        self.background.insert(pos, slot);
    }

    fn setup_static_dependencies(&mut self, slot: u32) {
        for i in 0..self.statics.len() {
            let other = self.statics[i];
            if other != slot {
                self.link_if_overlapping(slot, other, true);
            }
        }
    }

    fn remove_static_dependencies(&mut self, slot: u32) {
        let record = self.record_mut(slot);
        let dependents = std::mem::take(&mut record.static_dependents);
        let deps = std::mem::take(&mut record.static_deps);
        self.static_edge_count -= dependents.len() + deps.len();

        for to in dependents {
            self.record_mut(to).static_deps.retain(|s| *s != slot);
        }
        for from in deps {
            self.record_mut(from).static_dependents.retain(|s| *s != slot);
        }
    }

    /// Drop the moving edges of `slot` from its neighbours. The slot stays
    /// in `moving_dirty` until the next clear.
    fn purge_moving_references(&mut self, slot: u32) {
        let record = self.record_mut(slot);
        let deps = std::mem::take(&mut record.moving_deps);
        let dependents = std::mem::take(&mut record.moving_dependents);
        self.moving_edge_count -= deps.len() + dependents.len();
        for from in deps {
            self.record_mut(from).moving_dependents.retain(|s| *s != slot);
        }
        for to in dependents {
            self.record_mut(to).moving_deps.retain(|s| *s != slot);
        }
    }

    fn link_if_overlapping(&mut self, a: u32, b: u32, is_static: bool) {
        let ra = self.record(a);
        let rb = self.record(b);
        if !ra.bounds.intersects(&rb.bounds) {
            return;
        }
        let order = compare(&ra.footprint, &rb.footprint);
        match order {
            DrawOrder::ABeforeB => self.add_edge(a, b, is_static),
            DrawOrder::BBeforeA => self.add_edge(b, a, is_static),
            DrawOrder::Indeterminate => {}
        }
    }

    fn add_edge(&mut self, from: u32, to: u32, is_static: bool) {
        if is_static {
            self.record_mut(to).static_deps.push(from);
            self.record_mut(from).static_dependents.push(to);
            self.static_edge_count += 1;
        } else {
            self.mark_moving_dirty(to);
            self.mark_moving_dirty(from);
            self.record_mut(to).moving_deps.push(from);
            self.record_mut(from).moving_dependents.push(to);
            self.moving_edge_count += 1;
        }
    }

    fn mark_moving_dirty(&mut self, slot: u32) {
        let record = self.record(slot);
        if record.moving_deps.is_empty() && record.moving_dependents.is_empty() {
            self.moving_dirty.push(slot);
        }
    }
}
