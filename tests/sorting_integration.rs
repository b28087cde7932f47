//! Sorting core integration tests.
//!
//! These tests drive the ECS-free sorter through its public API with a mock
//! host and check the ordering guarantees end to end.
//!
//! # Test Categories
//!
//! 1. **Comparator** - antisymmetry, point/point and point/line rules
//! 2. **Graph** - bounds gating, incremental static registration
//! 3. **Cycle breaking** - random cyclic graphs end up acyclic
//! 4. **Ordering pass** - topological validity, bands, idempotence

use fastrand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use isosort::coords::{Bounds2D, Vec2};
use isosort::resources::sortconfig::SortConfig;
use isosort::sorting::cycles::{CycleBreaker, DEFAULT_MAX_PASSES};
use isosort::sorting::working::{Anchor, WorkingGraph};
use isosort::sorting::{
    DependencyGraph, DrawOrder, Footprint, IsoSortingManager, SortHost, SpriteDescriptor, compare,
};

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================================
// Helpers
// =============================================================================

#[derive(Default)]
struct MockHost {
    hidden: FxHashSet<u32>,
    orders: FxHashMap<u32, i32>,
    writes: usize,
}

impl SortHost<u32> for MockHost {
    fn is_visible(&self, key: u32) -> bool {
        !self.hidden.contains(&key)
    }

    fn apply_draw_order(&mut self, key: u32, order: i32) {
        self.orders.insert(key, order);
        self.writes += 1;
    }
}

fn random_vec(rng: &mut Rng, extent: f32) -> Vec2 {
    Vec2::new(rng.f32() * extent, rng.f32() * extent)
}

fn random_footprint(rng: &mut Rng, extent: f32) -> Footprint {
    match rng.u8(0..3) {
        0 => Footprint::point(random_vec(rng, extent)),
        1 => Footprint::line(random_vec(rng, extent), random_vec(rng, extent)),
        _ => {
            let points: SmallVec<[Vec2; 4]> =
                (0..rng.usize(3..5)).map(|_| random_vec(rng, extent)).collect();
            Footprint::Line(points)
        }
    }
}

/// Bounds of the footprint, padded so neighbours overlap.
fn padded_bounds(footprint: &Footprint, pad: f32) -> Bounds2D {
    let mut bounds = Bounds2D::from_corners(footprint.first(), footprint.first());
    for p in footprint.points() {
        bounds.encapsulate(&Bounds2D::from_corners(*p, *p));
    }
    Bounds2D::new(
        bounds.min_x - pad,
        bounds.min_y - pad,
        bounds.max_x + pad,
        bounds.max_y + pad,
    )
}

fn random_descriptor(rng: &mut Rng, extent: f32) -> SpriteDescriptor {
    let footprint = random_footprint(rng, extent);
    let bounds = padded_bounds(&footprint, 10.0);
    SpriteDescriptor::new(footprint, bounds)
        .with_static(rng.bool())
        .with_always_behind(rng.u8(0..10) == 0)
}

fn random_manager(rng: &mut Rng, sprites: u32) -> IsoSortingManager<u32> {
    let mut manager = IsoSortingManager::new();
    for key in 0..sprites {
        manager.register(key, random_descriptor(rng, 100.0)).unwrap();
    }
    manager
}

fn point_sprite(x: f32, y: f32) -> SpriteDescriptor {
    SpriteDescriptor::new(
        Footprint::point(Vec2::new(x, y)),
        Bounds2D::new(x - 2.0, y - 2.0, x + 2.0, y + 2.0),
    )
}

// =============================================================================
// Comparator
// =============================================================================

#[test]
fn comparator_is_antisymmetric() {
    let mut rng = Rng::with_seed(0xDEC0);
    for _ in 0..5000 {
        let a = random_footprint(&mut rng, 50.0);
        let b = random_footprint(&mut rng, 50.0);
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        assert_eq!(ab, ba.reverse(), "{:?} vs {:?}", a, b);
    }
}

#[test]
fn deeper_point_is_drawn_first() {
    let p1 = Footprint::point(Vec2::new(0.0, 5.0));
    let p2 = Footprint::point(Vec2::new(0.0, 3.0));
    assert_eq!(compare(&p1, &p2), DrawOrder::ABeforeB);
}

#[test]
fn point_outside_line_depth_range() {
    let line = Footprint::line(Vec2::new(-10.0, 4.0), Vec2::new(10.0, 8.0));
    // Shallower than both endpoints: in front, the line is drawn first.
    let front = Footprint::point(Vec2::new(0.0, 1.0));
    assert_eq!(compare(&front, &line), DrawOrder::BBeforeA);
    assert_eq!(compare(&line, &front), DrawOrder::ABeforeB);
    // Deeper than both endpoints: behind, drawn first.
    let back = Footprint::point(Vec2::new(0.0, 12.0));
    assert_eq!(compare(&back, &line), DrawOrder::ABeforeB);
}

#[test]
fn median_depth_of_lines() {
    let line = Footprint::line(Vec2::new(0.0, 2.0), Vec2::new(4.0, 8.0));
    assert!(approx_eq(line.median_depth(), 5.0));
    assert!(approx_eq(line.centroid().x, 2.0));
}

// =============================================================================
// Graph
// =============================================================================

#[test]
fn disjoint_bounds_never_produce_edges() {
    let mut manager = IsoSortingManager::new();
    // Definitely ordered by depth, but far apart.
    manager.register(1u32, point_sprite(0.0, 100.0).with_static(true)).unwrap();
    manager.register(2u32, point_sprite(0.0, 0.0).with_static(true)).unwrap();
    manager.register(3u32, point_sprite(50.0, 50.0)).unwrap();
    manager.run_ordering_pass(&mut MockHost::default());

    assert_eq!(manager.graph().static_edge_count(), 0);
    assert_eq!(manager.graph().moving_edge_count(), 0);
    assert!(manager.working_edges().is_empty());
}

#[test]
fn register_then_unregister_restores_static_edges() {
    let mut rng = Rng::with_seed(42);
    let mut graph = DependencyGraph::new();
    for key in 0..60u32 {
        graph
            .register(key, random_descriptor(&mut rng, 100.0).with_static(true))
            .unwrap();
    }
    let before = graph.static_edges();
    let count_before = graph.static_edge_count();
    assert!(!before.is_empty());

    for extra in 100..110u32 {
        let desc = random_descriptor(&mut rng, 100.0).with_static(true);
        graph.register(extra, desc).unwrap();
        graph.unregister(extra);
        assert_eq!(graph.static_edges(), before);
        assert_eq!(graph.static_edge_count(), count_before);
    }
}

#[test]
fn static_edges_survive_cycle_repair() {
    let mut rng = Rng::with_seed(99);
    let mut manager = IsoSortingManager::new();
    for key in 0..80u32 {
        manager
            .register(key, random_descriptor(&mut rng, 80.0).with_static(true))
            .unwrap();
    }
    let before = manager.graph().static_edges();
    let mut host = MockHost::default();
    manager.run_ordering_pass(&mut host);
    manager.run_ordering_pass(&mut host);
    assert_eq!(manager.graph().static_edges(), before);
}

// =============================================================================
// Cycle breaking
// =============================================================================

/// Random graph with `cycles` planted cycles of length 2..=5 plus random
/// forward edges.
fn random_cyclic_graph(rng: &mut Rng, nodes: u32, cycles: usize) -> WorkingGraph {
    let mut graph = WorkingGraph::new();
    for _ in 0..nodes {
        let x = rng.f32() * 100.0;
        if rng.bool() {
            graph.add_node(Anchor::point(x));
        } else {
            graph.add_node(Anchor::line(x));
        }
    }
    for _ in 0..cycles {
        let len = rng.usize(2..=5);
        let members: Vec<u32> = (0..len).map(|_| rng.u32(0..nodes)).collect();
        for i in 0..len {
            let (from, to) = (members[i], members[(i + 1) % len]);
            if from != to {
                graph.add_edge(from, to);
            }
        }
    }
    for _ in 0..nodes {
        let from = rng.u32(0..nodes);
        let to = rng.u32(0..nodes);
        if from < to {
            graph.add_edge(from, to);
        }
    }
    graph
}

#[test]
fn random_graphs_are_acyclic_after_repair() {
    let mut rng = Rng::with_seed(2024);
    let mut breaker = CycleBreaker::new();
    let trials = 500;
    let mut acyclic = 0;
    for _ in 0..trials {
        let nodes = rng.u32(5..60);
        let cycles = rng.usize(1..12);
        let mut graph = random_cyclic_graph(&mut rng, nodes, cycles);
        breaker.break_cycles(&mut graph, DEFAULT_MAX_PASSES);
        if !graph.has_cycle() {
            acyclic += 1;
        }
    }
    assert!(acyclic * 100 >= trials * 95, "{} of {} acyclic", acyclic, trials);
}

#[test]
fn cycle_breaking_removes_only_what_it_reports() {
    let mut rng = Rng::with_seed(5);
    let mut breaker = CycleBreaker::new();
    for _ in 0..100 {
        let mut graph = random_cyclic_graph(&mut rng, 30, 6);
        let before = graph.edge_count();
        let report = breaker.break_cycles(&mut graph, DEFAULT_MAX_PASSES);
        assert_eq!(graph.edge_count() + report.edges_removed, before);
    }
}

// =============================================================================
// Ordering pass
// =============================================================================

#[test]
fn surviving_edges_are_respected() {
    let mut rng = Rng::with_seed(7);
    for _ in 0..20 {
        let mut manager = random_manager(&mut rng, 120);
        let mut host = MockHost::default();
        manager.run_ordering_pass(&mut host);

        let position: FxHashMap<u32, usize> = manager
            .last_order()
            .iter()
            .enumerate()
            .map(|(i, &k)| (k, i))
            .collect();
        for (from, to) in manager.working_edges() {
            assert!(position[&from] < position[&to], "{} must precede {}", from, to);
            assert!(host.orders[&from] < host.orders[&to]);
        }
    }
}

#[test]
fn every_working_set_member_gets_a_distinct_order() {
    let mut rng = Rng::with_seed(8);
    let mut manager = random_manager(&mut rng, 150);
    let mut host = MockHost::default();
    let stats = manager.run_ordering_pass(&mut host);

    assert_eq!(stats.working_set + stats.background, 150);
    assert_eq!(host.writes, 150);
    let distinct: FxHashSet<i32> = host.orders.values().copied().collect();
    assert_eq!(distinct.len(), 150);
}

#[test]
fn background_band_is_below_main_band() {
    let mut rng = Rng::with_seed(9);
    for stride in [1u32, 2, 5] {
        let config = SortConfig::new().with_order_stride(stride);
        let mut manager = IsoSortingManager::with_config(&config).unwrap();
        let mut background = FxHashSet::default();
        for key in 0..100u32 {
            let desc = random_descriptor(&mut rng, 100.0).with_always_behind(key % 4 == 0);
            if desc.force_always_behind {
                background.insert(key);
            }
            manager.register(key, desc).unwrap();
        }
        let mut host = MockHost::default();
        manager.run_ordering_pass(&mut host);

        let max_back = background.iter().map(|k| host.orders[k]).max().unwrap();
        let min_main = host
            .orders
            .iter()
            .filter(|(k, _)| !background.contains(k))
            .map(|(_, o)| *o)
            .min()
            .unwrap();
        assert!(max_back < 0);
        assert!(max_back < min_main);
    }
}

#[test]
fn repeated_passes_give_the_same_order() {
    let mut rng = Rng::with_seed(10);
    let mut manager = random_manager(&mut rng, 200);
    let mut host = MockHost::default();

    manager.run_ordering_pass(&mut host);
    let first_order = manager.last_order().to_vec();
    let first_orders = host.orders.clone();

    manager.run_ordering_pass(&mut host);
    assert_eq!(manager.last_order(), first_order.as_slice());
    assert_eq!(host.orders, first_orders);
}

#[test]
fn hidden_sprites_keep_their_last_order() {
    let mut manager = IsoSortingManager::new();
    manager.register(1u32, point_sprite(0.0, 1.0)).unwrap();
    manager.register(2u32, point_sprite(0.0, 0.0)).unwrap();
    let mut host = MockHost::default();
    manager.run_ordering_pass(&mut host);
    assert_eq!(host.orders[&1], 0);
    assert_eq!(host.orders[&2], 1);

    host.hidden.insert(1);
    host.writes = 0;
    let stats = manager.run_ordering_pass(&mut host);
    assert_eq!(stats.working_set, 1);
    assert_eq!(host.writes, 1);
    // The stale order of 1 now ties with the fresh order of 2.
    assert_eq!(host.orders[&1], 0);
    assert_eq!(host.orders[&2], 0);
}

#[test]
fn moved_sprite_is_resorted() {
    let mut manager = IsoSortingManager::new();
    manager.register(1u32, point_sprite(0.0, 1.0).with_static(true)).unwrap();
    manager.register(2u32, point_sprite(0.0, 0.0)).unwrap();
    let mut host = MockHost::default();
    manager.run_ordering_pass(&mut host);
    assert_eq!(manager.last_order(), &[1, 2]);

    manager
        .update_sprite(
            2,
            Footprint::point(Vec2::new(0.0, 2.0)),
            Bounds2D::new(-2.0, 0.0, 2.0, 4.0),
        )
        .unwrap();
    manager.run_ordering_pass(&mut host);
    assert_eq!(manager.last_order(), &[2, 1]);
}

#[test]
fn unregistered_sprites_leave_the_pass() {
    let mut rng = Rng::with_seed(11);
    let mut manager = random_manager(&mut rng, 50);
    let mut host = MockHost::default();
    manager.run_ordering_pass(&mut host);

    for key in (0..50u32).step_by(3) {
        assert!(manager.unregister(key));
    }
    manager.run_ordering_pass(&mut host);
    let remaining: FxHashSet<u32> = manager.last_order().iter().copied().collect();
    assert_eq!(remaining.len(), manager.len());
    assert!((0..50u32).step_by(3).all(|k| !remaining.contains(&k)));
    for (from, to) in manager.working_edges() {
        assert!(remaining.contains(&from) && remaining.contains(&to));
    }
}
