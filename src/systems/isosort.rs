//! Depth sorting systems.
//!
//! These systems keep the [`IsoSorter`] resource in sync with entities that
//! carry an [`IsoSorting`] component and write the resulting draw order to
//! their [`ZIndex`].
//!
//! # System Flow
//!
//! Each frame, in this order:
//!
//! 1. [`register_iso_sprites`] registers newly added sort handles
//! 2. [`refresh_iso_sprites`] pushes moved or resized sprites to the sorter
//! 3. [`unregister_removed_iso_sprites`] drops sprites whose handle was
//!    removed or whose entity was despawned
//! 4. [`iso_sort_system`] runs the ordering pass and stores [`SortStats`]
//!
//! [`add_sort_systems`] adds all four to a schedule, chained.
//!
//! # Visibility
//!
//! A sprite takes part in the pass when it is not [`Hidden`] and its bounds
//! touch the [`SortView`] rectangle. A [`ForceSort`] marker overrides this
//! for one pass.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::forcesort::ForceSort;
use crate::components::hidden::Hidden;
use crate::components::isosorting::IsoSorting;
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::resources::isosorter::IsoSorter;
use crate::resources::sortstats::SortStats;
use crate::resources::sortview::SortView;
use crate::sorting::manager::SortHost;

type SortedSprite = (
    &'static MapPosition,
    &'static Sprite,
    &'static IsoSorting,
);

/// Register entities whose [`IsoSorting`] was just added.
///
/// Entities without a [`ZIndex`] get one, so the sort result has somewhere
/// to go.
pub fn register_iso_sprites(
    mut sorter: ResMut<IsoSorter>,
    query: Query<(Entity, SortedSprite, Has<ZIndex>), Added<IsoSorting>>,
    mut commands: Commands,
) {
    for (entity, (position, sprite, sorting), has_zindex) in query.iter() {
        let bounds = sprite.world_bounds(position.pos);
        let registered = sorting
            .descriptor_at(position.pos, bounds)
            .and_then(|descriptor| sorter.register(entity, descriptor));
        if let Err(err) = registered {
            warn!("Could not register {:?} ('{}') for sorting: {}", entity, sprite.name, err);
            continue;
        }
        if !has_zindex {
            commands.entity(entity).insert(ZIndex::default());
        }
    }
}

/// Refresh sorter geometry of sprites that moved, resized or changed handle.
///
/// A changed handle may move the sprite to another bucket, so it is
/// registered again from scratch.
pub fn refresh_iso_sprites(
    mut sorter: ResMut<IsoSorter>,
    query: Query<
        (Entity, &MapPosition, &Sprite, Ref<IsoSorting>),
        Or<(Changed<MapPosition>, Changed<Sprite>, Changed<IsoSorting>)>,
    >,
) {
    for (entity, position, sprite, sorting) in query.iter() {
        if sorting.is_added() {
            continue;
        }
        let bounds = sprite.world_bounds(position.pos);
        let result = if sorting.is_changed() {
            if sorter.contains(entity) {
                sorter.unregister(entity);
            }
            sorting
                .descriptor_at(position.pos, bounds)
                .and_then(|descriptor| sorter.register(entity, descriptor))
                .map(|_| ())
        } else if sorter.contains(entity) {
            sorting
                .footprint_at(position.pos)
                .and_then(|footprint| sorter.update_sprite(entity, footprint, bounds))
        } else {
            // Registration failed earlier and nothing about the handle changed.
            continue;
        };
        if let Err(err) = result {
            warn!("Could not refresh {:?} ('{}') for sorting: {}", entity, sprite.name, err);
        }
    }
}

/// Unregister sprites whose [`IsoSorting`] went away.
pub fn unregister_removed_iso_sprites(
    mut sorter: ResMut<IsoSorter>,
    mut removed: RemovedComponents<IsoSorting>,
) {
    for entity in removed.read() {
        if sorter.contains(entity) {
            sorter.unregister(entity);
        }
    }
}

type VisibilityData = (&'static MapPosition, &'static Sprite, Has<Hidden>);

struct EcsSortHost<'a, 'w1, 's1, 'w2, 's2> {
    view: &'a SortView,
    sprites: &'a Query<'w1, 's1, VisibilityData>,
    zindices: &'a mut Query<'w2, 's2, &'static mut ZIndex>,
}

impl SortHost<Entity> for EcsSortHost<'_, '_, '_, '_, '_> {
    fn is_visible(&self, key: Entity) -> bool {
        match self.sprites.get(key) {
            Ok((position, sprite, hidden)) => {
                !hidden && self.view.is_on_screen(&sprite.world_bounds(position.pos))
            }
            Err(_) => false,
        }
    }

    fn apply_draw_order(&mut self, key: Entity, order: i32) {
        if let Ok(mut zindex) = self.zindices.get_mut(key) {
            zindex.set_if_neq(ZIndex(order));
        }
    }
}

/// Run the ordering pass and write draw orders to [`ZIndex`].
///
/// [`ForceSort`] markers are handed to the sorter and removed.
pub fn iso_sort_system(
    mut sorter: ResMut<IsoSorter>,
    view: Res<SortView>,
    mut stats: ResMut<SortStats>,
    sprites: Query<VisibilityData>,
    mut zindices: Query<&'static mut ZIndex>,
    forced: Query<Entity, With<ForceSort>>,
    mut commands: Commands,
) {
    for entity in forced.iter() {
        sorter.force_sort(entity);
        commands.entity(entity).remove::<ForceSort>();
    }

    sorter.set_focus(view.focus_x);
    let mut host = EcsSortHost {
        view: &*view,
        sprites: &sprites,
        zindices: &mut zindices,
    };
    stats.last = sorter.run_ordering_pass(&mut host);
    stats.passes += 1;
}

/// Add the sorting systems to `schedule`, in their required order.
pub fn add_sort_systems(schedule: &mut Schedule) {
    schedule.add_systems(
        (
            register_iso_sprites,
            refresh_iso_sprites,
            unregister_removed_iso_sprites,
            iso_sort_system,
        )
            .chain(),
    );
}
