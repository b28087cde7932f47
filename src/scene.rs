//! Scene descriptions for the demo runner and tests.
//!
//! A [`SceneData`] lists sprites with their pivot, extent and sort handle.
//! It is either loaded from JSON or generated at random, then spawned into
//! a bevy [`World`].
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "width": 800.0,
//!   "height": 600.0,
//!   "sprites": [
//!     { "name": "wall", "x": 100.0, "y": 50.0, "width": 128.0, "height": 96.0,
//!       "origin_x": 64.0, "origin_y": 0.0, "sort_type": "line",
//!       "offsets": [[-64.0, 0.0], [64.0, 32.0]] },
//!     { "name": "hero", "x": 90.0, "y": 40.0, "width": 32.0, "height": 48.0,
//!       "origin_x": 16.0, "movable": true, "velocity": [30.0, 0.0] }
//!   ]
//! }
//! ```
//!
//! Omitted fields take their defaults: a point handle at the pivot, origin
//! at the top-left corner, static, not in the background band, no velocity.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::isosorting::IsoSorting;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::coords::{Bounds2D, Vec2};
use crate::sorting::footprint::SortType;

/// Share of random statics that are background tiles.
const BACKGROUND_SHARE: f32 = 0.1;
/// Share of random statics that are walls (line handles).
const WALL_SHARE: f32 = 0.35;
const MAX_MOVER_SPEED: f32 = 80.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneSprite {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub origin_x: f32,
    #[serde(default)]
    pub origin_y: f32,
    #[serde(default)]
    pub sort_type: SortType,
    /// Footprint points relative to the pivot.
    #[serde(default)]
    pub offsets: Vec<[f32; 2]>,
    #[serde(default)]
    pub movable: bool,
    #[serde(default)]
    pub render_below_all: bool,
    #[serde(default)]
    pub velocity: [f32; 2],
}

impl SceneSprite {
    pub fn sorting(&self) -> IsoSorting {
        IsoSorting {
            sort_type: self.sort_type,
            offsets: self.offsets.iter().copied().map(Vec2::from).collect(),
            render_below_all: self.render_below_all,
            movable: self.movable,
        }
    }

    pub fn sprite(&self) -> Sprite {
        Sprite::new(
            self.name.clone(),
            self.width,
            self.height,
            Vec2::new(self.origin_x, self.origin_y),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    pub width: f32,
    pub height: f32,
    pub sprites: Vec<SceneSprite>,
}

/// Final draw order of one sprite, as written by the demo's `--dump`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpEntry {
    pub name: String,
    pub z_index: i32,
}

impl SceneData {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        Self::from_json(&file_content)
    }

    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let scene: SceneData = serde_json::from_str(json)?;
        Ok(scene)
    }

    /// World rectangle of the scene, `(0, 0)` to `(width, height)`.
    pub fn area(&self) -> Bounds2D {
        Bounds2D::new(0.0, 0.0, self.width, self.height)
    }

    /// Random scene of `statics` fixed sprites and `movers` moving ones.
    ///
    /// Fixed sprites are a mix of props (point handles), walls (line
    /// handles sloping either way) and background tiles.
    pub fn random(width: f32, height: f32, statics: usize, movers: usize, seed: u64) -> Self {
        let mut rng = Rng::with_seed(seed);
        let area = Bounds2D::new(0.0, 0.0, width, height);
        let mut sprites = Vec::with_capacity(statics + movers);

        for i in 0..statics {
            let pos = area.random_pos(&mut rng);
            let roll = rng.f32();
            let sprite = if roll < BACKGROUND_SHARE {
                let size = 32.0 + rng.f32() * 64.0;
                SceneSprite {
                    name: format!("tile_{}", i),
                    x: pos.x,
                    y: pos.y,
                    width: size,
                    height: size * 0.5,
                    origin_x: size * 0.5,
                    origin_y: size * 0.25,
                    sort_type: SortType::Point,
                    offsets: Vec::new(),
                    movable: false,
                    render_below_all: true,
                    velocity: [0.0, 0.0],
                }
            } else if roll < BACKGROUND_SHARE + WALL_SHARE {
                let length = 64.0 + rng.f32() * 96.0;
                let rise = if rng.bool() { length * 0.5 } else { -length * 0.5 };
                SceneSprite {
                    name: format!("wall_{}", i),
                    x: pos.x,
                    y: pos.y,
                    width: length,
                    height: length * 0.5 + 64.0,
                    origin_x: length * 0.5,
                    origin_y: rise.abs() * 0.5,
                    sort_type: SortType::Line,
                    offsets: vec![[-length * 0.5, -rise * 0.5], [length * 0.5, rise * 0.5]],
                    movable: false,
                    render_below_all: false,
                    velocity: [0.0, 0.0],
                }
            } else {
                let size = 16.0 + rng.f32() * 48.0;
                SceneSprite {
                    name: format!("prop_{}", i),
                    x: pos.x,
                    y: pos.y,
                    width: size,
                    height: size * 1.5,
                    origin_x: size * 0.5,
                    origin_y: 0.0,
                    sort_type: SortType::Point,
                    offsets: Vec::new(),
                    movable: false,
                    render_below_all: false,
                    velocity: [0.0, 0.0],
                }
            };
            sprites.push(sprite);
        }

        for i in 0..movers {
            let pos = area.random_pos(&mut rng);
            let velocity = [
                (rng.f32() * 2.0 - 1.0) * MAX_MOVER_SPEED,
                (rng.f32() * 2.0 - 1.0) * MAX_MOVER_SPEED,
            ];
            sprites.push(SceneSprite {
                name: format!("mover_{}", i),
                x: pos.x,
                y: pos.y,
                width: 32.0,
                height: 48.0,
                origin_x: 16.0,
                origin_y: 0.0,
                sort_type: SortType::Point,
                offsets: Vec::new(),
                movable: true,
                render_below_all: false,
                velocity,
            });
        }

        SceneData {
            width,
            height,
            sprites,
        }
    }

    /// Spawn every sprite into `world`. Returns the spawned entities in
    /// scene order.
    pub fn spawn(&self, world: &mut World) -> Vec<Entity> {
        let entities: Vec<Entity> = self
            .sprites
            .iter()
            .map(|s| {
                let mut entity = world.spawn((
                    MapPosition::new(s.x, s.y),
                    s.sprite(),
                    s.sorting(),
                    ZIndex::default(),
                ));
                if s.movable && s.velocity != [0.0, 0.0] {
                    entity.insert(RigidBody::with_velocity(Vec2::from(s.velocity)));
                }
                entity.id()
            })
            .collect();
        info!(
            "Spawned {} sprites in a {}x{} scene",
            entities.len(),
            self.width,
            self.height
        );
        entities
    }
}

/// `(name, z_index)` of every sprite in `world`, back to front.
pub fn dump_draw_order(world: &mut World) -> Vec<DumpEntry> {
    let mut query = world.query::<(&Sprite, &ZIndex)>();
    let mut entries: Vec<DumpEntry> = query
        .iter(world)
        .map(|(sprite, zindex)| DumpEntry {
            name: sprite.name.clone(),
            z_index: zindex.0,
        })
        .collect();
    entries.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.name.cmp(&b.name)));
    entries
}
