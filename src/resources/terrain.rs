//! Solid tile set of the current level.
//!
//! The host physics owns real collision. The core keeps this coarse grid so
//! the player controller can tell when it has been pushed inside terrain
//! (and float out), and so the headless runner can derive
//! [`BodyContact`](crate::components::player::BodyContact) flags without a
//! physics engine.

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use rustc_hash::FxHashSet;

/// Inset applied to boxes before testing, so resting exactly on a tile edge
/// does not count as an overlap.
const EDGE_TOLERANCE: f32 = 0.01;

#[derive(Resource, Debug, Clone)]
pub struct TerrainMap {
    pub tile_size: f32,
    solid: FxHashSet<(i32, i32)>,
}

impl Default for TerrainMap {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl TerrainMap {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size: tile_size.max(1.0),
            solid: FxHashSet::default(),
        }
    }

    pub fn with_tiles(tile_size: f32, tiles: impl IntoIterator<Item = (i32, i32)>) -> Self {
        let mut map = Self::new(tile_size);
        map.solid.extend(tiles);
        map
    }

    pub fn tile_at(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.tile_size).floor() as i32,
            (point.y / self.tile_size).floor() as i32,
        )
    }

    pub fn solid_count(&self) -> usize {
        self.solid.len()
    }

    /// Whether the box `[min, max]` intersects any solid tile.
    pub fn overlaps_solid(&self, min: Vec2, max: Vec2) -> bool {
        if self.solid.is_empty() {
            return false;
        }
        let inset = Vec2::splat(EDGE_TOLERANCE);
        let (min, max) = (min + inset, max - inset);
        if min.x > max.x || min.y > max.y {
            return false;
        }
        let (x0, y0) = self.tile_at(min);
        let (x1, y1) = self.tile_at(max);
        (y0..=y1).any(|ty| (x0..=x1).any(|tx| self.solid.contains(&(tx, ty))))
    }
}
