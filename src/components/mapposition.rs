//! World-space position of an entity.
//!
//! The position is the entity's pivot in level coordinates (pixels, y grows
//! downwards). It is written by the host physics step, by trigger move
//! actions and by terrain recovery.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
