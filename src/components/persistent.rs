//! Marker for entities that survive [`load_level`](crate::game::load_level).
//!
//! Level loading despawns every positioned entity without it. Host-owned
//! objects placed in the world (cameras, HUD anchors) carry it.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Persistent;
