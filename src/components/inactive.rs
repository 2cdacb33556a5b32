//! Marker for world objects that exist but take no part in gameplay.
//!
//! A registry lookup that lands on an entity carrying [`Inactive`] is treated
//! the same as a missing target: triggers refuse to act on it.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Inactive;
