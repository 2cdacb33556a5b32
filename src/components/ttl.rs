//! Lifetime countdown for short-lived entities.
//!
//! Player projectiles are spawned with a [`Ttl`] equal to the configured
//! projectile lifetime and disappear when it runs out, whether or not they
//! hit anything.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ttl {
    /// Seconds left.
    pub remaining: f32,
}

impl Ttl {
    pub fn new(seconds: f32) -> Self {
        Ttl { remaining: seconds }
    }

    /// Count down by `dt`; true once nothing is left.
    pub fn consume(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}
