//! Velocity integration.
//!
//! Stand-in for the host physics step in the headless runner: applies each
//! body's acceleration forces, caps the fall speed and moves
//! [`MapPosition`] by `velocity * delta`. Frozen bodies are left alone.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

pub fn movement_system(mut query: Query<(&mut MapPosition, &mut RigidBody)>, time: Res<WorldTime>) {
    let dt = time.delta;
    for (mut position, mut rigidbody) in query.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        let accel = rigidbody.total_acceleration();
        rigidbody.velocity += accel * dt;
        if let Some(max_fall) = rigidbody.max_fall_speed {
            rigidbody.velocity.y = rigidbody.velocity.y.min(max_fall);
        }
        position.pos += rigidbody.velocity * dt;
    }
}
