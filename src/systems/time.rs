//! Frame clock update, run by the host before the per-frame schedule.

use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance [`WorldTime`] by one frame of `dt` unscaled seconds. Negative
/// deltas count as zero.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut clock = world.resource_mut::<WorldTime>();
    let step = dt.max(0.0) * clock.time_scale;
    clock.delta = step;
    clock.elapsed += step;
    clock.frame_count += 1;
}
