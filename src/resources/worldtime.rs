//! Session clock.

use bevy_ecs::prelude::Resource;

/// Advanced once per frame by
/// [`update_world_time`](crate::systems::time::update_world_time).
/// `delta` already includes `time_scale`; `elapsed` sums the scaled deltas
/// and is what the shoot cooldown is measured against.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Slow motion below 1.0, frozen at 0.0. Negative scales clamp to 0.
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }
}
