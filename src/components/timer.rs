//! One-shot countdown stored on the entity it belongs to.
//!
//! [`update_timers`](crate::systems::timer::update_timers) fires a
//! [`TimerEvent`](crate::events::timer::TimerEvent) carrying `signal` once
//! `elapsed` reaches `duration`, then removes the component. Despawning the
//! owner cancels the timer; the player's delayed game over is one of these.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Timer {
    /// Seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub signal: String,
}

impl Timer {
    pub fn new(duration: f32, signal: impl Into<String>) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            signal: signal.into(),
        }
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
