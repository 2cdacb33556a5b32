//! Fired by [`update_timers`](crate::systems::timer::update_timers) when a
//! [`Timer`](crate::components::timer::Timer) reaches its duration.
//!
//! Observers filter on `signal`; the session registers
//! [`game_over_observer`](crate::systems::timer::game_over_observer) for the
//! delayed game-over after the player dies.

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TimerEvent {
    /// Owner of the expired timer.
    pub entity: Entity,
    pub signal: String,
}
