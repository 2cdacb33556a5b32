//! One-shot timer systems.
//!
//! - [`update_timers`] accumulates delta time on every
//!   [`Timer`](crate::components::timer::Timer), triggers a
//!   [`TimerEvent`](crate::events::timer::TimerEvent) when it expires and
//!   removes the component
//! - [`game_over_observer`] turns the player's `"game_over"` timer into a
//!   [`GameEvent::GameOver`] on the bus

use bevy_ecs::prelude::*;
use log::info;

use crate::components::timer::Timer;
use crate::events::bus::EventBus;
use crate::events::gameevent::GameEvent;
use crate::events::timer::TimerEvent;
use crate::resources::worldtime::WorldTime;

/// Signal of the timer inserted on a player when it dies.
pub const GAME_OVER_SIGNAL: &str = "game_over";

pub fn update_timers(
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Timer)>,
    mut commands: Commands,
) {
    for (entity, mut timer) in query.iter_mut() {
        timer.elapsed += world_time.delta;
        if timer.finished() {
            commands.trigger(TimerEvent {
                entity,
                signal: timer.signal.clone(),
            });
            commands.entity(entity).remove::<Timer>();
        }
    }
}

pub fn game_over_observer(trigger: On<TimerEvent>, bus: Res<EventBus>) {
    let event = trigger.event();
    if event.signal != GAME_OVER_SIGNAL {
        return;
    }
    info!("Game over");
    bus.emit(GameEvent::GameOver {
        reason: Some("player_died".to_string()),
    });
}
