//! Scripted trigger zones.
//!
//! A [`Trigger`] sits on a zone entity. When the player overlaps the zone,
//! [`trigger_overlap_observer`](crate::systems::trigger::trigger_overlap_observer)
//! resolves the configured target through the
//! [`EntityRegistry`](crate::resources::registry::EntityRegistry) and
//! inserts a [`TriggerTask`] on the zone. The task counts down the start
//! delay and then runs the action as a queue of [`TaskPhase`]s, driven by
//! [`trigger_task_system`](crate::systems::trigger::trigger_task_system).
//!
//! ```text
//!   Idle ──activate──▶ Triggered ──(repeat && action done)──▶ Idle
//!                          │
//!                          └──(reset)──▶ Idle
//! ```
//!
//! The task is owned by the zone entity: despawning the zone cancels any
//! pending work.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::tween::{Easing, Vec2Tween};

/// Seconds spent tweening into and out of a scale action.
pub const SCALE_TWEEN_TIME: f32 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriggerState {
    #[default]
    Idle,
    Triggered,
}

/// What a trigger does to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerAction {
    /// Move at `velocity` (pixels/s) for the trigger duration.
    Move {
        velocity: Vec2,
        return_to_origin: bool,
    },
    /// Scale to `scale`, hold for the trigger duration, scale back.
    Scale { scale: Vec2 },
}

impl TriggerAction {
    pub fn name(&self) -> &'static str {
        match self {
            TriggerAction::Move { .. } => "move",
            TriggerAction::Scale { .. } => "scale",
        }
    }
}

/// Immutable configuration of a trigger, built from level data.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerConfig {
    pub target_uuid: String,
    pub action: TriggerAction,
    /// Seconds.
    pub duration: f32,
    pub repeat: bool,
    /// Seconds between activation and the start of the action.
    pub delay: f32,
    pub easing: Easing,
}

/// Target values recorded the first time the action starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapturedState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub scale: Vec2,
}

#[derive(Component, Clone, Debug)]
pub struct Trigger {
    pub config: TriggerConfig,
    pub state: TriggerState,
    pub captured: Option<CapturedState>,
}

impl Trigger {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            state: TriggerState::Idle,
            captured: None,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.state == TriggerState::Triggered
    }

    /// Force the trigger back to `Idle` and forget the captured snapshot.
    pub fn reset(&mut self) {
        self.state = TriggerState::Idle;
        self.captured = None;
    }
}

/// One step of a running trigger action.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskPhase {
    /// Tween the target's position.
    Position(Vec2Tween),
    /// Tween the target's scale.
    Scale(Vec2Tween),
    /// Hold the target's velocity at `velocity` for `remaining` seconds.
    Drive { velocity: Vec2, remaining: f32 },
    /// Put the target's velocity back.
    RestoreVelocity(Vec2),
    /// Do nothing for `remaining` seconds.
    Hold { remaining: f32 },
}

/// Pending or running action of a trigger, stored on the trigger entity.
#[derive(Component, Clone, Debug)]
pub struct TriggerTask {
    pub target: Entity,
    pub delay_remaining: f32,
    /// Empty until the delay has elapsed and the action has started.
    pub phases: VecDeque<TaskPhase>,
    pub started: bool,
}

impl TriggerTask {
    pub fn new(target: Entity, delay: f32) -> Self {
        Self {
            target,
            delay_remaining: delay.max(0.0),
            phases: VecDeque::new(),
            started: false,
        }
    }
}

/// Expand `config.action` into phases for a target currently at `position`
/// with scale `scale`.
///
/// `dynamic` selects velocity driving instead of position tweening for move
/// actions. Return legs go back to the `captured` values.
pub fn plan_phases(
    config: &TriggerConfig,
    captured: &CapturedState,
    position: Vec2,
    scale: Vec2,
    dynamic: bool,
) -> VecDeque<TaskPhase> {
    let mut phases = VecDeque::new();
    match config.action {
        TriggerAction::Move {
            velocity,
            return_to_origin,
        } => {
            if dynamic {
                phases.push_back(TaskPhase::Drive {
                    velocity,
                    remaining: config.duration,
                });
                phases.push_back(TaskPhase::RestoreVelocity(captured.velocity));
            } else {
                let destination = position + velocity * config.duration;
                phases.push_back(TaskPhase::Position(
                    Vec2Tween::new(position, destination, config.duration)
                        .with_easing(config.easing),
                ));
                if return_to_origin {
                    phases.push_back(TaskPhase::Position(
                        Vec2Tween::new(destination, captured.position, config.duration)
                            .with_easing(config.easing),
                    ));
                }
            }
        }
        TriggerAction::Scale { scale: target } => {
            phases.push_back(TaskPhase::Scale(
                Vec2Tween::new(scale, target, SCALE_TWEEN_TIME).with_easing(config.easing),
            ));
            phases.push_back(TaskPhase::Hold {
                remaining: config.duration,
            });
            phases.push_back(TaskPhase::Scale(
                Vec2Tween::new(target, captured.scale, SCALE_TWEEN_TIME)
                    .with_easing(config.easing),
            ));
        }
    }
    phases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(action: TriggerAction) -> TriggerConfig {
        TriggerConfig {
            target_uuid: "t".to_string(),
            action,
            duration: 1.0,
            repeat: false,
            delay: 0.0,
            easing: Easing::Linear,
        }
    }

    fn captured() -> CapturedState {
        CapturedState {
            position: Vec2::new(10.0, 20.0),
            velocity: Vec2::new(1.0, 2.0),
            scale: Vec2::ONE,
        }
    }

    #[test]
    fn test_reset_clears_state_and_snapshot() {
        let mut t = Trigger::new(config(TriggerAction::Scale { scale: Vec2::ONE }));
        t.state = TriggerState::Triggered;
        t.captured = Some(captured());
        t.reset();
        assert_eq!(t.state, TriggerState::Idle);
        assert!(t.captured.is_none());
    }

    #[test]
    fn test_plan_static_move_with_return() {
        let cfg = config(TriggerAction::Move {
            velocity: Vec2::new(100.0, 0.0),
            return_to_origin: true,
        });
        let phases = plan_phases(&cfg, &captured(), Vec2::new(10.0, 20.0), Vec2::ONE, false);
        assert_eq!(phases.len(), 2);
        match (&phases[0], &phases[1]) {
            (TaskPhase::Position(out), TaskPhase::Position(back)) => {
                assert_eq!(out.to, Vec2::new(110.0, 20.0));
                assert_eq!(back.to, Vec2::new(10.0, 20.0));
            }
            other => panic!("unexpected phases {:?}", other),
        }
    }

    #[test]
    fn test_plan_dynamic_move_restores_velocity() {
        let cfg = config(TriggerAction::Move {
            velocity: Vec2::new(0.0, -50.0),
            return_to_origin: true,
        });
        let phases = plan_phases(&cfg, &captured(), Vec2::ZERO, Vec2::ONE, true);
        assert_eq!(
            phases.back(),
            Some(&TaskPhase::RestoreVelocity(Vec2::new(1.0, 2.0)))
        );
        assert_eq!(phases.len(), 2);
    }

    #[test]
    fn test_plan_scale_tweens_holds_and_returns() {
        let cfg = config(TriggerAction::Scale {
            scale: Vec2::splat(2.0),
        });
        let phases = plan_phases(&cfg, &captured(), Vec2::ZERO, Vec2::ONE, false);
        assert_eq!(phases.len(), 3);
        assert_eq!(phases[1], TaskPhase::Hold { remaining: 1.0 });
        match &phases[2] {
            TaskPhase::Scale(tw) => {
                assert_eq!(tw.to, Vec2::ONE);
                assert!((tw.duration - SCALE_TWEEN_TIME).abs() < 1e-6);
            }
            other => panic!("unexpected phase {:?}", other),
        }
    }
}
