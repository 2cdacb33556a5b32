//! Domain events published on the [`EventBus`](super::bus::EventBus).
//!
//! Every notification the core produces is a variant of the sealed
//! [`GameEvent`] enum. Each variant has exactly one payload shape, so
//! producers and consumers agree at compile time and listeners match on the
//! variant instead of inspecting a loosely typed payload. [`EventKind`] is
//! the payload-free discriminant used to key subscriptions.
//!
//! | Kind | Payload |
//! |---|---|
//! | `player.jump` | velocity |
//! | `player.doubleJump` | jump count |
//! | `player.wallJump` | direction |
//! | `player.chargeJump` | charge time, velocity |
//! | `player.move` / `player.idle` | direction, velocity / none |
//! | `player.damage` / `player.death` / `player.respawn` | damage, health / none / position |
//! | `animation.*` | sprite, atlas key, animation name |
//! | `sound.*` | key, optional volume |
//! | `item.collect` / `goal.reached` / `obstacle.destroyed` | type, value / none / position, type |
//! | `game.start` / `game.over` / `game.victory` | none / optional reason / optional score |

use bevy_ecs::prelude::Entity;
use glam::Vec2;

/// Closed set of event kinds a listener can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    PlayerJump,
    PlayerDoubleJump,
    PlayerWallJump,
    PlayerChargeJump,
    PlayerMove,
    PlayerIdle,
    PlayerDamage,
    PlayerDeath,
    PlayerRespawn,
    AnimationPlay,
    AnimationStop,
    AnimationComplete,
    SoundPlay,
    SoundStop,
    SoundVolumeChange,
    ItemCollect,
    GoalReached,
    ObstacleDestroyed,
    GameStart,
    GameOver,
    GameVictory,
}

impl EventKind {
    pub const ALL: [EventKind; 21] = [
        EventKind::PlayerJump,
        EventKind::PlayerDoubleJump,
        EventKind::PlayerWallJump,
        EventKind::PlayerChargeJump,
        EventKind::PlayerMove,
        EventKind::PlayerIdle,
        EventKind::PlayerDamage,
        EventKind::PlayerDeath,
        EventKind::PlayerRespawn,
        EventKind::AnimationPlay,
        EventKind::AnimationStop,
        EventKind::AnimationComplete,
        EventKind::SoundPlay,
        EventKind::SoundStop,
        EventKind::SoundVolumeChange,
        EventKind::ItemCollect,
        EventKind::GoalReached,
        EventKind::ObstacleDestroyed,
        EventKind::GameStart,
        EventKind::GameOver,
        EventKind::GameVictory,
    ];

    /// Dotted name used in logs and by collaborators that key on strings.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::PlayerJump => "player.jump",
            EventKind::PlayerDoubleJump => "player.doubleJump",
            EventKind::PlayerWallJump => "player.wallJump",
            EventKind::PlayerChargeJump => "player.chargeJump",
            EventKind::PlayerMove => "player.move",
            EventKind::PlayerIdle => "player.idle",
            EventKind::PlayerDamage => "player.damage",
            EventKind::PlayerDeath => "player.death",
            EventKind::PlayerRespawn => "player.respawn",
            EventKind::AnimationPlay => "animation.play",
            EventKind::AnimationStop => "animation.stop",
            EventKind::AnimationComplete => "animation.complete",
            EventKind::SoundPlay => "sound.play",
            EventKind::SoundStop => "sound.stop",
            EventKind::SoundVolumeChange => "sound.volumeChange",
            EventKind::ItemCollect => "item.collect",
            EventKind::GoalReached => "goal.reached",
            EventKind::ObstacleDestroyed => "obstacle.destroyed",
            EventKind::GameStart => "game.start",
            EventKind::GameOver => "game.over",
            EventKind::GameVictory => "game.victory",
        }
    }

    /// Inverse of [`EventKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Sprite animation request or notification.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationRequest {
    pub sprite: Entity,
    pub atlas_key: String,
    pub animation_name: String,
}

/// Sound effect request.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundRequest {
    pub key: String,
    pub volume: Option<f32>,
}

/// A published notification together with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PlayerJump { velocity: f32 },
    PlayerDoubleJump { jump_count: u32 },
    /// `direction` is the horizontal sign of the kick away from the wall.
    PlayerWallJump { direction: f32 },
    PlayerChargeJump { charge_time: f32, velocity: f32 },
    PlayerMove { direction: f32, velocity: f32 },
    PlayerIdle,
    PlayerDamage { damage: i32, health: i32 },
    PlayerDeath,
    PlayerRespawn { position: Vec2 },
    AnimationPlay(AnimationRequest),
    AnimationStop(AnimationRequest),
    AnimationComplete(AnimationRequest),
    SoundPlay(SoundRequest),
    SoundStop(SoundRequest),
    SoundVolumeChange(SoundRequest),
    ItemCollect { item_type: String, value: i32 },
    GoalReached,
    ObstacleDestroyed { position: Vec2, obstacle_type: String },
    GameStart,
    GameOver { reason: Option<String> },
    GameVictory { score: Option<u32> },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::PlayerJump { .. } => EventKind::PlayerJump,
            GameEvent::PlayerDoubleJump { .. } => EventKind::PlayerDoubleJump,
            GameEvent::PlayerWallJump { .. } => EventKind::PlayerWallJump,
            GameEvent::PlayerChargeJump { .. } => EventKind::PlayerChargeJump,
            GameEvent::PlayerMove { .. } => EventKind::PlayerMove,
            GameEvent::PlayerIdle => EventKind::PlayerIdle,
            GameEvent::PlayerDamage { .. } => EventKind::PlayerDamage,
            GameEvent::PlayerDeath => EventKind::PlayerDeath,
            GameEvent::PlayerRespawn { .. } => EventKind::PlayerRespawn,
            GameEvent::AnimationPlay(_) => EventKind::AnimationPlay,
            GameEvent::AnimationStop(_) => EventKind::AnimationStop,
            GameEvent::AnimationComplete(_) => EventKind::AnimationComplete,
            GameEvent::SoundPlay(_) => EventKind::SoundPlay,
            GameEvent::SoundStop(_) => EventKind::SoundStop,
            GameEvent::SoundVolumeChange(_) => EventKind::SoundVolumeChange,
            GameEvent::ItemCollect { .. } => EventKind::ItemCollect,
            GameEvent::GoalReached => EventKind::GoalReached,
            GameEvent::ObstacleDestroyed { .. } => EventKind::ObstacleDestroyed,
            GameEvent::GameStart => EventKind::GameStart,
            GameEvent::GameOver { .. } => EventKind::GameOver,
            GameEvent::GameVictory { .. } => EventKind::GameVictory,
        }
    }

    /// Build the event for a kind whose payload is empty or entirely optional.
    ///
    /// Returns `None` for kinds that require data.
    pub fn without_payload(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::PlayerIdle => Some(GameEvent::PlayerIdle),
            EventKind::PlayerDeath => Some(GameEvent::PlayerDeath),
            EventKind::GoalReached => Some(GameEvent::GoalReached),
            EventKind::GameStart => Some(GameEvent::GameStart),
            EventKind::GameOver => Some(GameEvent::GameOver { reason: None }),
            EventKind::GameVictory => Some(GameEvent::GameVictory { score: None }),
            _ => None,
        }
    }

    /// Sound effect request at default volume.
    pub fn sound(key: impl Into<String>) -> Self {
        GameEvent::SoundPlay(SoundRequest {
            key: key.into(),
            volume: None,
        })
    }

    /// Animation play request for `sprite`.
    pub fn animation(sprite: Entity, atlas_key: &str, animation_name: &str) -> Self {
        GameEvent::AnimationPlay(AnimationRequest {
            sprite,
            atlas_key: atlas_key.to_string(),
            animation_name: animation_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EventKind::from_name("player.fly"), None);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = EventKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EventKind::ALL.len());
    }

    #[test]
    fn test_without_payload_matches_kind() {
        for kind in EventKind::ALL {
            if let Some(event) = GameEvent::without_payload(kind) {
                assert_eq!(event.kind(), kind);
            }
        }
        assert!(GameEvent::without_payload(EventKind::PlayerJump).is_none());
        assert!(GameEvent::without_payload(EventKind::SoundPlay).is_none());
    }

    #[test]
    fn test_sound_helper() {
        let event = GameEvent::sound("hit");
        assert_eq!(event.kind(), EventKind::SoundPlay);
        match event {
            GameEvent::SoundPlay(req) => {
                assert_eq!(req.key, "hit");
                assert!(req.volume.is_none());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
