//! Player movement/combat state machine.
//!
//! [`PlayerController`] holds everything that makes up one life of the
//! player character: health, jump bookkeeping, charge-jump accumulator,
//! knockback and invulnerability windows, shoot cooldown, terrain-stuck
//! recovery and the terminal dead flag. The host feeds it one
//! [`PlayerInput`] and one [`BodyContact`] per frame; the
//! [`player_controller_system`](crate::systems::player::player_controller_system)
//! calls [`PlayerController::tick`] with them.
//!
//! # Tick order
//!
//! 1. Ground reset (jump count back to 0), window timers count down
//! 2. Knockback lock: while active, voluntary handling (3–8) is skipped
//! 3. Horizontal movement and move/idle notification
//! 4. Charge jump
//! 5. Jump edge: wall jump, then normal/double jump
//! 6. Wall slide
//! 7. Airborne animation
//! 8. Shooting
//! 9. Terrain-stuck float, applied last and never locked out
//!
//! Exhausted or invalid jump attempts are silent no-ops. Damage while
//! invulnerable or dead is ignored completely.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;
use log::{debug, info};

use crate::components::rigidbody::RigidBody;
use crate::events::bus::EventBus;
use crate::events::gameevent::GameEvent;

/// Later jumps in the air use this fraction of `jump_speed`.
pub const DOUBLE_JUMP_FACTOR: f32 = 0.85;
/// Vertical part of a wall jump as a fraction of `jump_speed`.
pub const WALL_JUMP_VERTICAL_FACTOR: f32 = 0.9;
/// Seconds before another wall jump is allowed.
pub const WALL_JUMP_COOLDOWN: f32 = 0.3;

/// Tunable numbers of a player character.
///
/// Defaults come from [`GameConfig`](crate::resources::gameconfig::GameConfig);
/// level data may override `max_health`. Times are in seconds, speeds in
/// pixels per second.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub max_jumps: u32,
    pub wall_jump_speed: f32,
    pub wall_slide_speed: f32,
    pub min_charge_time: f32,
    pub max_charge_time: f32,
    pub charge_multiplier: f32,
    pub invulnerability_time: f32,
    pub knockback_time: f32,
    pub knockback_speed: f32,
    pub game_over_delay: f32,
    pub shoot_cooldown: f32,
    pub projectile_speed: f32,
    /// Fraction of the player's velocity a projectile inherits.
    pub projectile_inherit: f32,
    pub projectile_lifetime: f32,
    pub recoil: f32,
    pub stuck_check_interval: f32,
    pub stuck_float_speed: f32,
    /// Key of the sprite atlas used in animation requests.
    pub atlas_key: String,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 3,
            move_speed: 200.0,
            jump_speed: 400.0,
            max_jumps: 2,
            wall_jump_speed: 250.0,
            wall_slide_speed: 60.0,
            min_charge_time: 0.2,
            max_charge_time: 1.0,
            charge_multiplier: 1.8,
            invulnerability_time: 1.0,
            knockback_time: 0.25,
            knockback_speed: 200.0,
            game_over_delay: 2.0,
            shoot_cooldown: 0.3,
            projectile_speed: 500.0,
            projectile_inherit: 0.5,
            projectile_lifetime: 1.5,
            recoil: 60.0,
            stuck_check_interval: 0.1,
            stuck_float_speed: 120.0,
            atlas_key: "player".to_string(),
        }
    }
}

/// Per-frame input written by the host.
///
/// `*_pressed` and `charge_released` are edges: true only on the frame the
/// button changed. The controller system clears them after each tick.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
    pub charge_held: bool,
    pub charge_released: bool,
    pub fire_pressed: bool,
}

impl PlayerInput {
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.charge_released = false;
        self.fire_pressed = false;
    }
}

/// Per-frame "blocked" flags from the host physics.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyContact {
    pub grounded: bool,
    pub wall_left: bool,
    pub wall_right: bool,
}

impl BodyContact {
    pub fn touching_wall(&self) -> bool {
        self.wall_left || self.wall_right
    }
}

/// Result of [`PlayerController::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerable or already dead; nothing changed.
    Ignored,
    Hurt,
    /// This hit was lethal. Returned once per life.
    Died,
}

/// A projectile the controller wants spawned at the player's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub velocity: Vec2,
    pub lifetime: f32,
}

#[derive(Component, Clone, Debug)]
pub struct PlayerController {
    pub tuning: PlayerTuning,
    pub health: i32,
    pub jump_count: u32,
    pub wall_jump_cooldown: f32,
    pub knockback_remaining: f32,
    pub invulnerable: bool,
    pub invulnerable_remaining: f32,
    pub charging: bool,
    pub charge_elapsed: f32,
    /// World time of the last shot, in seconds.
    pub last_shot_at: f32,
    /// -1.0 facing left, 1.0 facing right.
    pub facing: f32,
    pub stuck: bool,
    stuck_check_elapsed: f32,
    current_animation: Option<&'static str>,
    pub dead: bool,
}

impl PlayerController {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            health: tuning.max_health,
            tuning,
            jump_count: 0,
            wall_jump_cooldown: 0.0,
            knockback_remaining: 0.0,
            invulnerable: false,
            invulnerable_remaining: 0.0,
            charging: false,
            charge_elapsed: 0.0,
            last_shot_at: f32::NEG_INFINITY,
            facing: 1.0,
            stuck: false,
            stuck_check_elapsed: 0.0,
            current_animation: None,
            dead: false,
        }
    }

    pub fn max_health(&self) -> i32 {
        self.tuning.max_health
    }

    /// Advance one frame. Returns a projectile to spawn, if the player fired.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        sprite: Entity,
        input: &PlayerInput,
        contact: &BodyContact,
        body: &mut RigidBody,
        dt: f32,
        now: f32,
        bus: &EventBus,
    ) -> Option<Shot> {
        if self.dead {
            return None;
        }

        if contact.grounded {
            self.jump_count = 0;
        }
        self.count_down_windows(dt);

        let shot = if self.knockback_remaining > 0.0 {
            self.knockback_remaining = (self.knockback_remaining - dt).max(0.0);
            None
        } else {
            self.voluntary(sprite, input, contact, body, dt, now, bus)
        };

        if self.stuck {
            body.velocity.y = -self.tuning.stuck_float_speed;
        }
        shot
    }

    fn count_down_windows(&mut self, dt: f32) {
        if self.invulnerable {
            self.invulnerable_remaining -= dt;
            if self.invulnerable_remaining <= 0.0 {
                self.invulnerable = false;
                self.invulnerable_remaining = 0.0;
            }
        }
        if self.wall_jump_cooldown > 0.0 {
            self.wall_jump_cooldown = (self.wall_jump_cooldown - dt).max(0.0);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn voluntary(
        &mut self,
        sprite: Entity,
        input: &PlayerInput,
        contact: &BodyContact,
        body: &mut RigidBody,
        dt: f32,
        now: f32,
        bus: &EventBus,
    ) -> Option<Shot> {
        self.horizontal(input, body, bus);
        self.charge(input, contact, body, dt, bus);
        if input.jump_pressed && !self.charging {
            self.jump(contact, body, bus);
        }

        let sliding = !contact.grounded && contact.touching_wall() && body.velocity.y > 0.0;
        if sliding {
            body.velocity.y = body.velocity.y.min(self.tuning.wall_slide_speed);
            self.play_animation(sprite, "climb", bus);
        } else if !contact.grounded {
            self.play_animation(sprite, "jump", bus);
        } else if !self.charging {
            let name = if body.velocity.x != 0.0 { "run" } else { "idle" };
            self.play_animation(sprite, name, bus);
        }

        if input.fire_pressed {
            return self.fire(body, now, bus);
        }
        None
    }

    fn horizontal(&mut self, input: &PlayerInput, body: &mut RigidBody, bus: &EventBus) {
        let direction = match (input.left, input.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        body.velocity.x = direction * self.tuning.move_speed;
        if direction != 0.0 {
            self.facing = direction;
        }
        if self.charging {
            return;
        }
        if direction != 0.0 {
            bus.emit(GameEvent::PlayerMove {
                direction,
                velocity: body.velocity.x,
            });
        } else {
            bus.emit(GameEvent::PlayerIdle);
        }
    }

    fn charge(
        &mut self,
        input: &PlayerInput,
        contact: &BodyContact,
        body: &mut RigidBody,
        dt: f32,
        bus: &EventBus,
    ) {
        if self.charging && !contact.grounded {
            debug!("Charge cancelled: left the ground");
            self.reset_charge();
            return;
        }
        if !self.charging && input.charge_held && !input.charge_released && contact.grounded {
            self.charging = true;
            self.charge_elapsed = 0.0;
            return;
        }
        if !self.charging {
            return;
        }
        if input.charge_held {
            let max = self.tuning.max_charge_time.max(0.0);
            self.charge_elapsed = (self.charge_elapsed + dt).clamp(0.0, max);
        }
        if input.charge_released {
            let elapsed = self.charge_elapsed;
            self.reset_charge();
            if elapsed < self.tuning.min_charge_time {
                return;
            }
            // A zero-length charge window counts as fully charged.
            let percent = if self.tuning.max_charge_time > 0.0 {
                elapsed / self.tuning.max_charge_time
            } else {
                1.0
            };
            let velocity =
                -self.tuning.jump_speed * (1.0 + percent * (self.tuning.charge_multiplier - 1.0));
            body.velocity.y = velocity;
            self.jump_count = 1;
            bus.emit(GameEvent::PlayerChargeJump {
                charge_time: elapsed,
                velocity,
            });
        }
    }

    fn reset_charge(&mut self) {
        self.charging = false;
        self.charge_elapsed = 0.0;
    }

    fn jump(&mut self, contact: &BodyContact, body: &mut RigidBody, bus: &EventBus) {
        if contact.touching_wall() && !contact.grounded && self.wall_jump_cooldown <= 0.0 {
            let direction = if contact.wall_left { 1.0 } else { -1.0 };
            body.velocity.x = direction * self.tuning.wall_jump_speed;
            body.velocity.y = -self.tuning.jump_speed * WALL_JUMP_VERTICAL_FACTOR;
            self.wall_jump_cooldown = WALL_JUMP_COOLDOWN;
            self.jump_count = 1;
            self.facing = direction;
            bus.emit(GameEvent::PlayerWallJump { direction });
            return;
        }
        if self.jump_count >= self.tuning.max_jumps {
            return;
        }
        if self.jump_count == 0 {
            let velocity = -self.tuning.jump_speed;
            body.velocity.y = velocity;
            self.jump_count = 1;
            bus.emit(GameEvent::PlayerJump { velocity });
        } else {
            body.velocity.y = -self.tuning.jump_speed * DOUBLE_JUMP_FACTOR;
            self.jump_count += 1;
            bus.emit(GameEvent::PlayerDoubleJump {
                jump_count: self.jump_count,
            });
        }
    }

    fn fire(&mut self, body: &mut RigidBody, now: f32, bus: &EventBus) -> Option<Shot> {
        if now - self.last_shot_at < self.tuning.shoot_cooldown {
            return None;
        }
        self.last_shot_at = now;
        let velocity = Vec2::new(self.facing * self.tuning.projectile_speed, 0.0)
            + body.velocity * self.tuning.projectile_inherit;
        body.apply_impulse(Vec2::new(-self.facing * self.tuning.recoil, 0.0));
        bus.emit(GameEvent::sound("shoot"));
        Some(Shot {
            velocity,
            lifetime: self.tuning.projectile_lifetime,
        })
    }

    fn play_animation(&mut self, sprite: Entity, name: &'static str, bus: &EventBus) {
        if self.current_animation == Some(name) {
            return;
        }
        self.current_animation = Some(name);
        bus.emit(GameEvent::animation(sprite, &self.tuning.atlas_key, name));
    }

    /// Accumulate `dt` and report whether a terrain overlap check is due.
    pub fn stuck_check_due(&mut self, dt: f32) -> bool {
        self.stuck_check_elapsed += dt;
        if self.stuck_check_elapsed >= self.tuning.stuck_check_interval {
            self.stuck_check_elapsed = 0.0;
            return true;
        }
        false
    }

    /// Record the result of a terrain overlap check.
    pub fn set_stuck(&mut self, stuck: bool) {
        if stuck != self.stuck {
            debug!(
                "Player {} terrain",
                if stuck { "stuck in" } else { "freed from" }
            );
        }
        self.stuck = stuck;
    }

    /// Apply a hit. Knockback goes sideways on the ground, upwards in the air.
    /// Non-positive amounts are not hits.
    pub fn take_damage(
        &mut self,
        amount: i32,
        grounded: bool,
        body: &mut RigidBody,
        bus: &EventBus,
    ) -> DamageOutcome {
        if self.dead || self.invulnerable || amount <= 0 {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount).clamp(0, self.tuning.max_health);
        self.invulnerable = true;
        self.invulnerable_remaining = self.tuning.invulnerability_time;
        self.knockback_remaining = self.tuning.knockback_time;
        self.reset_charge();
        if grounded {
            body.velocity.x = -self.facing * self.tuning.knockback_speed;
        } else {
            body.velocity.y = -self.tuning.knockback_speed;
        }
        bus.emit(GameEvent::PlayerDamage {
            damage: amount,
            health: self.health,
        });
        bus.emit(GameEvent::sound("hit"));

        if self.health > 0 {
            return DamageOutcome::Hurt;
        }

        self.dead = true;
        body.freeze();
        info!("Player died");
        bus.emit(GameEvent::PlayerDeath);
        bus.emit(GameEvent::sound("die"));
        DamageOutcome::Died
    }

    /// Restore health, clamped to the maximum. Returns the new health.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.dead {
            self.health = (self.health + amount.max(0)).min(self.tuning.max_health);
        }
        self.health
    }

    /// Start a fresh life at `position`.
    pub fn respawn(&mut self, body: &mut RigidBody, position: Vec2, bus: &EventBus) {
        *self = PlayerController::new(self.tuning.clone());
        body.velocity = Vec2::ZERO;
        body.unfreeze();
        info!("Player respawned at ({}, {})", position.x, position.y);
        bus.emit(GameEvent::PlayerRespawn { position });
    }
}
