//! Velocity, motion kind and constant accelerations of a body.
//!
//! The player gets a `"gravity"` force and a fall-speed cap from the
//! session config; platforms usually carry none. A frozen body is skipped by
//! the [`movement_system`](crate::systems::movement::movement_system); the
//! controller freezes the player on death.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// How the host physics treats a body.
///
/// Trigger move actions branch on this: `Static` and `Kinematic` bodies are
/// tweened by position, `Dynamic` bodies are driven through their velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyKind {
    #[default]
    Static,
    Kinematic,
    Dynamic,
}

impl BodyKind {
    /// Parse the level-data spelling (`static`, `kinematic`, `dynamic`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "static" => Some(BodyKind::Static),
            "kinematic" => Some(BodyKind::Kinematic),
            "dynamic" => Some(BodyKind::Dynamic),
            _ => None,
        }
    }
}

/// Written by the player controller and trigger actions, integrated into
/// [`MapPosition`](super::mapposition::MapPosition) by the movement system.
#[derive(Component, Clone, Debug, Default)]
pub struct RigidBody {
    /// Pixels per second.
    pub velocity: Vec2,
    pub kind: BodyKind,
    /// Named accelerations in pixels/s², summed every frame.
    pub forces: FxHashMap<String, Vec2>,
    /// Cap on downward (positive y) speed.
    pub max_fall_speed: Option<f32>,
    pub frozen: bool,
}

impl RigidBody {
    /// A still `Static` body.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: BodyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Insert or replace the force called `name`.
    pub fn add_force(&mut self, name: &str, value: Vec2) {
        self.forces.insert(name.to_string(), value);
    }

    pub fn total_acceleration(&self) -> Vec2 {
        self.forces.values().copied().sum()
    }

    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Stop the body dead and exclude it from integration.
    pub fn freeze(&mut self) {
        self.velocity = Vec2::ZERO;
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_body_is_static_and_still() {
        let rb = RigidBody::new();
        assert_eq!(rb.kind, BodyKind::Static);
        assert_eq!(rb.velocity, Vec2::ZERO);
        assert!(rb.forces.is_empty());
        assert!(!rb.frozen);
        assert!(!rb.is_dynamic());
    }

    #[test]
    fn test_body_kind_parse() {
        assert_eq!(BodyKind::parse("static"), Some(BodyKind::Static));
        assert_eq!(BodyKind::parse("kinematic"), Some(BodyKind::Kinematic));
        assert_eq!(BodyKind::parse("dynamic"), Some(BodyKind::Dynamic));
        assert_eq!(BodyKind::parse("Dynamic"), None);
    }

    #[test]
    fn test_forces_replace_by_name_and_sum() {
        let mut rb = RigidBody::with_kind(BodyKind::Dynamic);
        rb.add_force("gravity", Vec2::new(0.0, 100.0));
        rb.add_force("gravity", Vec2::new(0.0, 200.0));
        rb.add_force("wind", Vec2::new(-30.0, 0.0));
        assert_eq!(rb.forces.len(), 2);
        assert_eq!(rb.total_acceleration(), Vec2::new(-30.0, 200.0));
    }

    #[test]
    fn test_freeze_then_unfreeze() {
        let mut rb = RigidBody::with_kind(BodyKind::Dynamic);
        rb.velocity = Vec2::new(3.0, 4.0);
        rb.freeze();
        assert!(rb.frozen);
        assert_eq!(rb.velocity, Vec2::ZERO);
        rb.apply_impulse(Vec2::new(5.0, -3.0));
        rb.unfreeze();
        assert!(!rb.frozen);
        assert_eq!(rb.velocity, Vec2::new(5.0, -3.0));
    }
}
