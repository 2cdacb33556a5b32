//! Tween data for animated interpolation.
//!
//! A [`Vec2Tween`] interpolates a 2D value (a position or a scale) from `from`
//! to `to` over `duration` seconds with an [`Easing`] curve. Trigger tasks
//! embed these as action phases; see [`crate::systems::tween`] for the math
//! and [`crate::systems::trigger`] for the driver.

use glam::Vec2;

/// Curve applied to normalized tween time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Parse the snake_case spelling used in level properties.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "linear" => Some(Easing::Linear),
            "quad_in" => Some(Easing::QuadIn),
            "quad_out" => Some(Easing::QuadOut),
            "quad_in_out" => Some(Easing::QuadInOut),
            "cubic_in" => Some(Easing::CubicIn),
            "cubic_out" => Some(Easing::CubicOut),
            "cubic_in_out" => Some(Easing::CubicInOut),
            _ => None,
        }
    }
}

/// One pass from `from` to `to` over `duration` seconds.
///
/// `playing` drops to false when `time` reaches `duration`; the tween is
/// never rewound.
#[derive(Clone, Debug, PartialEq)]
pub struct Vec2Tween {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: f32,
    pub easing: Easing,
    pub playing: bool,
    pub time: f32,
}

impl Vec2Tween {
    /// Linear tween starting now. Negative durations count as zero.
    pub fn new(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            easing: Easing::default(),
            playing: true,
            time: 0.0,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_new() {
        let tw = Vec2Tween::new(Vec2::ZERO, Vec2::new(100.0, 200.0), 2.0);
        assert_eq!(tw.from, Vec2::ZERO);
        assert_eq!(tw.to, Vec2::new(100.0, 200.0));
        assert_eq!(tw.duration, 2.0);
        assert_eq!(tw.easing, Easing::Linear);
        assert!(tw.playing);
        assert_eq!(tw.time, 0.0);
    }

    #[test]
    fn test_tween_with_easing() {
        let tw = Vec2Tween::new(Vec2::ZERO, Vec2::ONE, 1.0).with_easing(Easing::CubicOut);
        assert_eq!(tw.easing, Easing::CubicOut);
    }

    #[test]
    fn test_easing_parse() {
        assert_eq!(Easing::parse("linear"), Some(Easing::Linear));
        assert_eq!(Easing::parse("quad_in_out"), Some(Easing::QuadInOut));
        assert_eq!(Easing::parse("cubic_out"), Some(Easing::CubicOut));
        assert_eq!(Easing::parse("bounce"), None);
    }
}
