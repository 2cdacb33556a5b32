//! Tween math.
//!
//! Easing curves, interpolation and the time advance shared by every
//! [`Vec2Tween`] user. Trigger tasks call [`step`] once per frame and write
//! the sampled value to their target's position or scale.

use crate::components::tween::{Easing, Vec2Tween};
use glam::Vec2;

/// Eased value of `t`, clamped to [0, 1] first.
pub(crate) fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Advance `tw` by `dt` and return the sampled value.
///
/// A zero-length tween lands on `to` immediately.
pub fn step(tw: &mut Vec2Tween, dt: f32) -> Vec2 {
    if tw.playing {
        tw.time += dt.max(0.0);
        if tw.time >= tw.duration {
            tw.time = tw.duration;
            tw.playing = false;
        }
    }
    if tw.duration <= 0.0 {
        return tw.to;
    }
    tw.from.lerp(tw.to, ease(tw.easing, tw.time / tw.duration))
}
