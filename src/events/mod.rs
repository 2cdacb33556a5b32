//! Event types used by the core.
//!
//! Two channels exist side by side:
//! - the [`bus::EventBus`], carrying [`gameevent::GameEvent`] notifications
//!   *out* of the core to collaborators (animation, sound, UI);
//! - `bevy_ecs` observer events, carrying host signals *into* the core
//!   (overlaps, expired timers).
//!
//! Submodules:
//! - [`bus`] – the publish/subscribe hub
//! - [`gameevent`] – event kinds and payloads
//! - [`contact`] – overlap notifications from the host physics
//! - [`timer`] – timer expiration
pub mod bus;
pub mod contact;
pub mod gameevent;
pub mod timer;
