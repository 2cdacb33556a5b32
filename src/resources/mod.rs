//! ECS resources made available to systems.
//!
//! All of these are per-session: [`crate::game::setup_session`] inserts them
//! into the `World`, nothing lives in a static.
//!
//! Overview
//! - `gameconfig` – INI tunables for the session, physics and player
//! - `registry` – UUID → entity index of level objects
//! - `score` – points and collected items
//! - `terrain` – solid tiles of the current level
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod registry;
pub mod score;
pub mod terrain;
pub mod worldtime;
