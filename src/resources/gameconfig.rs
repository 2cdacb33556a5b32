//! Session tunables.
//!
//! Tunables loaded from an INI file. Every value has a safe default so a
//! missing file or key never blocks startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [session]
//! fixed_timestep = 0.016666668
//! level = ./levels/demo.json
//!
//! [physics]
//! gravity = 980
//! max_fall_speed = 700
//!
//! [player]
//! max_health = 3
//! move_speed = 200
//! jump_speed = 400
//! max_jumps = 2
//! ; ...every other PlayerTuning field by name
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::player::PlayerTuning;

const DEFAULT_FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const DEFAULT_GRAVITY: f32 = 980.0;
const DEFAULT_MAX_FALL_SPEED: f32 = 700.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
/// Smallest accepted `max_charge_time`, in seconds.
const MIN_CHARGE_WINDOW: f32 = 0.01;

/// Physics and player defaults plus runner settings.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Seconds per simulation step in the headless runner.
    pub fixed_timestep: f32,
    /// Level file loaded when none is given on the command line.
    pub level_path: Option<PathBuf>,
    /// Downward acceleration applied to dynamic bodies, pixels/s².
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Defaults for every player spawned from level data.
    pub player: PlayerTuning,
    /// Where [`load_from_file`](Self::load_from_file) and
    /// [`save_to_file`](Self::save_to_file) read and write.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f32(config: &Ini, section: &str, key: &str, target: &mut f32) {
    if let Some(v) = config.getfloat(section, key).ok().flatten() {
        *target = v as f32;
    }
}

fn read_i32(config: &Ini, section: &str, key: &str, target: &mut i32) {
    if let Some(v) = config.getint(section, key).ok().flatten() {
        *target = v as i32;
    }
}

impl GameConfig {
    /// Built-in defaults, pointing at `./config.ini`.
    pub fn new() -> Self {
        Self {
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            level_path: None,
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            player: PlayerTuning::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Built-in defaults, pointing at `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Overlay values from `config_path`. Absent keys keep their current
    /// value; an unreadable file or a non-positive timestep is an error.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [session] section
        read_f32(&config, "session", "fixed_timestep", &mut self.fixed_timestep);
        if self.fixed_timestep <= 0.0 {
            return Err(format!(
                "Invalid fixed_timestep {} in {:?}",
                self.fixed_timestep, self.config_path
            ));
        }
        if let Some(level) = config.get("session", "level") {
            self.level_path = Some(PathBuf::from(level));
        }

        // [physics] section
        read_f32(&config, "physics", "gravity", &mut self.gravity);
        read_f32(&config, "physics", "max_fall_speed", &mut self.max_fall_speed);

        // [player] section
        let p = &mut self.player;
        read_i32(&config, "player", "max_health", &mut p.max_health);
        read_f32(&config, "player", "move_speed", &mut p.move_speed);
        read_f32(&config, "player", "jump_speed", &mut p.jump_speed);
        if let Some(v) = config.getuint("player", "max_jumps").ok().flatten() {
            p.max_jumps = v as u32;
        }
        read_f32(&config, "player", "wall_jump_speed", &mut p.wall_jump_speed);
        read_f32(&config, "player", "wall_slide_speed", &mut p.wall_slide_speed);
        read_f32(&config, "player", "min_charge_time", &mut p.min_charge_time);
        read_f32(&config, "player", "max_charge_time", &mut p.max_charge_time);
        read_f32(&config, "player", "charge_multiplier", &mut p.charge_multiplier);
        read_f32(&config, "player", "invulnerability_time", &mut p.invulnerability_time);
        read_f32(&config, "player", "knockback_time", &mut p.knockback_time);
        read_f32(&config, "player", "knockback_speed", &mut p.knockback_speed);
        read_f32(&config, "player", "game_over_delay", &mut p.game_over_delay);
        read_f32(&config, "player", "shoot_cooldown", &mut p.shoot_cooldown);
        read_f32(&config, "player", "projectile_speed", &mut p.projectile_speed);
        read_f32(&config, "player", "projectile_inherit", &mut p.projectile_inherit);
        read_f32(&config, "player", "projectile_lifetime", &mut p.projectile_lifetime);
        read_f32(&config, "player", "recoil", &mut p.recoil);
        read_f32(&config, "player", "stuck_check_interval", &mut p.stuck_check_interval);
        read_f32(&config, "player", "stuck_float_speed", &mut p.stuck_float_speed);
        if let Some(atlas) = config.get("player", "atlas_key") {
            p.atlas_key = atlas;
        }
        p.min_charge_time = p.min_charge_time.max(0.0);
        p.max_charge_time = p.max_charge_time.max(p.min_charge_time).max(MIN_CHARGE_WINDOW);

        info!(
            "Loaded config: dt={}, gravity={}, player health={} jumps={}",
            self.fixed_timestep, self.gravity, self.player.max_health, self.player.max_jumps
        );

        Ok(())
    }

    /// Write every value back to `config_path` in the layout `load_from_file`
    /// reads.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [session] section
        config.set(
            "session",
            "fixed_timestep",
            Some(self.fixed_timestep.to_string()),
        );
        if let Some(level) = &self.level_path {
            config.set("session", "level", Some(level.display().to_string()));
        }

        // [physics] section
        config.set("physics", "gravity", Some(self.gravity.to_string()));
        config.set(
            "physics",
            "max_fall_speed",
            Some(self.max_fall_speed.to_string()),
        );

        // [player] section
        let p = &self.player;
        let entries: [(&str, String); 21] = [
            ("max_health", p.max_health.to_string()),
            ("move_speed", p.move_speed.to_string()),
            ("jump_speed", p.jump_speed.to_string()),
            ("max_jumps", p.max_jumps.to_string()),
            ("wall_jump_speed", p.wall_jump_speed.to_string()),
            ("wall_slide_speed", p.wall_slide_speed.to_string()),
            ("min_charge_time", p.min_charge_time.to_string()),
            ("max_charge_time", p.max_charge_time.to_string()),
            ("charge_multiplier", p.charge_multiplier.to_string()),
            ("invulnerability_time", p.invulnerability_time.to_string()),
            ("knockback_time", p.knockback_time.to_string()),
            ("knockback_speed", p.knockback_speed.to_string()),
            ("game_over_delay", p.game_over_delay.to_string()),
            ("shoot_cooldown", p.shoot_cooldown.to_string()),
            ("projectile_speed", p.projectile_speed.to_string()),
            ("projectile_inherit", p.projectile_inherit.to_string()),
            ("projectile_lifetime", p.projectile_lifetime.to_string()),
            ("recoil", p.recoil.to_string()),
            ("stuck_check_interval", p.stuck_check_interval.to_string()),
            ("stuck_float_speed", p.stuck_float_speed.to_string()),
            ("atlas_key", p.atlas_key.clone()),
        ];
        for (key, value) in entries {
            config.set("player", key, Some(value));
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = GameConfig::new();
        assert!((cfg.fixed_timestep - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(cfg.player, PlayerTuning::default());
        assert!(cfg.level_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[player]\nmax_health = 5\njump_speed = 450.5\n").unwrap();

        let mut cfg = GameConfig::with_path(file.path());
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.player.max_health, 5);
        assert!((cfg.player.jump_speed - 450.5).abs() < 1e-4);
        assert!((cfg.player.move_speed - 200.0).abs() < 1e-4);
        assert!((cfg.gravity - DEFAULT_GRAVITY).abs() < 1e-4);
    }

    #[test]
    fn test_charge_window_is_kept_positive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[player]\nmin_charge_time = -1\nmax_charge_time = 0\n").unwrap();

        let mut cfg = GameConfig::with_path(file.path());
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.player.min_charge_time, 0.0);
        assert!((cfg.player.max_charge_time - MIN_CHARGE_WINDOW).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = GameConfig::with_path(dir.path().join("absent.ini"));
        assert!(cfg.load_from_file().is_err());
    }

    #[test]
    fn test_zero_timestep_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\nfixed_timestep = 0\n").unwrap();
        let mut cfg = GameConfig::with_path(file.path());
        assert!(cfg.load_from_file().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut cfg = GameConfig::with_path(&path);
        cfg.gravity = 1200.0;
        cfg.player.max_jumps = 3;
        cfg.player.atlas_key = "hero".to_string();
        cfg.level_path = Some(PathBuf::from("levels/one.json"));
        cfg.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert!((loaded.gravity - 1200.0).abs() < 1e-4);
        assert_eq!(loaded.player.max_jumps, 3);
        assert_eq!(loaded.player.atlas_key, "hero");
        assert_eq!(loaded.level_path, Some(PathBuf::from("levels/one.json")));
    }
}
