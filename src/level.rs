//! Level data model and typed property parser.
//!
//! Levels are JSON files exported from the map editor:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "tile_size": 16,
//!   "solid_tiles": [[0, 10], [1, 10]],
//!   "objects": [
//!     { "uuid": "…", "kind": "trigger", "name": "lift switch",
//!       "x": 64, "y": 144, "width": 16, "height": 16,
//!       "properties": [
//!         { "name": "event_type", "type": "string", "value": "move" },
//!         { "name": "target_uuid", "type": "string", "value": "…" },
//!         { "name": "velocity_y", "type": "float", "value": -40 },
//!         { "name": "duration", "type": "int", "value": 1500 }
//!       ] }
//!   ]
//! }
//! ```
//!
//! Object properties are a loose name/type/value list. The `parse_*`
//! functions turn them into typed settings with explicit defaults and fail
//! with a [`PropertyError`] on the first bad value. Durations are
//! milliseconds in the file and seconds everywhere else.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::rigidbody::BodyKind;
use crate::components::trigger::{TriggerAction, TriggerConfig};
use crate::components::tween::Easing;

const DEFAULT_DURATION_MS: f32 = 1000.0;

fn default_tile_size() -> f32 {
    16.0
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LevelData {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub solid_tiles: Vec<(i32, i32)>,
    #[serde(default)]
    pub objects: Vec<LevelObject>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LevelObject {
    #[serde(default)]
    pub uuid: String,
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Editor type tag (`int`, `float`, `bool`, `string`). Informational;
    /// the parser checks the value itself.
    #[serde(rename = "type", default)]
    pub type_name: String,
    pub value: PropertyValue,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyError {
    Missing {
        name: &'static str,
    },
    WrongType {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    InvalidValue {
        name: &'static str,
        value: String,
    },
    UnknownActionKind(String),
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::Missing { name } => write!(f, "missing property '{}'", name),
            PropertyError::WrongType {
                name,
                expected,
                found,
            } => write!(
                f,
                "property '{}' should be {}, found {}",
                name, expected, found
            ),
            PropertyError::InvalidValue { name, value } => {
                write!(f, "invalid value '{}' for property '{}'", value, name)
            }
            PropertyError::UnknownActionKind(kind) => write!(f, "unknown event_type '{}'", kind),
        }
    }
}

impl std::error::Error for PropertyError {}

#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "I/O error: {}", e),
            LevelError::Parse(e) => write!(f, "Level parse error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Typed view over an object's property list. Later duplicates win.
pub struct Properties<'a> {
    props: &'a [Property],
}

impl<'a> Properties<'a> {
    pub fn new(props: &'a [Property]) -> Self {
        Self { props }
    }

    fn get(&self, name: &str) -> Option<&'a PropertyValue> {
        self.props
            .iter()
            .rev()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn number(&self, name: &'static str) -> Result<Option<f32>, PropertyError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropertyValue::Int(v)) => Ok(Some(*v as f32)),
            Some(PropertyValue::Float(v)) => Ok(Some(*v as f32)),
            Some(other) => Err(PropertyError::WrongType {
                name,
                expected: "number",
                found: other.type_name(),
            }),
        }
    }

    pub fn int(&self, name: &'static str) -> Result<Option<i32>, PropertyError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropertyValue::Int(v)) => {
                i32::try_from(*v)
                    .map(Some)
                    .map_err(|_| PropertyError::InvalidValue {
                        name,
                        value: v.to_string(),
                    })
            }
            Some(other) => Err(PropertyError::WrongType {
                name,
                expected: "int",
                found: other.type_name(),
            }),
        }
    }

    pub fn bool(&self, name: &'static str) -> Result<Option<bool>, PropertyError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropertyValue::Bool(v)) => Ok(Some(*v)),
            Some(other) => Err(PropertyError::WrongType {
                name,
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }

    pub fn string(&self, name: &'static str) -> Result<Option<&'a str>, PropertyError> {
        match self.get(name) {
            None => Ok(None),
            Some(PropertyValue::String(v)) => Ok(Some(v.as_str())),
            Some(other) => Err(PropertyError::WrongType {
                name,
                expected: "string",
                found: other.type_name(),
            }),
        }
    }

    /// Milliseconds in the file, seconds out. Negative values are rejected.
    pub fn millis(&self, name: &'static str) -> Result<Option<f32>, PropertyError> {
        match self.number(name)? {
            Some(ms) if ms < 0.0 => Err(PropertyError::InvalidValue {
                name,
                value: ms.to_string(),
            }),
            other => Ok(other.map(|ms| ms / 1000.0)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerSettings {
    pub max_health: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodySettings {
    pub kind: BodyKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemSettings {
    pub item_type: String,
    pub value: i32,
}

pub fn parse_player(props: &[Property]) -> Result<PlayerSettings, PropertyError> {
    let p = Properties::new(props);
    let max_health = p.int("max_health")?;
    if let Some(h) = max_health.filter(|h| *h <= 0) {
        return Err(PropertyError::InvalidValue {
            name: "max_health",
            value: h.to_string(),
        });
    }
    Ok(PlayerSettings { max_health })
}

pub fn parse_body(props: &[Property]) -> Result<BodySettings, PropertyError> {
    let p = Properties::new(props);
    let kind = match p.string("body")? {
        None => BodyKind::default(),
        Some(s) => BodyKind::parse(s).ok_or_else(|| PropertyError::InvalidValue {
            name: "body",
            value: s.to_string(),
        })?,
    };
    Ok(BodySettings { kind })
}

pub fn parse_hazard_damage(props: &[Property]) -> Result<i32, PropertyError> {
    let damage = Properties::new(props).int("damage")?.unwrap_or(1);
    if damage <= 0 {
        return Err(PropertyError::InvalidValue {
            name: "damage",
            value: damage.to_string(),
        });
    }
    Ok(damage)
}

pub fn parse_item(props: &[Property]) -> Result<ItemSettings, PropertyError> {
    let p = Properties::new(props);
    Ok(ItemSettings {
        item_type: p.string("item_type")?.unwrap_or("coin").to_string(),
        value: p.int("value")?.unwrap_or(1),
    })
}

pub fn parse_trigger(props: &[Property]) -> Result<TriggerConfig, PropertyError> {
    let p = Properties::new(props);
    let target_uuid = p
        .string("target_uuid")?
        .filter(|s| !s.trim().is_empty())
        .ok_or(PropertyError::Missing {
            name: "target_uuid",
        })?
        .to_string();

    let action = match p.string("event_type")? {
        None | Some("move") => TriggerAction::Move {
            velocity: Vec2::new(
                p.number("velocity_x")?.unwrap_or(0.0),
                p.number("velocity_y")?.unwrap_or(0.0),
            ),
            return_to_origin: p.bool("return_to_origin")?.unwrap_or(false),
        },
        Some("scale") => TriggerAction::Scale {
            scale: Vec2::new(
                p.number("scale_x")?.unwrap_or(1.0),
                p.number("scale_y")?.unwrap_or(1.0),
            ),
        },
        Some(other) => return Err(PropertyError::UnknownActionKind(other.to_string())),
    };

    let easing = match p.string("easing")? {
        None => Easing::default(),
        Some(s) => Easing::parse(s).ok_or_else(|| PropertyError::InvalidValue {
            name: "easing",
            value: s.to_string(),
        })?,
    };

    Ok(TriggerConfig {
        target_uuid,
        action,
        duration: p.millis("duration")?.unwrap_or(DEFAULT_DURATION_MS / 1000.0),
        repeat: p.bool("repeat")?.unwrap_or(false),
        delay: p.millis("delay")?.unwrap_or(0.0),
        easing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, value: PropertyValue) -> Property {
        Property {
            name: name.to_string(),
            type_name: value.type_name().to_string(),
            value,
        }
    }

    fn target() -> Property {
        prop("target_uuid", PropertyValue::String("abc".to_string()))
    }

    #[test]
    fn test_trigger_defaults() {
        let cfg = parse_trigger(&[target()]).unwrap();
        assert_eq!(cfg.target_uuid, "abc");
        assert_eq!(
            cfg.action,
            TriggerAction::Move {
                velocity: Vec2::ZERO,
                return_to_origin: false
            }
        );
        assert!((cfg.duration - 1.0).abs() < 1e-6);
        assert!(!cfg.repeat);
        assert_eq!(cfg.delay, 0.0);
        assert_eq!(cfg.easing, Easing::Linear);
    }

    #[test]
    fn test_trigger_scale_with_millis() {
        let cfg = parse_trigger(&[
            target(),
            prop("event_type", PropertyValue::String("scale".to_string())),
            prop("scale_x", PropertyValue::Float(2.5)),
            prop("duration", PropertyValue::Int(500)),
            prop("delay", PropertyValue::Int(250)),
            prop("repeat", PropertyValue::Bool(true)),
        ])
        .unwrap();
        assert_eq!(
            cfg.action,
            TriggerAction::Scale {
                scale: Vec2::new(2.5, 1.0)
            }
        );
        assert!((cfg.duration - 0.5).abs() < 1e-6);
        assert!((cfg.delay - 0.25).abs() < 1e-6);
        assert!(cfg.repeat);
    }

    #[test]
    fn test_unknown_action_kind() {
        let err = parse_trigger(&[
            target(),
            prop("event_type", PropertyValue::String("teleport".to_string())),
        ])
        .unwrap_err();
        assert_eq!(err, PropertyError::UnknownActionKind("teleport".to_string()));
    }

    #[test]
    fn test_missing_target() {
        assert_eq!(
            parse_trigger(&[]).unwrap_err(),
            PropertyError::Missing {
                name: "target_uuid"
            }
        );
    }

    #[test]
    fn test_wrong_type_and_negative_duration() {
        let err = parse_trigger(&[target(), prop("repeat", PropertyValue::Int(1))]).unwrap_err();
        assert!(matches!(err, PropertyError::WrongType { name: "repeat", .. }));

        let err =
            parse_trigger(&[target(), prop("duration", PropertyValue::Int(-5))]).unwrap_err();
        assert!(matches!(err, PropertyError::InvalidValue { name: "duration", .. }));
    }

    #[test]
    fn test_player_and_body() {
        let player = parse_player(&[prop("max_health", PropertyValue::Int(5))]).unwrap();
        assert_eq!(player.max_health, Some(5));
        assert!(parse_player(&[prop("max_health", PropertyValue::Int(0))]).is_err());

        assert_eq!(parse_body(&[]).unwrap().kind, BodyKind::Static);
        let body = parse_body(&[prop("body", PropertyValue::String("dynamic".to_string()))]);
        assert_eq!(body.unwrap().kind, BodyKind::Dynamic);
        assert!(parse_body(&[prop("body", PropertyValue::String("jelly".to_string()))]).is_err());
    }

    #[test]
    fn test_hazard_damage_must_be_positive() {
        assert_eq!(parse_hazard_damage(&[]).unwrap(), 1);
        assert_eq!(
            parse_hazard_damage(&[prop("damage", PropertyValue::Int(3))]).unwrap(),
            3
        );
        for bad in [0, -2] {
            let err = parse_hazard_damage(&[prop("damage", PropertyValue::Int(bad))]).unwrap_err();
            assert!(matches!(err, PropertyError::InvalidValue { name: "damage", .. }));
        }
    }

    #[test]
    fn test_level_json() {
        let json = r#"{
            "name": "t",
            "solid_tiles": [[0, 1], [1, 1]],
            "objects": [
                { "uuid": "p", "kind": "player", "x": 8, "y": 0,
                  "properties": [{ "name": "max_health", "type": "int", "value": 4 }] },
                { "kind": "decoration", "x": 1.5, "y": 2 }
            ]
        }"#;
        let level = LevelData::from_json(json).unwrap();
        assert_eq!(level.tile_size, 16.0);
        assert_eq!(level.solid_tiles, vec![(0, 1), (1, 1)]);
        assert_eq!(level.objects.len(), 2);
        assert_eq!(level.objects[0].properties[0].value, PropertyValue::Int(4));
        assert!(level.objects[1].uuid.is_empty());
        assert!(LevelData::from_json("{").is_err());
    }
}
