//! Stable-identity index of world objects.
//!
//! Level data refers to objects by UUID strings (a trigger's `target_uuid`,
//! for instance). The [`EntityRegistry`] maps those identities to the live
//! `Entity` handles created when the level is spawned, together with a
//! category tag and an optional display name.
//!
//! The registry does not own anything: an `Entity` is a weak handle and may
//! refer to an object that has since been despawned. Callers check liveness
//! against the `World` (or a `Query`) before acting on a lookup.
//!
//! Each entity holds at most one identity. A reverse index (`Entity` → id) is
//! kept in step with the forward map so [`EntityRegistry::get_id_for`] does
//! not scan.
//!
//! The registry is a per-session resource. [`crate::game::load_level`] clears
//! it before spawning, so no entry can leak from one level into the next.

use std::borrow::Borrow;
use std::fmt;

use bevy_ecs::prelude::{Entity, Resource};
use log::{debug, warn};
use rustc_hash::FxHashMap;

/// Stable external identifier of a world object (a UUID string).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    /// Random RFC 4122 version 4 UUID.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&fastrand::u64(..).to_be_bytes());
        bytes[8..].copy_from_slice(&fastrand::u64(..).to_be_bytes());
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        let mut s = String::with_capacity(36);
        for (i, b) in bytes.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                s.push('-');
            }
            s.push_str(&format!("{:02x}", b));
        }
        EntityId(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

/// One registered world object.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryEntry {
    pub id: EntityId,
    pub entity: Entity,
    pub category: String,
    pub name: Option<String>,
}

#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    entries: FxHashMap<EntityId, RegistryEntry>,
    reverse: FxHashMap<Entity, EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entity` under `id`, replacing any previous entry for that id.
    ///
    /// An entity already registered under another id loses that entry: one
    /// identity per entity. A blank id gets a freshly generated UUID (with a
    /// warning). Returns the id actually used.
    pub fn register(
        &mut self,
        id: &str,
        entity: Entity,
        category: impl Into<String>,
        name: Option<String>,
    ) -> EntityId {
        let category = category.into();
        let id = if id.trim().is_empty() {
            let generated = EntityId::generate();
            warn!(
                "Registering {:?} ({}) without an id; generated {}",
                entity, category, generated
            );
            generated
        } else {
            EntityId::new(id)
        };

        if let Some(old) = self.entries.remove(&id) {
            debug!(
                "Replacing registry entry {} ({:?} -> {:?})",
                id, old.entity, entity
            );
            self.reverse.remove(&old.entity);
        }
        if let Some(previous) = self.reverse.insert(entity, id.clone()) {
            debug!("Moving {:?} from id {} to {}", entity, previous, id);
            self.entries.remove(&previous);
        }

        self.entries.insert(
            id.clone(),
            RegistryEntry {
                id: id.clone(),
                entity,
                category,
                name,
            },
        );
        id
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    /// All entries tagged with `category`, in id order.
    pub fn get_by_category(&self, category: &str) -> Vec<&RegistryEntry> {
        let mut found: Vec<_> = self
            .entries
            .values()
            .filter(|e| e.category == category)
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    pub fn unregister(&mut self, id: &str) -> Option<RegistryEntry> {
        let entry = self.entries.remove(id)?;
        self.reverse.remove(&entry.entity);
        Some(entry)
    }

    /// Identity registered for `entity`.
    pub fn get_id_for(&self, entity: Entity) -> Option<&EntityId> {
        self.reverse.get(&entity)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.reverse.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn test_register_and_get() {
        let e = entities(1);
        let mut reg = EntityRegistry::new();
        let id = reg.register("abc", e[0], "platform", Some("lift".to_string()));
        assert_eq!(id.as_str(), "abc");
        let entry = reg.get("abc").unwrap();
        assert_eq!(entry.entity, e[0]);
        assert_eq!(entry.category, "platform");
        assert_eq!(entry.name.as_deref(), Some("lift"));
        assert_eq!(reg.get_id_for(e[0]).map(|i| i.as_str()), Some("abc"));
    }

    #[test]
    fn test_same_id_last_write_wins() {
        let e = entities(2);
        let mut reg = EntityRegistry::new();
        reg.register("dup", e[0], "platform", None);
        reg.register("dup", e[1], "hazard", None);

        assert_eq!(reg.len(), 1);
        let entry = reg.get("dup").unwrap();
        assert_eq!(entry.entity, e[1]);
        assert_eq!(entry.category, "hazard");
        assert!(reg.get_id_for(e[0]).is_none());
        assert_eq!(reg.get_id_for(e[1]).map(|i| i.as_str()), Some("dup"));
    }

    #[test]
    fn test_blank_id_generates_uuid() {
        let e = entities(2);
        let mut reg = EntityRegistry::new();
        let a = reg.register("", e[0], "decoration", None);
        let b = reg.register("   ", e[1], "decoration", None);
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert_eq!(&a.as_str()[14..15], "4");
        assert!(reg.get(a.as_str()).is_some());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_generated_uuid_shape() {
        for _ in 0..50 {
            let id = EntityId::generate();
            let parts: Vec<_> = id.as_str().split('-').collect();
            assert_eq!(
                parts.iter().map(|p| p.len()).collect::<Vec<_>>(),
                vec![8, 4, 4, 4, 12]
            );
            assert!(matches!(&parts[3][..1], "8" | "9" | "a" | "b"));
        }
    }

    #[test]
    fn test_unregister_and_reverse_index() {
        let e = entities(1);
        let mut reg = EntityRegistry::new();
        reg.register("x", e[0], "platform", None);
        let removed = reg.unregister("x").unwrap();
        assert_eq!(removed.entity, e[0]);
        assert!(reg.get("x").is_none());
        assert!(reg.get_id_for(e[0]).is_none());
        assert!(reg.unregister("x").is_none());
    }

    #[test]
    fn test_entity_reregistered_under_new_id() {
        let e = entities(1);
        let mut reg = EntityRegistry::new();
        reg.register("old", e[0], "platform", None);
        reg.register("new", e[0], "platform", None);
        assert_eq!(reg.get_id_for(e[0]).map(|i| i.as_str()), Some("new"));
        assert!(reg.get("old").is_none());
        assert_eq!(reg.len(), 1);
        assert!(reg.unregister("old").is_none());
        assert_eq!(reg.get_id_for(e[0]).map(|i| i.as_str()), Some("new"));
    }

    #[test]
    fn test_forward_and_reverse_agree_after_moves() {
        let e = entities(2);
        let mut reg = EntityRegistry::new();
        reg.register("a", e[0], "platform", None);
        reg.register("b", e[0], "platform", None);
        reg.unregister("b");
        assert!(reg.get("a").is_none());
        assert!(reg.get_id_for(e[0]).is_none());
        assert!(reg.is_empty());

        reg.register("a", e[0], "platform", None);
        reg.register("b", e[0], "platform", None);
        reg.register("b", e[1], "hazard", None);
        assert!(reg.get_id_for(e[0]).is_none());
        assert_eq!(reg.get_id_for(e[1]).map(|i| i.as_str()), Some("b"));
        for entry in reg.iter() {
            assert_eq!(reg.get_id_for(entry.entity), Some(&entry.id));
        }
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_get_by_category_and_clear() {
        let e = entities(3);
        let mut reg = EntityRegistry::new();
        reg.register("b", e[0], "platform", None);
        reg.register("a", e[1], "platform", None);
        reg.register("c", e[2], "hazard", None);

        let platforms = reg.get_by_category("platform");
        assert_eq!(
            platforms.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(reg.get_by_category("goal").is_empty());

        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.get_id_for(e[0]).is_none());
    }
}
