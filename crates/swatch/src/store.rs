//! The attribute store.
//!
//! A [`Store`] is one revision of a theme: every attribute keyed by
//! [`AttrKey`], plus the group layout from the catalog it was seeded from.
//! Stores are never mutated in place. Every update returns a new store and
//! leaves the receiver untouched, so a failed edit or resolution pass simply
//! drops the candidate revision.
//!
//! Attribute values are shared between revisions with `Arc`; producing a new
//! revision copies the key map, not the attributes.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::attribute::Attribute;
use crate::catalog::Catalog;
use crate::error::{Error, StoreError};
use crate::key::AttrKey;
use crate::resolver::resolve_all;
use crate::snapshot::{Snapshot, SnapshotEntry};

/// A presentational group of attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeGroup {
    id: String,
    title: String,
    expanded: bool,
    members: Vec<AttrKey>,
}

impl AttributeGroup {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the group starts expanded.
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Member keys in catalog order.
    pub fn members(&self) -> &[AttrKey] {
        &self.members
    }
}

/// One immutable revision of all attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    attributes: BTreeMap<AttrKey, Arc<Attribute>>,
    groups: Arc<[AttributeGroup]>,
}

impl Store {
    /// Seeds a store from a catalog and resolves any references among the
    /// default values.
    pub fn from_catalog(catalog: &Catalog) -> Result<Self, Error> {
        catalog.validate()?;
        let store = Self::unresolved(catalog);
        Ok(resolve_all(&store)?)
    }

    /// Store with raw input = resolved value = catalog default.
    fn unresolved(catalog: &Catalog) -> Self {
        let attributes = catalog
            .entries()
            .map(|(key, entry)| {
                let attribute = Attribute::new(&entry.label, entry.attr_type, &entry.value);
                (key, Arc::new(attribute))
            })
            .collect();

        let groups = catalog
            .groups()
            .iter()
            .map(|group| AttributeGroup {
                id: group.id.clone(),
                title: group.title.clone(),
                expanded: group.expanded,
                members: group
                    .attributes
                    .iter()
                    .filter_map(|entry| AttrKey::new(&group.id, &entry.name).ok())
                    .collect(),
            })
            .collect();

        Self { attributes, groups }
    }

    /// Restores a persisted snapshot over the attributes of `catalog`.
    ///
    /// Labels and groups come from the catalog; raw inputs and types from the
    /// snapshot. A snapshot covering every catalog attribute is taken
    /// verbatim, resolved values included. A partial snapshot is merged over
    /// the catalog defaults and the result is resolved in full, since the
    /// defaults it falls back to were never resolved against its values.
    pub fn restore(catalog: &Catalog, snapshot: &Snapshot) -> Result<Self, Error> {
        catalog.validate()?;
        let mut store = Self::unresolved(catalog);
        for (key, entry) in &snapshot.attributes {
            let current = store
                .attributes
                .get(key)
                .ok_or_else(|| StoreError::NotFound(key.clone()))?;
            let restored = current.restored(
                entry.attr_type,
                entry.raw_input.clone(),
                entry.resolved_value.clone(),
            );
            store.attributes.insert(key.clone(), Arc::new(restored));
        }

        if snapshot.attributes.len() < store.attributes.len() {
            debug!(
                restored = snapshot.attributes.len(),
                total = store.attributes.len(),
                "partial snapshot, resolving defaults"
            );
            return Ok(resolve_all(&store)?);
        }
        Ok(store)
    }

    /// The persistence form of this revision.
    pub fn to_snapshot(&self) -> Snapshot {
        let attributes = self
            .attributes
            .iter()
            .map(|(key, attribute)| {
                let entry = SnapshotEntry {
                    raw_input: attribute.raw_input().to_string(),
                    resolved_value: attribute.resolved_value().to_string(),
                    attr_type: attribute.attr_type(),
                };
                (key.clone(), entry)
            })
            .collect();
        Snapshot { attributes }
    }

    /// Looks up an attribute that must exist.
    pub fn get(&self, key: &AttrKey) -> Result<&Attribute, StoreError> {
        self.try_get(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    pub fn try_get(&self, key: &AttrKey) -> Option<&Attribute> {
        self.attributes.get(key).map(Arc::as_ref)
    }

    pub fn contains(&self, key: &AttrKey) -> bool {
        self.attributes.contains_key(key)
    }

    /// Sets raw input and resolved value of one attribute, returning the next
    /// revision.
    pub fn with_value(
        &self,
        key: &AttrKey,
        raw_input: impl Into<String>,
        resolved_value: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let current = self.get(key)?;
        let updated = current.with_values(raw_input.into(), resolved_value.into());
        let mut attributes = self.attributes.clone();
        attributes.insert(key.clone(), Arc::new(updated));
        Ok(Self {
            attributes,
            groups: Arc::clone(&self.groups),
        })
    }

    /// Sets the raw input, keeping the previous resolved value until the
    /// resolver recomputes it.
    pub fn with_raw_input(&self, key: &AttrKey, raw_input: impl Into<String>) -> Result<Self, StoreError> {
        let resolved = self.get(key)?.resolved_value().to_string();
        self.with_value(key, raw_input, resolved)
    }

    /// Sets only the resolved value.
    pub(crate) fn with_resolved(&self, key: &AttrKey, resolved_value: String) -> Result<Self, StoreError> {
        let raw = self.get(key)?.raw_input().to_string();
        self.with_value(key, raw, resolved_value)
    }

    /// Keys of the attributes whose raw input references `key`, excluding
    /// `key` itself, in key order.
    pub fn dependents(&self, key: &AttrKey) -> Vec<AttrKey> {
        self.attributes
            .iter()
            .filter(|(other, attribute)| *other != key && key.is_referenced_by(attribute.raw_input()))
            .map(|(other, _)| other.clone())
            .collect()
    }

    /// All attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &Attribute)> {
        self.attributes.iter().map(|(k, a)| (k, a.as_ref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &AttrKey> {
        self.attributes.keys()
    }

    /// Groups in catalog order.
    pub fn groups(&self) -> &[AttributeGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&AttributeGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Attributes of one group in catalog order. Empty for an unknown group.
    pub fn group_attributes(&self, id: &str) -> Vec<(&AttrKey, &Attribute)> {
        self.group(id)
            .map(|group| {
                group
                    .members
                    .iter()
                    .filter_map(|key| self.attributes.get_key_value(key))
                    .map(|(k, a)| (k, a.as_ref()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttrType;

    fn key(s: &str) -> AttrKey {
        s.parse().unwrap()
    }

    fn small_catalog() -> Catalog {
        Catalog::new()
            .group("colors", "General colors", true, |g| {
                g.attr("primary", "Primary font color", "#000000", AttrType::Color)
                    .attr("link", "Link color", "{colors.primary}", AttrType::Color)
            })
            .group("sizes", "Global sizes", false, |g| {
                g.attr("text", "Default text size (em)", "1.1", AttrType::Em)
            })
    }

    #[test]
    fn from_catalog_resolves_defaults() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        let link = store.get(&key("colors.link")).unwrap();
        assert_eq!(link.raw_input(), "{colors.primary}");
        assert_eq!(link.resolved_value(), "#000000");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn from_catalog_rejects_dangling_default() {
        let catalog = Catalog::new().group("colors", "Colors", true, |g| {
            g.attr("link", "Link", "{colors.missing}", AttrType::Color)
        });
        assert!(matches!(
            Store::from_catalog(&catalog),
            Err(Error::Resolve(_))
        ));
    }

    #[test]
    fn get_missing_key_fails() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        assert_eq!(
            store.get(&key("colors.nope")),
            Err(StoreError::NotFound(key("colors.nope")))
        );
        assert!(store.try_get(&key("colors.nope")).is_none());
    }

    #[test]
    fn with_value_returns_new_revision() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        let next = store.with_value(&key("sizes.text"), "1.3", "1.3").unwrap();

        assert_eq!(next.get(&key("sizes.text")).unwrap().raw_input(), "1.3");
        assert_eq!(store.get(&key("sizes.text")).unwrap().raw_input(), "1.1");
    }

    #[test]
    fn with_value_keeps_label_and_type() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        let next = store.with_value(&key("sizes.text"), "2", "2").unwrap();
        let attr = next.get(&key("sizes.text")).unwrap();
        assert_eq!(attr.label(), "Default text size (em)");
        assert_eq!(attr.attr_type(), AttrType::Em);
    }

    #[test]
    fn with_value_unknown_key_fails() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        assert!(store.with_value(&key("links.nope"), "x", "x").is_err());
    }

    #[test]
    fn with_raw_input_keeps_resolved() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        let next = store.with_raw_input(&key("colors.primary"), "red").unwrap();
        let attr = next.get(&key("colors.primary")).unwrap();
        assert_eq!(attr.raw_input(), "red");
        assert_eq!(attr.resolved_value(), "#000000");
    }

    #[test]
    fn dependents_excludes_self() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        assert_eq!(store.dependents(&key("colors.primary")), vec![key("colors.link")]);
        assert!(store.dependents(&key("colors.link")).is_empty());
    }

    #[test]
    fn groups_keep_catalog_order() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        let ids: Vec<&str> = store.groups().iter().map(|g| g.id()).collect();
        assert_eq!(ids, vec!["colors", "sizes"]);
        assert!(!store.group("sizes").unwrap().expanded());

        let members: Vec<String> = store
            .group_attributes("colors")
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(members, vec!["colors.primary", "colors.link"]);
        assert!(store.group_attributes("nope").is_empty());
    }

    #[test]
    fn iter_is_key_ordered() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        let keys: Vec<String> = store.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["colors.link", "colors.primary", "sizes.text"]);
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let store = Store::from_catalog(&small_catalog()).unwrap();
        let edited = store.with_value(&key("colors.primary"), "red", "red").unwrap();
        let restored = Store::restore(&small_catalog(), &edited.to_snapshot()).unwrap();
        assert_eq!(restored, edited);
    }

    #[test]
    fn restore_unknown_key_fails() {
        let mut snapshot = Store::from_catalog(&small_catalog()).unwrap().to_snapshot();
        snapshot.attributes.insert(
            key("colors.ghost"),
            SnapshotEntry {
                raw_input: "x".to_string(),
                resolved_value: "x".to_string(),
                attr_type: AttrType::Text,
            },
        );
        assert!(matches!(
            Store::restore(&small_catalog(), &snapshot),
            Err(Error::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn full_restore_is_verbatim() {
        let mut snapshot = Store::from_catalog(&small_catalog()).unwrap().to_snapshot();
        snapshot.attributes.insert(
            key("colors.link"),
            SnapshotEntry {
                raw_input: "{colors.primary}".to_string(),
                resolved_value: "stale".to_string(),
                attr_type: AttrType::Color,
            },
        );
        let store = Store::restore(&small_catalog(), &snapshot).unwrap();
        assert_eq!(store.get(&key("colors.link")).unwrap().resolved_value(), "stale");
    }

    #[test]
    fn partial_restore_resolves_defaults() {
        let mut snapshot = Snapshot::default();
        snapshot.attributes.insert(
            key("colors.primary"),
            SnapshotEntry {
                raw_input: "red".to_string(),
                resolved_value: "red".to_string(),
                attr_type: AttrType::Color,
            },
        );
        let store = Store::restore(&small_catalog(), &snapshot).unwrap();

        let link = store.get(&key("colors.link")).unwrap();
        assert_eq!(link.raw_input(), "{colors.primary}");
        assert_eq!(link.resolved_value(), "red");
        assert_eq!(store, resolve_all(&store).unwrap());
    }
}
