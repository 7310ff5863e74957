//! Seed catalogs: the fixed table of groups and attributes a theme starts from.
//!
//! A catalog can be built in code or read from YAML. The YAML form is a list
//! of groups, each with an ordered list of attributes:
//!
//! ```yaml
//! - group: colors
//!   title: General colors
//!   expanded: true
//!   attributes:
//!     - name: primary
//!       label: Primary font color
//!       value: "#000000"
//!       type: color
//!     - name: link
//!       label: Link color
//!       value: "{colors.primary}"
//!       type: color
//! ```
//!
//! Default values may reference other attributes; they are resolved when a
//! store is seeded from the catalog.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use swatch_refparser::is_identifier;

use crate::attribute::AttrType;
use crate::error::CatalogError;
use crate::key::AttrKey;

/// One attribute definition in a catalog group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub label: String,
    pub value: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
}

/// A titled, ordered group of attribute definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGroup {
    #[serde(rename = "group")]
    pub id: String,
    pub title: String,
    /// Whether presentation shows the group expanded by default.
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default)]
    pub attributes: Vec<CatalogEntry>,
}

fn default_expanded() -> bool {
    true
}

/// Builder for the attributes of one group, see [`Catalog::group`].
#[derive(Debug)]
pub struct GroupBuilder {
    group: CatalogGroup,
}

impl GroupBuilder {
    /// Adds an attribute definition.
    pub fn attr(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
        attr_type: AttrType,
    ) -> Self {
        self.group.attributes.push(CatalogEntry {
            name: name.into(),
            label: label.into(),
            value: value.into(),
            attr_type,
        });
        self
    }
}

/// The seed table of a theme.
///
/// ```rust
/// use swatch::{AttrType, Catalog};
///
/// let catalog = Catalog::new()
///     .group("colors", "General colors", true, |g| {
///         g.attr("primary", "Primary font color", "#000000", AttrType::Color)
///             .attr("link", "Link color", "{colors.primary}", AttrType::Color)
///     })
///     .group("sizes", "Global sizes", false, |g| {
///         g.attr("text", "Default text size (em)", "1.1", AttrType::Em)
///     });
///
/// assert!(catalog.validate().is_ok());
/// assert_eq!(catalog.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    groups: Vec<CatalogGroup>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new()
        .group("colors", "General colors", true, |g| {
            g.attr("primary", "Primary font color", "#000000", AttrType::Color)
                .attr("primaryBackground", "Primary background color", "#ffffff", AttrType::Color)
                .attr("secondary", "Secondary font color", "#ffffff", AttrType::Color)
                .attr("secondaryBackground", "Secondary background color", "#4a86e8", AttrType::Color)
                .attr("highlight1", "Highlight on primary background", "#4a86e8", AttrType::Color)
                .attr("highlight2", "Highlight on secondary background", "#ffab40", AttrType::Color)
        })
        .group("sizes", "Global sizes", true, |g| {
            g.attr("text", "Default text size (em)", "1.1", AttrType::Em)
                .attr("h1", "Header1 text size (em)", "1.4", AttrType::Em)
                .attr("h2", "Header2 text size (em)", "1.2", AttrType::Em)
                .attr("borderWidth", "Default border width (px)", "1", AttrType::Px)
        })
        .group("textfield", "Text field", true, |g| {
            g.attr("textSize", "Text size (em)", "1.1", AttrType::Em)
                .attr("color", "Font color", "#000000", AttrType::Color)
                .attr("border", "Border", "1px solid #000000", AttrType::Text)
                .attr("background", "Background", "#ffffff", AttrType::Color)
        })
        .group("buttons", "Buttons", true, |g| {
            g.attr("fontSize", "Font size (em)", "calc(1.1*1.2)", AttrType::Em)
                .attr("color", "Font color", "#000000", AttrType::Color)
                .attr("background", "Background", "#4a86e8", AttrType::Color)
        })
        .group("links", "Links", true, |g| {
            g.attr("fontSize", "Font size (em)", "1.1", AttrType::Em)
                .attr("fontColor", "Font color", "#007bff", AttrType::Color)
        })
});

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// The default theme: colors, sizes, text field, buttons and links.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Adds a group, returning the catalog for chaining.
    pub fn group<F>(mut self, id: impl Into<String>, title: impl Into<String>, expanded: bool, build: F) -> Self
    where
        F: FnOnce(GroupBuilder) -> GroupBuilder,
    {
        let builder = GroupBuilder {
            group: CatalogGroup {
                id: id.into(),
                title: title.into(),
                expanded,
                attributes: Vec::new(),
            },
        };
        self.groups.push(build(builder).group);
        self
    }

    /// Parses and validates a catalog from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads a catalog from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Load {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml(&content).map_err(|err| match err {
            CatalogError::Parse { message, .. } => CatalogError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Serializes the catalog to YAML.
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        serde_yaml::to_string(self).map_err(|e| CatalogError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Checks identifiers and uniqueness of groups and attribute names.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !is_identifier(&group.id) {
                return Err(CatalogError::InvalidGroup(group.id.clone()));
            }
            if !group_ids.insert(group.id.as_str()) {
                return Err(CatalogError::DuplicateGroup(group.id.clone()));
            }

            let mut names = HashSet::new();
            for entry in &group.attributes {
                let key = AttrKey::new(&group.id, &entry.name).map_err(|_| CatalogError::InvalidKey {
                    group: group.id.clone(),
                    name: entry.name.clone(),
                })?;
                if !names.insert(entry.name.as_str()) {
                    return Err(CatalogError::DuplicateKey(key));
                }
            }
        }
        Ok(())
    }

    pub fn groups(&self) -> &[CatalogGroup] {
        &self.groups
    }

    /// All entries with their keys, in catalog order.
    ///
    /// Entries with invalid names are skipped; call [`validate`](Self::validate) first.
    pub fn entries(&self) -> impl Iterator<Item = (AttrKey, &CatalogEntry)> {
        self.groups.iter().flat_map(|group| {
            group.attributes.iter().filter_map(move |entry| {
                AttrKey::new(&group.id, &entry.name).ok().map(|key| (key, entry))
            })
        })
    }

    /// Looks up the definition for a key.
    pub fn get(&self, key: &AttrKey) -> Option<&CatalogEntry> {
        self.groups
            .iter()
            .find(|g| g.id == key.group())?
            .attributes
            .iter()
            .find(|e| e.name == key.name())
    }

    /// Total number of attribute definitions.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.attributes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
