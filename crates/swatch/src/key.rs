//! Composite `group.name` keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use swatch_refparser::{is_identifier, Reference};

use crate::error::ParseError;

/// Identity of an attribute: a `(group, name)` pair written `group.name`.
///
/// Keys order lexicographically by group, then name. The resolver relies on
/// this ordering to visit dependents reproducibly.
///
/// ```rust
/// use swatch::AttrKey;
///
/// let key: AttrKey = "colors.primary".parse().unwrap();
/// assert_eq!(key.group(), "colors");
/// assert_eq!(key.name(), "primary");
/// assert_eq!(key.token(), "{colors.primary}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttrKey {
    group: String,
    name: String,
}

impl AttrKey {
    /// Creates a key, checking that both parts are identifiers.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Result<Self, ParseError> {
        let group = group.into();
        let name = name.into();
        if is_identifier(&group) && is_identifier(&name) {
            Ok(Self { group, name })
        } else {
            Err(ParseError::InvalidKey(format!("{}.{}", group, name)))
        }
    }

    /// Key for a reference token. Token parts are identifiers by construction.
    pub(crate) fn from_reference(reference: &Reference<'_>) -> Self {
        Self {
            group: reference.group.to_string(),
            name: reference.name.to_string(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reference token for this key, `{group.name}`.
    pub fn token(&self) -> String {
        format!("{{{}.{}}}", self.group, self.name)
    }

    /// Returns true if `input` holds a reference token for this key.
    pub fn is_referenced_by(&self, input: &str) -> bool {
        swatch_refparser::contains_reference(input, &self.group, &self.name)
    }
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

impl FromStr for AttrKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, name) = s
            .split_once('.')
            .ok_or_else(|| ParseError::InvalidKey(s.to_string()))?;
        Self::new(group, name).map_err(|_| ParseError::InvalidKey(s.to_string()))
    }
}

impl TryFrom<String> for AttrKey {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttrKey> for String {
    fn from(key: AttrKey) -> Self {
        key.to_string()
    }
}
