//! Attribute values and their type tags.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Type tag of an attribute. Decides whether a unit suffix is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    Text,
    Em,
    Px,
    Color,
}

impl AttrType {
    pub const ALL: [AttrType; 4] = [AttrType::Text, AttrType::Em, AttrType::Px, AttrType::Color];

    pub fn as_str(self) -> &'static str {
        match self {
            AttrType::Text => "text",
            AttrType::Em => "em",
            AttrType::Px => "px",
            AttrType::Color => "color",
        }
    }

    /// The unit appended to numeric values, if this type has one.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            AttrType::Em => Some("em"),
            AttrType::Px => Some("px"),
            AttrType::Text | AttrType::Color => None,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttrType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttrType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError::UnknownType(s.to_string()))
    }
}

/// A themed value: what the user typed and what it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    label: String,
    attr_type: AttrType,
    raw_input: String,
    resolved_value: String,
}

impl Attribute {
    /// Creates an attribute whose raw input and resolved value are both `value`.
    pub fn new(label: impl Into<String>, attr_type: AttrType, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: label.into(),
            attr_type,
            resolved_value: value.clone(),
            raw_input: value,
        }
    }

    /// Same label and type, new values.
    pub(crate) fn with_values(&self, raw_input: String, resolved_value: String) -> Self {
        Self {
            label: self.label.clone(),
            attr_type: self.attr_type,
            raw_input,
            resolved_value,
        }
    }

    /// Same label, persisted type and values.
    pub(crate) fn restored(&self, attr_type: AttrType, raw_input: String, resolved_value: String) -> Self {
        Self {
            label: self.label.clone(),
            attr_type,
            raw_input,
            resolved_value,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attr_type(&self) -> AttrType {
        self.attr_type
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn resolved_value(&self) -> &str {
        &self.resolved_value
    }

    /// Returns true if the raw input holds at least one reference token.
    pub fn has_references(&self) -> bool {
        swatch_refparser::references(&self.raw_input).next().is_some()
    }

    /// The resolved value as it should be applied to a style property.
    pub fn style_value(&self) -> Cow<'_, str> {
        format_style(self.attr_type, &self.resolved_value)
    }
}

/// Formats a resolved value for use as a style property.
///
/// Numeric values of `em` and `px` attributes get their unit appended.
/// Anything else is returned unchanged.
///
/// ```rust
/// use swatch::{format_style, AttrType};
///
/// assert_eq!(format_style(AttrType::Em, "1.1"), "1.1em");
/// assert_eq!(format_style(AttrType::Em, "10px"), "10px");
/// assert_eq!(format_style(AttrType::Px, "calc(2 * 3px)"), "calc(2 * 3px)");
/// assert_eq!(format_style(AttrType::Color, "#ffffff"), "#ffffff");
/// ```
pub fn format_style(attr_type: AttrType, value: &str) -> Cow<'_, str> {
    match attr_type.unit() {
        Some(unit) if is_numeric(value) => Cow::Owned(format!("{}{}", value, unit)),
        _ => Cow::Borrowed(value),
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(|n| !n.is_nan())
}
