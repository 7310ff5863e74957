//! Error types for the attribute store, the resolver and their inputs.
//!
//! Validation failures are not here: they are user-facing and collected into a
//! list rather than returned as errors, see [`crate::ValidationError`].

use std::path::PathBuf;

use thiserror::Error;

use crate::key::AttrKey;

/// Errors parsing keys and type tags from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text is not a `group.name` pair of identifiers.
    #[error("invalid attribute key '{0}', expected 'group.name'")]
    InvalidKey(String),

    /// The type tag is not one of the four known types.
    #[error("unknown attribute type '{0}', expected one of: text, em, px, color")]
    UnknownType(String),
}

/// Errors from attribute store lookups and updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No attribute exists under this key.
    #[error("attribute '{0}' not found")]
    NotFound(AttrKey),
}

/// Errors that abort a resolution pass.
///
/// A failed pass never produces a store, so the caller keeps its last
/// consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The attribute to resolve does not exist.
    #[error("attribute '{0}' not found")]
    NotFound(AttrKey),

    /// A raw input references an attribute that does not exist.
    #[error("attribute '{from}' references non-existent attribute '{to}'")]
    UnresolvedReference { from: AttrKey, to: AttrKey },

    /// Propagation came back to an attribute already on its path.
    #[error("cycle detected in attribute references: {}", join_path(.path))]
    CyclicReference { path: Vec<AttrKey> },
}

impl ResolveError {
    /// For a cycle, the key that closed it (the last key on the path).
    pub fn closing_key(&self) -> Option<&AttrKey> {
        match self {
            ResolveError::CyclicReference { path } => path.last(),
            _ => None,
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => ResolveError::NotFound(key),
        }
    }
}

fn join_path(path: &[AttrKey]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors building or loading a seed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// YAML parse error.
    #[error("failed to parse catalog{}: {message}", location(.path))]
    Parse {
        /// Optional source file path.
        path: Option<PathBuf>,
        /// Error message from the YAML parser.
        message: String,
    },

    /// The catalog file could not be read.
    #[error("failed to load catalog: {message}")]
    Load { message: String },

    /// A group id is not an identifier.
    #[error("invalid group id '{0}'")]
    InvalidGroup(String),

    /// An attribute name is not an identifier.
    #[error("invalid attribute key '{group}.{name}'")]
    InvalidKey { group: String, name: String },

    /// Two groups share an id.
    #[error("duplicate group '{0}'")]
    DuplicateGroup(String),

    /// Two attributes in one group share a name.
    #[error("duplicate attribute '{0}'")]
    DuplicateKey(AttrKey),
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Errors reading or writing persisted snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage medium failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted form could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for StorageError {
    fn from(err: serde_yaml::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Top-level error for seeding, restoring and persisting a whole theme.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for whole-theme operations.
pub type Result<T> = std::result::Result<T, Error>;
