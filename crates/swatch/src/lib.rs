//! # Swatch - Theme Attributes with Live References
//!
//! Swatch keeps a set of named style attributes (colors, sizes, borders) and
//! lets any attribute's value reference others with `{group.name}` tokens.
//! When an attribute changes, everything that references it is recomputed.
//!
//! - [`Catalog`]: the seed definition of groups and attributes
//! - [`Store`]: an immutable snapshot of every attribute's raw and resolved value
//! - [`resolve`] / [`propagate`]: recompute a changed key and its dependents
//! - [`validate`]: the checks a candidate input must pass before commit
//! - [`ThemeEditor`]: the one-editor-at-a-time editing session
//! - [`SnapshotStorage`]: where the store is persisted between sessions
//!
//! ## Quick Start
//!
//! ```rust
//! use swatch::{resolve, AttrKey, Catalog, Store};
//!
//! let store = Store::from_catalog(&Catalog::builtin()).unwrap();
//! let border: AttrKey = "textfield.border".parse().unwrap();
//! let primary: AttrKey = "colors.primary".parse().unwrap();
//!
//! let store = store
//!     .with_raw_input(&border, "1px solid {colors.primary}")
//!     .unwrap();
//! let store = resolve(&store, &border).unwrap();
//!
//! let store = store.with_raw_input(&primary, "red").unwrap();
//! let store = resolve(&store, &primary).unwrap();
//!
//! assert_eq!(store.get(&border).unwrap().resolved_value(), "1px solid red");
//! ```
//!
//! ## Resolution
//!
//! Resolution is a pure function from one store to the next. A pass either
//! yields a complete new store or fails with a [`ResolveError`], leaving the
//! input store as the current consistent state. A pass that returns to a key
//! already on its propagation path fails with
//! [`ResolveError::CyclicReference`].
//!
//! ## Style Values
//!
//! Resolved values of `em` and `px` attributes get their unit appended when
//! they are plain numbers, see [`format_style`].

pub mod attribute;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod key;
pub mod resolver;
pub mod snapshot;
pub mod store;
pub mod validator;

// Model
pub use attribute::{format_style, AttrType, Attribute};
pub use catalog::{Catalog, CatalogEntry, CatalogGroup, GroupBuilder};
pub use key::AttrKey;
pub use store::{AttributeGroup, Store};

// Errors
pub use error::{CatalogError, Error, ParseError, ResolveError, Result, StorageError, StoreError};

// Resolution and validation
pub use resolver::{check_references, propagate, resolve, resolve_all, Propagation};
pub use validator::{is_valid, validate, ValidationError};

// Editing and persistence
pub use editor::{AttributeView, Commit, EditError, EditSession, ThemeEditor};
pub use snapshot::{FileStorage, MemoryStorage, Snapshot, SnapshotEntry, SnapshotStorage};

// Token scanning (from swatch-refparser)
pub use swatch_refparser::{DelimiterError, Reference, Segment, Tokenizer};
