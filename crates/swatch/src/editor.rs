//! Inline editing of a theme, one attribute at a time.
//!
//! [`ThemeEditor`] is what presentation code drives. It holds the current
//! store revision and at most one open [`EditSession`]. An edit flows as:
//!
//! 1. [`open`](ThemeEditor::open) an attribute: the buffer starts as its raw input.
//! 2. [`set_buffer`](ThemeEditor::set_buffer) as the user types, optionally
//!    showing [`validation_errors`](ThemeEditor::validation_errors).
//! 3. [`commit`](ThemeEditor::commit): the buffer is validated, written as the
//!    new raw input and resolved. Only a fully successful pass replaces the
//!    current store.
//!
//! [`discard`](ThemeEditor::discard) reverts the buffer without touching the
//! store.
//!
//! ```rust
//! use swatch::{AttrKey, Catalog, ThemeEditor};
//!
//! let mut editor = ThemeEditor::new(Catalog::builtin()).unwrap();
//! let primary: AttrKey = "colors.primary".parse().unwrap();
//!
//! editor.open(&primary).unwrap();
//! editor.set_buffer("{colors.highlight2}").unwrap();
//! editor.commit().unwrap();
//!
//! assert_eq!(editor.view(&primary).unwrap().resolved_value, "#ffab40");
//! ```

use std::borrow::Cow;

use thiserror::Error;
use tracing::{info, warn};

use crate::attribute::AttrType;
use crate::catalog::Catalog;
use crate::error::{Error, ResolveError, StorageError, StoreError};
use crate::key::AttrKey;
use crate::resolver::{check_references, propagate};
use crate::snapshot::SnapshotStorage;
use crate::store::Store;
use crate::validator::{validate, ValidationError};

/// Errors from editing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// No attribute editor is open.
    #[error("no attribute is being edited")]
    NoActiveEdit,

    /// Another attribute's editor is already open.
    #[error("attribute '{open}' is already being edited")]
    Busy { open: AttrKey },

    /// The attribute does not exist.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The input failed validation; the store is unchanged.
    #[error("edit rejected: {}", messages(.0))]
    Rejected(Vec<ValidationError>),

    /// Resolution failed; the store is unchanged.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

fn messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The open editor for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    key: AttrKey,
    buffer: String,
}

impl EditSession {
    pub fn key(&self) -> &AttrKey {
        &self.key
    }

    /// The text being edited. Kept after a rejected commit.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub key: AttrKey,
    /// Distinct keys recomputed, in order, starting with `key`.
    pub updated: Vec<AttrKey>,
}

/// What presentation shows for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeView<'a> {
    pub key: &'a AttrKey,
    pub label: &'a str,
    pub attr_type: AttrType,
    pub raw_input: &'a str,
    pub resolved_value: &'a str,
    /// Resolved value formatted for a style property.
    pub style: Cow<'a, str>,
}

/// A theme being edited.
#[derive(Debug, Clone)]
pub struct ThemeEditor {
    catalog: Catalog,
    store: Store,
    session: Option<EditSession>,
}

impl ThemeEditor {
    /// Starts from the catalog defaults.
    pub fn new(catalog: Catalog) -> Result<Self, Error> {
        let store = Store::from_catalog(&catalog)?;
        Ok(Self {
            catalog,
            store,
            session: None,
        })
    }

    /// Restores the saved snapshot if `storage` has one, otherwise starts from
    /// the catalog defaults.
    ///
    /// A restored snapshot must reference only existing attributes and be
    /// free of cycles.
    pub fn load<S: SnapshotStorage + ?Sized>(catalog: Catalog, storage: &S) -> Result<Self, Error> {
        let Some(snapshot) = storage.load()? else {
            return Self::new(catalog);
        };
        let store = Store::restore(&catalog, &snapshot)?;
        check_references(&store)?;
        info!(attributes = snapshot.attributes.len(), "restored saved theme");
        Ok(Self {
            catalog,
            store,
            session: None,
        })
    }

    /// Writes the current store to `storage`.
    pub fn save<S: SnapshotStorage + ?Sized>(&self, storage: &S) -> Result<(), StorageError> {
        storage.save(&self.store.to_snapshot())
    }

    /// Returns to the catalog defaults and closes any open editor.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.store = Store::from_catalog(&self.catalog)?;
        self.session = None;
        info!("theme reset to catalog defaults");
        Ok(())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Display data for one attribute.
    pub fn view<'a>(&'a self, key: &'a AttrKey) -> Result<AttributeView<'a>, StoreError> {
        let attribute = self.store.get(key)?;
        Ok(AttributeView {
            key,
            label: attribute.label(),
            attr_type: attribute.attr_type(),
            raw_input: attribute.raw_input(),
            resolved_value: attribute.resolved_value(),
            style: attribute.style_value(),
        })
    }

    /// Opens the editor for `key`, with the buffer set to its raw input.
    ///
    /// Opening the attribute that is already open keeps its buffer.
    pub fn open(&mut self, key: &AttrKey) -> Result<(), EditError> {
        if let Some(session) = &self.session {
            if &session.key == key {
                return Ok(());
            }
            return Err(EditError::Busy {
                open: session.key.clone(),
            });
        }
        let buffer = self.store.get(key)?.raw_input().to_string();
        self.session = Some(EditSession {
            key: key.clone(),
            buffer,
        });
        Ok(())
    }

    /// Closes the open editor, returning its session.
    pub fn close(&mut self) -> Option<EditSession> {
        self.session.take()
    }

    /// Opens `key`'s editor, or closes it if it is the one open.
    ///
    /// Returns whether the editor for `key` is open afterwards.
    pub fn toggle(&mut self, key: &AttrKey) -> Result<bool, EditError> {
        if self.session.as_ref().is_some_and(|s| &s.key == key) {
            self.session = None;
            return Ok(false);
        }
        self.open(key)?;
        Ok(true)
    }

    fn active_mut(&mut self) -> Result<&mut EditSession, EditError> {
        self.session.as_mut().ok_or(EditError::NoActiveEdit)
    }

    fn active(&self) -> Result<&EditSession, EditError> {
        self.session.as_ref().ok_or(EditError::NoActiveEdit)
    }

    /// Replaces the text in the open editor.
    pub fn set_buffer(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        self.active_mut()?.buffer = text.into();
        Ok(())
    }

    pub fn buffer(&self) -> Result<&str, EditError> {
        Ok(self.active()?.buffer())
    }

    /// Validates the buffer without committing it.
    pub fn validation_errors(&self) -> Result<Vec<ValidationError>, EditError> {
        let session = self.active()?;
        Ok(validate(&session.buffer, &session.key))
    }

    /// Reverts the buffer to the committed raw input.
    pub fn discard(&mut self) -> Result<(), EditError> {
        let key = self.active()?.key.clone();
        let raw = self.store.get(&key)?.raw_input().to_string();
        self.active_mut()?.buffer = raw;
        Ok(())
    }

    /// Commits the buffer of the open editor.
    ///
    /// On failure the store and the buffer are left as they were. On success
    /// the editor stays open on the committed text.
    pub fn commit(&mut self) -> Result<Commit, EditError> {
        let session = self.active()?.clone();
        self.apply(&session.key, &session.buffer)
    }

    /// Validates, writes and resolves `input` as the raw input of `key`.
    ///
    /// This is a commit without an open editor. It still refuses to run while
    /// a different attribute is being edited.
    pub fn apply(&mut self, key: &AttrKey, input: &str) -> Result<Commit, EditError> {
        if let Some(session) = &self.session {
            if &session.key != key {
                return Err(EditError::Busy {
                    open: session.key.clone(),
                });
            }
        }

        let errors = validate(input, key);
        if !errors.is_empty() {
            warn!(key = %key, errors = ?errors, "edit rejected");
            return Err(EditError::Rejected(errors));
        }

        let candidate = self.store.with_raw_input(key, input)?;
        let propagation = propagate(&candidate, key)?;
        let updated: Vec<AttrKey> = propagation.updated().into_iter().cloned().collect();

        self.store = propagation.store;
        info!(key = %key, updated = updated.len(), "edit committed");
        Ok(Commit {
            key: key.clone(),
            updated,
        })
    }
}
