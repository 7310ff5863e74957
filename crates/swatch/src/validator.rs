//! Validation of candidate raw inputs before they reach the store.
//!
//! No strict value validation is done (e.g. of `1px solid black`): style
//! values have too many legal shapes, and `calc()` expressions are opaque
//! text. Two rules are checked, and both always run:
//!
//! - Every `(`, `[` and `{` is closed in order.
//! - The input does not reference the attribute being edited.

use swatch_refparser::{check_delimiters, is_balanced, DelimiterError};
use thiserror::Error;

use crate::key::AttrKey;

/// A reason to reject a candidate input. Messages are meant for end users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please check that all parentheses close properly.")]
    UnbalancedDelimiters {
        #[source]
        cause: DelimiterError,
    },

    #[error("Self-referencing is not allowed.")]
    SelfReference { key: AttrKey },
}

impl ValidationError {
    /// Stable identifier for display lists.
    pub fn id(&self) -> u8 {
        match self {
            ValidationError::UnbalancedDelimiters { .. } => 0,
            ValidationError::SelfReference { .. } => 1,
        }
    }
}

/// Checks `candidate` as the new raw input of `own_key`.
///
/// Returns every failed rule; an empty list means the input may be committed.
pub fn validate(candidate: &str, own_key: &AttrKey) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(cause) = check_delimiters(candidate) {
        errors.push(ValidationError::UnbalancedDelimiters { cause });
    }

    if candidate.contains(&own_key.token()) {
        errors.push(ValidationError::SelfReference {
            key: own_key.clone(),
        });
    }

    errors
}

/// Returns true if all delimiters in `candidate` are balanced.
pub fn is_valid(candidate: &str) -> bool {
    is_balanced(candidate)
}
