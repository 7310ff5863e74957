//! Tokenizer for `{group.name}` attribute references.
//!
//! Attribute raw inputs are free text that may embed references to other
//! attributes. This crate splits such text into literal segments and
//! reference tokens, and checks that the bracket-like delimiters in a
//! candidate input are balanced.
//!
//! # Example
//!
//! ```rust
//! use swatch_refparser::{references, substitute, Segment, Tokenizer};
//!
//! let input = "1px solid {colors.primary}";
//!
//! let segments: Vec<_> = Tokenizer::new(input).collect();
//! assert_eq!(segments.len(), 2);
//! assert!(matches!(segments[0], Segment::Text("1px solid ")));
//!
//! let refs: Vec<_> = references(input).map(|r| r.to_string()).collect();
//! assert_eq!(refs, vec!["colors.primary"]);
//!
//! let out: Result<String, ()> = substitute(input, |_| Ok("#000000".to_string()));
//! assert_eq!(out.unwrap(), "1px solid #000000");
//! ```
//!
//! # Token Grammar
//!
//! A reference is `{`, an identifier, `.`, an identifier, `}`. Identifiers
//! are one or more ASCII letters, digits or underscores.
//!
//! Pattern: `\{[A-Za-z0-9_]+\.[A-Za-z0-9_]+\}`
//!
//! Anything else is literal text. A `{` that does not open a well-formed
//! token is emitted on its own and scanning resumes right after it, so
//! `{{colors.primary}}` yields `{`, the reference, then `}`.

mod delimiters;

pub use delimiters::{check_delimiters, is_balanced, DelimiterError};

use std::fmt;
use std::ops::Range;

/// A `{group.name}` reference found in an input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Group part, before the dot.
    pub group: &'a str,
    /// Name part, after the dot.
    pub name: &'a str,
    /// Byte range of the whole token, braces included.
    pub span: Range<usize>,
}

impl Reference<'_> {
    /// Returns true if this reference points at `group.name`.
    pub fn targets(&self, group: &str, name: &str) -> bool {
        self.group == group && self.name == name
    }
}

impl fmt::Display for Reference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// A piece of tokenized input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, copied through unchanged.
    Text(&'a str),
    /// A reference token.
    Reference(Reference<'a>),
}

/// Iterator over the [`Segment`]s of an input string.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

/// Checks if a string is a valid identifier (`[A-Za-z0-9_]+`).
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Splits token content (`group.name`) into its two identifiers.
fn split_token(content: &str) -> Option<(&str, &str)> {
    let (group, name) = content.split_once('.')?;
    if is_identifier(group) && is_identifier(name) {
        Some((group, name))
    } else {
        None
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.pos..];

        let Some(brace_pos) = remaining.find('{') else {
            self.pos = self.input.len();
            return Some(Segment::Text(remaining));
        };

        if brace_pos > 0 {
            self.pos += brace_pos;
            return Some(Segment::Text(&remaining[..brace_pos]));
        }

        // At a '{': the token, if any, ends at the first '}'
        if let Some(close) = remaining.find('}') {
            if let Some((group, name)) = split_token(&remaining[1..close]) {
                let start = self.pos;
                self.pos += close + 1;
                return Some(Segment::Reference(Reference {
                    group,
                    name,
                    span: start..self.pos,
                }));
            }
        }

        // Not a token: the brace is literal
        self.pos += 1;
        Some(Segment::Text(&remaining[..1]))
    }
}

/// Returns an iterator over the references in `input`, in order of appearance.
pub fn references(input: &str) -> impl Iterator<Item = Reference<'_>> {
    Tokenizer::new(input).filter_map(|segment| match segment {
        Segment::Reference(reference) => Some(reference),
        Segment::Text(_) => None,
    })
}

/// Returns true if `input` contains the token `{group.name}`.
pub fn contains_reference(input: &str, group: &str, name: &str) -> bool {
    references(input).any(|r| r.targets(group, name))
}

/// Rebuilds `input`, replacing every reference with the result of `lookup`.
///
/// The first lookup failure aborts the substitution and is returned as is.
pub fn substitute<E, F>(input: &str, mut lookup: F) -> Result<String, E>
where
    F: FnMut(&Reference<'_>) -> Result<String, E>,
{
    let mut output = String::with_capacity(input.len());
    for segment in Tokenizer::new(input) {
        match segment {
            Segment::Text(text) => output.push_str(text),
            Segment::Reference(reference) => output.push_str(&lookup(&reference)?),
        }
    }
    Ok(output)
}
