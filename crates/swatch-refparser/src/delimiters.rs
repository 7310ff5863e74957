//! Balance checking for `()`, `[]` and `{}`.
//!
//! Only the six delimiter characters are considered; everything else in the
//! input is ignored. All three kinds share one stack, so a closer must match
//! the most recent unclosed opener: `"(]"` and `"([)]"` are rejected.

use std::fmt;

/// Why an input failed the balance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelimiterError {
    /// A closer that does not match the innermost open delimiter.
    Unexpected {
        /// The closing character found.
        found: char,
        /// Byte offset of `found`.
        offset: usize,
        /// The closer that was expected, or `None` if nothing was open.
        expected: Option<char>,
    },
    /// The input ended with delimiters still open.
    Unclosed {
        /// The closer for the innermost unclosed opener.
        expected: char,
        /// Byte offset of that opener.
        offset: usize,
    },
}

impl fmt::Display for DelimiterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelimiterError::Unexpected {
                found,
                offset,
                expected: Some(expected),
            } => write!(
                f,
                "unexpected '{}' at offset {}, expected '{}'",
                found, offset, expected
            ),
            DelimiterError::Unexpected {
                found,
                offset,
                expected: None,
            } => write!(f, "unmatched '{}' at offset {}", found, offset),
            DelimiterError::Unclosed { expected, offset } => write!(
                f,
                "delimiter opened at offset {} is never closed, expected '{}'",
                offset, expected
            ),
        }
    }
}

impl std::error::Error for DelimiterError {}

fn closer_for(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Checks that every delimiter in `input` is closed in the right order.
pub fn check_delimiters(input: &str) -> Result<(), DelimiterError> {
    // (closer, offset of its opener)
    let mut stack: Vec<(char, usize)> = Vec::new();

    for (offset, c) in input.char_indices() {
        if let Some(closer) = closer_for(c) {
            stack.push((closer, offset));
        } else if is_closer(c) {
            match stack.last() {
                Some((expected, _)) if *expected == c => {
                    stack.pop();
                }
                top => {
                    return Err(DelimiterError::Unexpected {
                        found: c,
                        offset,
                        expected: top.map(|(expected, _)| *expected),
                    });
                }
            }
        }
    }

    match stack.pop() {
        Some((expected, offset)) => Err(DelimiterError::Unclosed { expected, offset }),
        None => Ok(()),
    }
}

/// Returns true if all delimiters in `input` are balanced.
pub fn is_balanced(input: &str) -> bool {
    check_delimiters(input).is_ok()
}
