// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Error types
//!
//! Only malformed input produces an error. Inconsistencies in the automaton
//! constructions are bugs and panic instead.
//!

use std::{fmt::Display, path::PathBuf};

///
/// Grammar rule violated by a pattern
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SyntaxErrorKind {
    /// The pattern ended where a letter or a group was required.
    UnexpectedEnd,

    /// A character that no rule accepts at this point.
    UnexpectedSymbol(char),

    /// A `(` without its closing `)`.
    UnmatchedParen,

    /// Groups nested deeper than the parser allows.
    NestingTooDeep,

    /// Characters left over after a complete expression (e.g., a stray `)`).
    TrailingInput(char),
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of input"),
            Self::UnexpectedSymbol(c) => write!(f, "unexpected symbol '{c}'"),
            Self::UnmatchedParen => write!(f, "unmatched '('"),
            Self::NestingTooDeep => write!(f, "groups nested too deeply"),
            Self::TrailingInput(c) => write!(f, "trailing input at '{c}'"),
        }
    }
}

///
/// Error produced by the parser
///
/// The position is the index (in characters) of the offending character, or
/// the length of the pattern if the input ended prematurely.
///
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("syntax error at position {position}: {message}")]
pub struct SyntaxError {
    /// Violated rule
    pub kind: SyntaxErrorKind,
    /// Human-readable description
    pub message: String,
    /// Character index where parsing stopped
    pub position: usize,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, position: usize, context: &str) -> Self {
        SyntaxError {
            kind,
            message: format!("{kind} {context}"),
            position,
        }
    }
}

///
/// Errors reported by the compiler and its driver
///
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pattern is not in the supported grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The generated code could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        /// Destination file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        let e = SyntaxError::new(SyntaxErrorKind::UnmatchedParen, 2, "opened at position 0");
        assert_eq!(
            e.to_string(),
            "syntax error at position 2: unmatched '(' opened at position 0"
        );

        let e: Error = SyntaxError::new(SyntaxErrorKind::UnexpectedSymbol('1'), 0, "in atom").into();
        assert!(matches!(e, Error::Syntax(ref s) if s.position == 0));
        assert_eq!(
            e.to_string(),
            "syntax error at position 0: unexpected symbol '1' in atom"
        );

        let e = Error::Io {
            path: PathBuf::from("out.cpp"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.to_string(), "cannot write out.cpp: denied");
    }
}
