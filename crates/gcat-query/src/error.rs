//! Error types for query parsing.
//!
//! Lexing failures carry byte positions; parse failures carry token indices. Both fold
//! into [`QueryError`], which renders the query with a caret under the failure point.

use std::{error::Error, fmt};

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("query syntax error: {message} at byte {position}")]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }
}

/// Parse error with token position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Token index where error occurred (if applicable).
    pub token_index: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, token_index: Option<usize>) -> Self {
        Self {
            message: message.into(),
            token_index,
        }
    }
}

/// A unified error type for query parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Tokenization failed, e.g. an unclosed quote.
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// The token stream did not form a valid query.
    Parse {
        /// Error message.
        message: String,
        /// Approximate byte position in input (if available).
        position: Option<usize>,
    },
}

impl QueryError {
    /// Creates a lex error.
    pub fn lex(message: impl Into<String>, position: usize, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: message.into(),
                position,
            },
            query: Some(query.into()),
        }
    }

    /// Creates a parse error.
    pub fn parse(
        message: impl Into<String>,
        position: Option<usize>,
        query: Option<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
            },
            query,
        }
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } | QueryErrorKind::Parse { message, .. } => message,
        }
    }

    /// Returns the byte position of the failure, if known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("unclosed quote") {
            Some("Add a closing quote (\") to complete the phrase")
        } else if message.contains("escape") {
            Some("A backslash must be followed by the character it escapes, e.g. \\\"")
        } else {
            None
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;

        if let Some(query) = &self.query {
            writeln!(f, "  {query}")?;
            if let Some(pos) = self.position() {
                let clamped = pos.min(query.len());
                // Pad by characters, not bytes, so the caret lines up on non-ASCII input.
                let width = query
                    .get(..clamped)
                    .map_or(clamped, |prefix| prefix.chars().count());
                writeln!(f, "  {}^", " ".repeat(width))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
            },
            query: Some(err.input),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: err.message,
                position: None,
            },
            query: None,
        }
    }
}
