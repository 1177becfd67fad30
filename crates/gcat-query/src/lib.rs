//! Query parsing for gcat tool search.
//!
//! The query language is a flat list of space-separated parts, all of which must match:
//!
//! - **Words**: `samtools` - free text matched against tool name, description, and
//!   display name
//! - **Phrases**: `"samtools view"` - a quoted run matched verbatim; `\` escapes a quote
//! - **Comparisons**: `topic:Mapping`, `instance:"My Galaxy"` - field-scoped filters
//!
//! # Example
//!
//! ```
//! use gcat_query::{QueryNode, parse};
//!
//! let query = parse("bwa topic:Mapping").unwrap();
//! assert_eq!(query.len(), 2);
//! assert_eq!(query.nodes()[0], QueryNode::text("bwa"));
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{ParsedQuery, QueryNode};
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, tokenize};
pub use parser::parse;
