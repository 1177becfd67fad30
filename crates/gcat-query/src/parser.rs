//! Query parser.
//!
//! Turns the token stream into an ordered list of query nodes.
//!
//! # Grammar
//!
//! ```text
//! query      → (comparison | term)*
//! comparison → FIELD_PREFIX term
//! term       → PHRASE | WORD
//! ```
//!
//! The lexer has already resolved the ordered choice between a comparison and a bare
//! word, so the parser never backtracks.

use crate::{
    ast::{ParsedQuery, QueryNode},
    error::{ParseError, QueryError},
    lexer::{Token, tokenize},
};

/// Parser over a token stream.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query.
    fn parse(mut self) -> Result<ParsedQuery, ParseError> {
        let mut nodes = Vec::with_capacity(self.tokens.len());

        while self.peek().is_some() {
            nodes.push(self.parse_node()?);
        }

        Ok(ParsedQuery::new(nodes))
    }

    /// Parses: comparison | term
    fn parse_node(&mut self) -> Result<QueryNode, ParseError> {
        match self.peek().cloned() {
            Some(Token::FieldPrefix(field)) => {
                self.advance();
                let value = self.parse_term().ok_or_else(|| {
                    ParseError::new(
                        format!("expected term or phrase after '{field}:'"),
                        Some(self.position),
                    )
                })?;
                Ok(QueryNode::comparison(field, value))
            }
            Some(_) => self
                .parse_term()
                .ok_or_else(|| ParseError::new("expected term", Some(self.position))),
            None => Err(ParseError::new("unexpected end of query", None)),
        }
    }

    /// Parses: PHRASE | WORD, consuming the token on success.
    fn parse_term(&mut self) -> Option<QueryNode> {
        let node = match self.peek()? {
            Token::Word(word) => QueryNode::text(word.clone()),
            Token::Phrase(phrase) => QueryNode::exact(phrase.clone()),
            Token::FieldPrefix(_) => return None,
        };
        self.advance();
        Some(node)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into its node sequence.
///
/// Empty and all-whitespace input produce an empty `ParsedQuery`. Malformed quoting
/// produces a `QueryError` carrying the input and the offending position.
pub fn parse(input: &str) -> Result<ParsedQuery, QueryError> {
    let tokens = tokenize(input).map_err(QueryError::from)?;
    Parser::new(tokens)
        .parse()
        .map_err(|e| QueryError::from(e).with_query(input))
}
