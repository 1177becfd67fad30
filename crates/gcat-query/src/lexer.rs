//! Query lexer (tokenizer).
//!
//! Splits a query string on whitespace into words, quoted phrases, and field prefixes.
//! A field prefix is only produced when the text before the first colon of a word is
//! non-empty and a term follows the colon immediately; otherwise the whole run is an
//! ordinary word.

use crate::error::LexError;

/// Quote character delimiting exact phrases.
const QUOTE: char = '"';

/// Escape character inside exact phrases.
const ESCAPE: char = '\\';

/// Separator between a field name and its value.
const FIELD_SEPARATOR: char = ':';

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word.
    Word(String),

    /// A quoted phrase (quotes stripped, escapes resolved).
    Phrase(String),

    /// Field prefix (e.g., "topic:" produces FieldPrefix("topic")).
    FieldPrefix(String),
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Current byte position in input.
    position: usize,
    /// Set after a field prefix, so the value is never read as another prefix.
    in_field_value: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            in_field_value: false,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let in_field_value = self.in_field_value;
        self.in_field_value = false;

        if ch == QUOTE {
            return self.read_phrase().map(Some);
        }

        if !in_field_value && let Some(name) = self.read_field_prefix() {
            self.in_field_value = true;
            return Ok(Some(Token::FieldPrefix(name)));
        }

        Ok(Some(Token::Word(self.read_word())))
    }

    /// Reads a quoted phrase starting at the opening quote.
    fn read_phrase(&mut self) -> Result<Token, LexError> {
        let start_pos = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.peek() {
                Some(QUOTE) => {
                    self.advance(); // consume closing quote
                    return Ok(Token::Phrase(content));
                }
                Some(ESCAPE) => {
                    let escape_pos = self.position;
                    self.advance();
                    let Some(escaped) = self.peek() else {
                        return Err(self.error_at("unterminated escape in phrase", escape_pos));
                    };
                    content.push(escaped);
                    self.advance();
                }
                Some(ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unclosed quote", start_pos)),
            }
        }
    }

    /// Consumes `name:` when the current word is a field comparison.
    ///
    /// Requires a non-empty name before the first colon and a non-whitespace character
    /// right after it. Leaves the position untouched when the word is not a comparison.
    fn read_field_prefix(&mut self) -> Option<String> {
        let rest = &self.input[self.position..];
        let word_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_len];

        let colon = word.find(FIELD_SEPARATOR)?;
        if colon == 0 || colon + FIELD_SEPARATOR.len_utf8() == word.len() {
            return None;
        }

        let name = word[..colon].to_string();
        self.position += colon + FIELD_SEPARATOR.len_utf8();
        Some(name)
    }

    /// Reads a run of non-whitespace characters.
    fn read_word(&mut self) -> String {
        let rest = &self.input[self.position..];
        let word_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.position += word_len;
        rest[..word_len].to_string()
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Returns the character at the current position.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Advances past the current character.
    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.position += ch.len_utf8();
        }
    }
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
