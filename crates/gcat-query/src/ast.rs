//! Parsed query representation.
//!
//! A query is a flat, ordered list of nodes. Every node must match for a tool to be
//! returned; order carries no meaning but is kept for deterministic output.

use std::{fmt, slice};

use serde::Serialize;

/// One parsed unit of a query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryNode {
    /// Loose words matched as free text.
    Text(Vec<String>),

    /// A quoted phrase, matched verbatim. Always holds exactly one element.
    Exact(Vec<String>),

    /// Field-scoped filter such as `topic:mapping` or `instance:"My Galaxy"`.
    Comparison {
        /// Field name as written before the colon.
        field: String,
        /// The value being compared. Always a `Text` or `Exact` node.
        value: Box<Self>,
    },
}

impl QueryNode {
    /// Creates a text node holding a single word.
    pub fn text(word: impl Into<String>) -> Self {
        Self::Text(vec![word.into()])
    }

    /// Creates an exact node holding a single phrase.
    pub fn exact(phrase: impl Into<String>) -> Self {
        Self::Exact(vec![phrase.into()])
    }

    /// Creates a comparison node.
    pub fn comparison(field: impl Into<String>, value: Self) -> Self {
        Self::Comparison {
            field: field.into(),
            value: Box::new(value),
        }
    }

    /// Returns the tokens of a text or exact node rejoined with single spaces.
    ///
    /// Comparisons have no standalone value and return `None`.
    pub fn joined(&self) -> Option<String> {
        match self {
            Self::Text(tokens) | Self::Exact(tokens) => Some(tokens.join(" ")),
            Self::Comparison { .. } => None,
        }
    }

    /// Formats the node as query syntax.
    fn fmt_query_string(&self) -> String {
        match self {
            Self::Text(tokens) => tokens.join(" "),
            Self::Exact(tokens) => {
                let phrase = tokens.join(" ");
                format!("\"{}\"", phrase.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Self::Comparison { field, value } => {
                format!("{}:{}", field, value.fmt_query_string())
            }
        }
    }

    /// Writes the node as an indented tree line.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Text(tokens) => writeln!(f, "{prefix}Text({tokens:?})"),
            Self::Exact(tokens) => writeln!(f, "{prefix}Exact({tokens:?})"),
            Self::Comparison { field, value } => {
                writeln!(f, "{prefix}Comparison({field:?})")?;
                value.fmt_tree(f, indent + 1)
            }
        }
    }
}

/// The ordered node sequence produced by parsing one query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedQuery {
    /// Nodes in left-to-right order of appearance.
    nodes: Vec<QueryNode>,
}

impl ParsedQuery {
    /// Creates a parsed query from nodes.
    pub fn new(nodes: Vec<QueryNode>) -> Self {
        Self { nodes }
    }

    /// Returns the nodes in order.
    pub fn nodes(&self) -> &[QueryNode] {
        &self.nodes
    }

    /// Returns an iterator over the nodes.
    pub fn iter(&self) -> slice::Iter<'_, QueryNode> {
        self.nodes.iter()
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the query has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Formats the query back into query syntax.
    ///
    /// The output parses to an equal `ParsedQuery`.
    pub fn to_query_string(&self) -> String {
        self.nodes
            .iter()
            .map(QueryNode::fmt_query_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a ParsedQuery {
    type Item = &'a QueryNode;
    type IntoIter = slice::Iter<'a, QueryNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            node.fmt_tree(f, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_rejoins_tokens_with_single_space() {
        let node = QueryNode::Text(vec!["samtools".into(), "view".into()]);
        assert_eq!(node.joined().as_deref(), Some("samtools view"));
    }

    #[test]
    fn comparison_has_no_joined_value() {
        let node = QueryNode::comparison("topic", QueryNode::text("mapping"));
        assert_eq!(node.joined(), None);
    }

    #[test]
    fn tree_display() {
        let query = ParsedQuery::new(vec![
            QueryNode::text("bwa"),
            QueryNode::comparison("instance", QueryNode::exact("My Galaxy")),
        ]);
        assert_eq!(
            query.to_string(),
            "Text([\"bwa\"])\nComparison(\"instance\")\n  Exact([\"My Galaxy\"])\n"
        );
    }

    #[test]
    fn query_string_escapes_quotes() {
        let query = ParsedQuery::new(vec![QueryNode::comparison(
            "topic",
            QueryNode::exact("say \"hi\""),
        )]);
        assert_eq!(query.to_query_string(), "topic:\"say \\\"hi\\\"\"");
    }

    #[test]
    fn serializes_with_kind_tags() {
        let query = ParsedQuery::new(vec![QueryNode::comparison(
            "topic",
            QueryNode::text("mapping"),
        )]);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json[0]["kind"], "comparison");
        assert_eq!(json[0]["value"]["field"], "topic");
        assert_eq!(json[0]["value"]["value"]["kind"], "text");
    }
}
