//! Read-only catalog access used by query evaluation.

use crate::{Instance, Tool, ToolVersion, Topic, TopicId};

/// A tool-level condition. A predicate set is a conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Name, description, or display name contains the text, ignoring case.
    TextContains(String),
    /// The tool is annotated with the topic.
    HasTopic(TopicId),
}

impl Predicate {
    /// Returns true if the tool satisfies this predicate.
    pub fn matches(&self, tool: &Tool) -> bool {
        match self {
            Self::TextContains(text) => {
                let needle = text.to_lowercase();
                [&tool.name, &tool.description, &tool.display_name]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            Self::HasTopic(topic) => tool.topics.contains(topic),
        }
    }
}

/// Lookup capability the query evaluator depends on.
///
/// Implementations must be safe to read concurrently when shared across threads.
pub trait CatalogAccessor {
    /// Finds a topic whose label equals `label` exactly.
    fn find_topic_by_label(&self, label: &str) -> Option<Topic>;

    /// Finds a topic whose label equals `label` ignoring case.
    fn find_topic_by_label_ignore_case(&self, label: &str) -> Option<Topic>;

    /// Finds an instance whose brand equals `brand` ignoring case.
    fn find_instance_by_brand(&self, brand: &str) -> Option<Instance>;

    /// Returns every tool satisfying all predicates. An empty set matches all tools.
    fn tools_matching(&self, predicates: &[Predicate]) -> Vec<Tool>;

    /// Returns the versions of a tool in the tool's order.
    fn versions_of(&self, tool: &Tool) -> Vec<ToolVersion>;
}
