//! Query evaluation.
//!
//! Turns a parsed query into a plan (tool-level predicates plus the instances one tool
//! version must be hosted on) and runs it against a [`CatalogAccessor`].
//!
//! Any comparison that cannot be resolved (unknown field, topic, or instance) makes
//! the whole query match nothing. Resolution stops at the first such comparison.

use std::{fmt, str::FromStr};

use gcat_query::{ParsedQuery, QueryNode};
use thiserror::Error;
use tracing::debug;

use crate::{CatalogAccessor, InstanceId, Predicate, Tool, Topic};

/// Field names accepted in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// `topic:` filters by topic label.
    Topic,
    /// `instance:` filters by hosting instance brand.
    Instance,
}

impl SearchField {
    /// All recognized fields.
    pub const ALL: [Self; 2] = [Self::Topic, Self::Instance];

    /// Returns the name used in query syntax.
    pub fn name(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Instance => "instance",
        }
    }
}

impl FromStr for SearchField {
    type Err = Unresolved;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| Unresolved::UnknownField(s.to_string()))
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a query was resolved to the empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unresolved {
    /// The query had no nodes.
    #[error("empty query")]
    EmptyQuery,
    /// A comparison named a field other than `topic` or `instance`.
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// No topic carries the requested label.
    #[error("no topic labelled {0:?}")]
    UnknownTopic(String),
    /// No instance carries the requested brand.
    #[error("no instance branded {0:?}")]
    UnknownInstance(String),
    /// A comparison value was itself a comparison.
    #[error("invalid value for field {0}")]
    InvalidValue(String),
}

/// Options controlling how filter values are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluateOptions {
    /// Match `topic:` values against labels exactly, including case.
    pub case_sensitive_topics: bool,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            case_sensitive_topics: true,
        }
    }
}

/// A resolved query, ready to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    /// Tool-level conditions, all of which must hold.
    pub predicates: Vec<Predicate>,
    /// Instances that a single version of the tool must all be hosted on.
    pub required_instances: Vec<InstanceId>,
}

/// Evaluates parsed queries against a catalog.
pub struct Evaluator<'a, C: ?Sized> {
    /// Catalog queried for filter values and tools.
    catalog: &'a C,
    /// Resolution options.
    options: EvaluateOptions,
}

impl<'a, C: CatalogAccessor + ?Sized> Evaluator<'a, C> {
    /// Creates an evaluator over `catalog`.
    pub fn new(catalog: &'a C, options: EvaluateOptions) -> Self {
        Self { catalog, options }
    }

    /// Returns the tools matching `query`, sorted by name then id.
    pub fn evaluate(&self, query: &ParsedQuery) -> Vec<Tool> {
        match self.plan(query) {
            Ok(plan) => self.run(&plan),
            Err(reason) => {
                debug!(%reason, "query resolved to no results");
                Vec::new()
            }
        }
    }

    /// Resolves every node of `query` into a plan.
    ///
    /// Fails on the first comparison that cannot be resolved.
    pub fn plan(&self, query: &ParsedQuery) -> Result<QueryPlan, Unresolved> {
        if query.is_empty() {
            return Err(Unresolved::EmptyQuery);
        }

        let mut plan = QueryPlan::default();

        for node in query {
            match node {
                QueryNode::Comparison { field, value } => {
                    let value = value
                        .joined()
                        .ok_or_else(|| Unresolved::InvalidValue(field.clone()))?;
                    match field.parse::<SearchField>()? {
                        SearchField::Topic => {
                            let topic = self.resolve_topic(&value)?;
                            plan.predicates.push(Predicate::HasTopic(topic.id));
                        }
                        SearchField::Instance => {
                            let instance = self
                                .catalog
                                .find_instance_by_brand(&value)
                                .ok_or(Unresolved::UnknownInstance(value))?;
                            if !plan.required_instances.contains(&instance.id) {
                                plan.required_instances.push(instance.id);
                            }
                        }
                    }
                }
                QueryNode::Text(_) | QueryNode::Exact(_) => {
                    if let Some(text) = node.joined() {
                        plan.predicates.push(Predicate::TextContains(text));
                    }
                }
            }
        }

        Ok(plan)
    }

    /// Runs a resolved plan.
    pub fn run(&self, plan: &QueryPlan) -> Vec<Tool> {
        let mut tools = self.catalog.tools_matching(&plan.predicates);

        if !plan.required_instances.is_empty() {
            tools.retain(|tool| {
                self.catalog
                    .versions_of(tool)
                    .iter()
                    .any(|v| v.hosted_on_all(&plan.required_instances))
            });
        }

        tools.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        debug!(
            predicates = plan.predicates.len(),
            required_instances = plan.required_instances.len(),
            matched = tools.len(),
            "evaluated query"
        );
        tools
    }

    /// Looks up a topic label according to the case-sensitivity option.
    fn resolve_topic(&self, label: &str) -> Result<Topic, Unresolved> {
        let topic = if self.options.case_sensitive_topics {
            self.catalog.find_topic_by_label(label)
        } else {
            self.catalog.find_topic_by_label_ignore_case(label)
        };
        topic.ok_or_else(|| Unresolved::UnknownTopic(label.to_string()))
    }
}

/// Evaluates `query` against `catalog`.
pub fn evaluate<C: CatalogAccessor + ?Sized>(
    query: &ParsedQuery,
    catalog: &C,
    options: EvaluateOptions,
) -> Vec<Tool> {
    Evaluator::new(catalog, options).evaluate(query)
}
