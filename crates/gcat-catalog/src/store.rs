//! In-memory catalog with JSON persistence.
//!
//! The catalog is loaded whole, queried through [`CatalogAccessor`], updated by
//! ingestion, and written back as a single JSON document.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::Path,
    time::SystemTime,
};

use serde::{Deserialize, Serialize};

use crate::{
    CatalogAccessor, CatalogError, Instance, InstanceId, Predicate, Tool, ToolId, ToolVersion,
    ToolVersionId, Topic, TopicId,
};

/// Entity counts for status output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Registered instances.
    pub instances: usize,
    /// Distinct tools.
    pub tools: usize,
    /// Distinct tool versions.
    pub versions: usize,
    /// Distinct topics.
    pub topics: usize,
}

/// On-disk layout: flat entity lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    /// Registered instances.
    #[serde(default)]
    instances: Vec<Instance>,
    /// Tools.
    #[serde(default)]
    tools: Vec<Tool>,
    /// Tool versions.
    #[serde(default)]
    versions: Vec<ToolVersion>,
    /// Topics.
    #[serde(default)]
    topics: Vec<Topic>,
}

/// The tool catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CatalogFile", into = "CatalogFile")]
pub struct Catalog {
    /// Instances by id.
    instances: BTreeMap<InstanceId, Instance>,
    /// Tools by id.
    tools: BTreeMap<ToolId, Tool>,
    /// Tool versions by id.
    versions: BTreeMap<ToolVersionId, ToolVersion>,
    /// Topics by id.
    topics: BTreeMap<TopicId, Topic>,
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        Self {
            instances: file.instances.into_iter().map(|i| (i.id, i)).collect(),
            tools: file.tools.into_iter().map(|t| (t.id, t)).collect(),
            versions: file.versions.into_iter().map(|v| (v.id, v)).collect(),
            topics: file.topics.into_iter().map(|t| (t.id, t)).collect(),
        }
    }
}

impl From<Catalog> for CatalogFile {
    fn from(catalog: Catalog) -> Self {
        Self {
            instances: catalog.instances.into_values().collect(),
            tools: catalog.tools.into_values().collect(),
            versions: catalog.versions.into_values().collect(),
            topics: catalog.topics.into_values().collect(),
        }
    }
}

/// Returns the id following the largest key in `map`.
fn next_key<K: Copy, V>(map: &BTreeMap<K, V>, raw: impl Fn(K) -> u64) -> u64 {
    map.keys().next_back().map_or(1, |k| raw(*k) + 1)
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a JSON file.
    ///
    /// Returns an empty catalog if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves the catalog as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let io_err = |source: io::Error| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(CatalogError::Serialize)?;
        fs::write(path, contents).map_err(io_err)
    }

    /// Returns entity counts.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            instances: self.instances.len(),
            tools: self.tools.len(),
            versions: self.versions.len(),
            topics: self.topics.len(),
        }
    }

    /// Returns true if nothing has been ingested.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.tools.is_empty()
    }

    /// Iterates over instances in id order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    /// Iterates over tools in id order.
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Iterates over topics in id order.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    /// Gets an instance by id.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    /// Gets an instance by its URL.
    pub fn instance_by_url(&self, url: &str) -> Option<&Instance> {
        self.instances.values().find(|i| i.url == url)
    }

    /// Gets a tool by id.
    pub fn tool(&self, id: ToolId) -> Option<&Tool> {
        self.tools.get(&id)
    }

    /// Gets a tool by its unique name.
    pub fn tool_by_name(&self, name: &str) -> Option<&Tool> {
        self.tools.values().find(|t| t.name == name)
    }

    /// Gets a tool version by id.
    pub fn version(&self, id: ToolVersionId) -> Option<&ToolVersion> {
        self.versions.get(&id)
    }

    /// Gets a topic by id.
    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.get(&id)
    }

    /// Returns the versions of a tool, skipping dangling ids.
    pub fn tool_versions(&self, tool: &Tool) -> Vec<&ToolVersion> {
        tool.versions
            .iter()
            .filter_map(|id| self.versions.get(id))
            .collect()
    }

    /// Returns the distinct instances hosting any version of a tool, in id order.
    pub fn tool_instances(&self, tool: &Tool) -> Vec<&Instance> {
        let ids: BTreeSet<InstanceId> = self
            .tool_versions(tool)
            .into_iter()
            .flat_map(|v| v.instances.iter().copied())
            .collect();
        ids.into_iter()
            .filter_map(|id| self.instances.get(&id))
            .collect()
    }

    /// Returns the topics of a tool, skipping dangling ids.
    pub fn tool_topics(&self, tool: &Tool) -> Vec<&Topic> {
        tool.topics
            .iter()
            .filter_map(|id| self.topics.get(id))
            .collect()
    }

    /// Counts distinct tool names among the versions hosted on an instance.
    pub fn instance_tool_count(&self, id: InstanceId) -> usize {
        self.versions
            .values()
            .filter(|v| v.instances.contains(&id))
            .map(|v| v.name.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Returns the instance registered at `url`, creating it if needed.
    pub fn upsert_instance(&mut self, url: &str, now: SystemTime) -> &mut Instance {
        let id = self
            .instance_by_url(url)
            .map_or_else(|| InstanceId(next_key(&self.instances, |k| k.0)), |i| i.id);
        self.instances.entry(id).or_insert_with(|| Instance {
            id,
            url: url.to_string(),
            brand: None,
            version: None,
            allow_user_creation: false,
            enable_quotas: false,
            require_login: false,
            terms_url: None,
            creation_date: now,
            update_date: None,
        })
    }

    /// Returns the tool named `name`, creating an empty one if needed.
    ///
    /// The boolean is true when the tool was created.
    pub fn upsert_tool(&mut self, name: &str) -> (&mut Tool, bool) {
        let existing = self.tool_by_name(name).map(|t| t.id);
        let created = existing.is_none();
        let id = existing.unwrap_or_else(|| ToolId(next_key(&self.tools, |k| k.0)));
        let tool = self.tools.entry(id).or_insert_with(|| Tool {
            id,
            name: name.to_string(),
            description: String::new(),
            display_name: String::new(),
            topics: Vec::new(),
            versions: Vec::new(),
        });
        (tool, created)
    }

    /// Returns the id of the first version matching `pred`.
    pub fn find_version(&self, pred: impl Fn(&ToolVersion) -> bool) -> Option<ToolVersionId> {
        self.versions.values().find(|v| pred(v)).map(|v| v.id)
    }

    /// Stores a new version, assigning it an id. The `id` field of `version` is ignored.
    pub fn insert_version(&mut self, mut version: ToolVersion) -> ToolVersionId {
        let id = ToolVersionId(next_key(&self.versions, |k| k.0));
        version.id = id;
        self.versions.insert(id, version);
        id
    }

    /// Gets a mutable tool version by id.
    pub fn version_mut(&mut self, id: ToolVersionId) -> Option<&mut ToolVersion> {
        self.versions.get_mut(&id)
    }

    /// Gets a mutable tool by id.
    pub fn tool_mut(&mut self, id: ToolId) -> Option<&mut Tool> {
        self.tools.get_mut(&id)
    }

    /// Returns the id of the topic labelled `label`, creating it if needed.
    pub fn upsert_topic(&mut self, label: &str) -> TopicId {
        if let Some(existing) = self.topics.values().find(|t| t.label == label) {
            return existing.id;
        }
        let id = TopicId(next_key(&self.topics, |k| k.0));
        self.topics.insert(
            id,
            Topic {
                id,
                label: label.to_string(),
            },
        );
        id
    }
}

impl CatalogAccessor for Catalog {
    fn find_topic_by_label(&self, label: &str) -> Option<Topic> {
        self.topics.values().find(|t| t.label == label).cloned()
    }

    fn find_topic_by_label_ignore_case(&self, label: &str) -> Option<Topic> {
        let label = label.to_lowercase();
        self.topics
            .values()
            .find(|t| t.label.to_lowercase() == label)
            .cloned()
    }

    fn find_instance_by_brand(&self, brand: &str) -> Option<Instance> {
        let brand = brand.to_lowercase();
        self.instances
            .values()
            .find(|i| i.brand.as_deref().is_some_and(|b| b.to_lowercase() == brand))
            .cloned()
    }

    fn tools_matching(&self, predicates: &[Predicate]) -> Vec<Tool> {
        self.tools
            .values()
            .filter(|tool| predicates.iter().all(|p| p.matches(tool)))
            .cloned()
            .collect()
    }

    fn versions_of(&self, tool: &Tool) -> Vec<ToolVersion> {
        self.tool_versions(tool).into_iter().cloned().collect()
    }
}
