//! Merging Galaxy API payloads into the catalog.
//!
//! Galaxy reports a tool once per installed version. Tools are merged across
//! instances by short name; versions are merged by their tool shed coordinates, or by
//! version string for tools that were not installed from a tool shed.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Catalog, CatalogError, InstanceId, ToolVersion, ToolVersionId};

/// The `model_class` Galaxy uses for runnable tools.
const TOOL_MODEL_CLASS: &str = "Tool";

/// Subset of a Galaxy server's `/api/configuration` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Brand label.
    pub brand: Option<String>,
    /// Whether users may register accounts.
    pub allow_user_creation: bool,
    /// Whether disk quotas are enforced. Absent on servers without quotas.
    pub enable_quotas: bool,
    /// Whether the server requires login before use.
    pub require_login: bool,
    /// Terms of service URL.
    pub terms_url: Option<String>,
    /// Major Galaxy release, e.g. `23.1`.
    pub version_major: Option<String>,
}

/// Tool shed coordinates of an installed tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolShedRepository {
    /// Changeset revision installed.
    pub changeset_revision: String,
    /// Tool shed host.
    pub tool_shed: String,
    /// Repository owner.
    pub owner: String,
}

/// One element of a Galaxy server's `/api/tools?in_panel=false` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolElement {
    /// Element kind; only `Tool` elements are ingested.
    pub model_class: String,
    /// Tool id, a full tool shed GUID for installed tools.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub description: Option<String>,
    /// Version string.
    #[serde(default)]
    pub version: String,
    /// Tool shed coordinates, for tools installed from a tool shed.
    #[serde(default)]
    pub tool_shed_repository: Option<ToolShedRepository>,
    /// EDAM operation term ids annotating the tool.
    #[serde(default)]
    pub edam_operations: Vec<String>,
}

impl ToolElement {
    /// Returns the catalog tool name for this element.
    ///
    /// Tool shed ids look like `host/repos/owner/repo/tool/version`; the name is the
    /// second-to-last segment. Other ids are used as-is.
    pub fn tool_name(&self) -> &str {
        if !self.id.contains('/') {
            return &self.id;
        }
        let mut segments = self.id.rsplit('/');
        segments.next();
        segments.next().unwrap_or(&self.id)
    }
}

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Tools seen for the first time.
    pub tools_created: usize,
    /// Existing tools whose metadata was refreshed.
    pub tools_updated: usize,
    /// Versions seen for the first time.
    pub versions_created: usize,
    /// Elements that were not tools.
    pub skipped: usize,
}

/// Registers or refreshes the instance at `url` from its configuration.
pub fn register_instance(
    catalog: &mut Catalog,
    url: &str,
    config: &InstanceConfig,
    now: SystemTime,
) -> InstanceId {
    let instance = catalog.upsert_instance(url, now);
    instance.brand = config.brand.clone();
    instance.allow_user_creation = config.allow_user_creation;
    instance.enable_quotas = config.enable_quotas;
    instance.require_login = config.require_login;
    instance.terms_url = config.terms_url.clone();
    instance.version = config.version_major.clone();
    instance.update_date = Some(now);
    info!(url, brand = ?instance.brand, "registered instance");
    instance.id
}

/// Merges the tool list reported by `instance` into the catalog.
pub fn ingest_tools(
    catalog: &mut Catalog,
    instance: InstanceId,
    elements: &[ToolElement],
) -> Result<IngestReport, CatalogError> {
    if catalog.instance(instance).is_none() {
        return Err(CatalogError::UnknownInstance(instance));
    }

    let mut report = IngestReport::default();

    for element in elements {
        if element.model_class != TOOL_MODEL_CLASS {
            debug!(id = %element.id, class = %element.model_class, "skipping non-tool element");
            report.skipped += 1;
            continue;
        }
        ingest_element(catalog, instance, element, &mut report);
    }

    info!(
        %instance,
        tools_created = report.tools_created,
        tools_updated = report.tools_updated,
        versions_created = report.versions_created,
        skipped = report.skipped,
        "ingested tools"
    );
    Ok(report)
}

/// Merges one tool element.
fn ingest_element(
    catalog: &mut Catalog,
    instance: InstanceId,
    element: &ToolElement,
    report: &mut IngestReport,
) {
    let name = element.tool_name();

    let version_id = match find_version(catalog, name, element) {
        Some(id) => id,
        None => {
            report.versions_created += 1;
            let shed = element.tool_shed_repository.as_ref();
            catalog.insert_version(ToolVersion {
                id: ToolVersionId(0),
                name: name.to_string(),
                version: element.version.clone(),
                tool_shed: shed.map(|r| r.tool_shed.clone()),
                owner: shed.map(|r| r.owner.clone()),
                changeset: shed.map(|r| r.changeset_revision.clone()),
                instances: Vec::new(),
            })
        }
    };

    if let Some(version) = catalog.version_mut(version_id)
        && !version.instances.contains(&instance)
    {
        version.instances.push(instance);
    }

    let topics: Vec<_> = element
        .edam_operations
        .iter()
        .map(|term| catalog.upsert_topic(term))
        .collect();

    let (tool, created) = catalog.upsert_tool(name);
    if created {
        report.tools_created += 1;
    } else {
        report.tools_updated += 1;
    }
    tool.description = element.description.clone().unwrap_or_default();
    tool.display_name = element.name.clone();
    if !tool.versions.contains(&version_id) {
        tool.versions.push(version_id);
    }
    for topic in topics {
        if !tool.topics.contains(&topic) {
            tool.topics.push(topic);
        }
    }
}

/// Finds the stored version matching an element's identity.
fn find_version(catalog: &Catalog, name: &str, element: &ToolElement) -> Option<ToolVersionId> {
    match &element.tool_shed_repository {
        Some(shed) => catalog.find_version(|v| {
            v.name == name
                && v.changeset.as_deref() == Some(shed.changeset_revision.as_str())
                && v.tool_shed.as_deref() == Some(shed.tool_shed.as_str())
                && v.owner.as_deref() == Some(shed.owner.as_str())
        }),
        None => catalog.find_version(|v| {
            v.name == name && v.version == element.version && v.tool_shed.is_none()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogAccessor;

    fn shed_element(version: &str, changeset: &str) -> ToolElement {
        ToolElement {
            model_class: "Tool".into(),
            id: format!("toolshed.g2.bx.psu.edu/repos/devteam/bwa/bwa_mem/{version}"),
            name: "Map with BWA-MEM".into(),
            description: Some("- map medium and long reads".into()),
            version: version.into(),
            tool_shed_repository: Some(ToolShedRepository {
                changeset_revision: changeset.into(),
                tool_shed: "toolshed.g2.bx.psu.edu".into(),
                owner: "devteam".into(),
            }),
            edam_operations: vec!["operation_3198".into()],
        }
    }

    fn local_element(id: &str, version: &str) -> ToolElement {
        ToolElement {
            model_class: "Tool".into(),
            id: id.into(),
            name: id.to_uppercase(),
            description: None,
            version: version.into(),
            tool_shed_repository: None,
            edam_operations: vec![],
        }
    }

    fn config(brand: &str) -> InstanceConfig {
        InstanceConfig {
            brand: Some(brand.into()),
            version_major: Some("23.1".into()),
            ..InstanceConfig::default()
        }
    }

    #[test]
    fn tool_name_from_shed_id() {
        assert_eq!(shed_element("0.7.17.2", "abc").tool_name(), "bwa_mem");
        assert_eq!(local_element("upload1", "1.1.7").tool_name(), "upload1");
    }

    #[test]
    fn register_instance_updates_metadata() {
        let mut catalog = Catalog::new();
        let now = SystemTime::now();
        let id = register_instance(&mut catalog, "https://a.example", &config("A"), now);
        let again = register_instance(&mut catalog, "https://a.example", &config("A2"), now);
        assert_eq!(id, again);

        let instance = catalog.instance(id).unwrap();
        assert_eq!(instance.brand.as_deref(), Some("A2"));
        assert_eq!(instance.version.as_deref(), Some("23.1"));
        assert_eq!(instance.update_date, Some(now));
    }

    #[test]
    fn ingest_rejects_unknown_instance() {
        let mut catalog = Catalog::new();
        let err = ingest_tools(&mut catalog, InstanceId(3), &[]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownInstance(InstanceId(3))));
    }

    #[test]
    fn ingest_merges_versions_across_instances() {
        let mut catalog = Catalog::new();
        let now = SystemTime::now();
        let a = register_instance(&mut catalog, "https://a.example", &config("A"), now);
        let b = register_instance(&mut catalog, "https://b.example", &config("B"), now);

        let report = ingest_tools(&mut catalog, a, &[shed_element("0.7.17.2", "abc")]).unwrap();
        assert_eq!(report.tools_created, 1);
        assert_eq!(report.versions_created, 1);

        let report = ingest_tools(
            &mut catalog,
            b,
            &[shed_element("0.7.17.2", "abc"), shed_element("0.7.18", "def")],
        )
        .unwrap();
        assert_eq!(report.tools_created, 0);
        assert_eq!(report.tools_updated, 2);
        assert_eq!(report.versions_created, 1);

        let tool = catalog.tool_by_name("bwa_mem").unwrap();
        let versions = catalog.versions_of(tool);
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].instances, vec![a, b]);
        assert_eq!(versions[1].instances, vec![b]);
        assert_eq!(versions[1].owner.as_deref(), Some("devteam"));
        assert_eq!(tool.display_name, "Map with BWA-MEM");
    }

    #[test]
    fn ingest_is_idempotent() {
        let mut catalog = Catalog::new();
        let a = register_instance(&mut catalog, "https://a.example", &config("A"), SystemTime::now());
        let elements = [shed_element("0.7.17.2", "abc"), local_element("cat1", "1.0")];
        ingest_tools(&mut catalog, a, &elements).unwrap();
        let before = catalog.stats();
        ingest_tools(&mut catalog, a, &elements).unwrap();
        assert_eq!(catalog.stats(), before);

        let tool = catalog.tool_by_name("cat1").unwrap();
        assert_eq!(tool.versions.len(), 1);
        assert_eq!(catalog.versions_of(tool)[0].instances, vec![a]);
    }

    #[test]
    fn local_versions_are_keyed_by_version_string() {
        let mut catalog = Catalog::new();
        let a = register_instance(&mut catalog, "https://a.example", &config("A"), SystemTime::now());
        let report = ingest_tools(
            &mut catalog,
            a,
            &[local_element("cat1", "1.0"), local_element("cat1", "1.1")],
        )
        .unwrap();
        assert_eq!(report.versions_created, 2);
        assert_eq!(catalog.tool_by_name("cat1").unwrap().description, "");
    }

    #[test]
    fn non_tools_are_skipped() {
        let mut catalog = Catalog::new();
        let a = register_instance(&mut catalog, "https://a.example", &config("A"), SystemTime::now());
        let mut label = local_element("section_label", "");
        label.model_class = "ToolSectionLabel".into();
        let report = ingest_tools(&mut catalog, a, &[label]).unwrap();
        assert_eq!(report.skipped, 1);
        assert!(catalog.tools().next().is_none());
    }

    #[test]
    fn edam_operations_become_searchable_topics() {
        let mut catalog = Catalog::new();
        let a = register_instance(&mut catalog, "https://a.example", &config("A"), SystemTime::now());
        ingest_tools(&mut catalog, a, &[shed_element("0.7.17.2", "abc")]).unwrap();

        let tools = crate::search("topic:operation_3198", &catalog, Default::default()).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "bwa_mem");
    }

    #[test]
    fn deserializes_galaxy_payloads() {
        let config: InstanceConfig = serde_json::from_str(
            r#"{"brand": "Galaxy Europe", "allow_user_creation": true,
                "require_login": false, "terms_url": null, "version_major": "24.0",
                "ftp_upload_site": "ftp.example"}"#,
        )
        .unwrap();
        assert_eq!(config.brand.as_deref(), Some("Galaxy Europe"));
        assert!(!config.enable_quotas);

        let elements: Vec<ToolElement> = serde_json::from_str(
            r#"[{"model_class": "Tool", "id": "upload1", "name": "Upload File",
                 "description": "from your computer", "version": "1.1.7"},
                {"model_class": "ToolSectionLabel", "id": "label_1", "text": "Get Data"}]"#,
        )
        .unwrap();
        assert_eq!(elements.len(), 2);
        assert!(elements[1].tool_shed_repository.is_none());
    }
}
