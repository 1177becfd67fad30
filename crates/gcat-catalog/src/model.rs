//! Catalog entities.
//!
//! Entities reference each other by id. A `Tool` owns the ids of its versions and
//! topics; a `ToolVersion` owns the ids of the instances that host it.

use std::{fmt, time::SystemTime};

use serde::{Deserialize, Serialize};

/// Declares a numeric id newtype.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a registered Galaxy instance.
    InstanceId
);
id_type!(
    /// Identifies a tool.
    ToolId
);
id_type!(
    /// Identifies one build or release of a tool.
    ToolVersionId
);
id_type!(
    /// Identifies a topic label.
    TopicId
);

/// A registered Galaxy server whose tools have been ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Catalog id.
    pub id: InstanceId,
    /// Base URL of the server. Unique within the catalog.
    pub url: String,
    /// Brand label shown by the server, used by `instance:` filters.
    pub brand: Option<String>,
    /// Major Galaxy release the server runs.
    pub version: Option<String>,
    /// Whether users may register accounts.
    pub allow_user_creation: bool,
    /// Whether disk quotas are enforced.
    pub enable_quotas: bool,
    /// Whether the server requires login before use.
    pub require_login: bool,
    /// Terms of service URL.
    pub terms_url: Option<String>,
    /// When the instance was first registered.
    #[serde(with = "system_time_serde")]
    pub creation_date: SystemTime,
    /// When metadata was last refreshed from the server.
    #[serde(default, with = "optional_system_time_serde")]
    pub update_date: Option<SystemTime>,
}

impl Instance {
    /// Returns the brand, falling back to the URL for unbranded servers.
    pub fn label(&self) -> &str {
        self.brand.as_deref().unwrap_or(&self.url)
    }
}

/// A tool, merged across every instance that offers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Catalog id.
    pub id: ToolId,
    /// Short tool name. Unique within the catalog.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Human-facing name.
    pub display_name: String,
    /// Topics annotating this tool.
    #[serde(default)]
    pub topics: Vec<TopicId>,
    /// Known versions, in order of discovery.
    #[serde(default)]
    pub versions: Vec<ToolVersionId>,
}

/// One build or release of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersion {
    /// Catalog id.
    pub id: ToolVersionId,
    /// Name of the tool this version belongs to.
    pub name: String,
    /// Version string as reported by Galaxy.
    pub version: String,
    /// Tool shed the version was installed from, if any.
    pub tool_shed: Option<String>,
    /// Tool shed repository owner.
    pub owner: Option<String>,
    /// Tool shed changeset revision.
    pub changeset: Option<String>,
    /// Instances hosting this exact version.
    #[serde(default)]
    pub instances: Vec<InstanceId>,
}

impl ToolVersion {
    /// Returns true if this version is hosted on every one of `required`.
    pub fn hosted_on_all(&self, required: &[InstanceId]) -> bool {
        required.iter().all(|id| self.instances.contains(id))
    }
}

/// A controlled-vocabulary label, such as an EDAM operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Catalog id.
    pub id: TopicId,
    /// Label matched by `topic:` filters. Unique within the catalog.
    pub label: String,
}

/// Serde serialization for `SystemTime` as Unix timestamp (seconds).
mod system_time_serde {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serializes a `SystemTime` as a Unix timestamp in seconds.
    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        duration.as_secs().serialize(serializer)
    }

    /// Deserializes a Unix timestamp (seconds) into a `SystemTime`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}

/// Serde serialization for `Option<SystemTime>` as an optional Unix timestamp.
mod optional_system_time_serde {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serializes an optional `SystemTime` as seconds or null.
    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time.map(|t| {
            t.duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::ZERO)
                .as_secs()
        })
        .serialize(serializer)
    }

    /// Deserializes seconds or null into an optional `SystemTime`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(|s| UNIX_EPOCH + Duration::from_secs(s)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    fn version_on(instances: &[u64]) -> ToolVersion {
        ToolVersion {
            id: ToolVersionId(1),
            name: "bwa".into(),
            version: "0.7.17".into(),
            tool_shed: None,
            owner: None,
            changeset: None,
            instances: instances.iter().copied().map(InstanceId).collect(),
        }
    }

    #[test]
    fn hosted_on_all_requires_every_instance() {
        let version = version_on(&[1, 2, 3]);
        assert!(version.hosted_on_all(&[InstanceId(1), InstanceId(3)]));
        assert!(!version.hosted_on_all(&[InstanceId(1), InstanceId(4)]));
        assert!(version.hosted_on_all(&[]));
    }

    #[test]
    fn instance_label_falls_back_to_url() {
        let mut instance = Instance {
            id: InstanceId(1),
            url: "https://usegalaxy.eu".into(),
            brand: None,
            version: None,
            allow_user_creation: true,
            enable_quotas: false,
            require_login: false,
            terms_url: None,
            creation_date: UNIX_EPOCH,
            update_date: None,
        };
        assert_eq!(instance.label(), "https://usegalaxy.eu");
        instance.brand = Some("Galaxy Europe".into());
        assert_eq!(instance.label(), "Galaxy Europe");
    }

    #[test]
    fn instance_timestamps_serialize_as_seconds() {
        let instance = Instance {
            id: InstanceId(7),
            url: "https://example.org".into(),
            brand: Some("Example".into()),
            version: Some("23.1".into()),
            allow_user_creation: false,
            enable_quotas: true,
            require_login: true,
            terms_url: None,
            creation_date: UNIX_EPOCH + Duration::from_secs(1_500_000_000),
            update_date: None,
        };
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["creation_date"], 1_500_000_000u64);
        assert!(json["update_date"].is_null());

        let back: Instance = serde_json::from_value(json).unwrap();
        assert_eq!(back, instance);
    }
}
