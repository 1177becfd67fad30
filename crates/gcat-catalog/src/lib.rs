//! Galaxy tool catalog: storage, ingestion, and search.
//!
//! The catalog records which tools, at which versions, are hosted on which Galaxy
//! instances. Searches are parsed by `gcat-query` and evaluated here against any
//! [`CatalogAccessor`].
//!
//! # Example
//!
//! ```
//! use std::time::SystemTime;
//! use gcat_catalog::{Catalog, EvaluateOptions, InstanceConfig, ToolElement, search};
//!
//! let mut catalog = Catalog::new();
//! let config = InstanceConfig { brand: Some("Europe".into()), ..Default::default() };
//! let eu = gcat_catalog::register_instance(
//!     &mut catalog,
//!     "https://usegalaxy.eu",
//!     &config,
//!     SystemTime::now(),
//! );
//!
//! let tools: Vec<ToolElement> = serde_json::from_str(
//!     r#"[{"model_class": "Tool", "id": "cat1", "name": "Concatenate", "version": "1.0"}]"#,
//! ).unwrap();
//! gcat_catalog::ingest_tools(&mut catalog, eu, &tools).unwrap();
//!
//! let found = search("concat instance:europe", &catalog, EvaluateOptions::default()).unwrap();
//! assert_eq!(found[0].name, "cat1");
//! ```

#![warn(missing_docs)]

mod accessor;
mod error;
mod evaluate;
mod ingest;
mod model;
mod search;
mod store;

pub use accessor::{CatalogAccessor, Predicate};
pub use error::CatalogError;
pub use evaluate::{EvaluateOptions, Evaluator, QueryPlan, SearchField, Unresolved, evaluate};
pub use ingest::{
    IngestReport, InstanceConfig, ToolElement, ToolShedRepository, ingest_tools,
    register_instance,
};
pub use model::{Instance, InstanceId, Tool, ToolId, ToolVersion, ToolVersionId, Topic, TopicId};
pub use search::search;
pub use store::{Catalog, CatalogStats};
