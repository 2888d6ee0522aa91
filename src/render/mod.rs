//! Output rendering (collection JSON, run reports)

pub mod report;

pub use report::{write_collections, write_json, BUILD_SCHEMA_VERSION};
