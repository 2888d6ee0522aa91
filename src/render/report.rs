//! Collection and report JSON generation.

use crate::collections::Collections;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

pub const BUILD_SCHEMA_VERSION: &str = "1";

/// Pretty-print `value` to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write `projects.json`, `authors.json`, `briefings.json` and a `build.json`
/// manifest into `out_dir`. Returns the written paths, manifest last.
pub fn write_collections(
    out_dir: &Path,
    collections: &Collections,
    include_timestamp: bool,
) -> Result<Vec<PathBuf>> {
    let outputs = [
        ("projects.json", serde_json::to_value(&collections.projects)?),
        ("authors.json", serde_json::to_value(&collections.authors)?),
        ("briefings.json", serde_json::to_value(&collections.briefings)?),
    ];

    let mut written = Vec::new();
    for (name, value) in &outputs {
        let path = out_dir.join(name);
        write_json(&path, value)?;
        written.push(path);
    }

    let rows: usize = collections.projects.iter().map(|p| p.rows.len()).sum();
    let mut manifest = Map::new();
    manifest.insert("schema_version".to_string(), Value::String(BUILD_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        manifest.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    manifest.insert(
        "stats".to_string(),
        json!({
            "projects": collections.projects.len(),
            "rows": rows,
            "authors": collections.authors.len(),
            "briefings": collections.briefings.len(),
        }),
    );
    manifest.insert(
        "output_files".to_string(),
        serde_json::to_value(outputs.iter().map(|(name, _)| *name).collect::<Vec<_>>())?,
    );

    let path = out_dir.join("build.json");
    write_json(&path, &Value::Object(manifest))?;
    written.push(path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, Briefing};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> Collections {
        Collections {
            projects: Vec::new(),
            authors: vec![Author {
                id: "alice".to_string(),
                github_username: "alice".to_string(),
                url: "https://github.com/alice".to_string(),
                avatar: None,
            }],
            briefings: vec![Briefing {
                id: "cohort1".to_string(),
                title: "Cohort 1".to_string(),
                description: "First".to_string(),
                body: String::new(),
            }],
        }
    }

    #[test]
    fn writes_all_collections_and_manifest() {
        let tmp = TempDir::new().expect("tmp");
        let out = tmp.path().join("dist");
        let written = write_collections(&out, &sample(), true).expect("write");
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|p| p.is_file()));

        let authors: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("authors.json")).expect("read"))
                .expect("json");
        assert_eq!(authors[0]["url"], json!("https://github.com/alice"));

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("build.json")).expect("read"))
                .expect("json");
        assert_eq!(manifest["stats"]["authors"], json!(1));
        assert_eq!(manifest["stats"]["rows"], json!(0));
        assert!(manifest.get("generated_at").is_some());
    }

    #[test]
    fn manifest_omits_timestamp_when_disabled() {
        let tmp = TempDir::new().expect("tmp");
        write_collections(tmp.path(), &sample(), false).expect("write");
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("build.json")).expect("read"))
                .expect("json");
        assert!(manifest.get("generated_at").is_none());
        assert_eq!(manifest["output_files"], json!(["projects.json", "authors.json", "briefings.json"]));
    }
}
