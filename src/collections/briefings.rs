//! Briefing documents: markdown files with YAML front matter.

use crate::domain::Briefing;
use crate::utils::{normalize_path, read_text_file};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: String,
    description: String,
}

/// Load every `*.md` below `dir`. The id is the path relative to `dir`
/// without extension, using forward slashes.
///
/// A missing directory yields no briefings. A document whose front matter is
/// absent or invalid is skipped with a warning.
pub fn load_briefings(dir: &Path) -> Vec<Briefing> {
    if !dir.is_dir() {
        warn!("briefings directory {} not found", dir.display());
        return Vec::new();
    }

    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    paths.sort();

    paths
        .iter()
        .filter_map(|path| match load_briefing(dir, path) {
            Ok(briefing) => Some(briefing),
            Err(err) => {
                warn!("{:#}; briefing skipped", err);
                None
            }
        })
        .collect()
}

fn load_briefing(root: &Path, path: &Path) -> Result<Briefing> {
    let (content, _) = read_text_file(path)?;
    let (front_matter, body) = split_front_matter(&content)
        .with_context(|| format!("{} has no front matter", path.display()))?;
    let meta: FrontMatter = serde_yaml::from_str(front_matter)
        .with_context(|| format!("Invalid front matter in {}", path.display()))?;

    let rel = path.strip_prefix(root).unwrap_or(path).with_extension("");
    Ok(Briefing {
        id: normalize_path(&rel.to_string_lossy()),
        title: meta.title,
        description: meta.description,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

/// Split `---`-delimited front matter from the document body.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0usize;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front, body));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn splits_front_matter_from_body() {
        let doc = "---\ntitle: Alpha\ndescription: First brief\n---\n\n# Task\n";
        let (front, body) = split_front_matter(doc).expect("front matter");
        assert_eq!(front, "title: Alpha\ndescription: First brief\n");
        assert_eq!(body, "\n# Task\n");
    }

    #[test]
    fn no_front_matter_is_none() {
        assert!(split_front_matter("# Just a heading\n").is_none());
        assert!(split_front_matter("---\ntitle: never closed\n").is_none());
    }

    #[test]
    fn loads_nested_briefings_and_skips_invalid_ones() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("cohort1.md"),
            "---\ntitle: Generative Posters\ndescription: Week 1\n---\nBody text\n",
        )
        .expect("write");
        fs::create_dir(tmp.path().join("2024")).expect("mkdir");
        fs::write(
            tmp.path().join("2024").join("cohort2.md"),
            "---\ntitle: Sound\ndescription: Week 2\n---\n",
        )
        .expect("write");
        fs::write(tmp.path().join("broken.md"), "---\ntitle: Missing description\n---\n")
            .expect("write");
        fs::write(tmp.path().join("notes.txt"), "ignored").expect("write");

        let briefings = load_briefings(tmp.path());
        let ids: Vec<_> = briefings.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["2024/cohort2", "cohort1"]);
        assert_eq!(briefings[1].title, "Generative Posters");
        assert_eq!(briefings[1].body, "Body text\n");
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let tmp = TempDir::new().expect("tmp");
        assert!(load_briefings(&tmp.path().join("absent")).is_empty());
    }
}
