//! Build configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub projects_dir: PathBuf,
    pub briefings_dir: PathBuf,
    pub screenshots_dir: PathBuf,
    pub placeholder_image: PathBuf,
    pub colors_report: PathBuf,
    pub avatars_dir: PathBuf,
    pub output_dir: PathBuf,

    pub pages_base_url: String,
    pub profile_base_url: String,
    pub avatar_base_url: String,
    pub avatar_timeout_secs: u64,

    #[serde(deserialize_with = "string_or_list")]
    pub exclude_users: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub exclude_titles: Vec<String>,
    /// Allow-list and ordering of project ids. `None` keeps every project,
    /// sorted by id.
    #[serde(deserialize_with = "optional_string_or_list")]
    pub project_order: Option<Vec<String>>,

    pub browser: String,
    pub screenshot_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from("src/data/projects"),
            briefings_dir: PathBuf::from("src/data/briefings"),
            screenshots_dir: PathBuf::from("src/assets/screenshots"),
            placeholder_image: PathBuf::from("src/assets/screenshots/placeholder.png"),
            colors_report: PathBuf::from("src/data/projects/colors.json"),
            avatars_dir: PathBuf::from("src/assets/avatars"),
            output_dir: PathBuf::from("dist/collections"),
            pages_base_url: "https://hbk-bs.github.io".to_string(),
            profile_base_url: "https://github.com".to_string(),
            avatar_base_url: "https://github.com".to_string(),
            avatar_timeout_secs: 10,
            exclude_users: Vec::new(),
            exclude_titles: Vec::new(),
            project_order: None,
            browser: "chromium".to_string(),
            screenshot_timeout_secs: 10,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_list(self) -> Vec<String> {
        let parts = match self {
            StringOrList::One(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
            StringOrList::Many(v) => v,
        };
        parts.into_iter().map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()
    }
}

/// Accept either `"a, b"` or `["a", "b"]`.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrList::deserialize(deserializer)?.into_list())
}

fn optional_string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrList>::deserialize(deserializer)?.map(StringOrList::into_list))
}
