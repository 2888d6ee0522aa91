//! CLI override merging

use crate::domain::Config;
use std::path::PathBuf;

/// Values given on the command line. `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub projects_dir: Option<PathBuf>,
    pub briefings_dir: Option<PathBuf>,
    pub screenshots_dir: Option<PathBuf>,
    pub colors_report: Option<PathBuf>,
    pub avatars_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub pages_base_url: Option<String>,
    pub exclude_users: Option<Vec<String>>,
    pub exclude_titles: Option<Vec<String>>,
    pub project_order: Option<Vec<String>>,
    pub browser: Option<String>,
    pub screenshot_timeout_secs: Option<u64>,
    pub avatar_timeout_secs: Option<u64>,
}

/// Apply `cli` on top of `config` (CLI > file > defaults).
pub fn merge_cli_with_config(config: Config, cli: CliOverrides) -> Config {
    Config {
        projects_dir: cli.projects_dir.unwrap_or(config.projects_dir),
        briefings_dir: cli.briefings_dir.unwrap_or(config.briefings_dir),
        screenshots_dir: cli.screenshots_dir.unwrap_or(config.screenshots_dir),
        colors_report: cli.colors_report.unwrap_or(config.colors_report),
        avatars_dir: cli.avatars_dir.unwrap_or(config.avatars_dir),
        output_dir: cli.output_dir.unwrap_or(config.output_dir),
        pages_base_url: cli.pages_base_url.unwrap_or(config.pages_base_url),
        exclude_users: cli.exclude_users.unwrap_or(config.exclude_users),
        exclude_titles: cli.exclude_titles.unwrap_or(config.exclude_titles),
        project_order: cli.project_order.or(config.project_order),
        browser: cli.browser.unwrap_or(config.browser),
        screenshot_timeout_secs: cli
            .screenshot_timeout_secs
            .unwrap_or(config.screenshot_timeout_secs),
        avatar_timeout_secs: cli.avatar_timeout_secs.unwrap_or(config.avatar_timeout_secs),
        ..config
    }
}
