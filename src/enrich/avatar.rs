//! Author avatar cache backed by one-time downloads.

use crate::error::ShowcaseError;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// GitHub login rules: alphanumerics and single hyphens, at most 39 chars.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$").expect("valid regex"));

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Local avatar store, one `{username}.png` per author.
pub struct AvatarCache {
    dir: PathBuf,
    base_url: String,
    client: Option<Client>,
}

impl AvatarCache {
    /// Cache that downloads missing avatars from `{base_url}/{username}.png`.
    pub fn new(dir: impl Into<PathBuf>, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("showcase/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            dir: dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Some(client),
        })
    }

    /// Cache that only serves avatars already on disk.
    pub fn offline(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), base_url: String::new(), client: None }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cached_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{username}.png"))
    }

    /// Cached avatar path for `username`, downloading it first if needed.
    /// Any failure yields `None`.
    pub fn resolve(&self, username: &str) -> Option<PathBuf> {
        if !is_valid_username(username) {
            warn!("not fetching avatar for invalid username '{}'", username);
            return None;
        }

        let cached = self.cached_path(username);
        if cached.is_file() {
            return Some(cached);
        }

        let Some(client) = &self.client else {
            debug!("{}", ShowcaseError::LookupMiss { kind: "cached avatar", key: username.into() });
            return None;
        };

        match self.fetch(client, username, &cached) {
            Ok(()) => Some(cached),
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }

    fn fetch(&self, client: &Client, username: &str, dest: &Path) -> Result<(), ShowcaseError> {
        let url = format!("{}/{}.png", self.base_url, username);
        let network =
            |reason: String| ShowcaseError::Network { url: url.clone(), reason };

        let response = client.get(&url).send().map_err(|e| network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(network(format!("HTTP {status}")));
        }
        let bytes = response.bytes().map_err(|e| network(e.to_string()))?;

        // Written beside the target and renamed so readers never see a partial file.
        std::fs::create_dir_all(&self.dir)?;
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(&bytes)?;
        staged.persist(dest).map_err(|e| e.error)?;
        debug!("cached avatar for {} ({} bytes)", username, bytes.len());
        Ok(())
    }
}
