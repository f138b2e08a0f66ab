use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::config::navigation::default_navigation;
use crate::highlight::{HighlightMarker, Highlighter};
use crate::paths::PathNormalizer;
use crate::records::{Bar, BarList};
use crate::timing::RetryPolicy;
use crate::value::with_ids;

pub mod navigation;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "Teamsite";
const APP_NAME: &str = "teamsite";

pub const CONFIG_ENV: &str = "TEAMSITE_CONFIG";
pub const API_URL_ENV: &str = "TEAMSITE_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        let paths = ConfigPaths::discover(explicit)?;
        Ok(Self { paths })
    }

    pub fn from_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let default_cfg = AppConfig::default();
            self.write_default_config(&default_cfg)?;
            let mut cfg = default_cfg;
            cfg.post_load(env::var(API_URL_ENV).ok())?;
            return Ok(cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load(env::var(API_URL_ENV).ok())?;
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

/// Where the config file lives: an explicit path, then `TEAMSITE_CONFIG`,
/// then `config.toml` in the platform config directory.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
        }
    }

    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(file) = explicit.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from)) {
            return Ok(Self::new(file));
        }
        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;
        Ok(Self::new(project_dirs.config_dir().join("config.toml")))
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    pub fn ensure_directories(&self) -> Result<()> {
        let Some(dir) = self.config_dir() else {
            return Ok(());
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("creating configuration directory {}", dir.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub highlight: HighlightMarker,
    pub debounce: DebounceConfig,
    pub image_retry: RetryPolicy,
    pub store: StoreOptions,
    pub navigation: Vec<Bar>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            highlight: HighlightMarker::default(),
            debounce: DebounceConfig::default(),
            image_retry: RetryPolicy::default(),
            store: StoreOptions::default(),
            navigation: default_navigation(),
        }
    }
}

impl AppConfig {
    fn post_load(&mut self, api_url_override: Option<String>) -> Result<()> {
        if let Some(url) = api_url_override.filter(|url| !url.trim().is_empty()) {
            tracing::debug!(%url, "api url overridden from environment");
            self.api_url = url;
        }
        if self.api_url.trim().is_empty() {
            tracing::warn!("empty api_url in config, falling back to {DEFAULT_API_URL}");
            self.api_url = DEFAULT_API_URL.to_owned();
        }
        if self.image_retry.max_attempts == 0 {
            bail!("image_retry.max_attempts must be at least 1");
        }
        Ok(())
    }

    pub fn path_normalizer(&self) -> PathNormalizer {
        PathNormalizer::new(self.api_url.as_str())
    }

    pub fn highlighter(&self, search: &str) -> Highlighter {
        Highlighter::new(search, self.highlight.clone())
    }

    /// Navigation entries with their display ids.
    pub fn nav_bar(&self) -> BarList {
        with_ids(&self.navigation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub search_ms: u64,
    pub autosave_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            search_ms: 300,
            autosave_ms: 800,
        }
    }
}

impl DebounceConfig {
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub page_limit: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { page_limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_paths(root: &TempDir) -> ConfigPaths {
        ConfigPaths::new(root.path().join("config").join("config.toml"))
    }

    #[test]
    fn explicit_path_is_used_as_the_config_file() -> Result<()> {
        let temp = TempDir::new()?;
        let file = temp.path().join("nested").join("site.toml");
        let paths = ConfigPaths::discover(Some(file.clone()))?;
        assert_eq!(paths.config_file, file);
        assert_eq!(paths.config_dir(), Some(temp.path().join("nested").as_path()));

        ConfigLoader::from_paths(paths).load_or_init()?;
        assert!(file.is_file());
        Ok(())
    }

    #[test]
    fn bare_file_names_have_no_directory_to_create() -> Result<()> {
        let paths = ConfigPaths::new("config.toml");
        assert_eq!(paths.config_dir(), None);
        paths.ensure_directories()?;
        Ok(())
    }

    #[test]
    fn first_load_writes_defaults_to_disk() -> Result<()> {
        let temp = TempDir::new()?;
        let loader = ConfigLoader::from_paths(temp_paths(&temp));

        let created = loader.load_or_init()?;
        assert!(loader.paths().config_file.exists());
        assert_eq!(created.store.page_limit, 10);
        assert_eq!(created.image_retry, RetryPolicy::default());

        let raw = fs::read_to_string(&loader.paths().config_file)?;
        let reparsed: AppConfig = toml::from_str(&raw)?;
        assert_eq!(reparsed, AppConfig::default());
        Ok(())
    }

    #[test]
    fn partial_files_fill_in_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let paths = temp_paths(&temp);
        paths.ensure_directories()?;
        fs::write(
            &paths.config_file,
            "api_url = \"https://api.example.org/\"\n[debounce]\nsearch_ms = 150\n",
        )?;

        let cfg = ConfigLoader::from_paths(paths).load()?;
        assert_eq!(cfg.debounce.search_delay(), Duration::from_millis(150));
        assert_eq!(cfg.debounce.autosave_ms, 800);
        assert_eq!(cfg.navigation.len(), 3);
        assert_eq!(cfg.path_normalizer().base_url(), "https://api.example.org");
        Ok(())
    }

    #[test]
    fn environment_override_wins_over_file() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.post_load(Some("https://staging.example.org".into()))?;
        assert_eq!(cfg.api_url, "https://staging.example.org");

        let mut cfg = AppConfig {
            api_url: "  ".into(),
            ..AppConfig::default()
        };
        cfg.post_load(Some(String::new()))?;
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        Ok(())
    }

    #[test]
    fn zero_retry_budget_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.image_retry.max_attempts = 0;
        let err = cfg.post_load(None).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn nav_bar_is_numbered_in_order() {
        let bar = AppConfig::default().nav_bar();
        let entries: Vec<_> = bar.iter().map(|b| (b.id, b.item.href.as_str())).collect();
        assert_eq!(
            entries,
            vec![(1, "/home/update"), (2, "/home/member"), (3, "/home/achieves")]
        );
    }
}
