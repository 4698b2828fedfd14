use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, fs, path::Path, path::PathBuf};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.agcnewsnet.com/api/general";
pub const DEFAULT_SITE_URL: &str = "https://agcnewsnet.com";

/// On-disk shape; every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api_base: Option<String>,
    pub site_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub search_debounce_ms: Option<u64>,
    pub search_per_page: Option<u32>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_base: String,
    pub site_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub search_debounce_ms: u64,
    pub search_per_page: u32,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            site_url: DEFAULT_SITE_URL.into(),
            user_agent: "agc-news/0.1".into(),
            timeout_secs: 20,
            connect_timeout_secs: 5,
            search_debounce_ms: 300,
            search_per_page: 50,
            open_command: None,
            header: None,
        }
    }
}

impl RuntimeConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Public web page of a story.
    pub fn story_url(&self, id: u64) -> String {
        format!("{}/stories/{}", self.site_url.trim_end_matches('/'), id)
    }

    fn merge(file: AppConfig) -> Self {
        let d = Self::default();
        Self {
            api_base: file.api_base.unwrap_or(d.api_base),
            site_url: file.site_url.unwrap_or(d.site_url),
            user_agent: file.user_agent.unwrap_or(d.user_agent),
            timeout_secs: file.timeout_secs.unwrap_or(d.timeout_secs),
            connect_timeout_secs: file.connect_timeout_secs.unwrap_or(d.connect_timeout_secs),
            search_debounce_ms: file.search_debounce_ms.unwrap_or(d.search_debounce_ms),
            search_per_page: file.search_per_page.unwrap_or(d.search_per_page),
            open_command: file.open_command,
            header: file.header,
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_base).with_context(|| format!("invalid api_base: {}", self.api_base))?;
        Url::parse(&self.site_url).with_context(|| format!("invalid site_url: {}", self.site_url))?;
        if self.user_agent.trim().is_empty() {
            bail!("user_agent is empty");
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            bail!("timeouts must be > 0");
        }
        if self.search_per_page == 0 {
            bail!("search_per_page must be > 0");
        }
        Ok(())
    }
}

pub fn load(config_override: Option<&Path>) -> Result<RuntimeConfig> {
    let mut cfg = match config_override {
        Some(p) => read_file(p)?,
        None => match default_config_path() {
            Some(p) if p.is_file() => read_file(&p)?,
            // Built-in defaults
            _ => RuntimeConfig::default(),
        },
    };
    if let Ok(base) = env::var("AGC_API_BASE") {
        if !base.trim().is_empty() {
            cfg.api_base = base;
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<RuntimeConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let parsed: AppConfig =
        toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(RuntimeConfig::merge(parsed))
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("agc-news");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("agc-news");
        p.push("config.toml");
        return Some(p);
    }
    None
}
