// src/config.rs
//! Dashboard configuration: data.gov.in endpoints, credentials, timeouts.
//!
//! Resolution order:
//! 1) `$DASHBOARD_CONFIG_PATH` (must exist)
//! 2) `config/dashboard.toml`
//! 3) built-in defaults
//!
//! Environment overrides are applied on top: `DATA_GOV_API_KEY`,
//! `DASHBOARD_FETCH_TIMEOUT_MS`, `DASHBOARD_BASE_URL`.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_API_KEY: &str = "DATA_GOV_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "DASHBOARD_FETCH_TIMEOUT_MS";
pub const ENV_BASE_URL: &str = "DASHBOARD_BASE_URL";

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 120_000;

fn default_base_url() -> String {
    "https://api.data.gov.in/resource".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_format() -> String {
    "json".to_string()
}
fn default_survey_resource() -> String {
    "9ef84268-d583-465a-b399-0a5d0b5ace15".to_string()
}
fn default_platform_resource() -> String {
    "3b01bcb8-0b14-4abf-b6f2-c1bfd384ba69".to_string()
}
fn default_schools_resource() -> String {
    "5c62f4a0-9e94-4fb1-9008-6aac87d61e8f".to_string()
}

#[derive(Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Literal key, or "ENV"/empty to read `DATA_GOV_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub resources: Resources,
}

/// One data.gov.in resource id per source.
#[derive(Debug, Clone, Deserialize)]
pub struct Resources {
    #[serde(default = "default_survey_resource")]
    pub survey_preferences: String,
    #[serde(default = "default_platform_resource")]
    pub platform_usage: String,
    #[serde(default = "default_schools_resource")]
    pub school_infrastructure: String,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            survey_preferences: default_survey_resource(),
            platform_usage: default_platform_resource(),
            school_infrastructure: default_schools_resource(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
            format: default_format(),
            resources: Resources::default(),
        }
    }
}

// Never print the key itself.
impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key_fingerprint())
            .field("timeout_ms", &self.timeout_ms)
            .field("format", &self.format)
            .field("resources", &self.resources)
            .finish()
    }
}

impl DashboardConfig {
    /// Load using env var + fallbacks, then apply env overrides.
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
            if pb.exists() {
                Self::load_from(&pb)?
            } else {
                Self::default()
            }
        };
        Ok(base.apply_env().sanitized())
    }

    /// Load from an explicit TOML file. Env overrides are not applied here.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing dashboard config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: DashboardConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    fn apply_env(mut self) -> Self {
        if let Some(key) = non_empty_env(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(ms) = non_empty_env(ENV_TIMEOUT_MS).and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_ms = ms;
        }
        if let Some(url) = non_empty_env(ENV_BASE_URL) {
            self.base_url = url;
        }
        self
    }

    fn sanitized(mut self) -> Self {
        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = non_empty_env(ENV_API_KEY).unwrap_or_default();
        }
        self.api_key = self.api_key.trim().to_string();
        self.timeout_ms = self.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.format.trim().is_empty() {
            self.format = default_format();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Short SHA-256 prefix of the key, safe to log.
    pub fn api_key_fingerprint(&self) -> Option<String> {
        use sha2::{Digest, Sha256};
        if self.api_key.is_empty() {
            return None;
        }
        let digest = Sha256::digest(self.api_key.as_bytes());
        let mut out = String::with_capacity(12);
        for b in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        Some(out)
    }

    pub fn endpoint(&self, resource_id: &str) -> SourceEndpoint {
        let mut query = Vec::with_capacity(2);
        if self.has_api_key() {
            query.push(("api-key".to_string(), self.api_key.clone()));
        }
        query.push(("format".to_string(), self.format.clone()));
        SourceEndpoint {
            url: format!("{}/{}", self.base_url, resource_id.trim()),
            query,
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fully resolved GET target for one source.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceEndpoint {
    pub url: String,
    pub query: Vec<(String, String)>,
}

static RE_API_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(api[-_]?key=)[^&\s]+").expect("api key regex"));

/// Mask `api-key=...` in anything that looks like a URL.
pub fn redact_api_key(s: &str) -> String {
    RE_API_KEY.replace_all(s, "${1}***").into_owned()
}

impl SourceEndpoint {
    /// URL with the key masked, for logs.
    pub fn redacted(&self) -> String {
        let qs = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        if qs.is_empty() {
            self.url.clone()
        } else {
            redact_api_key(&format!("{}?{}", self.url, qs))
        }
    }
}

impl fmt::Debug for SourceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}
