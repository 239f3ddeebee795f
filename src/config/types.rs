//! Configuration types for content-guard
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::config::settings::Settings;
use crate::model::{STANDARD_TEMPLATE_ID, TemplateId};
use crate::util::SecretString;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which site and template family the policy protects
    pub guard: GuardConfig,

    /// Derivation result cache
    pub cache: CacheConfig,

    /// Principal directory service
    pub directory: DirectoryConfig,

    /// Opaque named settings
    pub settings: Settings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Security hook settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Site name the policy applies to (compared case-insensitively)
    pub protected_site: String,

    /// Base template that protected items derive from
    pub protected_template: Option<TemplateId>,

    /// Template of structural (template definition) items
    pub standard_template: TemplateId,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_site: String::new(),
            protected_template: None,
            standard_template: STANDARD_TEMPLATE_ID,
        }
    }
}

/// Derivation cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Seconds a cached derivation result stays valid
    pub ttl_secs: u64,

    /// Upper bound on cached (template, ancestor) pairs
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 300,
            max_entries: 10_000,
        }
    }
}

/// Principal directory connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Directory base URL; falls back to the `api_endpoint` setting
    pub url: Option<String>,

    /// Bearer token (prefer env var CONTENT_GUARD_DIRECTORY_TOKEN)
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries for failed requests, at most [`MAX_DIRECTORY_RETRIES`]
    pub max_retries: u32,
}

/// Upper bound accepted for `directory.max_retries`
pub const MAX_DIRECTORY_RETRIES: u32 = 10;

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: 10,
            max_retries: 2,
        }
    }
}

impl DirectoryConfig {
    /// Resolve the directory endpoint, if any is configured
    pub fn endpoint(&self, settings: &Settings) -> Option<String> {
        self.url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| Some(settings.api_endpoint()).filter(|url| !url.is_empty()))
            .map(|url| url.trim_end_matches('/').to_string())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
