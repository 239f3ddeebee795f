//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (CONTENT_GUARD_*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::{AppConfig, MAX_DIRECTORY_RETRIES};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "content-guard.toml",
    ".content-guard.toml",
    "~/.config/content-guard/config.toml",
    "/etc/content-guard/config.toml",
];

/// Dedicated override for the directory token
const DIRECTORY_TOKEN_ENV: &str = "CONTENT_GUARD_DIRECTORY_TOKEN";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Defaults come from serde defaults on AppConfig

    // 2. Configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Environment variables, e.g. CONTENT_GUARD_GUARD__PROTECTED_SITE.
    // Double underscore (__) maps to nested keys (guard.protected_site)
    builder = builder.add_source(
        Environment::with_prefix("CONTENT_GUARD")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. Directory token convenience variable
    if let Ok(token) = std::env::var(DIRECTORY_TOKEN_ENV)
        && !token.is_empty()
    {
        builder = builder
            .set_override("directory.token", token)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.guard.protected_site.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "guard.protected_site".to_string(),
        });
    }

    let Some(protected) = config.guard.protected_template else {
        return Err(ConfigError::Missing {
            field: "guard.protected_template".to_string(),
        });
    };

    if protected == config.guard.standard_template {
        return Err(ConfigError::Invalid {
            message: "guard.protected_template must differ from guard.standard_template"
                .to_string(),
        });
    }

    if config.cache.enabled {
        if config.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "cache.ttl_secs must be greater than 0".to_string(),
            });
        }
        if config.cache.max_entries == 0 {
            return Err(ConfigError::Invalid {
                message: "cache.max_entries must be greater than 0".to_string(),
            });
        }
    }

    if config.directory.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "directory.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.directory.max_retries > MAX_DIRECTORY_RETRIES {
        return Err(ConfigError::Invalid {
            message: format!(
                "directory.max_retries must be at most {}, got: {}",
                MAX_DIRECTORY_RETRIES, config.directory.max_retries
            ),
        });
    }

    if let Some(url) = &config.directory.url
        && !url.is_empty()
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        return Err(ConfigError::Invalid {
            message: format!(
                "directory.url must start with http:// or https://, got: {}",
                url
            ),
        });
    }

    Ok(())
}
