//! Named string settings
//!
//! A pass-through lookup: values are opaque, never validated, and a missing
//! setting reads as the empty string.

use serde::Deserialize;
use std::collections::HashMap;

/// Setting holding the external API (directory) endpoint
pub const API_ENDPOINT_SETTING: &str = "api_endpoint";

/// Setting naming the deployment environment
pub const ENVIRONMENT_SETTING: &str = "environment_setting";

/// Case-insensitive named settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, String>")]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Get a setting by name, or `""` if it is not set
    pub fn get(&self, name: &str) -> &str {
        self.values
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn api_endpoint(&self) -> &str {
        self.get(API_ENDPOINT_SETTING)
    }

    pub fn environment_setting(&self) -> &str {
        self.get(ENVIRONMENT_SETTING)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for Settings {
    fn from(values: HashMap<String, String>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    #[test]
    fn test_missing_setting_is_empty() {
        let s = Settings::default();
        assert_eq!(s.get("anything"), "");
        assert_eq!(s.api_endpoint(), "");
        assert_eq!(s.environment_setting(), "");
    }

    #[test]
    fn test_named_settings() {
        let s = settings(&[
            ("api_endpoint", "https://api.example.com"),
            ("environment_setting", "staging"),
        ]);
        assert_eq!(s.api_endpoint(), "https://api.example.com");
        assert_eq!(s.environment_setting(), "staging");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let s = settings(&[("Api_Endpoint", "x")]);
        assert_eq!(s.get("API_ENDPOINT"), "x");
        assert_eq!(s.api_endpoint(), "x");
    }

    #[test]
    fn test_values_are_opaque() {
        let s = settings(&[("environment_setting", "  not a url  ")]);
        assert_eq!(s.environment_setting(), "  not a url  ");
    }
}
