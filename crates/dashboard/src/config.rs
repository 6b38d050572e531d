use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub joblocator: JobLocatorConfig,
    pub patterns: PatternsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLocatorConfig {
    pub enabled: bool,
    /// Comma-separated namespace specification, e.g. "team-a, team-b".
    pub namespace_to_watch: String,
    pub list_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
}

impl JobLocatorConfig {
    pub fn namespaces_to_watch(&self) -> Vec<String> {
        resolve_namespaces(&self.namespace_to_watch)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternsConfig {
    /// Template applied to each job to produce its display name.
    pub display_name: String,
    /// Endpoint key -> path template, substituted per job at render time.
    pub endpoint_path_patterns: BTreeMap<String, String>,
}

/// The configuration object served to the dashboard UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub display_name_pattern: String,
    pub endpoint_path_patterns: BTreeMap<String, String>,
    pub version: String,
}

/// Parse a raw namespace specification into the list of namespaces to watch.
///
/// Blank input falls back to `["default"]`. Segments are trimmed and empty
/// segments dropped; order is preserved and repeats are kept as-is (jobs are
/// deduplicated downstream by id + namespace, so a repeated namespace here is
/// harmless but still visible in the config).
pub fn resolve_namespaces(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return vec!["default".to_string()];
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_endpoint_patterns(raw: &str) -> Result<BTreeMap<String, String>> {
    let mut patterns = BTreeMap::new();
    for pair in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, pattern) = pair.split_once('=').ok_or_else(|| {
            Error::Config(format!(
                "invalid ENDPOINT_PATTERNS entry {pair:?}, expected key=pattern"
            ))
        })?;
        patterns.insert(key.trim().to_string(), pattern.trim().to_string());
    }
    Ok(patterns)
}

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| Error::Config(format!("{name} must be an integer, got {value:?}"))),
        Err(_) => Ok(default),
    }
}

fn env_bool(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(value) => match value.to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(Error::Config(format!(
                "{name} must be a boolean, got {value:?}"
            ))),
        },
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Config {
            server: ServerConfig {
                addr: env_string("SERVER_ADDR", "0.0.0.0:8080"),
            },
            joblocator: JobLocatorConfig {
                enabled: env_bool("JOBLOCATOR_K8S_OPERATOR_ENABLED", true)?,
                namespace_to_watch: env_string("JOBLOCATOR_K8S_OPERATOR_NAMESPACE_TO_WATCH", ""),
                list_timeout_seconds: env_u64("JOBLOCATOR_LIST_TIMEOUT_SECONDS", 10)?,
                cache_ttl_seconds: env_u64("JOBS_CACHE_TTL_SECONDS", 5)?,
            },
            patterns: PatternsConfig {
                display_name: env_string("PATTERNS_DISPLAY_NAME", "{{name}}"),
                endpoint_path_patterns: parse_endpoint_patterns(&env_string(
                    "ENDPOINT_PATTERNS",
                    "",
                ))?,
            },
        };

        Ok(config)
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            display_name_pattern: self.patterns.display_name.clone(),
            endpoint_path_patterns: self.patterns.endpoint_path_patterns.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: "0.0.0.0:8080".to_string(),
            },
            joblocator: JobLocatorConfig {
                enabled: true,
                namespace_to_watch: String::new(),
                list_timeout_seconds: 10,
                cache_ttl_seconds: 5,
            },
            patterns: PatternsConfig {
                display_name: "{{name}}".to_string(),
                endpoint_path_patterns: BTreeMap::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_namespace_spec_falls_back_to_default() {
        assert_eq!(resolve_namespaces(""), vec!["default"]);
        assert_eq!(resolve_namespaces("   "), vec!["default"]);
    }

    #[test]
    fn namespace_spec_is_split_and_trimmed() {
        assert_eq!(
            resolve_namespaces("ns1, ns2 ,ns3"),
            vec!["ns1", "ns2", "ns3"]
        );
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(resolve_namespaces("ns1,,ns2"), vec!["ns1", "ns2"]);
        assert_eq!(resolve_namespaces(",ns1,"), vec!["ns1"]);
    }

    #[test]
    fn repeats_are_preserved() {
        assert_eq!(resolve_namespaces("ns1,ns1"), vec!["ns1", "ns1"]);
    }

    #[test]
    fn endpoint_patterns_parse_into_map() {
        let patterns =
            parse_endpoint_patterns("flink-ui=/ui/{{name}}, logs=/logs/{{metadata.app}}").unwrap();
        assert_eq!(patterns["flink-ui"], "/ui/{{name}}");
        assert_eq!(patterns["logs"], "/logs/{{metadata.app}}");
    }

    #[test]
    fn malformed_endpoint_pattern_is_a_config_error() {
        let err = parse_endpoint_patterns("no-equals-sign").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
