use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::Job;

lazy_static! {
    // Two token forms: {{name}} and {{metadata.<key>}}. Keys may contain
    // dots, slashes and dashes, as Kubernetes label keys do.
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{\s*(?:(name)|metadata\.([A-Za-z0-9_.\-/]+))\s*\}\}").unwrap();
}

/// Substitute every recognized placeholder in `pattern` with the matching
/// job attribute. A metadata key absent from the job substitutes the empty
/// string, so a link with a missing label still renders as a usable path.
/// Unrecognized `{{...}}` forms are left literal.
pub fn render(pattern: &str, job: &Job) -> String {
    PLACEHOLDER
        .replace_all(pattern, |caps: &Captures| {
            if caps.get(1).is_some() {
                job.name.clone()
            } else {
                let key = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                job.metadata.get(key).cloned().unwrap_or_default()
            }
        })
        .into_owned()
}

/// Resolve a whole endpoint pattern map against one job.
pub fn render_endpoints(
    patterns: &BTreeMap<String, String>,
    job: &Job,
) -> BTreeMap<String, String> {
    patterns
        .iter()
        .map(|(key, pattern)| (key.clone(), render(pattern, job)))
        .collect()
}

/// A user-local endpoint pattern, kept in browser storage on the client side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointPatternOverride {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Merge server-defined endpoint patterns with user-local overrides.
///
/// An override needs both a non-blank key and a non-blank pattern to count;
/// anything else is silently skipped. Overrides win over server entries, and
/// the last override wins among duplicates of the same key.
pub fn merge_endpoint_patterns(
    server: &BTreeMap<String, String>,
    overrides: &[EndpointPatternOverride],
) -> BTreeMap<String, String> {
    let mut merged = server.clone();
    for entry in overrides {
        if entry.key.trim().is_empty() || entry.pattern.trim().is_empty() {
            continue;
        }
        merged.insert(entry.key.clone(), entry.pattern.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JobStatus, JobType};

    fn job() -> Job {
        Job {
            id: "abc".to_string(),
            name: "checkout-events".to_string(),
            namespace: "team-a".to_string(),
            status: JobStatus::Running,
            job_type: JobType::Application,
            parallelism: Some(2),
            flink_version: None,
            image: None,
            start_time: None,
            metadata: BTreeMap::from([
                ("team".to_string(), "streaming".to_string()),
                ("app.kubernetes.io/name".to_string(), "checkout".to_string()),
            ]),
        }
    }

    fn overrides(entries: &[(&str, &str)]) -> Vec<EndpointPatternOverride> {
        entries
            .iter()
            .map(|(key, pattern)| EndpointPatternOverride {
                key: key.to_string(),
                pattern: pattern.to_string(),
                title: None,
            })
            .collect()
    }

    #[test]
    fn substitutes_name_and_metadata_tokens() {
        let rendered = render("/flink/{{name}}?team={{metadata.team}}", &job());
        assert_eq!(rendered, "/flink/checkout-events?team=streaming");
    }

    #[test]
    fn metadata_keys_may_contain_slashes_and_dots() {
        let rendered = render("/app/{{metadata.app.kubernetes.io/name}}", &job());
        assert_eq!(rendered, "/app/checkout");
    }

    #[test]
    fn absent_metadata_key_substitutes_empty_string() {
        let rendered = render("/logs/{{metadata.missing}}/tail", &job());
        assert_eq!(rendered, "/logs//tail");
    }

    #[test]
    fn unrecognized_placeholders_are_left_literal() {
        let rendered = render("/jobs/{{namespace}}/{{name}}", &job());
        assert_eq!(rendered, "/jobs/{{namespace}}/checkout-events");
    }

    #[test]
    fn repeated_tokens_are_all_substituted() {
        let rendered = render("{{name}}-{{name}}", &job());
        assert_eq!(rendered, "checkout-events-checkout-events");
    }

    #[test]
    fn render_endpoints_resolves_every_pattern() {
        let patterns = BTreeMap::from([
            ("ui".to_string(), "/ui/{{name}}".to_string()),
            ("metrics".to_string(), "/m/{{metadata.team}}".to_string()),
        ]);
        let resolved = render_endpoints(&patterns, &job());
        assert_eq!(resolved["ui"], "/ui/checkout-events");
        assert_eq!(resolved["metrics"], "/m/streaming");
    }

    #[test]
    fn override_wins_over_server_pattern() {
        let server = BTreeMap::from([("a".to_string(), "P1".to_string())]);
        let merged = merge_endpoint_patterns(&server, &overrides(&[("a", "P2")]));
        assert_eq!(merged["a"], "P2");
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn blank_pattern_is_ignored() {
        let server = BTreeMap::from([("a".to_string(), "P1".to_string())]);
        let merged = merge_endpoint_patterns(&server, &overrides(&[("b", "")]));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["a"], "P1");
    }

    #[test]
    fn blank_key_is_ignored() {
        let server = BTreeMap::from([("a".to_string(), "P1".to_string())]);
        let merged = merge_endpoint_patterns(&server, &overrides(&[("", "P2"), ("  ", "P3")]));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["a"], "P1");
    }

    #[test]
    fn last_duplicate_override_wins() {
        let server = BTreeMap::new();
        let merged = merge_endpoint_patterns(&server, &overrides(&[("a", "P1"), ("a", "P2")]));
        assert_eq!(merged["a"], "P2");
    }

    #[test]
    fn new_override_keys_are_added() {
        let server = BTreeMap::from([("a".to_string(), "P1".to_string())]);
        let merged = merge_endpoint_patterns(&server, &overrides(&[("b", "P2")]));
        assert_eq!(merged["a"], "P1");
        assert_eq!(merged["b"], "P2");
    }
}
