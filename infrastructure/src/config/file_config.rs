//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types at the
//! edges.

use conclave_domain::{AgentRole, ConferenceRequest, ParticipantSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Complete file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: BackendConfig,
    pub conference: ConferenceConfig,
    pub output: OutputConfig,
}

/// `[backend]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL (scheme + host + port)
    pub base_url: String,
    /// Timeout for non-streaming requests, in seconds
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8787".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// `[conference]` section — defaults for every run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceConfig {
    /// Participant role → model identifier
    pub participants: BTreeMap<String, String>,
    pub retrieval_enabled: bool,
    pub fragility_enabled: bool,
    pub fragility_probes: u32,
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self {
            participants: AgentRole::deliberators()
                .into_iter()
                .map(|role| (role.as_str().to_string(), "default".to_string()))
                .collect(),
            retrieval_enabled: true,
            fragility_enabled: true,
            fragility_probes: 5,
        }
    }
}

impl ConferenceConfig {
    /// Participant specs from the configured map, skipping entries whose
    /// role name doesn't parse.
    pub fn participant_specs(&self) -> Vec<ParticipantSpec> {
        self.participants
            .iter()
            .filter_map(|(role, model)| match role.parse::<AgentRole>() {
                Ok(role) => Some(ParticipantSpec::new(role, model.clone())),
                Err(_) => {
                    warn!("Config: unknown participant role '{}', skipping", role);
                    None
                }
            })
            .collect()
    }

    /// Build the default request for a dilemma from this config.
    pub fn to_request(&self, dilemma: impl Into<String>) -> ConferenceRequest {
        let mut request = ConferenceRequest::new(dilemma)
            .with_participants(self.participant_specs())
            .with_fragility_probes(self.fragility_probes);
        if !self.retrieval_enabled {
            request = request.without_retrieval();
        }
        if !self.fragility_enabled {
            request = request.without_fragility();
        }
        request
    }
}

/// `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// "full", "synthesis", or "json"
    pub format: String,
    /// Bounded height of the activity tail printed after a run
    pub activity_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "full".to_string(),
            activity_rows: 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8787");
        assert_eq!(config.conference.participants.len(), 4);
        assert!(config.conference.retrieval_enabled);
        assert_eq!(config.output.activity_rows, 12);
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://conference.internal:9000"

            [conference]
            fragility_probes = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "http://conference.internal:9000");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.conference.fragility_probes, 10);
        assert!(config.conference.fragility_enabled);
    }

    #[test]
    fn test_unknown_participant_roles_skipped() {
        let config: FileConfig = toml::from_str(
            r#"
            [conference.participants]
            empiricist = "model-a"
            prophet = "model-b"
            "#,
        )
        .unwrap();
        let specs = config.conference.participant_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].role, AgentRole::Empiricist);
        assert_eq!(specs[0].model, "model-a");
    }

    #[test]
    fn test_to_request_applies_toggles() {
        let mut config = ConferenceConfig::default();
        config.retrieval_enabled = false;
        let request = config.to_request("q");
        assert!(!request.retrieval_enabled);
        assert!(request.fragility_enabled);
        assert!(request.validate().is_ok());
    }
}
