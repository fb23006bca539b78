//! Client→server job description
//!
//! [`ConferenceRequest`] is everything the operator chooses before
//! starting a run; the backend answers with an opaque [`JobTicket`].

use super::agent::AgentRole;
use super::event::DeliberationMode;
use crate::core::error::DomainError;
use crate::core::job::JobId;
use serde::{Deserialize, Serialize};

/// Upper bound on fragility probes a single request may ask for.
const MAX_FRAGILITY_PROBES: u32 = 25;

/// One enabled participant and its model selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub role: AgentRole,
    /// Backend model identifier; opaque to this client
    pub model: String,
    pub enabled: bool,
}

impl ParticipantSpec {
    pub fn new(role: AgentRole, model: impl Into<String>) -> Self {
        Self {
            role,
            model: model.into(),
            enabled: true,
        }
    }
}

/// Description of a conference to start (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceRequest {
    /// The dilemma to deliberate
    pub dilemma: String,
    /// Participants and their model assignments
    pub participants: Vec<ParticipantSpec>,
    /// Force a deliberation mode instead of letting the router pick
    pub mode_override: Option<DeliberationMode>,
    /// Supplementary document context passed through to the backend
    pub context_documents: Vec<String>,
    /// Whether the literature scout runs
    pub retrieval_enabled: bool,
    /// Whether the fragility stage runs
    pub fragility_enabled: bool,
    /// Number of fragility probes when enabled
    pub fragility_probes: u32,
}

impl ConferenceRequest {
    pub fn new(dilemma: impl Into<String>) -> Self {
        Self {
            dilemma: dilemma.into(),
            participants: AgentRole::deliberators()
                .into_iter()
                .map(|role| ParticipantSpec::new(role, "default"))
                .collect(),
            mode_override: None,
            context_documents: Vec::new(),
            retrieval_enabled: true,
            fragility_enabled: true,
            fragility_probes: 5,
        }
    }

    pub fn with_participants(mut self, participants: Vec<ParticipantSpec>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_mode(mut self, mode: DeliberationMode) -> Self {
        self.mode_override = Some(mode);
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.context_documents.push(document.into());
        self
    }

    pub fn without_retrieval(mut self) -> Self {
        self.retrieval_enabled = false;
        self
    }

    pub fn without_fragility(mut self) -> Self {
        self.fragility_enabled = false;
        self
    }

    pub fn with_fragility_probes(mut self, probes: u32) -> Self {
        self.fragility_probes = probes;
        self
    }

    /// Validate the request before it goes on the wire.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.dilemma.trim().is_empty() {
            return Err(DomainError::InvalidRequest("dilemma is empty".to_string()));
        }
        if !self.participants.iter().any(|p| p.enabled) {
            return Err(DomainError::InvalidRequest(
                "at least one participant must be enabled".to_string(),
            ));
        }
        if self.fragility_enabled && self.fragility_probes == 0 {
            return Err(DomainError::InvalidRequest(
                "fragility enabled with zero probes".to_string(),
            ));
        }
        if self.fragility_probes > MAX_FRAGILITY_PROBES {
            return Err(DomainError::InvalidRequest(format!(
                "fragility probes capped at {}",
                MAX_FRAGILITY_PROBES
            )));
        }
        Ok(())
    }
}

/// Backend response to a start request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTicket {
    pub job_id: JobId,
    /// Stream endpoint path, relative to the backend base URL
    pub stream_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_is_valid() {
        let request = ConferenceRequest::new("Should we rewrite it?");
        assert!(request.validate().is_ok());
        assert_eq!(request.participants.len(), 4);
        assert!(request.retrieval_enabled);
    }

    #[test]
    fn test_empty_dilemma_rejected() {
        let request = ConferenceRequest::new("   ");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_all_participants_disabled_rejected() {
        let mut request = ConferenceRequest::new("q");
        for p in &mut request.participants {
            p.enabled = false;
        }
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_probe_bounds() {
        let zero = ConferenceRequest::new("q").with_fragility_probes(0);
        assert!(zero.validate().is_err());

        let capped = ConferenceRequest::new("q").with_fragility_probes(26);
        assert!(capped.validate().is_err());

        let disabled = ConferenceRequest::new("q")
            .without_fragility()
            .with_fragility_probes(0);
        assert!(disabled.validate().is_ok());
    }
}
