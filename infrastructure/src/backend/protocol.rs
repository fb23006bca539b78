//! Wire DTOs for the backend's HTTP surface.
//!
//! The wire uses camelCase field names; domain types stay snake_case.
//! Conversions live here so neither layer leaks into the other.

use conclave_domain::{ConferenceRequest, JobId, JobTicket};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/conference`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConferenceBody {
    pub dilemma: String,
    pub participants: Vec<ParticipantBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_override: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_documents: Vec<String>,
    pub retrieval_enabled: bool,
    pub fragility_enabled: bool,
    pub fragility_probes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBody {
    pub role: String,
    pub model: String,
    pub enabled: bool,
}

impl From<&ConferenceRequest> for StartConferenceBody {
    fn from(request: &ConferenceRequest) -> Self {
        Self {
            dilemma: request.dilemma.clone(),
            participants: request
                .participants
                .iter()
                .map(|p| ParticipantBody {
                    role: p.role.as_str().to_string(),
                    model: p.model.clone(),
                    enabled: p.enabled,
                })
                .collect(),
            mode_override: request.mode_override.map(|m| m.as_str().to_string()),
            context_documents: request.context_documents.clone(),
            retrieval_enabled: request.retrieval_enabled,
            fragility_enabled: request.fragility_enabled,
            fragility_probes: request.fragility_probes,
        }
    }
}

/// Response of `POST /api/conference`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConferenceResponse {
    pub job_id: String,
    #[serde(default)]
    pub stream_url: Option<String>,
}

impl From<StartConferenceResponse> for JobTicket {
    fn from(response: StartConferenceResponse) -> Self {
        let stream_path = response
            .stream_url
            .unwrap_or_else(|| format!("/api/conference/{}/events", response.job_id));
        Self {
            job_id: JobId::new(response.job_id),
            stream_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::DeliberationMode;

    #[test]
    fn request_body_uses_camel_case() {
        let request = ConferenceRequest::new("Should we migrate?")
            .with_mode(DeliberationMode::StandardReview)
            .with_fragility_probes(3);
        let body = StartConferenceBody::from(&request);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["dilemma"], "Should we migrate?");
        assert_eq!(json["modeOverride"], "STANDARD_REVIEW");
        assert_eq!(json["fragilityProbes"], 3);
        assert_eq!(json["participants"][0]["role"], "empiricist");
        // Empty document list is omitted entirely.
        assert!(json.get("contextDocuments").is_none());
    }

    #[test]
    fn ticket_falls_back_to_conventional_stream_path() {
        let response = StartConferenceResponse {
            job_id: "job-9".to_string(),
            stream_url: None,
        };
        let ticket = JobTicket::from(response);
        assert_eq!(ticket.stream_path, "/api/conference/job-9/events");
    }

    #[test]
    fn response_parses_minimal_json() {
        let response: StartConferenceResponse =
            serde_json::from_str(r#"{"jobId": "abc"}"#).unwrap();
        assert_eq!(response.job_id, "abc");
        assert!(response.stream_url.is_none());
    }
}
