//! Error types for the backend adapter

use conclave_application::GatewayError;
use thiserror::Error;

/// Errors that can occur when talking to the deliberation backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Lift adapter errors into the port's error taxonomy.
impl From<BackendError> for GatewayError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Http(e) => GatewayError::Unreachable(e.to_string()),
            BackendError::Status { status, message } => GatewayError::Rejected { status, message },
            BackendError::UnexpectedResponse(message) => GatewayError::Protocol(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_rejected() {
        let error = BackendError::Status {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(matches!(
            GatewayError::from(error),
            GatewayError::Rejected { status: 503, .. }
        ));
    }

    #[test]
    fn test_unexpected_response_maps_to_protocol() {
        let error = BackendError::UnexpectedResponse("not json".to_string());
        assert!(matches!(
            GatewayError::from(error),
            GatewayError::Protocol(_)
        ));
    }
}
