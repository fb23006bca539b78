//! Infrastructure layer for conclave
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod backend;
pub mod config;

// Re-export commonly used types
pub use backend::{
    error::BackendError,
    gateway::HttpDeliberationGateway,
    sse::{SseFrame, SseParser},
    stream::SseEventStream,
};
pub use config::{BackendConfig, ConferenceConfig, ConfigLoader, FileConfig, OutputConfig};
