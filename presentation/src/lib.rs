//! Presentation layer for conclave
//!
//! This crate contains CLI definitions, output formatters, the live
//! progress reporter, and the bounded activity view.

pub mod activity;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use activity::ActivityView;
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ConferenceProgressReporter, SimpleObserver};
