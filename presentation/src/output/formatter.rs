//! Output formatter trait

use conclave_application::ConferenceOutcome;

/// Trait for formatting conference outcomes
pub trait OutputFormatter {
    /// Format the complete outcome: phases, agents, verdict, activity tail
    fn format(&self, outcome: &ConferenceOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &ConferenceOutcome) -> String;

    /// Format the verdict only (concise output)
    fn format_synthesis_only(&self, outcome: &ConferenceOutcome) -> String;
}
