//! Console output formatter for conference outcomes

use crate::activity::ActivityView;
use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use conclave_application::ConferenceOutcome;
use conclave_domain::{AgentStatus, ConferenceStatus, PhaseStatus};

/// Formats conference outcomes for console display
pub struct ConsoleFormatter {
    /// Height of the activity tail in the full format
    activity_rows: usize,
}

impl ConsoleFormatter {
    pub fn new(activity_rows: usize) -> Self {
        Self { activity_rows }
    }

    fn header(title: &str) -> String {
        format!("{}\n{}\n", title.cyan().bold(), "=".repeat(title.len()))
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).yellow().bold())
    }

    fn status_mark(ok: bool) -> colored::ColoredString {
        if ok { "v".green() } else { "x".red() }
    }

    fn phase_line(label: &str, status: PhaseStatus, duration: Option<f64>) -> String {
        let mark = match status {
            PhaseStatus::Complete => "v".green(),
            PhaseStatus::Error => "x".red(),
            PhaseStatus::Running => ">".yellow(),
            PhaseStatus::Pending => "-".dimmed(),
        };
        let timing = duration
            .map(|d| format!("  ({:.1}s)", d))
            .unwrap_or_default();
        format!("  {} {:<20} {}{}\n", mark, label, status, timing)
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self { activity_rows: 12 }
    }
}

impl OutputFormatter for ConsoleFormatter {
    /// Format the complete outcome
    fn format(&self, outcome: &ConferenceOutcome) -> String {
        let state = &outcome.state;
        let mut output = String::new();

        output.push_str(&Self::header("Conference Results"));

        if let Some(job_id) = &state.job_id {
            output.push_str(&format!("{} {}\n", "Job:".cyan().bold(), job_id));
        }
        if let Some(mode) = state.mode {
            output.push_str(&format!("{} {}\n", "Mode:".cyan().bold(), mode));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            match state.status {
                ConferenceStatus::Complete => state.status.to_string().green().to_string(),
                ConferenceStatus::Error => state.status.to_string().red().to_string(),
                _ => state.status.to_string(),
            }
        ));

        // Pipeline
        output.push_str(&Self::section_header("Pipeline"));
        for phase in &state.phases {
            output.push_str(&Self::phase_line(&phase.label, phase.status, phase.duration));
        }

        // Agents
        if !state.agents.is_empty() {
            output.push_str(&Self::section_header("Agents"));
            for agent in state.agents.values() {
                let confidence = agent
                    .confidence
                    .map(|c| format!("  {:.2} conf", c))
                    .unwrap_or_default();
                let tokens = if agent.tokens_generated > 0 {
                    format!("  {} tokens", agent.tokens_generated)
                } else {
                    String::new()
                };
                output.push_str(&format!(
                    "  {} {:<12} {}{}{}\n",
                    Self::status_mark(agent.status == AgentStatus::Complete),
                    agent.role.display_name(),
                    agent.status,
                    tokens,
                    confidence,
                ));
            }
        }

        // Verdict
        output.push_str(&Self::section_header("Verdict"));
        match (&state.result, state.synthesis.is_empty()) {
            (Some(verdict), _) if !verdict.summary.is_empty() => {
                output.push_str(&format!("\n{}\n", verdict.summary));
                if let Some(confidence) = verdict.confidence {
                    output.push_str(&format!(
                        "\n{} {:.2}\n",
                        "Confidence:".cyan().bold(),
                        confidence
                    ));
                }
            }
            (_, false) => output.push_str(&format!("\n{}\n", state.synthesis)),
            _ => match &state.error {
                Some(error) => {
                    output.push_str(&format!("\n{} {}\n", "Failed:".red().bold(), error))
                }
                None => output.push_str("\n(no verdict)\n"),
            },
        }

        // Fragility
        if let Some(report) = &state.fragility {
            output.push_str(&format!(
                "\n{} verdict held in {}/{} probes\n",
                "Robustness:".cyan().bold(),
                report.survived,
                report.total
            ));
        }

        // Recent activity tail, bounded
        if !outcome.activity.is_empty() {
            output.push_str(&Self::section_header("Recent Activity"));
            let view = ActivityView::new(self.activity_rows);
            for entry in view.visible(&outcome.activity) {
                let detail = entry.details.as_deref().unwrap_or("");
                output.push_str(&format!(
                    "  {} [{}] {}\n",
                    entry.timestamp.format("%H:%M:%S%.3f"),
                    entry.kind,
                    detail
                ));
            }
        }

        output
    }

    /// Format as JSON
    fn format_json(&self, outcome: &ConferenceOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    fn format_synthesis_only(&self, outcome: &ConferenceOutcome) -> String {
        let state = &outcome.state;
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Conference Verdict ===".cyan().bold()));

        if let Some(error) = &state.error {
            output.push_str(&format!("{} {}\n", "Failed:".red().bold(), error));
            return output;
        }

        match &state.result {
            Some(verdict) if !verdict.summary.is_empty() => {
                output.push_str(&format!("{}\n", verdict.summary));
                if let Some(confidence) = verdict.confidence {
                    output.push_str(&format!(
                        "\n{} {:.2}\n",
                        "Confidence:".cyan().bold(),
                        confidence
                    ));
                }
            }
            _ if !state.synthesis.is_empty() => {
                output.push_str(&format!("{}\n", state.synthesis));
            }
            _ => output.push_str("(no verdict)\n"),
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{ConferenceEvent, ConferenceState, Verdict};

    fn completed_outcome() -> ConferenceOutcome {
        let mut state = ConferenceState::new();
        state.apply(
            &ConferenceEvent::ConferenceCompleted {
                result: Some(Verdict {
                    summary: "Adopt incrementally.".to_string(),
                    confidence: Some(0.81),
                    mode: None,
                    fragility: None,
                }),
            },
            1.0,
        );
        ConferenceOutcome {
            state,
            activity: vec![],
        }
    }

    #[test]
    fn test_full_format_mentions_verdict() {
        let output = ConsoleFormatter::default().format(&completed_outcome());
        assert!(output.contains("Adopt incrementally."));
        assert!(output.contains("Pipeline"));
    }

    #[test]
    fn test_synthesis_only_is_concise() {
        let output = ConsoleFormatter::default().format_synthesis_only(&completed_outcome());
        assert!(output.contains("Adopt incrementally."));
        assert!(!output.contains("Pipeline"));
    }

    #[test]
    fn test_json_round_trips() {
        let output = ConsoleFormatter::default().format_json(&completed_outcome());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["state"]["status"], "complete");
    }
}
