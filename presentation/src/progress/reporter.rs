//! Progress reporting for a running conference

use colored::Colorize;
use conclave_application::{ActivityEvent, ConferenceObserver};
use conclave_domain::{
    AgentRole, AgentStatus, ConferenceState, Transition, estimate_time_remaining,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports conference progress with live progress bars: one overall bar
/// fed from the aggregate's derived percentage, plus one token bar per
/// streaming agent.
pub struct ConferenceProgressReporter {
    multi: MultiProgress,
    overall: ProgressBar,
    agent_bars: Mutex<HashMap<AgentRole, ProgressBar>>,
}

impl ConferenceProgressReporter {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(100));
        overall.set_style(Self::overall_style());
        overall.set_prefix("Conference");
        overall.set_message("waiting for backend...");
        Self {
            multi,
            overall,
            agent_bars: Mutex::new(HashMap::new()),
        }
    }

    fn overall_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn agent_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("  {prefix:.bold} [{bar:30.yellow/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn ensure_agent_bar(&self, role: AgentRole) -> ProgressBar {
        let mut bars = self.agent_bars.lock().unwrap();
        bars.entry(role)
            .or_insert_with(|| {
                let bar = self.multi.add(ProgressBar::new(1));
                bar.set_style(Self::agent_style());
                bar.set_prefix(role.display_name().to_string());
                bar
            })
            .clone()
    }
}

impl Default for ConferenceProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConferenceObserver for ConferenceProgressReporter {
    fn on_transition(&self, transition: &Transition, snapshot: &ConferenceState) {
        self.overall.set_position(snapshot.progress as u64);
        if let Some(key) = snapshot.current_phase {
            let remaining = estimate_time_remaining(&snapshot.phases);
            self.overall
                .set_message(format!("{} (~{}s left)", key.display_name(), remaining));
        }

        match transition {
            Transition::RoutingDecided { mode, roster } => {
                if let Some(mode) = mode {
                    self.overall.set_message(format!("routed: {}", mode));
                }
                for role in roster {
                    let bar = self.ensure_agent_bar(*role);
                    bar.set_message("waiting".dimmed().to_string());
                }
            }
            Transition::AgentProgressed {
                role,
                tokens_generated,
                tokens_estimated,
            } => {
                let bar = self.ensure_agent_bar(*role);
                bar.set_length((*tokens_estimated).max(*tokens_generated).max(1));
                bar.set_position(*tokens_generated);
                bar.set_message("streaming".to_string());
            }
            Transition::AgentAdvanced { role, status } => {
                let bar = self.ensure_agent_bar(*role);
                match status {
                    AgentStatus::Complete => {
                        let confidence = snapshot
                            .agents
                            .get(role)
                            .and_then(|a| a.confidence)
                            .map(|c| format!("{} {:.2} conf", "v".green(), c))
                            .unwrap_or_else(|| format!("{} done", "v".green()));
                        bar.finish_with_message(confidence);
                    }
                    other => bar.set_message(other.as_str().to_string()),
                }
            }
            Transition::AgentFailed { role, message } => {
                let bar = self.ensure_agent_bar(*role);
                bar.abandon_with_message(format!("{} {}", "x".red(), message));
            }
            Transition::Completed => {
                self.overall
                    .finish_with_message("complete!".green().to_string());
            }
            Transition::Failed { message } => {
                self.overall
                    .abandon_with_message(format!("{} {}", "x".red(), message));
            }
            _ => {}
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleObserver;

impl ConferenceObserver for SimpleObserver {
    fn on_transition(&self, transition: &Transition, snapshot: &ConferenceState) {
        match transition {
            Transition::Started => {
                println!("{} deliberation started", "->".cyan());
            }
            Transition::RoutingDecided { mode, roster } => {
                let mode = mode.map(|m| m.to_string()).unwrap_or_default();
                println!(
                    "{} routed {} ({} participants)",
                    "->".cyan(),
                    mode.bold(),
                    roster.len()
                );
            }
            Transition::PhaseAdvanced { key, status } => {
                println!(
                    "{} {} {} ({}%, ~{}s left)",
                    "->".cyan(),
                    key.display_name().bold(),
                    status,
                    snapshot.progress,
                    estimate_time_remaining(&snapshot.phases)
                );
            }
            Transition::AgentAdvanced { role, status } => match status {
                AgentStatus::Complete => println!("  {} {}", "v".green(), role),
                _ => println!("  {} {} {}", "*".yellow(), role, status),
            },
            Transition::AgentFailed { role, message } => {
                println!("  {} {} ({})", "x".red(), role, message);
            }
            Transition::Completed => {
                println!("{} conference complete", "v".green());
            }
            Transition::Failed { message } => {
                println!("{} conference failed: {}", "x".red(), message);
            }
            _ => {}
        }
    }

    fn on_activity(&self, _entry: &ActivityEvent) {}
}
