//! CLI entrypoint for conclave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conclave_application::{DeliberationGateway, NoObserver, RunConferenceUseCase};
use conclave_domain::{AgentRole, ConferenceStatus, DeliberationMode, ParticipantSpec};
use conclave_infrastructure::{ConfigLoader, HttpDeliberationGateway};
use conclave_presentation::{
    Cli, ConferenceProgressReporter, ConsoleFormatter, OutputFormat, OutputFormatter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    // === Dependency Injection ===
    let gateway = Arc::new(
        HttpDeliberationGateway::new(&config.backend.base_url).with_request_timeout(
            std::time::Duration::from_secs(config.backend.request_timeout_secs),
        ),
    );

    // Health probe mode
    if cli.health {
        if gateway.health().await {
            println!("Backend reachable: {}", config.backend.base_url);
            return Ok(());
        }
        bail!("Backend unreachable: {}", config.backend.base_url);
    }

    // A dilemma is required for everything else
    let dilemma = match cli.dilemma {
        Some(d) => d,
        None => bail!("A dilemma is required. See --help for usage."),
    };

    info!("Starting conclave against {}", config.backend.base_url);

    // Build the request: config defaults, then flag overrides
    let mut request = config.conference.to_request(dilemma.clone());

    for pair in &cli.role {
        let Some((role, model)) = pair.split_once('=') else {
            bail!("Invalid --role '{}': expected role=model", pair);
        };
        let role: AgentRole = role
            .parse()
            .with_context(|| format!("Invalid --role '{}'", pair))?;
        match request.participants.iter_mut().find(|p| p.role == role) {
            Some(spec) => {
                spec.model = model.to_string();
                spec.enabled = true;
            }
            None => request.participants.push(ParticipantSpec::new(role, model)),
        }
    }

    if let Some(mode) = &cli.mode {
        let mode: DeliberationMode = mode
            .parse()
            .with_context(|| format!("Invalid --mode '{}'", mode))?;
        request = request.with_mode(mode);
    }
    if cli.no_retrieval {
        request = request.without_retrieval();
    }
    if cli.no_fragility {
        request = request.without_fragility();
    }
    if let Some(probes) = cli.probes {
        request = request.with_fragility_probes(probes);
    }
    for path in &cli.doc {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read --doc {}", path.display()))?;
        request = request.with_document(content);
    }

    // Print header
    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|            Conclave - Deliberation Conference              |");
        println!("+============================================================+");
        println!();
        println!("Dilemma: {}", dilemma);
        println!(
            "Participants: {}",
            request
                .participants
                .iter()
                .filter(|p| p.enabled)
                .map(|p| p.role.as_str().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    // Create use case with injected gateway
    let use_case = RunConferenceUseCase::new(gateway);

    // Execute with or without progress reporting
    let outcome = if cli.quiet {
        use_case.execute(request, &NoObserver).await?
    } else {
        let progress = ConferenceProgressReporter::new();
        use_case.execute(request, &progress).await?
    };

    // Output results: an explicit -o wins over the configured format
    let format = cli.output.unwrap_or(match config.output.format.as_str() {
        "synthesis" => OutputFormat::Synthesis,
        "json" => OutputFormat::Json,
        _ => OutputFormat::Full,
    });
    let formatter = ConsoleFormatter::new(config.output.activity_rows);
    let output = match format {
        OutputFormat::Full => formatter.format(&outcome),
        OutputFormat::Synthesis => formatter.format_synthesis_only(&outcome),
        OutputFormat::Json => formatter.format_json(&outcome),
    };

    println!("{}", output);

    if outcome.state.status == ConferenceStatus::Error {
        bail!(
            "Conference failed: {}",
            outcome.state.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
