//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(group_size) = args.group_size {
        info!(group_size, "Overriding group size from CLI");
        blueprint.dispatch.group_size = group_size;
    }
    if let Some(interval_ms) = args.interval_ms {
        info!(interval_ms, "Overriding cycle interval from CLI");
        blueprint.dispatch.cycle_interval_ms = interval_ms;
    }
    if let Some(max_cycles) = args.max_cycles {
        info!(max_cycles, "Overriding max cycles from CLI");
        blueprint.dispatch.max_cycles = max_cycles;
    }

    // Overrides bypass the loader, so re-check the result
    config_loader::validate(&blueprint).context("Configuration invalid after CLI overrides")?;

    info!(
        location = %blueprint.store.location.display(),
        collection = %blueprint.store.collection,
        group_size = blueprint.dispatch.group_size,
        transport = %blueprint.transport.name,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    let pipeline = Pipeline::new(pipeline_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");

    tokio::select! {
        result = pipeline.run() => {
            match result {
                Ok(stats) => {
                    info!(
                        cycles = stats.cycles_run,
                        parts = stats.parts_sent,
                        duration_secs = stats.duration.as_secs_f64(),
                        pps = format!("{:.2}", stats.pps()),
                        "Pipeline completed successfully"
                    );

                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Pipeline execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("Partcast finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::StreamBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Store:");
    println!("  Location: {}", blueprint.store.location.display());
    println!("  Collection: {}", blueprint.store.collection);
    println!("  Field: {} ({:?})", blueprint.store.field, blueprint.store.layout);

    println!("\nDispatch:");
    println!("  Group size: {}", blueprint.dispatch.group_size);
    println!("  Cycle interval: {} ms", blueprint.dispatch.cycle_interval_ms);
    if blueprint.dispatch.max_cycles > 0 {
        println!("  Max cycles: {}", blueprint.dispatch.max_cycles);
    } else {
        println!("  Max cycles: until drained");
    }

    println!("\nTransport:");
    println!(
        "  {} ({:?}), {} socket(s)",
        blueprint.transport.name, blueprint.transport.kind, blueprint.transport.sockets
    );
    if !blueprint.transport.params.is_empty() {
        for (key, value) in &blueprint.transport.params {
            println!("    {key} = {value}");
        }
    }

    println!();
}
