//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use record_store::RecordStore;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    store: StoreInfo,
    dispatch: DispatchInfo,
    transport: TransportInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    probe: Option<ProbeInfo>,
}

#[derive(Serialize)]
struct StoreInfo {
    location: String,
    collection: String,
    field: String,
    layout: String,
}

#[derive(Serialize)]
struct DispatchInfo {
    group_size: usize,
    cycle_interval_ms: u64,
    max_cycles: u64,
}

#[derive(Serialize)]
struct TransportInfo {
    name: String,
    kind: String,
    sockets: usize,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    params: std::collections::HashMap<String, String>,
}

#[derive(Serialize)]
struct ProbeInfo {
    record_count: i64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let probe = if args.probe {
        Some(probe_store(&blueprint)?)
    } else {
        None
    };

    if args.json {
        let info = build_config_info(&blueprint, probe);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, probe);
    }

    Ok(())
}

/// Open the configured store and report its live record count
fn probe_store(blueprint: &contracts::StreamBlueprint) -> Result<ProbeInfo> {
    let mut store = RecordStore::<Value>::new();
    store.open(&blueprint.store).with_context(|| {
        format!(
            "Failed to open record store at {}",
            blueprint.store.location.display()
        )
    })?;

    Ok(ProbeInfo {
        record_count: store.count(),
    })
}

fn build_config_info(blueprint: &contracts::StreamBlueprint, probe: Option<ProbeInfo>) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        store: StoreInfo {
            location: blueprint.store.location.display().to_string(),
            collection: blueprint.store.collection.clone(),
            field: blueprint.store.field.clone(),
            layout: format!("{:?}", blueprint.store.layout),
        },
        dispatch: DispatchInfo {
            group_size: blueprint.dispatch.group_size,
            cycle_interval_ms: blueprint.dispatch.cycle_interval_ms,
            max_cycles: blueprint.dispatch.max_cycles,
        },
        transport: TransportInfo {
            name: blueprint.transport.name.clone(),
            kind: format!("{:?}", blueprint.transport.kind),
            sockets: blueprint.transport.sockets,
            params: blueprint.transport.params.clone(),
        },
        probe,
    }
}

fn print_config_info(blueprint: &contracts::StreamBlueprint, probe: Option<ProbeInfo>) {
    println!("=== Partcast Configuration ===\n");

    println!("Store");
    println!("   Version: {:?}", blueprint.version);
    println!("   Location: {}", blueprint.store.location.display());
    println!("   Collection: {}", blueprint.store.collection);
    println!(
        "   Field: {} ({:?})",
        blueprint.store.field, blueprint.store.layout
    );
    if let Some(ref probe) = probe {
        println!("   Records (probed): {}", probe.record_count);
    }

    println!("\nDispatch");
    println!("   Group size: {}", blueprint.dispatch.group_size);
    println!(
        "   Cycle interval: {} ms",
        blueprint.dispatch.cycle_interval_ms
    );
    if blueprint.dispatch.max_cycles > 0 {
        println!("   Max cycles: {}", blueprint.dispatch.max_cycles);
    } else {
        println!("   Max cycles: until drained");
    }

    println!("\nTransport");
    println!("   Name: {}", blueprint.transport.name);
    println!("   Kind: {:?}", blueprint.transport.kind);
    println!("   Sockets: {}", blueprint.transport.sockets);
    if !blueprint.transport.params.is_empty() {
        println!("   Params:");
        for (key, value) in &blueprint.transport.params {
            println!("     {key} = {value}");
        }
    }

    println!();
}
