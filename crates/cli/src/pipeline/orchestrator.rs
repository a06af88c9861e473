//! Pipeline orchestrator - wires store, transport, and dispatcher.
//!
//! Opens the configured record store, builds the transport, binds it to a
//! batch dispatcher, then drives dispatch cycles on a tokio interval until
//! the store drains or the cycle limit is reached.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{BoundedStore, StreamBlueprint};
use dispatcher::BatchDispatcher;
use observability::DispatchMetricsAggregator;
use record_store::RecordStore;
use serde_json::Value;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The streaming blueprint
    pub blueprint: StreamBlueprint,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    ///
    /// Stops when the remaining records no longer fit a whole group per
    /// socket, or when `max_cycles` is reached.
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Open the record store
        info!(
            location = %blueprint.store.location.display(),
            collection = %blueprint.store.collection,
            field = %blueprint.store.field,
            "Opening record store..."
        );

        let mut store = RecordStore::<Value>::new();
        store.open(&blueprint.store).with_context(|| {
            format!(
                "Failed to open record store at {}",
                blueprint.store.location.display()
            )
        })?;
        let total = store.count();
        let store = Arc::new(Mutex::new(store));

        // Build the transport
        info!(
            name = %blueprint.transport.name,
            kind = ?blueprint.transport.kind,
            "Creating transport..."
        );

        let transport = dispatcher::create_transport(&blueprint.transport, Arc::clone(&store))
            .context("Failed to create transport")?;
        let socket_count = transport.socket_count();

        // Bind the dispatcher
        let bound: Arc<dyn BoundedStore + Send + Sync> = store;
        let mut batch = BatchDispatcher::new(bound);
        batch.bind_transport(Arc::clone(&transport));

        let group_size = blueprint.dispatch.group_size;
        let max_cycles = blueprint.dispatch.max_cycles;

        let mut interval =
            tokio::time::interval(Duration::from_millis(blueprint.dispatch.cycle_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut aggregator = DispatchMetricsAggregator::new();
        let mut cycles = 0u64;
        let mut parts_sent = 0u64;

        info!(
            records = total,
            sockets = socket_count,
            group_size,
            max_cycles,
            "Pipeline running"
        );

        loop {
            interval.tick().await;

            // Drain detection is host logic: stop issuing cycles once no
            // whole group fits past the cursor.
            let cursor = transport.current_index();
            if cursor + group_size as i64 >= total {
                info!(cursor, total, "No whole group remains, store drained");
                break;
            }

            let cycle_start = Instant::now();
            batch.dispatch(group_size).context("Dispatch cycle failed")?;
            let duration_ms = cycle_start.elapsed().as_secs_f64() * 1000.0;

            let after = transport.current_index();
            let cycle_parts = (after - cursor) as u64;
            let served = cycle_parts as usize / group_size;
            let skipped = socket_count.saturating_sub(served) as u64;

            cycles += 1;
            parts_sent += cycle_parts;

            observability::record_cycle(cycles, served, cycle_parts);
            observability::record_cursor_position(after);
            observability::record_cycle_duration_ms(duration_ms);
            aggregator.update(cycle_parts, skipped, duration_ms);

            if max_cycles > 0 && cycles >= max_cycles {
                info!(cycles, "Reached max cycles limit");
                break;
            }
        }

        let stats = PipelineStats {
            cycles_run: cycles,
            parts_sent,
            records_total: total,
            final_cursor: transport.current_index(),
            group_size,
            socket_count,
            duration: start_time.elapsed(),
            dispatch_metrics: aggregator,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            pps = format!("{:.2}", stats.pps()),
            "Pipeline shutdown complete"
        );

        Ok(stats)
    }
}
