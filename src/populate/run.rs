//! Populate command runner.

use anyhow::Context;
use checkpoint::{CheckpointStore, FilesystemStore, NullStore};
use perf_monitor::PerformanceMonitor;
use seed_core::RunPlan;
use seed_populate::{CommonPopulateArgs, EntityStore, MemoryStore, Orchestrator, RunReport};
use seed_populate_postgresql::PostgreSQLStore;
use std::sync::Arc;

use super::mask_connection_password;
use crate::PopulateTarget;

/// Run the populate command against the selected store.
pub async fn run_populate(target: PopulateTarget) -> anyhow::Result<Option<RunReport>> {
    match target {
        PopulateTarget::Memory { args } => {
            if args.dry_run {
                dry_run(&args)?;
                return Ok(None);
            }
            let store = Arc::new(MemoryStore::new());
            let report = execute(&args, store.clone()).await?;
            store.statistics().await?.log();
            Ok(Some(report))
        }
        PopulateTarget::PostgreSQL { args } => {
            let masked = mask_connection_password(&args.connection.postgresql_connection_string);
            if args.common.dry_run {
                dry_run(&args.common)?;
                tracing::info!("[DRY-RUN] Connection: {}", masked);
                return Ok(None);
            }

            tracing::info!("Connecting to PostgreSQL at {}", masked);
            let store = PostgreSQLStore::connect(&args.connection.postgresql_connection_string)
                .await
                .context("Failed to connect to PostgreSQL")?;

            if args.recreate {
                store
                    .recreate_schema()
                    .await
                    .context("Failed to recreate tables")?;
            } else if !args.skip_schema {
                store
                    .create_schema()
                    .await
                    .context("Failed to create tables")?;
            }
            if !args.common.resume && !args.recreate {
                store
                    .truncate_all()
                    .await
                    .context("Failed to truncate tables")?;
            }

            let store = Arc::new(store);
            let report = execute(&args.common, store.clone()).await?;
            store
                .statistics()
                .await
                .context("Failed to read table statistics")?
                .log();
            Ok(Some(report))
        }
    }
}

/// Validate the configuration and run every phase against `store`.
///
/// The performance summary is logged whether or not the run succeeds.
pub async fn execute(
    args: &CommonPopulateArgs,
    store: Arc<dyn EntityStore>,
) -> anyhow::Result<RunReport> {
    let config = args
        .load_config()
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    let monitor = Arc::new(PerformanceMonitor::new());

    let checkpoints: Arc<dyn CheckpointStore> = match &args.checkpoint_dir {
        Some(dir) => Arc::new(FilesystemStore::new(dir)),
        None => Arc::new(NullStore),
    };

    let orchestrator = Orchestrator::from_config(&config, store, Arc::clone(&monitor))
        .context("Invalid run configuration")?
        .with_checkpoints(checkpoints)
        .with_resume(args.resume);

    let report = match orchestrator.run().await {
        Ok(report) => report,
        Err(e) => {
            monitor.log_summary();
            return Err(e).context("Populate run failed");
        }
    };

    report.log();
    monitor.log_summary();

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {path:?}"))?;
        tracing::info!("Run report written to {:?}", path);
    }

    Ok(report)
}

fn dry_run(args: &CommonPopulateArgs) -> anyhow::Result<RunPlan> {
    let config = args
        .load_config()
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    let plan = config.validate().context("Invalid run configuration")?;

    tracing::info!("[DRY-RUN] Seed: {}", plan.seed);
    for phase in plan.phases() {
        let blob = phase
            .blob
            .map(|b| format!(", {} rows with {} byte blobs", b.rows_with_blob, b.size_bytes))
            .unwrap_or_default();
        tracing::info!(
            "[DRY-RUN] {}: {} rows in {} batches of up to {}{}",
            phase.kind.display_name(),
            phase.volume,
            phase.batch_count(),
            phase.batch_size,
            blob
        );
    }
    tracing::info!("[DRY-RUN] Configuration validated successfully");
    Ok(plan)
}
