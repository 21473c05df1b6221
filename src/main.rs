use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use settlement_engine::{
    cli::cli_options_from_args,
    config::Config,
    ledger::{HexAddressResolver, InMemoryLedger, LedgerSnapshot, TracingEventSink, in_memory_ports},
    logging::init_tracing,
    manager::{BlockEndReport, Manager},
    types::BlockHeight,
};

#[derive(Serialize)]
struct RunSummary {
    run_id: String,
    from_height: BlockHeight,
    to_height: BlockHeight,
    settled_contracts: usize,
    failures: usize,
    blocks: Vec<BlockEndReport>,
}

fn main() -> Result<()> {
    let options = cli_options_from_args()?;
    let mut config = Config::load(&options.config_path)
        .with_context(|| format!("failed to load config from {}", options.config_path.display()))?;
    if let Some(from_height) = options.from_height {
        config.run.from_height = from_height;
    }
    if let Some(to_height) = options.to_height {
        config.run.to_height = Some(to_height);
    }
    let from_height = config.run.from_height;
    let to_height = config.run.last_height();
    if to_height < from_height {
        return Err(anyhow!(
            "to height {to_height} is below from height {from_height}"
        ));
    }

    let logging_guard = init_tracing(&config.logging)?;

    let snapshot = LedgerSnapshot::load(&config.ledger.snapshot_path)?;
    let ledger = Arc::new(InMemoryLedger::from_snapshot(snapshot));
    let ports = in_memory_ports(
        Arc::clone(&ledger),
        HexAddressResolver::new(config.ledger.address_prefix.clone()),
        Arc::new(TracingEventSink),
    );
    let manager = Manager::new(ports, &config.params);
    tracing::info!(
        target: "main",
        params_version = manager.params().version,
        denom = %manager.params().denom,
        from_height,
        to_height,
        "settlement_run_started"
    );

    let blocks: Vec<BlockEndReport> = (from_height..=to_height)
        .map(|height| manager.end_block(height))
        .collect();

    let output_path = config
        .ledger
        .output_path
        .clone()
        .unwrap_or_else(|| config.ledger.snapshot_path.clone());
    ledger.snapshot().save(&output_path)?;

    let summary = RunSummary {
        run_id: logging_guard.run_id().to_string(),
        from_height,
        to_height,
        settled_contracts: blocks.iter().map(|block| block.settled.len()).sum(),
        failures: blocks.iter().map(BlockEndReport::failure_count).sum(),
        blocks,
    };
    tracing::info!(
        target: "main",
        from_height,
        to_height,
        settled_contracts = summary.settled_contracts,
        failures = summary.failures,
        output = %output_path.display(),
        "run_completed"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode run summary")?
    );

    Ok(())
}
