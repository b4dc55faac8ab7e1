//! Orchestrator: builds the configuration, dispatches clients, and prints the
//! aggregated report exactly once.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info};

use crate::args::LoadArgs;
use crate::config::{RunConfig, StopCondition};
use crate::error::{AppError, AppResult};
use crate::http::{HyperExecutor, TransportSettings};
use crate::metrics::{self, WorkerCounters};
use crate::report::RunReport;
use crate::shutdown_handlers::{
    setup_period_trigger, setup_signal_shutdown_handler, shutdown_channel,
};
use crate::worker::run_client;

/// Drive a full run: dispatch, wait, aggregate, report.
///
/// Two completion paths exist. Request-limit runs normally end with every
/// client joined, after which the totals are summed and printed. The shutdown
/// channel - fed by operator interrupts and by the period trigger - ends the
/// run early instead: the counters are summed as they stand, without waiting
/// for clients to quiesce, and the report on that path is an advisory
/// snapshot. A client fault aborts the run without a report.
///
/// # Errors
///
/// Returns configuration errors raised before dispatch and fatal client
/// faults.
pub async fn run(args: &LoadArgs) -> AppResult<()> {
    let start = Instant::now();
    let config = Arc::new(RunConfig::from_args(args)?);
    let settings = TransportSettings::from_args(args);

    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    drop(setup_signal_shutdown_handler(&shutdown_tx));
    if let StopCondition::Period(period) = config.stop() {
        drop(setup_period_trigger(&shutdown_tx, period));
    }

    info!("Dispatching {} clients", args.clients);

    let mut clients = JoinSet::new();
    let mut counters = Vec::with_capacity(args.clients);
    for _ in 0..args.clients {
        let client_counters = Arc::new(WorkerCounters::new());
        counters.push(Arc::clone(&client_counters));
        let executor = HyperExecutor::new(
            Arc::clone(&config),
            settings,
            Arc::clone(&client_counters),
        );
        clients.spawn(run_client(Arc::clone(&config), client_counters, executor));
    }

    info!("Waiting for results...");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                RunReport::new(metrics::aggregate(&counters), start.elapsed()).print();
                return Ok(());
            }
            joined = clients.join_next() => match joined {
                None => break,
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(fault))) => {
                    error!("Client failed: {}", fault);
                    return Err(fault);
                }
                Some(Err(join_error)) => {
                    error!("Client task aborted: {}", join_error);
                    return Err(AppError::from(join_error));
                }
            }
        }
    }

    RunReport::new(metrics::aggregate(&counters), start.elapsed()).print();
    Ok(())
}
