//! Client worker loop: one independent task per unit of concurrency.

use std::sync::Arc;

use tracing::debug;

use crate::config::RunConfig;
use crate::error::AppResult;
use crate::http::{AttemptOutcome, RequestExecutor};
use crate::metrics::WorkerCounters;

/// Status classified as a successful hit.
const STATUS_OK: u16 = 200;

/// Drive requests until the per-client budget is exhausted.
///
/// Each pass walks the URL sequence in order; the budget is re-checked only
/// at the top of a pass, so a client may overshoot the limit by up to one
/// URL-sequence length minus one. The attempt counter is bumped before the
/// outcome is classified, and every attempt lands in exactly one bucket.
/// Classified failures are final - the loop moves to the next URL without
/// retrying.
///
/// # Errors
///
/// Propagates executor defects (not per-request transport failures), which
/// the orchestrator treats as fatal to the whole run.
pub async fn run_client<E>(
    config: Arc<RunConfig>,
    counters: Arc<WorkerCounters>,
    mut executor: E,
) -> AppResult<()>
where
    E: RequestExecutor + Send,
{
    let limit = config.request_limit();
    while counters.requests() < limit {
        for target in config.urls() {
            let outcome = executor.execute(target).await?;
            counters.record_attempt();
            match outcome {
                AttemptOutcome::Status(STATUS_OK) => counters.record_success(),
                AttemptOutcome::Status(status) => {
                    debug!("{} answered {}", target.authority(), status);
                    counters.record_bad_status();
                }
                AttemptOutcome::Failed(err) => {
                    debug!("Request to {} failed: {}", target.authority(), err);
                    counters.record_network_failure();
                }
            }
        }
    }
    Ok(())
}
