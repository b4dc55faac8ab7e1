//! Shutdown channel aliases.
//!
//! One broadcast channel carries every termination cause: operator
//! interrupts, SIGTERM, and the period-expiry trigger all fan out to the
//! orchestrator's aggregation path through these types.
use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;
