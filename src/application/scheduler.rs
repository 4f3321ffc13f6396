use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::agent::IterationOutcome;
use super::Agent;

/// Run `agent` immediately and then every `period` until `shutdown`
/// resolves. Returns the number of iterations that ran.
///
/// Iterations never overlap; a slow one delays the next tick instead of
/// queueing extra ones.
pub async fn run<F>(agent: &mut Agent, period: Duration, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut iterations = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(iterations, "Shutdown requested, stopping scheduler");
                break;
            }
            _ = ticker.tick() => {
                iterations += 1;
                match agent.run_iteration().await {
                    IterationOutcome::Sent { records } => debug!(iterations, records, "Iteration finished"),
                    IterationOutcome::NothingToTrack | IterationOutcome::Failed => {}
                }
            }
        }
    }

    iterations
}
