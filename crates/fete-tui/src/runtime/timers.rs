//! Timer handlers.
//!
//! These are the only places that wait. A one-shot step sleeps and returns
//! its event; the photo timer loops until its token is cancelled.

use std::time::Duration;

use fete_core::sequencer::Deferred;
use fete_core::slideshow::TimerGeneration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::inbox::UiEventSender;
use crate::events::UiEvent;

/// Sleeps for `delay`, then yields the deferred step.
pub async fn deferred_step(delay: Duration, deferred: Deferred) -> UiEvent {
    tokio::time::sleep(delay).await;
    UiEvent::Deferred(deferred)
}

/// Posts a `SlideshowTick` every `period` until `cancel` fires or the inbox
/// closes. The first tick comes one full period after the start.
pub async fn slideshow_ticks(
    tx: UiEventSender,
    generation: TimerGeneration,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(generation, "Photo timer cancelled");
                break;
            }
            _ = interval.tick() => {
                if tx.send(UiEvent::SlideshowTick { generation }).is_err() {
                    break;
                }
            }
        }
    }
}
