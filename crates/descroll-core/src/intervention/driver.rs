//! Background countdown ticking.
//!
//! The state machine itself has no clock; this driver owns a tokio task that
//! ticks a shared occurrence once per second and publishes transitions on a
//! channel. Cancellation is deterministic: once `cancel()` is observed, no
//! further tick reaches the occurrence.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{InterventionEvent, InterventionOccurrence};

/// Drives one occurrence's countdown at 1 Hz until it finishes or is
/// cancelled.
pub struct CountdownDriver {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl CountdownDriver {
    /// Spawn the ticking task.
    ///
    /// Events are published on `events`; the task exits on its own once the
    /// occurrence no longer has an active countdown, when the receiver is
    /// dropped, or when the driver is cancelled.
    pub fn spawn(
        occurrence: Arc<Mutex<InterventionOccurrence>>,
        events: mpsc::UnboundedSender<InterventionEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; skip it so the
            // occurrence sees full one-second steps.
            ticker.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log::debug!("countdown driver cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        let mut occ = occurrence.lock().await;
                        let event = occ.tick();
                        let active = occ.countdown_active();
                        drop(occ);
                        if let Some(event) = event {
                            if events.send(event).is_err() {
                                break;
                            }
                        }
                        if !active {
                            break;
                        }
                    }
                }
            }
        });
        Self { cancel, handle }
    }

    /// Request cancellation. Any tick not yet delivered is dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the ticking task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel and wait for the task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::{InterventionConfig, InterventionMode, Phase};
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn accountability_occurrence(dismissals_today: u32) -> Arc<Mutex<InterventionOccurrence>> {
        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        Arc::new(Mutex::new(InterventionOccurrence::new(
            InterventionMode::Accountability,
            "Still scrolling?".to_string(),
            dismissals_today,
            &InterventionConfig::default(),
            &mut rng,
        )))
    }

    /// Step the paused clock one second at a time so every interval tick is
    /// delivered before the next advance.
    async fn step_seconds(driver: &CountdownDriver, max_secs: u32) {
        for _ in 0..max_secs {
            if driver.is_finished() {
                return;
            }
            tokio::time::advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_reaches_eligibility() {
        let occ = accountability_occurrence(0);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = CountdownDriver::spawn(Arc::clone(&occ), tx);

        // The paused clock auto-advances while the test waits on the channel.
        let mut saw_granted = false;
        while let Some(event) = rx.recv().await {
            if event == InterventionEvent::EligibilityGranted {
                saw_granted = true;
                break;
            }
        }
        assert!(saw_granted);
        assert_eq!(occ.lock().await.phase(), Phase::Eligible);
        driver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_ticking() {
        let occ = accountability_occurrence(0);
        let (tx, _rx) = mpsc::unbounded_channel();
        let driver = CountdownDriver::spawn(Arc::clone(&occ), tx);

        step_seconds(&driver, 3).await;
        driver.cancel();
        // Let the task observe the cancellation.
        tokio::task::yield_now().await;

        let remaining_at_cancel = occ.lock().await.wait_remaining_secs();
        assert!(remaining_at_cancel > 0);
        step_seconds(&driver, 20).await;

        // No further ticks after cancellation.
        assert_eq!(occ.lock().await.wait_remaining_secs(), remaining_at_cancel);
        assert_eq!(occ.lock().await.phase(), Phase::WaitingForEligibility);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_exits_when_budget_blocks_eligibility() {
        let occ = accountability_occurrence(3);
        let (tx, _rx) = mpsc::unbounded_channel();
        let driver = CountdownDriver::spawn(Arc::clone(&occ), tx);

        step_seconds(&driver, 30).await;
        assert!(driver.is_finished());

        // Countdown finished but the spent budget kept it non-dismissible.
        let occ = occ.lock().await;
        assert_eq!(occ.phase(), Phase::WaitingForEligibility);
        assert!(!occ.can_dismiss());
    }
}
