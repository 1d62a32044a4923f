use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owns the recurring timer for continuous mode. Ticks are delivered through
/// the given channel with `try_send`; a tick the receiver cannot take right
/// now is dropped at the source, never queued. `stop` cancels synchronously:
/// once it returns, no further tick is delivered.
pub struct CycleScheduler {
    period: Duration,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl CycleScheduler {
    pub fn start(period: Duration, tick_tx: mpsc::Sender<()>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if tick_tx.try_send(()).is_err() {
                            debug!("tick dropped; receiver busy");
                        }
                    }
                }
            }
        });
        Self {
            period,
            cancel,
            task,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stop(&self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

impl Drop for CycleScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_at_the_configured_period() {
        let (tick_tx, mut tick_rx) = mpsc::channel(1);
        let scheduler = CycleScheduler::start(Duration::from_millis(2_000), tick_tx);

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert!(tick_rx.try_recv().is_ok());
        assert!(tick_rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert!(tick_rx.try_recv().is_ok());

        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_is_delivered_after_stop_returns() {
        let (tick_tx, mut tick_rx) = mpsc::channel(1);
        let scheduler = CycleScheduler::start(Duration::from_millis(100), tick_tx);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(tick_rx.try_recv().is_ok());

        scheduler.stop();
        while tick_rx.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(tick_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn busy_receiver_loses_ticks_instead_of_queueing_them() {
        let (tick_tx, mut tick_rx) = mpsc::channel(1);
        let scheduler = CycleScheduler::start(Duration::from_millis(100), tick_tx);

        // nobody drains for a long stretch; at most one tick may be buffered
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(tick_rx.try_recv().is_ok());
        assert!(tick_rx.try_recv().is_err());

        scheduler.stop();
    }
}
