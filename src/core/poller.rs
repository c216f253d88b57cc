/// Background polling of the SPR admin API
///
/// One repeating 5-second timer owns all re-fetching: every tick it
/// fires the four status requests and streams whatever comes back to
/// the UI thread over an unbounded channel. Requests are independent
/// and idempotent, so overlapping ticks and out-of-order completions
/// just overwrite state that was always safe to overwrite.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::alert::AlertSink;
use crate::core::client::StatusApi;
use crate::core::status::{ContainerSummary, UptimeInfo};
use crate::utils::POLL_INTERVAL_MS;

/// One successful fetch result. Each variant replaces its panel wholesale.
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    Uptime(UptimeInfo),
    Containers(Vec<ContainerSummary>),
    Hostname(String),
    Version(String),
}

/// Owns the repeating fetch timer. `stop` (or dropping the handle)
/// cancels the timer exactly once; fetches already in flight are not
/// cancelled and complete against a closed channel.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start polling: an immediate first fetch of all four resources, then
/// every 5 seconds unconditionally. Failures go to the alert sink and
/// never stop the timer.
pub fn spawn_poller(
    api: Arc<dyn StatusApi>,
    alerts: Arc<dyn AlertSink>,
) -> (PollerHandle, UnboundedReceiver<StatusUpdate>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick completes immediately
            ticker.tick().await;
            fetch_tick(&api, &alerts, &tx);
        }
    });

    (PollerHandle { task }, rx)
}

/// Fire the four fetches for one tick. Each runs on its own task so a
/// slow endpoint never delays the others; the tick loop does not await
/// them and there is no de-duplication of still-running requests.
fn fetch_tick(
    api: &Arc<dyn StatusApi>,
    alerts: &Arc<dyn AlertSink>,
    tx: &UnboundedSender<StatusUpdate>,
) {
    {
        let (api, alerts, tx) = (api.clone(), alerts.clone(), tx.clone());
        tokio::spawn(async move {
            match api.uptime().await {
                Ok(uptime) => {
                    let _ = tx.send(StatusUpdate::Uptime(uptime));
                }
                Err(err) => alerts.error(err.into()),
            }
        });
    }

    {
        let (api, alerts, tx) = (api.clone(), alerts.clone(), tx.clone());
        tokio::spawn(async move {
            match api.containers().await {
                Ok(containers) => {
                    let _ = tx.send(StatusUpdate::Containers(containers));
                }
                Err(err) => alerts.error(err.into()),
            }
        });
    }

    {
        let (api, alerts, tx) = (api.clone(), alerts.clone(), tx.clone());
        tokio::spawn(async move {
            match api.hostname().await {
                Ok(hostname) => {
                    let _ = tx.send(StatusUpdate::Hostname(hostname));
                }
                Err(err) => alerts.error(err.into()),
            }
        });
    }

    {
        let (api, alerts, tx) = (api.clone(), alerts.clone(), tx.clone());
        tokio::spawn(async move {
            match api.version().await {
                Ok(version) => {
                    let _ = tx.send(StatusUpdate::Version(version));
                }
                Err(err) => alerts.error(err.into()),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::ClientError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counting stand-in for the admin API; optionally fails /info/docker
    #[derive(Default)]
    struct FakeApi {
        uptime_calls: AtomicUsize,
        container_calls: AtomicUsize,
        hostname_calls: AtomicUsize,
        version_calls: AtomicUsize,
        fail_containers: bool,
    }

    impl FakeApi {
        fn failing_containers() -> Self {
            Self {
                fail_containers: true,
                ..Self::default()
            }
        }

        fn total_calls(&self) -> usize {
            self.uptime_calls.load(Ordering::SeqCst)
                + self.container_calls.load(Ordering::SeqCst)
                + self.hostname_calls.load(Ordering::SeqCst)
                + self.version_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusApi for FakeApi {
        async fn uptime(&self) -> Result<UptimeInfo, ClientError> {
            self.uptime_calls.fetch_add(1, Ordering::SeqCst);
            Ok(UptimeInfo {
                time: "10:00".to_string(),
                uptime: "2 days".to_string(),
                users: "1".to_string(),
                load_1m: "0.1".to_string(),
                load_5m: "0.2".to_string(),
                load_15m: "0.3".to_string(),
            })
        }

        async fn containers(&self) -> Result<Vec<ContainerSummary>, ClientError> {
            self.container_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_containers {
                Err(ClientError::Status {
                    url: "http://localhost:8000/info/docker".to_string(),
                    status: reqwest::StatusCode::BAD_GATEWAY,
                })
            } else {
                Ok(vec![])
            }
        }

        async fn hostname(&self) -> Result<String, ClientError> {
            self.hostname_calls.fetch_add(1, Ordering::SeqCst);
            Ok("router1".to_string())
        }

        async fn version(&self) -> Result<String, ClientError> {
            self.version_calls.fetch_add(1, Ordering::SeqCst);
            Ok("1.2.3".to_string())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        alerts: AtomicUsize,
    }

    impl AlertSink for CountingSink {
        fn error(&self, _err: anyhow::Error) {
            self.alerts.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Let the poller and its spawned fetch tasks run to completion
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    fn drain(rx: &mut UnboundedReceiver<StatusUpdate>) -> Vec<StatusUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_tick_fetches_all_four_without_alerts() {
        let api = Arc::new(FakeApi::default());
        let sink = Arc::new(CountingSink::default());

        let (_handle, mut rx) = spawn_poller(api.clone(), sink.clone());
        settle().await;

        assert_eq!(api.uptime_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.container_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.hostname_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.version_calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.alerts.load(Ordering::SeqCst), 0);

        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 4);
        assert!(updates.iter().any(|u| matches!(u, StatusUpdate::Hostname(h) if h == "router1")));
        assert!(updates.iter().any(|u| matches!(u, StatusUpdate::Version(v) if v == "1.2.3")));
        assert!(updates.iter().any(|u| matches!(u, StatusUpdate::Uptime(i) if i.uptime == "2 days")));
        assert!(updates.iter().any(|u| matches!(u, StatusUpdate::Containers(c) if c.is_empty())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetches_every_interval() {
        let api = Arc::new(FakeApi::default());
        let sink = Arc::new(CountingSink::default());

        let (_handle, mut rx) = spawn_poller(api.clone(), sink.clone());
        settle().await;
        assert_eq!(api.total_calls(), 4);

        tokio::time::advance(Duration::from_millis(POLL_INTERVAL_MS)).await;
        settle().await;
        assert_eq!(api.total_calls(), 8);

        tokio::time::advance(Duration::from_millis(POLL_INTERVAL_MS)).await;
        settle().await;
        assert_eq!(api.total_calls(), 12);

        assert_eq!(drain(&mut rx).len(), 12);
        assert_eq!(sink.alerts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_endpoint_alerts_once_per_tick_others_update() {
        let api = Arc::new(FakeApi::failing_containers());
        let sink = Arc::new(CountingSink::default());

        let (_handle, mut rx) = spawn_poller(api.clone(), sink.clone());
        settle().await;

        // One alert for the failing docker endpoint, three updates delivered
        assert_eq!(sink.alerts.load(Ordering::SeqCst), 1);
        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 3);
        assert!(!updates.iter().any(|u| matches!(u, StatusUpdate::Containers(_))));

        tokio::time::advance(Duration::from_millis(POLL_INTERVAL_MS)).await;
        settle().await;
        assert_eq!(sink.alerts.load(Ordering::SeqCst), 2);
        assert_eq!(drain(&mut rx).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        let api = Arc::new(FakeApi::default());
        let sink = Arc::new(CountingSink::default());

        let (handle, _rx) = spawn_poller(api.clone(), sink.clone());
        settle().await;
        assert_eq!(api.total_calls(), 4);

        handle.stop();
        settle().await;

        // Advancing past multiple intervals triggers zero additional requests
        tokio::time::advance(Duration::from_millis(POLL_INTERVAL_MS * 5)).await;
        settle().await;
        assert_eq!(api.total_calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let api = Arc::new(FakeApi::default());
        let sink = Arc::new(CountingSink::default());

        let (handle, _rx) = spawn_poller(api.clone(), sink.clone());
        settle().await;
        assert_eq!(api.total_calls(), 4);

        drop(handle);
        settle().await;

        tokio::time::advance(Duration::from_millis(POLL_INTERVAL_MS * 3)).await;
        settle().await;
        assert_eq!(api.total_calls(), 4);
    }
}
