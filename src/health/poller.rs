// src/health/poller.rs
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::status::{CheckState, MonitoredService, ServiceSnapshot, StatusVariant};
use crate::client::DirectoryApi;
use crate::metrics::MetricsCollector;

/// Shortest interval `run` will poll at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

struct ServiceEntry {
    generation: u64,
    state: CheckState,
    checked_at: Option<chrono::DateTime<Utc>>,
    last_healthy: Option<bool>,
}

/// Checks every monitored service concurrently and keeps one independent
/// status per service.
pub struct StatusPoller {
    api: Arc<dyn DirectoryApi>,
    services: Vec<MonitoredService>,
    states: Arc<DashMap<&'static str, ServiceEntry>>,
    generation: AtomicU64,
    metrics: Option<Arc<MetricsCollector>>,
    cancel: CancellationToken,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn DirectoryApi>,
        variant: StatusVariant,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self::with_services(api, variant.services(), metrics)
    }

    pub fn with_services(
        api: Arc<dyn DirectoryApi>,
        services: Vec<MonitoredService>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        let states = DashMap::new();
        for service in &services {
            states.insert(
                service.name,
                ServiceEntry {
                    generation: 0,
                    state: CheckState::Checking,
                    checked_at: None,
                    last_healthy: None,
                },
            );
        }

        Self {
            api,
            services,
            states: Arc::new(states),
            generation: AtomicU64::new(0),
            metrics,
            cancel: CancellationToken::new(),
        }
    }

    /// Reset every service to `Checking`, then check them all in parallel.
    ///
    /// Results from an older, overlapping refresh are dropped.
    pub async fn refresh(&self) -> Vec<ServiceSnapshot> {
        if self.cancel.is_cancelled() {
            debug!("Poller closed, skipping refresh");
            return self.snapshot();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        for mut entry in self.states.iter_mut() {
            entry.generation = generation;
            entry.state = CheckState::Checking;
        }

        let mut tasks = Vec::with_capacity(self.services.len());
        for service in self.services.iter().copied() {
            let api = self.api.clone();
            let states = self.states.clone();
            let metrics = self.metrics.clone();
            let cancel = self.cancel.clone();

            tasks.push(tokio::spawn(async move {
                check_service(api, states, metrics, cancel, service, generation).await
            }));
        }

        let mut applied = 0;
        for result in futures::future::join_all(tasks).await {
            match result {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(e) => error!("Status check task failed: {}", e),
            }
        }

        debug!(
            "Refresh {} complete: {}/{} results applied",
            generation,
            applied,
            self.services.len()
        );
        self.snapshot()
    }

    /// Poll on a fixed interval until [`close`](Self::close) is called,
    /// handing each finished round to `on_round`. Intervals below
    /// [`MIN_POLL_INTERVAL`] are raised to it.
    pub async fn run<F>(&self, every: Duration, mut on_round: F)
    where
        F: FnMut(&[ServiceSnapshot]),
    {
        if every < MIN_POLL_INTERVAL {
            warn!("Poll interval {:?} too short, using {:?}", every, MIN_POLL_INTERVAL);
        }
        let every = every.max(MIN_POLL_INTERVAL);
        let mut ticker = interval(every);
        info!("Starting status poller with interval: {:?}", every);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = self.refresh().await;
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    on_round(&snapshot);
                }
                _ = self.cancel.cancelled() => break,
            }
        }

        info!("Status poller shutting down");
    }

    /// Cancel in-flight checks; their results are never applied.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn snapshot(&self) -> Vec<ServiceSnapshot> {
        self.services
            .iter()
            .map(|service| {
                let (state, checked_at) = self
                    .states
                    .get(service.name)
                    .map(|entry| (entry.state.clone(), entry.checked_at))
                    .unwrap_or((CheckState::Checking, None));
                ServiceSnapshot {
                    name: service.name,
                    endpoint: service.endpoint,
                    state,
                    checked_at,
                }
            })
            .collect()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn check_service(
    api: Arc<dyn DirectoryApi>,
    states: Arc<DashMap<&'static str, ServiceEntry>>,
    metrics: Option<Arc<MetricsCollector>>,
    cancel: CancellationToken,
    service: MonitoredService,
    generation: u64,
) -> bool {
    let result = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("Check of {} cancelled", service.name);
            return false;
        }
        result = api.health(service.endpoint) => result,
    };

    let state = match result {
        Ok(status) => CheckState::Reported(status),
        Err(e) => {
            warn!("Service {} check failed: {}", service.name, e);
            CheckState::Failed(e.to_string())
        }
    };
    let healthy = state.is_healthy();

    let Some(mut entry) = states.get_mut(service.name) else {
        return false;
    };
    if entry.generation != generation {
        debug!(
            "Dropping stale result for {} (generation {} < {})",
            service.name, generation, entry.generation
        );
        return false;
    }

    match (entry.last_healthy, healthy) {
        (Some(false) | None, true) => info!("Service {} is healthy", service.name),
        (Some(true) | None, false) => warn!("Service {} is not healthy", service.name),
        _ => {}
    }

    entry.state = state;
    entry.checked_at = Some(Utc::now());
    entry.last_healthy = Some(healthy);
    drop(entry);

    if let Some(metrics) = &metrics {
        metrics.update_service_health(service.name, healthy);
    }
    true
}
