// src/search/panel.rs
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{DirectoryApi, SearchResponse};

/// Shown when an error carries no message of its own.
pub const FALLBACK_ERROR: &str = "An error occurred";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success(SearchResponse),
    Failure(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("A search is already in flight")]
    Busy,

    #[error("Search panel is closed")]
    Closed,
}

/// Runs the fixed "John Smith" search and owns its view state.
pub struct SearchPanel {
    api: Arc<dyn DirectoryApi>,
    state: watch::Sender<ViewState>,
    in_flight: AtomicBool,
    cancel: CancellationToken,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SearchPanel {
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            api,
            state,
            in_flight: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Clear the previous outcome, enter `Loading`, and settle on either
    /// `Success` or `Failure`.
    pub async fn search(&self) -> Result<ViewState, PanelError> {
        if self.cancel.is_cancelled() {
            return Err(PanelError::Closed);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Search requested while another is loading");
            return Err(PanelError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.state.send_replace(ViewState::Idle);
        self.state.send_replace(ViewState::Loading);

        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("Search cancelled, dropping its result");
                return Err(PanelError::Closed);
            }
            result = self.api.search_john_smith() => result,
        };

        let next = match result {
            Ok(response) => {
                info!(
                    "Search returned {} results in {:.2}ms",
                    response.results_count, response.execution_time_ms
                );
                ViewState::Success(response)
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                ViewState::Failure(failure_message(&e))
            }
        };

        self.state.send_replace(next.clone());
        Ok(next)
    }

    /// Cancel any in-flight search; its result is never applied.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SearchPanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// User-facing text for a failed search.
pub fn failure_message(err: &dyn Display) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, Endpoint, HealthStatus};
    use async_trait::async_trait;
    use std::time::Duration;

    struct SlowSearchApi {
        delay: Duration,
        response: SearchResponse,
    }

    #[async_trait]
    impl DirectoryApi for SlowSearchApi {
        async fn health(&self, _endpoint: Endpoint) -> Result<HealthStatus, ClientError> {
            Ok(HealthStatus::healthy("backend"))
        }

        async fn search_john_smith(&self) -> Result<SearchResponse, ClientError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.response)
        }
    }

    fn panel(delay_ms: u64) -> Arc<SearchPanel> {
        Arc::new(SearchPanel::new(Arc::new(SlowSearchApi {
            delay: Duration::from_millis(delay_ms),
            response: SearchResponse {
                results_count: 7,
                execution_time_ms: 12.5,
            },
        })))
    }

    #[derive(Debug)]
    struct Silent;

    impl Display for Silent {
        fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            Ok(())
        }
    }

    #[test]
    fn test_failure_message_fallback() {
        assert_eq!(failure_message(&Silent), FALLBACK_ERROR);
        assert_eq!(failure_message(&"connection reset"), "connection reset");
    }

    #[tokio::test]
    async fn test_idle_until_searched() {
        let panel = panel(0);
        assert_eq!(panel.state(), ViewState::Idle);

        let state = panel.search().await.unwrap();
        assert_eq!(
            state,
            ViewState::Success(SearchResponse {
                results_count: 7,
                execution_time_ms: 12.5
            })
        );
        assert_eq!(panel.state(), state);
    }

    #[tokio::test]
    async fn test_second_search_while_loading_is_busy() {
        let panel = panel(100);

        let first = {
            let panel = panel.clone();
            tokio::spawn(async move { panel.search().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(panel.state().is_loading());
        assert_eq!(panel.search().await, Err(PanelError::Busy));

        assert!(matches!(first.await.unwrap(), Ok(ViewState::Success(_))));
        // Free again once settled.
        assert!(panel.search().await.is_ok());
    }

    #[tokio::test]
    async fn test_new_search_clears_previous_result() {
        let panel = panel(100);
        assert!(matches!(panel.search().await.unwrap(), ViewState::Success(_)));

        let mut rx = panel.subscribe();
        let second = {
            let panel = panel.clone();
            tokio::spawn(async move { panel.search().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The old result is gone while the new search is in flight.
        assert_eq!(panel.state(), ViewState::Loading);
        assert_eq!(*rx.borrow_and_update(), ViewState::Loading);

        assert!(matches!(second.await.unwrap(), Ok(ViewState::Success(_))));
    }

    #[tokio::test]
    async fn test_close_drops_in_flight_result() {
        let panel = panel(200);

        let pending = {
            let panel = panel.clone();
            tokio::spawn(async move { panel.search().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        panel.close();

        assert_eq!(pending.await.unwrap(), Err(PanelError::Closed));
        assert_eq!(panel.state(), ViewState::Loading);
        assert_eq!(panel.search().await, Err(PanelError::Closed));
    }

    #[tokio::test]
    async fn test_subscribers_see_final_state() {
        let panel = panel(10);
        let mut rx = panel.subscribe();

        panel.search().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(matches!(*rx.borrow_and_update(), ViewState::Success(_)));
    }
}
