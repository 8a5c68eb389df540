//! Refresh orchestration for the dashboard.
//!
//! This module contains the `RefreshController`, which owns the dashboard
//! state and decides when the feed is fetched. Fetches run in a spawned
//! Tokio task; the UI loop picks up finished fetches with
//! `check_background_tasks`, so state is only ever mutated from the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::api::{DataOrigin, FeedClient, FeedData, FeedSource, FetchError};
use crate::cache::KeyValueStore;
use crate::views::sort_newest_first;

use super::state::{DashboardState, FETCH_ERROR_MESSAGE};

// ============================================================================
// Constants
// ============================================================================

/// Automatic refresh cadence. Fixed; not configurable at runtime.
pub const REFRESH_INTERVAL_MS: u64 = 60_000;

/// Buffer size for the timer tick channel.
/// Ticks that arrive while one is pending are redundant anyway.
const TICK_BUFFER_SIZE: usize = 1;

/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// First load at startup; may be served from a fresh cache.
    Startup,
    /// Recurring auto-refresh tick.
    Timer,
    /// User-requested refresh.
    Manual,
}

impl RefreshTrigger {
    /// Timer and manual refreshes always check the network.
    pub fn force_refresh(&self) -> bool {
        !matches!(self, RefreshTrigger::Startup)
    }
}

type FetchResult = Result<FeedData, FetchError>;

/// The one outstanding fetch, if any.
struct InFlight {
    trigger: RefreshTrigger,
    handle: JoinHandle<FetchResult>,
}

/// Periodic tick source. The task is aborted when this is dropped.
pub struct AutoRefresh {
    handle: JoinHandle<()>,
}

impl AutoRefresh {
    fn spawn(period: Duration, tx: mpsc::Sender<()>) -> Self {
        let handle = tokio::spawn(async move {
            // First tick one full period from now; the startup fetch covers t=0
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.try_send(()).is_err() && tx.is_closed() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Owns `DashboardState` and runs at most one fetch at a time.
pub struct RefreshController<S, K> {
    feed: Arc<FeedClient<S, K>>,
    state: DashboardState,
    in_flight: Option<InFlight>,
    timer: Option<AutoRefresh>,
    tick_rx: Option<mpsc::Receiver<()>>,
}

impl<S, K> RefreshController<S, K>
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    pub fn new(feed: Arc<FeedClient<S, K>>) -> Self {
        Self {
            feed,
            state: DashboardState::default(),
            in_flight: None,
            timer: None,
            tick_rx: None,
        }
    }

    pub fn feed(&self) -> &FeedClient<S, K> {
        &self.feed
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_auto_refresh_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Kick off the startup fetch and arm the auto-refresh timer.
    pub fn start(&mut self) {
        self.request_refresh(RefreshTrigger::Startup);
        self.start_auto_refresh(Duration::from_millis(REFRESH_INTERVAL_MS));
    }

    fn start_auto_refresh(&mut self, period: Duration) {
        let (tx, rx) = mpsc::channel(TICK_BUFFER_SIZE);
        self.timer = Some(AutoRefresh::spawn(period, tx));
        self.tick_rx = Some(rx);
        debug!(period_ms = period.as_millis() as u64, "Auto-refresh armed");
    }

    /// Stop the auto-refresh timer. An outstanding fetch still completes.
    pub fn shutdown(&mut self) {
        if self.timer.take().is_some() {
            debug!("Auto-refresh stopped");
        }
        self.tick_rx = None;
    }

    /// User-requested refresh. Returns false if a fetch is already running.
    pub fn refresh_now(&mut self) -> bool {
        self.request_refresh(RefreshTrigger::Manual)
    }

    /// Start a fetch unless one is already outstanding. A request made while
    /// a fetch runs is dropped, not queued, and changes nothing.
    pub fn request_refresh(&mut self, trigger: RefreshTrigger) -> bool {
        if let Some(current) = &self.in_flight {
            debug!(?trigger, running = ?current.trigger, "Refresh already in flight, dropping request");
            return false;
        }

        if self.state.events.is_empty() {
            self.state.loading = true;
            self.state.error = None;
        }

        let force = trigger.force_refresh();
        info!(?trigger, force, "Starting refresh");

        let feed = Arc::clone(&self.feed);
        let handle = tokio::spawn(async move { feed.fetch(force).await });
        self.in_flight = Some(InFlight { trigger, handle });
        true
    }

    /// Apply a finished fetch and act on pending timer ticks.
    /// Returns true if the event list was replaced.
    pub fn check_background_tasks(&mut self) -> bool {
        let mut replaced = false;

        if let Some(mut flight) = self.in_flight.take() {
            match (&mut flight.handle).now_or_never() {
                Some(joined) => replaced = self.finish(flight.trigger, joined),
                None => self.in_flight = Some(flight),
            }
        }

        let mut ticked = false;
        if let Some(rx) = self.tick_rx.as_mut() {
            while rx.try_recv().is_ok() {
                ticked = true;
            }
        }
        if ticked {
            self.request_refresh(RefreshTrigger::Timer);
        }

        replaced
    }

    /// Wait for the outstanding fetch, if any, and apply it.
    /// Returns true if the event list was replaced.
    pub async fn wait_for_refresh(&mut self) -> bool {
        match self.in_flight.take() {
            Some(flight) => {
                let joined = flight.handle.await;
                self.finish(flight.trigger, joined)
            }
            None => false,
        }
    }

    /// Runs for every fetch exactly once, whatever the outcome.
    fn finish(&mut self, trigger: RefreshTrigger, joined: Result<FetchResult, JoinError>) -> bool {
        self.state.loading = false;

        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                error!(?trigger, error = %e, "Refresh task failed");
                self.state.error = Some(FETCH_ERROR_MESSAGE.to_string());
                return false;
            }
        };

        match result {
            Ok(data) => {
                self.apply(trigger, data);
                true
            }
            Err(e) => {
                error!(?trigger, error = %e, "Refresh failed with no cached data");
                self.state.error = Some(FETCH_ERROR_MESSAGE.to_string());
                false
            }
        }
    }

    fn apply(&mut self, trigger: RefreshTrigger, data: FeedData) {
        let FeedData {
            mut events,
            sources,
            origin,
            fetched_at,
        } = data;
        sort_newest_first(&mut events);

        match origin {
            DataOrigin::Network | DataOrigin::Cache => {
                self.state.last_updated = Some(Utc::now());
                self.state.error = None;
            }
            DataOrigin::StaleCache => {
                warn!(?trigger, "Showing last known data after failed refresh");
                self.state.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }

        info!(?trigger, ?origin, events = events.len(), "Refresh complete");
        self.state.events = events;
        self.state.sources = sources;
        self.state.data_fetched_at = fetched_at;
    }
}

// ============================================================================
// Tests
// ============================================================================
