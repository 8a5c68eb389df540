//! Application state management for QuakeWatch.
//!
//! This module contains the `App` struct that ties the refresh controller,
//! the map view and the UI-only state (selection, ordering, overlays)
//! together for the render loop.

use std::sync::Arc;

use quakewatch_core::markers::QuakeMap;
use quakewatch_core::views::{self, SortOption};
use quakewatch_core::{
    DashboardState, Earthquake, FeedClient, FeedSource, FileStore, KeyValueStore,
    RefreshController, UsgsSource,
};
use tracing::debug;

use crate::ui::map::CanvasMap;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

/// Main application state container
pub struct App<S = UsgsSource, K = FileStore> {
    pub controller: RefreshController<S, K>,
    pub map: QuakeMap<CanvasMap>,

    pub state: AppState,
    pub sort: SortOption,
    pub selection: usize,
}

impl<S, K> App<S, K>
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    pub fn new(feed: Arc<FeedClient<S, K>>) -> Self {
        Self {
            controller: RefreshController::new(feed),
            map: QuakeMap::new(CanvasMap::new()),
            state: AppState::Normal,
            sort: SortOption::default(),
            selection: 0,
        }
    }

    /// Startup fetch plus auto-refresh timer.
    pub fn start(&mut self) {
        self.controller.start();
    }

    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    pub fn dashboard(&self) -> &DashboardState {
        self.controller.state()
    }

    /// Manual refresh. Ignored while a fetch is already running.
    pub fn refresh(&mut self) {
        if !self.controller.refresh_now() {
            debug!("Manual refresh ignored, fetch in flight");
        }
    }

    /// Check for completed background fetches and timer ticks.
    pub fn check_background_tasks(&mut self) {
        if self.controller.check_background_tasks() {
            self.sync_views();
        }
    }

    /// Reconcile the map and keep the selection in range after the event
    /// list changed.
    pub fn sync_views(&mut self) {
        let events = &self.controller.state().events;
        self.map.reconcile(events);
        self.selection = self.selection.min(events.len().saturating_sub(1));
    }

    /// Events in list order.
    pub fn list_events(&self) -> Vec<&Earthquake> {
        views::sorted_by(&self.dashboard().events, self.sort)
    }

    pub fn selected_event(&self) -> Option<&Earthquake> {
        self.list_events().get(self.selection).copied()
    }

    pub fn toggle_sort(&mut self) {
        // Keep the same event selected across the reorder
        let selected_id = self.selected_event().map(|e| e.id.clone());
        self.sort = self.sort.toggle();
        if let Some(id) = selected_id {
            if let Some(pos) = self.list_events().iter().position(|e| e.id == id) {
                self.selection = pos;
            }
        }
    }

    pub fn select_next(&mut self, step: usize) {
        let last = self.dashboard().events.len().saturating_sub(1);
        self.selection = (self.selection + step).min(last);
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.dashboard().events.len().saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.state = match self.state {
            AppState::ShowingHelp => AppState::Normal,
            _ => AppState::ShowingHelp,
        };
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }
}

// ============================================================================
// Tests
// ============================================================================
