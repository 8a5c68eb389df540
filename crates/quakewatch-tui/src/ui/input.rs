//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};
use quakewatch_core::{FeedSource, KeyValueStore};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Apply one key press. Returns true when the app should exit.
pub fn handle_input<S, K>(app: &mut App<S, K>, key: KeyEvent) -> bool
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    if app.state == AppState::ShowingHelp {
        // Any key closes help; q still quits
        if matches!(key.code, KeyCode::Char('q')) {
            app.quit();
            return true;
        }
        app.toggle_help();
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit();
            return true;
        }
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('r') | KeyCode::Char('u') => app.refresh(),
        KeyCode::Char('s') => app.toggle_sort(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(1),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(1),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Char('+') | KeyCode::Char('=') => app.map.surface_mut().zoom_in(),
        KeyCode::Char('-') => app.map.surface_mut().zoom_out(),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app, FEED_A};
    use crossterm::event::KeyModifiers;
    use quakewatch_core::markers::DEFAULT_ZOOM;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app(vec![]);
        assert!(handle_input(&mut app, press(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app(vec![]);
        assert!(!handle_input(&mut app, press(KeyCode::Char('?'))));
        assert_eq!(app.state, AppState::ShowingHelp);

        assert!(!handle_input(&mut app, press(KeyCode::Char('x'))));
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_zoom_keys() {
        let mut app = app(vec![]);
        handle_input(&mut app, press(KeyCode::Char('+')));
        assert_eq!(app.map.surface().zoom(), DEFAULT_ZOOM + 1);
        handle_input(&mut app, press(KeyCode::Char('-')));
        handle_input(&mut app, press(KeyCode::Char('-')));
        assert_eq!(app.map.surface().zoom(), DEFAULT_ZOOM - 1);
    }

    #[tokio::test]
    async fn test_refresh_key_is_single_flight() {
        let mut app = app(vec![FEED_A]);
        handle_input(&mut app, press(KeyCode::Char('r')));
        assert!(app.controller.is_refreshing());

        // Second press while in flight is dropped
        handle_input(&mut app, press(KeyCode::Char('r')));
        assert!(!app.controller.refresh_now());
        assert!(app.controller.wait_for_refresh().await);
        app.sync_views();

        assert_eq!(app.controller.feed().source().calls(), 1);
        assert_eq!(app.dashboard().events.len(), 3);
        assert!(!app.controller.is_refreshing());
        assert!(app.dashboard().error.is_none());
    }

    #[tokio::test]
    async fn test_navigation_keys() {
        let mut app = app(vec![FEED_A]);
        app.refresh();
        app.controller.wait_for_refresh().await;

        handle_input(&mut app, press(KeyCode::Char('j')));
        handle_input(&mut app, press(KeyCode::Down));
        handle_input(&mut app, press(KeyCode::Down));
        assert_eq!(app.selection, 2);

        handle_input(&mut app, press(KeyCode::Char('g')));
        assert_eq!(app.selection, 0);
        handle_input(&mut app, press(KeyCode::End));
        assert_eq!(app.selection, 2);
    }
}
