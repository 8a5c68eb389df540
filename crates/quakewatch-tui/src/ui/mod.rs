//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `map`: Canvas map backend for the marker reconciler
//! - `chart`: Magnitude trend bar chart

pub mod chart;
pub mod input;
pub mod map;
pub mod render;
pub mod styles;
