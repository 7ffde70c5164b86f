//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`overview`]: Sensor table with gauges, sparklines and the prediction banner
//! - [`charts`]: History charts with comparison overlays and selectable styles
//! - [`common`]: Shared components (header, tabs, status bar, help, error screen)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (overview/charts::render, or         │
//! │  common::render_error when faulted)  │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Help overlay rendered on top
//! ```

pub mod charts;
pub mod common;
pub mod overview;
pub mod theme;

pub use charts::{ChartBoard, ChartSelection, ChartStyle};
pub use theme::Theme;
