//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`dashboard`]: The page regions (attack counters, chart, flagged IP table,
//!   mitigation input)
//! - [`common`]: Shared components (header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Header (common::render_header)               │
//! ├──────────────────┬───────────────────────────┤
//! │ Attack Types     │                           │
//! ├──────────────────┤ Malicious IPs             │
//! │ Attack Chart     │                           │
//! ├──────────────────┴───────────────────────────┤
//! │ Mitigate: ip_address                         │
//! ├──────────────────────────────────────────────┤
//! │ Status Bar (common::render_status_bar)       │
//! └──────────────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod common;
pub mod dashboard;
pub mod theme;

pub use theme::Theme;
