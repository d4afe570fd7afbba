//! User interface rendering layer with component-based architecture.
//!
//! This module turns page state into ANSI-styled frames through composable
//! rendering components. It provides theme support and a layout that
//! matches the page's pointer hit tests.
//!
//! # Architecture
//!
//! The UI layer follows a declarative rendering model:
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (cursor, width-aware padding)
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{
    EmptyState, FilterChip, FooterInfo, HeaderInfo, MenuView, PanelOption, PanelView, SearchBarInfo, UIViewModel,
};
