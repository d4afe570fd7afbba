//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to specialized component renderers
//!
//! Frames are returned as strings of ANSI escapes so the caller decides
//! where they go (stdout, a test assertion).
//!
//! # Example
//!
//! ```rust
//! use classdesk::app::{AppState, PageConfig};
//! use classdesk::table::FieldMapping;
//! use classdesk::ui::{render, Theme};
//!
//! let page = PageConfig::new("Students", "students", FieldMapping::new().label("name", "Name"));
//! let state = AppState::new(page, Theme::default());
//! let frame = render(&state)?;
//! assert!(frame.contains("Students (0)"));
//! # Ok::<(), classdesk::DeskError>(())
//! ```

use crate::app::AppState;
use crate::domain::Result;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Renders one frame of the page at its current viewport.
///
/// # Errors
///
/// Returns [`DeskError::Mapping`](crate::domain::DeskError::Mapping) if the
/// page's field mapping is malformed.
pub fn render(state: &AppState) -> Result<String> {
    let viewmodel = state.compute_viewmodel()?;
    Ok(render_viewmodel(
        &viewmodel,
        &state.theme,
        state.viewport.height,
        state.viewport.width,
    ))
}

/// Renders a pre-computed view model into a `rows` x `cols` frame.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let _span = tracing::trace_span!("render", rows, cols).entered();
    let mut out = String::new();
    components::render_page(&mut out, vm, theme, rows, cols);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::{FilterSource, FilterSpec, PageConfig};
    use crate::app::{handle_event, Event};
    use crate::domain::SelectOption;
    use crate::select::SelectionMode;
    use crate::table::FieldMapping;
    use crate::ui::helpers::strip_ansi;
    use crate::worker::{ListTarget, WorkerResponse};
    use serde_json::json;

    fn page() -> PageConfig {
        PageConfig::new("Students", "students", FieldMapping::new().label("name", "Name")).with_filter(
            FilterSpec::new(
                "group",
                "Group",
                SelectionMode::Single,
                FilterSource::Static(vec![SelectOption::plain("5A"), SelectOption::plain("5B")]),
            ),
        )
    }

    #[test]
    fn loaded_page_shows_rows_and_chips() {
        let mut state = AppState::new(page(), Theme::default());
        handle_event(&mut state, &Event::Mounted).unwrap();
        let response = WorkerResponse::ListLoaded {
            generation: 1,
            target: ListTarget::Records,
            records: vec![json!({ "id": 1, "name": "Anna" }), json!({ "id": 2, "name": "Boris" })],
        };
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();

        let frame = strip_ansi(&render(&state).unwrap());
        assert!(frame.contains("Students (2)"));
        assert!(frame.contains("[Group ▾]"));
        assert!(frame.contains("NAME"));
        assert!(frame.contains("Anna"));
        assert!(frame.contains("Boris"));
    }

    #[test]
    fn open_panel_is_drawn_over_table() {
        let mut state = AppState::new(page(), Theme::default());
        handle_event(&mut state, &Event::ToggleFilter(0)).unwrap();

        let frame = strip_ansi(&render(&state).unwrap());
        assert!(frame.contains("[Group ▴]"));
        assert!(frame.contains("○ 5A"));
        assert!(frame.contains("○ 5B"));
    }

    #[test]
    fn loading_page_shows_skeleton() {
        let mut state = AppState::new(page(), Theme::default());
        handle_event(&mut state, &Event::Mounted).unwrap();

        let frame = strip_ansi(&render(&state).unwrap());
        assert!(frame.contains('░'));
        assert!(!frame.contains("Nothing here yet"));
    }
}
