//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place page state changes. It pattern-matches
//! the event, mutates [`AppState`], and returns whether the screen needs a
//! redraw together with the side effects the runtime should execute.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Mounted`, `Unmounted`, `Resize`, `Tick`
//! - **Keyboard**: `KeyDown`, `KeyUp`, `FocusSearch`, `Char`, `Backspace`,
//!   `Escape`, `Enter`
//! - **Controls**: `ToggleFilter`, `PickOption`, `PickPinned`,
//!   `OpenRowMenu`, `ChooseRowAction`, `DeleteSelected`
//! - **Pointer**: `Pointer` presses, routed through the page's node tree
//! - **Outside world**: `UrlChanged`, `WorkerResponse`
//!
//! # Example
//!
//! ```rust
//! use classdesk::app::{handle_event, AppState, Event, PageConfig};
//! use classdesk::table::FieldMapping;
//! use classdesk::ui::Theme;
//!
//! let page = PageConfig::new("Students", "students", FieldMapping::new().label("name", "Name"));
//! let mut state = AppState::new(page, Theme::default());
//! let (render, actions) = handle_event(&mut state, &Event::Mounted)?;
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), classdesk::DeskError>(())
//! ```

use super::filters::FilterState;
use super::modes::InputMode;
use super::state::HitTarget;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::popup::{Point, Rect};
use crate::select::{SelectControl, SelectOutcome};
use crate::worker::WorkerResponse;
use std::time::Instant;

/// Events triggered by user input, the clock, the URL, or the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The page became visible; fetch everything it shows.
    Mounted,
    /// The page went away; in-flight responses are ignored from now on.
    Unmounted,
    /// The terminal was resized.
    Resize { rows: usize, cols: usize },
    /// Time advanced; releases debounced search input.
    Tick(Instant),

    /// Moves the row selection down (wraps to top).
    KeyDown,
    /// Moves the row selection up (wraps to bottom).
    KeyUp,
    /// Puts keyboard focus in the search box.
    FocusSearch,
    /// Types into the focused search box or filter search.
    Char(char),
    Backspace,
    /// Closes the open popup or clears the search.
    Escape,
    /// Applies the search now, picks the first filter option, or opens the
    /// row menu, depending on focus.
    Enter,

    /// Opens or closes filter `n`.
    ToggleFilter(usize),
    /// Picks a visible option of the open filter.
    PickOption(usize),
    /// Activates the pinned row of the open filter.
    PickPinned,

    /// A pointer press at a screen cell.
    Pointer(Point),

    /// Opens or closes the action menu of the selected row.
    OpenRowMenu,
    /// Runs an action from the open row menu.
    ChooseRowAction(usize),
    /// Deletes the selected record through the API.
    DeleteSelected,

    /// The page URL query changed from outside (navigation, pasted link).
    UrlChanged(String),

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Short name for logs; worker responses can carry whole record lists.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Unmounted => "unmounted",
            Self::Resize { .. } => "resize",
            Self::Tick(_) => "tick",
            Self::KeyDown => "key_down",
            Self::KeyUp => "key_up",
            Self::FocusSearch => "focus_search",
            Self::Char(_) => "char",
            Self::Backspace => "backspace",
            Self::Escape => "escape",
            Self::Enter => "enter",
            Self::ToggleFilter(_) => "toggle_filter",
            Self::PickOption(_) => "pick_option",
            Self::PickPinned => "pick_pinned",
            Self::Pointer(_) => "pointer",
            Self::OpenRowMenu => "open_row_menu",
            Self::ChooseRowAction(_) => "choose_row_action",
            Self::DeleteSelected => "delete_selected",
            Self::UrlChanged(_) => "url_changed",
            Self::WorkerResponse(_) => "worker_response",
        }
    }
}

/// Processes an event, mutates page state, and returns actions to execute.
///
/// The boolean is `true` when the screen changed and should be redrawn; the
/// node tree is rebuilt before returning in that case.
///
/// # Errors
///
/// Returns [`DeskError::Config`](crate::domain::DeskError::Config) for a URL
/// query that does not fit the page's filters.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.kind()).entered();

    let (render, actions) = match event {
        Event::Mounted => {
            tracing::debug!(resource = %state.page.resource, "page mounted");
            (true, state.mount())
        }
        Event::Unmounted => {
            state.unmount();
            (false, vec![])
        }
        Event::Resize { rows, cols } => {
            state.set_viewport(*rows, *cols);
            (true, vec![])
        }
        Event::Tick(now) => (state.advance_clock(*now), vec![]),
        Event::KeyDown => match state.input_mode {
            InputMode::Normal | InputMode::Search => {
                state.move_selection_down();
                (true, vec![])
            }
            InputMode::Filter(_) | InputMode::RowMenu => (false, vec![]),
        },
        Event::KeyUp => match state.input_mode {
            InputMode::Normal | InputMode::Search => {
                state.move_selection_up();
                (true, vec![])
            }
            InputMode::Filter(_) | InputMode::RowMenu => (false, vec![]),
        },
        Event::FocusSearch => {
            state.close_popups(None);
            state.input_mode = InputMode::Search;
            (true, vec![])
        }
        Event::Char(c) => match state.input_mode {
            InputMode::Search => {
                state.search_input.push(*c);
                tracing::trace!(query = %state.search_input, "search input updated");
                state.schedule_search();
                (true, vec![])
            }
            InputMode::Filter(index) => match state.filters.get_mut(index) {
                Some(control) => {
                    control.push_search(*c);
                    (true, vec![])
                }
                None => (false, vec![]),
            },
            InputMode::Normal | InputMode::RowMenu => (false, vec![]),
        },
        Event::Backspace => match state.input_mode {
            InputMode::Search => {
                state.search_input.pop();
                state.schedule_search();
                (true, vec![])
            }
            InputMode::Filter(index) => match state.filters.get_mut(index) {
                Some(control) => {
                    control.pop_search();
                    (true, vec![])
                }
                None => (false, vec![]),
            },
            InputMode::Normal | InputMode::RowMenu => (false, vec![]),
        },
        Event::Escape => match state.input_mode {
            InputMode::Search => {
                state.clear_search();
                state.input_mode = InputMode::Normal;
                (true, vec![])
            }
            InputMode::Filter(_) | InputMode::RowMenu => {
                state.close_popups(None);
                (true, vec![])
            }
            InputMode::Normal => (false, vec![]),
        },
        Event::Enter => match state.input_mode {
            InputMode::Search => {
                state.flush_search();
                state.input_mode = InputMode::Normal;
                (true, vec![])
            }
            InputMode::Filter(index) => pick(state, index, Some(0)),
            InputMode::Normal => (state.toggle_row_menu(false), vec![]),
            InputMode::RowMenu => {
                state.choose_row_action(0);
                (true, vec![])
            }
        },
        Event::ToggleFilter(index) => (state.toggle_filter(*index), vec![]),
        Event::PickOption(option) => match state.active_filter() {
            Some(index) => pick(state, index, Some(*option)),
            None => (false, vec![]),
        },
        Event::PickPinned => match state.active_filter() {
            Some(index) => pick(state, index, None),
            None => (false, vec![]),
        },
        Event::Pointer(point) => pointer(state, *point),
        Event::OpenRowMenu => (state.toggle_row_menu(false), vec![]),
        Event::ChooseRowAction(index) => {
            if state.input_mode == InputMode::RowMenu {
                if !state.choose_row_action(*index) {
                    tracing::debug!(index, "no such row action");
                }
                (true, vec![])
            } else {
                (false, vec![])
            }
        }
        Event::DeleteSelected => match state.request_delete() {
            Some(action) => (false, vec![action]),
            None => {
                tracing::debug!("no record selected to delete");
                (false, vec![])
            }
        },
        Event::UrlChanged(query) => {
            let filters = FilterState::from_query(query)?;
            if filters == state.filter_state() {
                tracing::debug!("url filters unchanged");
                (false, vec![])
            } else {
                state.apply_filter_state(&filters)?;
                state.close_popups(None);
                (true, vec![state.request_records()])
            }
        }
        Event::WorkerResponse(response) => (state.accept(response), vec![]),
    };

    if render {
        state.relayout();
    }
    Ok((render, actions))
}

/// Applies a pick in filter `index`: an option (`Some`) or the pinned row.
fn pick(state: &mut AppState, index: usize, option: Option<usize>) -> (bool, Vec<Action>) {
    let Some(control) = state.filters.get_mut(index) else {
        return (false, vec![]);
    };
    let outcome = match option {
        Some(option) => control.pick(option),
        None => control.pick_pinned(),
    };
    if !control.is_open() {
        state.input_mode = InputMode::Normal;
    }

    match outcome {
        SelectOutcome::Ignored => (false, vec![]),
        SelectOutcome::Changed | SelectOutcome::Pinned => (true, state.filters_changed()),
    }
}

fn pointer(state: &mut AppState, point: Point) -> (bool, Vec<Action>) {
    state.pointer.record(point);
    let (target, hit) = state.hit(point);
    let mut render = state.dismiss_outside(target);
    let mut actions = Vec::new();

    match hit {
        HitTarget::FilterTrigger(index) => render |= state.toggle_filter(index),
        HitTarget::FilterPanel(index) => {
            let line = state.filters.get(index).and_then(|control| panel_line(control, point));
            let (changed, more) = match line {
                Some(PanelLine::Option(option)) => pick(state, index, Some(option)),
                Some(PanelLine::Pinned) => pick(state, index, None),
                Some(PanelLine::Search) | None => (false, vec![]),
            };
            render |= changed;
            actions = more;
        }
        HitTarget::Row(index) => {
            state.selected_index = index;
            render = true;
        }
        HitTarget::RowButton(index) => {
            state.selected_index = index;
            state.toggle_row_menu(true);
            render = true;
        }
        HitTarget::RowMenu => {
            if let Some(item) = state.row_menu.rect().and_then(|rect| menu_item(rect, point)) {
                state.choose_row_action(item);
                render = true;
            }
        }
        HitTarget::Elsewhere => {}
    }
    (render, actions)
}

enum PanelLine {
    Search,
    Pinned,
    Option(usize),
}

/// Which line of an open panel `point` is on, borders excluded.
fn panel_line(control: &SelectControl, point: Point) -> Option<PanelLine> {
    let rect = control.panel()?;
    let mut line = inner_line(rect, point)?;
    if control.is_searchable() {
        if line == 0 {
            return Some(PanelLine::Search);
        }
        line -= 1;
    }
    if control.pinned().is_some() {
        if line == 0 {
            return Some(PanelLine::Pinned);
        }
        line -= 1;
    }
    Some(PanelLine::Option(line))
}

fn menu_item(rect: Rect, point: Point) -> Option<usize> {
    inner_line(rect, point)
}

/// Line inside a bordered box, counting from the first line under the top
/// border.
fn inner_line(rect: Rect, point: Point) -> Option<usize> {
    let line = point.y.checked_sub(rect.y + 1)?;
    (line < rect.height.saturating_sub(2)).then_some(line)
}
