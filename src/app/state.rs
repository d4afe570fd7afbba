//! Page state and view model computation.
//!
//! [`AppState`] is the single source of truth for one list screen: the
//! fetched records, the filter controls, the search box, the open popups and
//! the bookkeeping that pairs worker responses with the requests that are
//! still wanted. The event handler mutates it; `compute_viewmodel` turns a
//! snapshot of it into a [`UIViewModel`].
//!
//! # Screen layout
//!
//! ```text
//! row 0        header
//! row 1        filter triggers
//! row 2        search box
//! row 3        table headers
//! rows 4..     table rows (one menu button at the right edge of each)
//! last row     footer
//! ```
//!
//! Every component gets a node in a [`NodeTree`] so pointer events can be
//! routed and popups can tell inside presses from outside ones. Open popups
//! are inserted last so they win hit tests over the table beneath them.

use super::debounce::Debouncer;
use super::filters::FilterState;
use super::modes::{InputMode, LoadState};
use super::page::{FilterSource, FilterSpec, PageConfig};
use super::Action;
use crate::domain::record::row_key;
use crate::domain::{Record, Result};
use crate::popup::{ListenerRegistry, NodeId, NodeTree, Point, PointerTracker, Rect, SharedListeners};
use crate::search::rank;
use crate::select::{SelectControl, SelectionState};
use crate::table::{build_table, MenuAnchor, RowMenu};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    EmptyState, FilterChip, FooterInfo, HeaderInfo, MenuView, PanelView, SearchBarInfo, UIViewModel,
};
use crate::worker::{ListTarget, WorkerMessage, WorkerResponse};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

pub const HEADER_ROW: usize = 0;
pub const FILTER_ROW: usize = 1;
pub const SEARCH_ROW: usize = 2;
pub const TABLE_HEADER_ROW: usize = 3;
pub const FIRST_DATA_ROW: usize = 4;

/// Rows not available for table data: the four above plus the footer.
const CHROME_ROWS: usize = 5;

/// Brackets, space and arrow around a filter label: `[Group ▾]`.
pub const CHIP_PADDING: usize = 4;
const CHIP_GAP: usize = 1;

/// Width of the `⋯` button at the end of each row.
pub const MENU_BUTTON_WIDTH: usize = 3;

const DEFAULT_VIEWPORT: Rect = Rect::new(0, 0, 80, 24);

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    FilterTrigger(usize),
    FilterPanel(usize),
    /// A table row, by absolute index into the visible records.
    Row(usize),
    /// The action menu button of a row.
    RowButton(usize),
    RowMenu,
    Elsewhere,
}

#[derive(Debug, Clone)]
struct FilterNodes {
    wrapper: NodeId,
    trigger: NodeId,
    trigger_rect: Rect,
    panel: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct RowNodes {
    row: NodeId,
    button: NodeId,
    button_rect: Rect,
    menu: Option<NodeId>,
    key: String,
}

#[derive(Debug, Clone, Default)]
struct ScreenLayout {
    filters: Vec<FilterNodes>,
    rows: Vec<RowNodes>,
    window_start: usize,
}

/// Live state of one list screen.
#[derive(Debug)]
pub struct AppState {
    pub page: PageConfig,
    pub theme: Theme,

    /// Records of the last accepted fetch, in server order.
    pub records: Vec<Record>,
    pub load_state: LoadState,

    /// Last failure reported by the worker, cleared by the next good load.
    pub last_error: Option<String>,

    pub input_mode: InputMode,

    /// Text in the search box.
    pub search_input: String,
    /// Query the table is currently ranked by (the debounced input).
    pub applied_query: String,

    /// Index into [`visible_records`](Self::visible_records).
    pub selected_index: usize,

    /// One control per [`FilterSpec`] of the page, same order.
    pub filters: Vec<SelectControl>,
    pub row_menu: RowMenu,
    pub pointer: PointerTracker,

    pub viewport: Rect,

    /// Time of the last [`Tick`](super::Event::Tick).
    pub now: Instant,

    tree: NodeTree,
    layout: ScreenLayout,
    listeners: SharedListeners,
    debouncer: Debouncer<String>,
    next_generation: u64,
    expected: BTreeMap<ListTarget, u64>,
    pending_deletes: BTreeSet<u64>,
    mounted: bool,
}

impl AppState {
    /// Creates an unmounted page. Nothing is fetched until
    /// [`Event::Mounted`](super::Event::Mounted).
    #[must_use]
    pub fn new(page: PageConfig, theme: Theme) -> Self {
        let listeners = ListenerRegistry::shared();
        let filters = page
            .filters
            .iter()
            .map(|spec| build_control(spec, &listeners))
            .collect();

        let mut state = Self {
            debouncer: Debouncer::new(page.debounce),
            row_menu: RowMenu::new(Rc::clone(&listeners)),
            page,
            theme,
            records: Vec::new(),
            load_state: LoadState::Idle,
            last_error: None,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            applied_query: String::new(),
            selected_index: 0,
            filters,
            pointer: PointerTracker::default(),
            viewport: DEFAULT_VIEWPORT,
            now: Instant::now(),
            tree: NodeTree::new(DEFAULT_VIEWPORT),
            layout: ScreenLayout::default(),
            listeners,
            next_generation: 0,
            expected: BTreeMap::new(),
            pending_deletes: BTreeSet::new(),
            mounted: false,
        };
        state.relayout();
        state
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Outside-click listeners currently attached by this page's popups.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().count()
    }

    /// Number of table rows that fit the viewport.
    #[must_use]
    pub const fn data_rows(&self) -> usize {
        self.viewport.height.saturating_sub(CHROME_ROWS)
    }

    pub fn set_viewport(&mut self, rows: usize, cols: usize) {
        self.viewport = Rect::new(0, 0, cols, rows);
        self.relayout();
    }

    /// Records matching the applied search query, best match first.
    ///
    /// Without a query this is every record in server order.
    #[must_use]
    pub fn visible_records(&self) -> Vec<&Record> {
        let config = self.page.search_config(&self.records);
        rank(&self.records, &config, &self.applied_query)
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&Record> {
        self.visible_records().get(self.selected_index).copied()
    }

    /// Moves the selection down by one row, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let count = self.visible_records().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Moves the selection up by one row, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let count = self.visible_records().len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Keeps the selection inside the visible records.
    pub fn clamp_selection(&mut self) {
        let count = self.visible_records().len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    /// `[start, end)` of the visible records shown on screen, centred on the
    /// selection.
    fn window(&self, total: usize) -> (usize, usize) {
        let available = self.data_rows();
        let mut start = self.selected_index.saturating_sub(available / 2);
        let end = (start + available).min(total);
        if end.saturating_sub(start) < available && total >= available {
            start = end.saturating_sub(available);
        }
        (start.min(end), end)
    }

    /// Queues the current search input; it applies once typing pauses.
    pub fn schedule_search(&mut self) {
        self.debouncer.schedule(self.search_input.clone(), self.now);
    }

    /// Applies a queued query whose quiet period has passed by `now`.
    pub fn advance_clock(&mut self, now: Instant) -> bool {
        self.now = now;
        match self.debouncer.poll(now) {
            Some(query) => {
                tracing::debug!(query = %query, "search query applied");
                self.apply_query(query);
                true
            }
            None => false,
        }
    }

    /// Applies the search input immediately.
    pub fn flush_search(&mut self) {
        self.debouncer.cancel();
        self.apply_query(self.search_input.clone());
    }

    pub fn clear_search(&mut self) {
        self.debouncer.cancel();
        self.search_input.clear();
        self.apply_query(String::new());
    }

    #[must_use]
    pub const fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn apply_query(&mut self, query: String) {
        if query != self.applied_query {
            self.applied_query = query;
            self.selected_index = 0;
        }
    }

    /// Current selections of every filter, keyed by filter id.
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        for (spec, control) in self.page.filters.iter().zip(&self.filters) {
            state.set(spec.id.clone(), control.selection().to_json());
        }
        state
    }

    /// Restores every filter from `filters`; filters it does not mention are
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Config`](crate::domain::DeskError::Config) if a
    /// value does not fit its filter (a list for a single-select filter).
    pub fn apply_filter_state(&mut self, filters: &FilterState) -> Result<()> {
        let restored = self
            .page
            .filters
            .iter()
            .map(|spec| match filters.get(&spec.id) {
                Some(value) => SelectionState::from_json(spec.mode, value),
                None => Ok(SelectionState::empty(spec.mode)),
            })
            .collect::<Result<Vec<_>>>()?;

        for (control, selection) in self.filters.iter_mut().zip(restored) {
            control.set_selection(selection);
        }
        Ok(())
    }

    /// Refetches the records for the new filter values and mirrors them into
    /// the URL.
    pub fn filters_changed(&mut self) -> Vec<Action> {
        let query = self.filter_state().to_query();
        tracing::debug!(query = %query, "filters changed");
        vec![self.request_records(), Action::PushUrl(query)]
    }

    /// Opens filter `index` (closing every other popup) or closes it.
    pub fn toggle_filter(&mut self, index: usize) -> bool {
        if index >= self.filters.len() {
            return false;
        }
        self.close_popups(Some(index));
        self.filters[index].toggle();

        if self.filters[index].is_open() {
            if let Some(nodes) = self.layout.filters.get(index) {
                let size = self.filters[index].panel_size();
                self.filters[index].place(nodes.trigger_rect, size, self.viewport);
            }
            self.input_mode = InputMode::Filter(index);
        } else {
            self.input_mode = InputMode::Normal;
        }
        true
    }

    /// Closes every open popup except filter `keep`.
    pub fn close_popups(&mut self, keep: Option<usize>) {
        for (index, control) in self.filters.iter_mut().enumerate() {
            if Some(index) != keep && control.is_open() {
                control.close();
            }
        }
        if self.row_menu.open_row().is_some() {
            self.row_menu.close();
        }
        if keep.is_none() {
            self.input_mode = InputMode::Normal;
        }
    }

    /// The filter whose panel currently takes input.
    #[must_use]
    pub const fn active_filter(&self) -> Option<usize> {
        match self.input_mode {
            InputMode::Filter(index) => Some(index),
            _ => None,
        }
    }

    /// Opens the action menu of the selected row, or closes it.
    ///
    /// A menu requested by a pointer press opens at the pointer. Otherwise it
    /// opens under the row's menu button.
    pub fn toggle_row_menu(&mut self, from_pointer: bool) -> bool {
        if self.page.row_actions.is_empty() {
            return false;
        }
        let Some(key) = self.selected_record().map(row_key) else {
            return false;
        };
        let slot = self.selected_index.saturating_sub(self.layout.window_start);
        let Some((button, button_rect)) = self.layout.rows.get(slot).map(|nodes| (nodes.button, nodes.button_rect))
        else {
            return false;
        };
        let anchor = self
            .pointer
            .last()
            .filter(|_| from_pointer)
            .map_or(MenuAnchor::Below(button_rect), MenuAnchor::Pointer);

        for control in &mut self.filters {
            control.close();
        }
        let size = self.page.row_actions.menu_size();
        let opened = self
            .row_menu
            .toggle(&key, button, anchor, size, self.viewport)
            .is_some();
        self.input_mode = if opened { InputMode::RowMenu } else { InputMode::Normal };
        true
    }

    /// Runs action `index` of the open row menu.
    pub fn choose_row_action(&mut self, index: usize) -> bool {
        let ran = self.row_menu.choose(&self.page.row_actions, index, &self.records);
        self.input_mode = InputMode::Normal;
        ran
    }

    /// Resolves a pointer position against the current layout.
    #[must_use]
    pub fn hit(&self, point: Point) -> (NodeId, HitTarget) {
        let target = self.tree.hit_test(point);

        for (index, nodes) in self.layout.filters.iter().enumerate() {
            if nodes.panel == Some(target) {
                return (target, HitTarget::FilterPanel(index));
            }
            if target == nodes.trigger || target == nodes.wrapper {
                return (target, HitTarget::FilterTrigger(index));
            }
        }
        for (slot, nodes) in self.layout.rows.iter().enumerate() {
            let index = self.layout.window_start + slot;
            if nodes.menu == Some(target) {
                return (target, HitTarget::RowMenu);
            }
            if target == nodes.button {
                return (target, HitTarget::RowButton(index));
            }
            if target == nodes.row {
                return (target, HitTarget::Row(index));
            }
        }
        (target, HitTarget::Elsewhere)
    }

    /// Lets every open popup react to a press on `target`. Returns `true` if
    /// any of them closed.
    pub fn dismiss_outside(&mut self, target: NodeId) -> bool {
        let mut closed = false;
        for (index, control) in self.filters.iter_mut().enumerate() {
            if control.pointer_down(&self.tree, target) {
                closed = true;
                if self.input_mode == InputMode::Filter(index) {
                    self.input_mode = InputMode::Normal;
                }
            }
        }
        if self.row_menu.pointer_down(&self.tree, target) {
            closed = true;
            if self.input_mode == InputMode::RowMenu {
                self.input_mode = InputMode::Normal;
            }
        }
        closed
    }

    /// Rebuilds the node tree from the current state and viewport.
    pub fn relayout(&mut self) {
        let width = self.viewport.width;
        let mut tree = NodeTree::new(self.viewport);
        let root = tree.root();

        tree.insert(root, Rect::new(0, HEADER_ROW, width, 1));

        let bar = tree.insert(root, Rect::new(0, FILTER_ROW, width, 1));
        let mut x = 0;
        let mut filters = Vec::with_capacity(self.filters.len());
        for control in &self.filters {
            let chip_width = control.button_label().width() + CHIP_PADDING;
            let rect = Rect::new(x, FILTER_ROW, chip_width, 1);
            let wrapper = tree.insert(bar, rect);
            let trigger = tree.insert(wrapper, rect);
            filters.push(FilterNodes {
                wrapper,
                trigger,
                trigger_rect: rect,
                panel: None,
            });
            x += chip_width + CHIP_GAP;
        }

        tree.insert(root, Rect::new(0, SEARCH_ROW, width, 1));

        let table = tree.insert(root, Rect::new(0, TABLE_HEADER_ROW, width, self.data_rows() + 1));
        let (window_start, keys) = {
            let visible = self.visible_records();
            let (start, end) = self.window(visible.len());
            let keys: Vec<String> = visible[start..end].iter().map(|record| row_key(record)).collect();
            (start, keys)
        };
        let mut rows = Vec::with_capacity(keys.len());
        for (slot, key) in keys.into_iter().enumerate() {
            let y = FIRST_DATA_ROW + slot;
            let row = tree.insert(table, Rect::new(0, y, width, 1));
            let button_width = MENU_BUTTON_WIDTH.min(width);
            let button_rect = Rect::new(width - button_width, y, button_width, 1);
            let button = tree.insert(row, button_rect);
            rows.push(RowNodes {
                row,
                button,
                button_rect,
                menu: None,
                key,
            });
        }

        for (control, nodes) in self.filters.iter_mut().zip(&mut filters) {
            control.set_host(nodes.trigger);
            if control.is_open() {
                let size = control.panel_size();
                let rect = control.place(nodes.trigger_rect, size, self.viewport);
                nodes.panel = Some(tree.insert(nodes.wrapper, rect));
            }
        }

        if let (Some(open), Some(rect)) = (self.row_menu.open_row().map(str::to_string), self.row_menu.rect()) {
            match rows.iter_mut().find(|nodes| nodes.key == open) {
                Some(nodes) => {
                    nodes.menu = Some(tree.insert(nodes.row, rect));
                    self.row_menu.set_host(nodes.button);
                }
                None => {
                    tracing::debug!(row = %open, "row scrolled away, closing its menu");
                    self.row_menu.close();
                    if self.input_mode == InputMode::RowMenu {
                        self.input_mode = InputMode::Normal;
                    }
                }
            }
        }

        self.tree = tree;
        self.layout = ScreenLayout {
            filters,
            rows,
            window_start,
        };
    }

    fn begin_request(&mut self, target: ListTarget) -> u64 {
        self.next_generation += 1;
        self.expected.insert(target, self.next_generation);
        self.next_generation
    }

    fn take_expected(&mut self, target: &ListTarget, generation: u64) -> bool {
        if self.expected.get(target) == Some(&generation) {
            self.expected.remove(target);
            true
        } else {
            false
        }
    }

    /// Marks the page mounted and requests everything it shows.
    pub fn mount(&mut self) -> Vec<Action> {
        self.mounted = true;
        let mut actions = vec![self.request_records()];
        actions.extend(self.request_filter_options());
        actions
    }

    /// Forgets in-flight requests and detaches every popup listener.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.expected.clear();
        self.pending_deletes.clear();
        self.debouncer.cancel();
        self.close_popups(None);
        self.load_state = LoadState::Idle;
        tracing::debug!("page unmounted");
    }

    /// Requests the main list with the current filter values.
    pub fn request_records(&mut self) -> Action {
        let generation = self.begin_request(ListTarget::Records);
        self.load_state = LoadState::Loading;
        Action::PostToWorker(WorkerMessage::fetch_list(
            generation,
            ListTarget::Records,
            self.page.resource.clone(),
            self.filter_state().api_query(),
        ))
    }

    /// Requests the option lists of every remote filter.
    pub fn request_filter_options(&mut self) -> Vec<Action> {
        let remote: Vec<(String, String)> = self
            .page
            .filters
            .iter()
            .filter_map(|spec| match &spec.source {
                FilterSource::Remote { resource, .. } => Some((spec.id.clone(), resource.clone())),
                FilterSource::Static(_) => None,
            })
            .collect();

        remote
            .into_iter()
            .map(|(id, resource)| {
                let target = ListTarget::FilterOptions(id);
                let generation = self.begin_request(target.clone());
                Action::PostToWorker(WorkerMessage::fetch_list(generation, target, resource, Vec::new()))
            })
            .collect()
    }

    /// Requests deletion of the selected record.
    pub fn request_delete(&mut self) -> Option<Action> {
        let id = self.selected_record().map(row_key)?;
        self.next_generation += 1;
        let generation = self.next_generation;
        self.pending_deletes.insert(generation);
        Some(Action::PostToWorker(WorkerMessage::delete_record(
            generation,
            self.page.resource.clone(),
            id,
        )))
    }

    /// Applies a worker response if it answers a request that is still
    /// wanted. Returns `true` if the screen changed.
    pub fn accept(&mut self, response: &WorkerResponse) -> bool {
        match response {
            WorkerResponse::ListLoaded {
                generation,
                target,
                records,
            } => {
                if !self.take_expected(target, *generation) {
                    tracing::debug!(generation, ?target, "dropping stale list");
                    return false;
                }
                match target {
                    ListTarget::Records => {
                        self.records.clone_from(records);
                        self.load_state = LoadState::Loaded;
                        self.last_error = None;
                        self.clamp_selection();
                    }
                    ListTarget::FilterOptions(id) => {
                        if let Some(index) = self.page.filters.iter().position(|spec| spec.id == *id) {
                            let options = self.page.filters[index].source.options_from(records);
                            self.filters[index].set_options(options);
                        }
                    }
                }
                true
            }
            WorkerResponse::RecordDeleted { generation, id, .. } => {
                if !self.pending_deletes.remove(generation) {
                    return false;
                }
                self.records.retain(|record| row_key(record) != *id);
                self.clamp_selection();
                true
            }
            WorkerResponse::Error {
                generation,
                target,
                message,
            } => {
                let wanted = match target {
                    Some(target) => self.take_expected(target, *generation),
                    None => self.pending_deletes.remove(generation),
                };
                if !wanted {
                    return false;
                }
                if target.as_ref() == Some(&ListTarget::Records) {
                    self.load_state = LoadState::Failed(message.clone());
                }
                self.last_error = Some(message.clone());
                true
            }
        }
    }

    /// Computes a renderable view model for the current viewport.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Mapping`](crate::domain::DeskError::Mapping) if
    /// the page's field mapping is malformed.
    pub fn compute_viewmodel(&self) -> Result<UIViewModel> {
        let _span = tracing::debug_span!("compute_viewmodel", records = self.records.len()).entered();

        let visible = self.visible_records();
        let (start, end) = self.window(visible.len());
        let window: Vec<Record> = visible[start..end].iter().map(|record| (*record).clone()).collect();

        let loading = self.load_state == LoadState::Loading;
        let mut options = self.page.table_options.clone();
        if loading {
            options.skeleton = Some(self.page.skeleton_rows);
        }
        let table = build_table(&window, &self.page.mapping, &options)?;

        let filters = self
            .filters
            .iter()
            .zip(&self.layout.filters)
            .map(|(control, nodes)| FilterChip {
                label: control.button_label(),
                rect: nodes.trigger_rect,
                open: control.is_open(),
                active: !control.selection().is_empty(),
            })
            .collect();

        let row_menu = self.row_menu.rect().map(|rect| MenuView {
            rect,
            items: self.page.row_actions.labels().into_iter().map(String::from).collect(),
        });

        Ok(UIViewModel {
            header: HeaderInfo {
                title: format!(" {} ({}) ", self.page.title, visible.len()),
            },
            filters,
            search_bar: SearchBarInfo {
                query: self.search_input.clone(),
                focused: self.input_mode == InputMode::Search,
                pending: self.debouncer.is_pending(),
            },
            table,
            selected_index: (!window.is_empty()).then(|| self.selected_index.saturating_sub(start)),
            panel: self.filters.iter().find_map(PanelView::from_control),
            row_menu,
            empty_state: (!loading && window.is_empty()).then(|| self.compute_empty_state()),
            error: self.last_error.clone(),
            footer: self.compute_footer(),
        })
    }

    fn compute_empty_state(&self) -> EmptyState {
        if let LoadState::Failed(message) = &self.load_state {
            return EmptyState {
                message: format!("Could not load {}", self.page.title.to_lowercase()),
                subtitle: message.clone(),
            };
        }
        if self.applied_query.is_empty() {
            EmptyState {
                message: "Nothing here yet".to_string(),
                subtitle: "Active filters may be hiding records".to_string(),
            }
        } else {
            EmptyState {
                message: format!("No matches for \"{}\"", self.applied_query),
                subtitle: "Esc clears the search".to_string(),
            }
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Normal => "j/k: move  /: search  1-9: filters  Enter: actions  d: delete  q: quit",
            InputMode::Search => "Esc: clear  Enter: apply now  Type to search",
            InputMode::Filter(_) => "Esc: close  Enter: pick first  Type to narrow options",
            InputMode::RowMenu => "Esc: close  1-9: run action",
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

fn build_control(spec: &FilterSpec, listeners: &SharedListeners) -> SelectControl {
    let mut control = SelectControl::new(spec.source.initial_options(), spec.mode, Rc::clone(listeners))
        .with_placeholder(spec.placeholder.clone());
    if spec.searchable {
        control = control.searchable();
    }
    if let Some(pinned) = &spec.pinned {
        control = control.with_pinned(pinned.label.clone(), pinned.clickable);
    }
    control
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::FilterSpec;
    use crate::domain::SelectOption;
    use crate::select::SelectionMode;
    use crate::table::FieldMapping;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn page() -> PageConfig {
        PageConfig::new("Students", "students", FieldMapping::new().label("name", "Name")).with_filter(
            FilterSpec::new(
                "day",
                "Day",
                SelectionMode::Multiple,
                FilterSource::Static(vec![SelectOption::plain("Mon"), SelectOption::plain("Tue")]),
            ),
        )
    }

    fn loaded(records: Vec<Record>) -> AppState {
        let mut state = AppState::new(page(), Theme::default());
        state.mount();
        let generation = state.expected[&ListTarget::Records];
        state.accept(&WorkerResponse::ListLoaded {
            generation,
            target: ListTarget::Records,
            records,
        });
        state.relayout();
        state
    }

    #[test]
    fn selection_wraps() {
        let mut state = loaded(vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        state.move_selection_up();
        assert_eq!(state.selected_index, 1);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn stale_generation_is_dropped() {
        let mut state = AppState::new(page(), Theme::default());
        state.mount();
        let first = state.expected[&ListTarget::Records];
        state.request_records();

        let stale = WorkerResponse::ListLoaded {
            generation: first,
            target: ListTarget::Records,
            records: vec![json!({ "id": 1 })],
        };
        assert!(!state.accept(&stale));
        assert!(state.records.is_empty());
        assert_eq!(state.load_state, LoadState::Loading);
    }

    #[test]
    fn window_follows_selection() {
        let records: Vec<Record> = (0..50).map(|i| json!({ "id": i })).collect();
        let mut state = loaded(records);
        state.set_viewport(10, 40);
        state.selected_index = 49;
        assert_eq!(state.window(50), (45, 50));
        state.selected_index = 0;
        assert_eq!(state.window(50), (0, 5));
    }

    #[test]
    fn filter_state_round_trips_into_controls() {
        let mut state = loaded(vec![]);
        let mut filters = FilterState::new();
        filters.set("day", json!(["Tue"]));
        state.apply_filter_state(&filters).unwrap();

        assert_eq!(state.filters[0].button_label(), "Tue");
        assert_eq!(state.filter_state(), filters);
    }

    #[test]
    fn loading_shows_skeleton() {
        let mut state = AppState::new(page(), Theme::default());
        state.mount();
        let vm = state.compute_viewmodel().unwrap();
        assert!(vm.table.is_loading());
        assert_eq!(vm.empty_state, None);
    }
}
