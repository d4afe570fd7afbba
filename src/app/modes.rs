//! Input focus and load state of a page.

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Row navigation and commands.
    Normal,
    /// Typing into the page search box.
    Search,
    /// A filter panel is open; input goes to that filter (index into the
    /// page's filters).
    Filter(usize),
    /// A row action menu is open.
    RowMenu,
}

/// Progress of the page's main list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Not mounted yet.
    Idle,
    /// A fetch is in flight; the table shows skeleton rows.
    Loading,
    Loaded,
    /// The last fetch failed with this message.
    Failed(String),
}
