//! Screen geometry and anchored placement.

/// A cell position, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    #[must_use]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Places a popup of `size` with its top-left corner at `origin`, shifted
/// left/up as needed so it never crosses the viewport's right or bottom edge.
///
/// A popup larger than the viewport is shrunk to fit.
#[must_use]
pub fn clamp_to_viewport(origin: Point, size: Size, viewport: Rect) -> Rect {
    let width = size.width.min(viewport.width);
    let height = size.height.min(viewport.height);

    let x = origin
        .x
        .max(viewport.x)
        .min(viewport.right().saturating_sub(width));
    let y = origin
        .y
        .max(viewport.y)
        .min(viewport.bottom().saturating_sub(height));

    Rect::new(x, y, width, height)
}

/// Places a panel directly below its trigger, clamped to the viewport.
///
/// # Examples
///
/// ```
/// use classdesk::popup::{anchor_below, Rect, Size};
///
/// let viewport = Rect::new(0, 0, 80, 24);
/// let trigger = Rect::new(70, 2, 10, 1);
///
/// let panel = anchor_below(trigger, Size::new(20, 5), viewport);
/// assert_eq!(panel, Rect::new(60, 3, 20, 5));
/// ```
#[must_use]
pub fn anchor_below(trigger: Rect, size: Size, viewport: Rect) -> Rect {
    clamp_to_viewport(Point::new(trigger.x, trigger.bottom()), size, viewport)
}

/// Last known pointer position, owned by whoever opens pointer-anchored menus.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    last: Option<Point>,
}

impl PointerTracker {
    /// Records a pointer interaction.
    pub fn record(&mut self, point: Point) {
        self.last = Some(point);
    }

    /// The most recent pointer position, if any interaction happened yet.
    #[must_use]
    pub const fn last(&self) -> Option<Point> {
        self.last
    }
}
