//! Rendering collaborators: geometry, the [`Surface`] and [`Canvas`]
//! traits, and in-memory implementations.
//!
//! A `Surface` is the mountable region one element (or the property panel)
//! renders into. A `Canvas` is the whole form area: it hands out surfaces,
//! lays them out in the order the form dictates, reports geometry for drop
//! resolution, and shows the hint line under the form.
//!
//! [`MemorySurface`] and [`MemoryCanvas`] keep everything in memory and are
//! cheap to clone; clones share state, so a test can keep one handle while
//! the form owns another.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::{MEMORY_CANVAS_WIDTH_PX, MEMORY_ROW_HEIGHT_PX};
use crate::element::ElementId;
use crate::view::{ControlId, View};

/// A point in page coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `pt` lies strictly inside the rectangle.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x > self.x && pt.x < self.x + self.width && pt.y > self.y && pt.y < self.y + self.height
    }

    /// The rectangle grown by `d` on every side.
    #[must_use]
    pub fn grow(&self, d: f64) -> Self {
        Self { x: self.x - d, y: self.y - d, width: self.width + 2.0 * d, height: self.height + 2.0 * d }
    }
}

/// A mountable render target.
pub trait Surface {
    /// Number of concrete targets this surface resolved to. Binding requires exactly one.
    fn target_count(&self) -> usize {
        1
    }

    /// Remove everything previously mounted.
    fn clear(&mut self);

    /// Replace the mounted content with `view`.
    fn mount(&mut self, view: View);

    /// Current on-page bounds, used for drop hit-testing.
    fn bounds(&self) -> Rect;

    /// The control that currently has keyboard focus, if any.
    fn focused(&self) -> Option<ControlId>;
}

/// The form area provided by the host.
pub trait Canvas {
    /// Number of concrete targets the canvas resolved to. A form requires exactly one.
    fn target_count(&self) -> usize {
        1
    }

    /// Bounds of the whole form.
    fn bounds(&self) -> Rect;

    /// Allocate a surface for the element `id`.
    fn create_surface(&mut self, id: ElementId) -> Box<dyn Surface>;

    /// Release the slot of element `id`.
    fn release_surface(&mut self, id: ElementId);

    /// Lay element slots out in `order` (fixed prefix first).
    fn arrange(&mut self, order: &[ElementId]);

    /// Show `text` in the hint line, or hide it.
    fn show_hint(&mut self, text: Option<&str>);
}

// =============================================================================
// IN-MEMORY SURFACE
// =============================================================================

#[derive(Debug, Default)]
struct SurfaceState {
    view: View,
    mounts: usize,
    visible: bool,
    bounds: Rect,
    focused: Option<ControlId>,
    targets: usize,
}

/// In-memory surface; clones share the same state.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl MemorySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::with_targets(1)
    }

    /// A surface that claims to resolve to `targets` render targets.
    #[must_use]
    pub fn with_targets(targets: usize) -> Self {
        Self { state: Rc::new(RefCell::new(SurfaceState { targets, ..SurfaceState::default() })) }
    }

    /// Copy of the currently mounted view.
    #[must_use]
    pub fn view(&self) -> View {
        self.state.borrow().view.clone()
    }

    /// How many times content has been mounted.
    #[must_use]
    pub fn mount_count(&self) -> usize {
        self.state.borrow().mounts
    }

    /// Whether something is mounted (cleared surfaces are not visible).
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.state.borrow_mut().bounds = bounds;
    }

    pub fn set_focused(&self, focused: Option<ControlId>) {
        self.state.borrow_mut().focused = focused;
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn target_count(&self) -> usize {
        self.state.borrow().targets
    }

    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        state.view = View::new();
        state.visible = false;
    }

    fn mount(&mut self, view: View) {
        let mut state = self.state.borrow_mut();
        state.view = view;
        state.mounts += 1;
        state.visible = true;
    }

    fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    fn focused(&self) -> Option<ControlId> {
        self.state.borrow().focused
    }
}

// =============================================================================
// IN-MEMORY CANVAS
// =============================================================================

#[derive(Debug)]
struct CanvasState {
    targets: usize,
    width: f64,
    row_height: f64,
    slots: Vec<(ElementId, MemorySurface)>,
    order: Vec<ElementId>,
    hint: Option<String>,
}

/// In-memory canvas that stacks element slots vertically in fixed-height rows.
///
/// Row `i` of the arranged order spans `y ∈ [i·h, (i+1)·h]`; the form bounds
/// include one extra empty row below the last element (the hint line).
#[derive(Debug, Clone)]
pub struct MemoryCanvas {
    state: Rc<RefCell<CanvasState>>,
}

impl MemoryCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::with_targets(1)
    }

    /// A canvas that claims to resolve to `targets` render targets.
    #[must_use]
    pub fn with_targets(targets: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(CanvasState {
                targets,
                width: MEMORY_CANVAS_WIDTH_PX,
                row_height: MEMORY_ROW_HEIGHT_PX,
                slots: Vec::new(),
                order: Vec::new(),
                hint: None,
            })),
        }
    }

    /// Vertical center of row `index`, handy for aiming drops.
    #[must_use]
    pub fn row_center(&self, index: usize) -> Point {
        let state = self.state.borrow();
        #[allow(clippy::cast_precision_loss)]
        let top = index as f64 * state.row_height;
        Point::new(state.width / 2.0, top + state.row_height / 2.0)
    }

    /// The surface allocated for `id`, if it is still live.
    #[must_use]
    pub fn surface(&self, id: ElementId) -> Option<MemorySurface> {
        self.state
            .borrow()
            .slots
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s.clone())
    }

    /// The last arranged order.
    #[must_use]
    pub fn order(&self) -> Vec<ElementId> {
        self.state.borrow().order.clone()
    }

    /// Number of live slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.state.borrow().slots.len()
    }

    /// Text currently shown in the hint line.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        self.state.borrow().hint.clone()
    }
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for MemoryCanvas {
    fn target_count(&self) -> usize {
        self.state.borrow().targets
    }

    fn bounds(&self) -> Rect {
        let state = self.state.borrow();
        #[allow(clippy::cast_precision_loss)]
        let rows = (state.order.len() + 1) as f64;
        Rect::new(0.0, 0.0, state.width, rows * state.row_height)
    }

    fn create_surface(&mut self, id: ElementId) -> Box<dyn Surface> {
        let surface = MemorySurface::new();
        self.state.borrow_mut().slots.push((id, surface.clone()));
        Box::new(surface)
    }

    fn release_surface(&mut self, id: ElementId) {
        let mut state = self.state.borrow_mut();
        state.slots.retain(|(sid, _)| *sid != id);
        state.order.retain(|oid| *oid != id);
    }

    fn arrange(&mut self, order: &[ElementId]) {
        let mut state = self.state.borrow_mut();
        let (width, row_height) = (state.width, state.row_height);
        for (index, id) in order.iter().enumerate() {
            if let Some((_, surface)) = state.slots.iter().find(|(sid, _)| sid == id) {
                #[allow(clippy::cast_precision_loss)]
                let top = index as f64 * row_height;
                surface.set_bounds(Rect::new(0.0, top, width, row_height));
            }
        }
        state.order = order.to_vec();
    }

    fn show_hint(&mut self, text: Option<&str>) {
        self.state.borrow_mut().hint = text.map(str::to_owned);
    }
}
