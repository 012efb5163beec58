//! Drop-position resolution.
//!
//! The drag collaborator only reports where a drop happened. Turning that
//! coordinate into a position in the element sequence needs nothing more
//! than the bounds each surface reports, which is all this module looks at.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::element::ElementId;
use crate::surface::{Point, Rect};

/// One rendered row of the form, in display order.
#[derive(Debug, Clone, Copy)]
pub struct Row {
    pub id: ElementId,
    pub bounds: Rect,
    /// Part of the fixed prefix (title, subtitle, separator).
    pub fixed: bool,
}

/// Where a dropped element should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The drop landed outside the form; ignore it.
    Outside,
    /// Insert immediately before this (non-fixed) element.
    Before(ElementId),
    /// The drop landed on the fixed prefix; insert first among non-fixed elements.
    AfterPrefix,
    /// Inside the form but over no element; append.
    End,
}

/// Resolve a drop at `pt` against the form bounds (grown by `slop`) and the rendered rows.
#[must_use]
pub fn resolve_drop(pt: Point, form_bounds: Rect, slop: f64, rows: &[Row]) -> DropTarget {
    if !form_bounds.grow(slop).contains(pt) {
        return DropTarget::Outside;
    }
    match rows.iter().find(|row| row.bounds.contains(pt)) {
        Some(row) if row.fixed => DropTarget::AfterPrefix,
        Some(row) => DropTarget::Before(row.id),
        None => DropTarget::End,
    }
}
