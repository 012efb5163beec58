//! Input model: form mode, keys, drag-and-drop events and the drag state machine.
//!
//! The drag collaborator reports five events. `Start` opens a gesture,
//! `Over`/`Leave` toggle whether the placeholder is showing (i.e. whether
//! the pointer is over a valid drop target), and `Drop`/`Cancel` close it.
//! [`DragState`] is the gesture tracked in between.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::element::{ElementId, Handle};
use crate::surface::Point;

/// Whether the form is being filled in or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Filling in the form (initial).
    #[default]
    View,
    /// Building the form: drag, select, keyboard navigation, property panel.
    Edit,
}

/// A keyboard key as reported by the browser (e.g. `"ArrowUp"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Navigation / edit command carried by this key, if any.
    #[must_use]
    pub fn command(&self) -> Option<KeyCommand> {
        match self.0.as_str() {
            "ArrowUp" | "Up" => Some(KeyCommand::SelectPrevious),
            "ArrowDown" | "Down" => Some(KeyCommand::SelectNext),
            "Delete" | "Del" | "Backspace" => Some(KeyCommand::RemoveSelected),
            _ => None,
        }
    }
}

/// What a key press asks the form to do in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    SelectPrevious,
    SelectNext,
    RemoveSelected,
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// An element already on the form (reorder, or drag-to-delete).
    Element(ElementId),
    /// A new element from the palette.
    Palette(Handle),
}

/// Events emitted by the drag-and-drop collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start(DragSource),
    /// The pointer entered a valid drop target; the placeholder shows.
    Over,
    /// The pointer left every valid drop target; the placeholder hides.
    Leave,
    /// The gesture was committed at the given page coordinate.
    Drop(Point),
    /// The gesture was aborted (e.g. Escape).
    Cancel,
}

/// Gesture in progress between `Start` and `Drop`/`Cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
        /// Whether the placeholder is showing, i.e. the pointer is over a valid target.
        placeholder_visible: bool,
    },
}

impl DragState {
    /// Advance the gesture. Returns the finished gesture on `Drop`.
    pub fn apply(&mut self, event: DragEvent) -> Option<(DragSource, bool, Point)> {
        match (event, *self) {
            (DragEvent::Start(source), _) => {
                *self = Self::Dragging { source, placeholder_visible: true };
                None
            }
            (DragEvent::Over, Self::Dragging { source, .. }) => {
                *self = Self::Dragging { source, placeholder_visible: true };
                None
            }
            (DragEvent::Leave, Self::Dragging { source, .. }) => {
                *self = Self::Dragging { source, placeholder_visible: false };
                None
            }
            (DragEvent::Drop(pt), Self::Dragging { source, placeholder_visible }) => {
                *self = Self::Idle;
                Some((source, placeholder_visible, pt))
            }
            (DragEvent::Cancel, _) => {
                *self = Self::Idle;
                None
            }
            (DragEvent::Over | DragEvent::Leave | DragEvent::Drop(_), Self::Idle) => None,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
