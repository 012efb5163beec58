//! Rendered representation of elements and property panels.
//!
//! A render produces a [`View`]: a flat list of [`Control`]s that a
//! [`crate::surface::Surface`] mounts wholesale. Interactive controls carry
//! a [`ControlId`] instead of a callback; the host reports user input back
//! as `(ControlId, InputValue)` pairs, so replacing a view can never leave
//! a stale handler behind.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use chrono::NaiveDate;

/// Identifies which piece of element state an interactive control edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// The element's primary value (text, checkbox, date, selection).
    Value,
    /// First half of a name field.
    FirstName,
    /// Second half of a name field.
    LastName,
    /// The label entry in the property panel.
    Label,
    /// The "required field" checkbox in the property panel.
    Required,
    /// The default-value control in the property panel.
    Default,
    /// Text entry of the option editor row at the given index.
    OptionEntry(usize),
    /// Delete button of the option editor row at the given index.
    OptionDelete(usize),
    /// A plain action button.
    Action,
}

/// A value reported by the host for an interactive control.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Text(String),
    Bool(bool),
    Index(Option<usize>),
    Date(Option<NaiveDate>),
    Click,
}

/// A single rendered control.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Section heading (title text, panel header).
    Heading(String),
    /// Field label; `required` adds the required mark, `colon` the trailing colon.
    Label { text: String, required: bool, colon: bool },
    /// Single-line text input.
    TextInput { id: ControlId, value: String, disabled: bool },
    /// Multi-line text input.
    TextArea { id: ControlId, value: String },
    /// Checkbox input.
    Checkbox { id: ControlId, checked: bool },
    /// Date selection affordance provided by the host's date picker, seeded with `seed`.
    DatePicker { id: ControlId, seed: Option<NaiveDate> },
    /// Drop-down selection of `options`.
    Select { id: ControlId, options: Vec<String>, selected: Option<usize> },
    /// Radio group; `name` is unique per render so groups never interfere.
    RadioGroup { id: ControlId, name: String, options: Vec<String>, selected: Option<usize> },
    /// Push button.
    Button { id: ControlId, text: String },
    /// Horizontal rule.
    Rule,
    /// Inline validation message.
    Error(String),
    /// Visual marker that the element is selected in edit mode.
    SelectedMarker,
    /// Drag handle shown in edit mode.
    DragHandle,
}

/// Edit-mode decorations set on an element by its form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decorations {
    pub selected: bool,
    pub draggable: bool,
}

/// Ordered list of controls produced by one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    controls: Vec<Control>,
}

impl View {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, control: Control) {
        self.controls.push(control);
    }

    #[must_use]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// First control with the given id, if any.
    #[must_use]
    pub fn find(&self, id: ControlId) -> Option<&Control> {
        self.controls.iter().find(|c| c.id() == Some(id))
    }

    /// Error messages rendered in this view.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.controls
            .iter()
            .filter_map(|c| match c {
                Control::Error(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Control {
    /// The interactive id of this control, if it accepts input.
    #[must_use]
    pub fn id(&self) -> Option<ControlId> {
        match self {
            Self::TextInput { id, .. }
            | Self::TextArea { id, .. }
            | Self::Checkbox { id, .. }
            | Self::DatePicker { id, .. }
            | Self::Select { id, .. }
            | Self::RadioGroup { id, .. }
            | Self::Button { id, .. } => Some(*id),
            Self::Heading(_)
            | Self::Label { .. }
            | Self::Rule
            | Self::Error(_)
            | Self::SelectedMarker
            | Self::DragHandle => None,
        }
    }
}
