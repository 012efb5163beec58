//! Form elements: the shared lifecycle contract and the concrete field kinds.
//!
//! Every field is a [`FormElement`]: common state (label, required flag,
//! surfaced error, render binding, event bus) plus a [`FieldKind`] carrying
//! the variant-specific value. The [`Handle`] of the kind is the stable type
//! tag used by the registry and the serializer; it cannot change after
//! construction because the kind itself is never swapped out.
//!
//! Mutation always goes through setters, and every setter funnels into
//! `changed()`: re-validate if an error is currently shown, re-render, then
//! emit [`ElementEvent::Changed`].

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::consts::{MSG_MUST_CHECK, MSG_REQUIRED};
use crate::error::{FormError, SerializeError};
use crate::event::EventBus;
use crate::i18n::Translator;
use crate::options::OptionList;
use crate::serializer::{ElementEntry, Serializer};
use crate::surface::{Rect, Surface};
use crate::view::{Control, ControlId, Decorations, InputValue, View};

/// Identity of an element inside one form. Never serialized.
pub type ElementId = Uuid;

/// Stable type tag of a field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Title,
    Subtitle,
    Separator,
    NameField,
    EntryField,
    TextArea,
    Button,
    Checkbox,
    DatePicker,
    DropdownList,
    RadioList,
}

impl Handle {
    /// Every built-in handle, in palette order.
    pub const ALL: [Handle; 11] = [
        Self::Title,
        Self::Subtitle,
        Self::Separator,
        Self::NameField,
        Self::EntryField,
        Self::TextArea,
        Self::Button,
        Self::Checkbox,
        Self::DatePicker,
        Self::DropdownList,
        Self::RadioList,
    ];

    /// The wire tag, e.g. `"entryfield"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Separator => "separator",
            Self::NameField => "namefield",
            Self::EntryField => "entryfield",
            Self::TextArea => "textarea",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::DatePicker => "datepicker",
            Self::DropdownList => "dropdownlist",
            Self::RadioList => "radiolist",
        }
    }

    /// Display name (a localization key) used in property panel headers and the palette.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Subtitle => "Subtitle",
            Self::Separator => "Separator",
            Self::NameField => "Name Field",
            Self::EntryField => "Entry Field",
            Self::TextArea => "Text Area",
            Self::Button => "Button",
            Self::Checkbox => "Checkbox",
            Self::DatePicker => "Date Picker",
            Self::DropdownList => "Dropdown List",
            Self::RadioList => "Radio List",
        }
    }

    /// Decorative and action kinds carry no value and are never required.
    #[must_use]
    pub fn can_be_required(self) -> bool {
        !matches!(self, Self::Separator | Self::Button)
    }

    fn default_label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Subtitle => "Subtitle",
            Self::Separator => "Separator",
            Self::NameField => "Firstname/Lastname",
            Self::EntryField | Self::TextArea => "Label",
            Self::Button => "Button",
            Self::Checkbox => "Please send more spam to my inbox",
            Self::DatePicker => "Date",
            Self::DropdownList | Self::RadioList => "Please choose",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Handle {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| SerializeError::UnknownHandle(s.to_owned()))
    }
}

/// Variant-specific state of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Title { text: String },
    Subtitle { text: String },
    Separator,
    NameField { first: String, last: String },
    EntryField { text: String },
    TextArea { text: String },
    Button,
    Checkbox { checked: bool },
    DatePicker { date: Option<NaiveDate> },
    DropdownList(OptionList),
    RadioList(OptionList),
}

impl FieldKind {
    /// The empty state of the kind identified by `handle`.
    #[must_use]
    pub fn empty(handle: Handle) -> Self {
        match handle {
            Handle::Title => Self::Title { text: String::new() },
            Handle::Subtitle => Self::Subtitle { text: String::new() },
            Handle::Separator => Self::Separator,
            Handle::NameField => Self::NameField { first: String::new(), last: String::new() },
            Handle::EntryField => Self::EntryField { text: String::new() },
            Handle::TextArea => Self::TextArea { text: String::new() },
            Handle::Button => Self::Button,
            Handle::Checkbox => Self::Checkbox { checked: false },
            Handle::DatePicker => Self::DatePicker { date: None },
            Handle::DropdownList => Self::DropdownList(OptionList::new()),
            Handle::RadioList => Self::RadioList(OptionList::new()),
        }
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        match self {
            Self::Title { .. } => Handle::Title,
            Self::Subtitle { .. } => Handle::Subtitle,
            Self::Separator => Handle::Separator,
            Self::NameField { .. } => Handle::NameField,
            Self::EntryField { .. } => Handle::EntryField,
            Self::TextArea { .. } => Handle::TextArea,
            Self::Button => Handle::Button,
            Self::Checkbox { .. } => Handle::Checkbox,
            Self::DatePicker { .. } => Handle::DatePicker,
            Self::DropdownList(_) => Handle::DropdownList,
            Self::RadioList(_) => Handle::RadioList,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Title { text } | Self::Subtitle { text } | Self::EntryField { text } | Self::TextArea { text } => {
                Some(text)
            }
            _ => None,
        }
    }

    fn options_mut(&mut self) -> Option<&mut OptionList> {
        match self {
            Self::DropdownList(list) | Self::RadioList(list) => Some(list),
            _ => None,
        }
    }
}

/// Events emitted by an element to its subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEvent {
    /// Some piece of state changed; the element has already re-rendered.
    Changed(ElementId),
    /// A button element was pressed.
    Activated(ElementId),
}

/// A single field of a form.
pub struct FormElement {
    id: ElementId,
    label: String,
    required: bool,
    kind: FieldKind,
    error: Option<String>,
    locked: bool,
    decorations: Decorations,
    translator: Translator,
    surface: Option<Box<dyn Surface>>,
    events: EventBus<ElementEvent>,
}

impl FormElement {
    /// A fresh element of the given kind with its default label.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self::from_kind(FieldKind::empty(handle))
    }

    /// A fresh element wrapping `kind`, with the default label for its handle.
    #[must_use]
    pub fn from_kind(kind: FieldKind) -> Self {
        let handle = kind.handle();
        Self::from_parts(kind, handle.default_label().to_owned(), handle.can_be_required())
    }

    /// A fresh element from fully specified state.
    #[must_use]
    pub fn from_parts(kind: FieldKind, label: String, required: bool) -> Self {
        let handle = kind.handle();
        Self {
            id: Uuid::new_v4(),
            label,
            required: required && handle.can_be_required(),
            locked: matches!(handle, Handle::Title | Handle::Subtitle),
            kind,
            error: None,
            decorations: Decorations::default(),
            translator: Translator::identity(),
            surface: None,
            events: EventBus::new(),
        }
    }

    /// Title element showing `text`.
    #[must_use]
    pub fn title(text: impl Into<String>) -> Self {
        Self::from_kind(FieldKind::Title { text: text.into() })
    }

    /// Subtitle element showing `text`.
    #[must_use]
    pub fn subtitle(text: impl Into<String>) -> Self {
        Self::from_kind(FieldKind::Subtitle { text: text.into() })
    }

    // --- Queries ---

    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.kind.handle()
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Localized display name, e.g. "Entry Field".
    #[must_use]
    pub fn name(&self) -> String {
        self.translator.translate(self.handle().display_name())
    }

    /// The currently surfaced validation message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// On-page bounds of the bound surface.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.surface.as_ref().map(|s| s.bounds())
    }

    /// The control of this element that has keyboard focus, if any.
    #[must_use]
    pub fn focused_control(&self) -> Option<ControlId> {
        self.surface.as_ref().and_then(|s| s.focused())
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn decorations(&self) -> Decorations {
        self.decorations
    }

    /// Text value of title, subtitle, entry field and text area elements.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Title { text }
            | FieldKind::Subtitle { text }
            | FieldKind::EntryField { text }
            | FieldKind::TextArea { text } => Some(text),
            _ => None,
        }
    }

    /// Option list of drop-down and radio elements.
    #[must_use]
    pub fn options(&self) -> Option<&OptionList> {
        match &self.kind {
            FieldKind::DropdownList(list) | FieldKind::RadioList(list) => Some(list),
            _ => None,
        }
    }

    #[must_use]
    pub fn events(&self) -> &EventBus<ElementEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<ElementEvent> {
        &mut self.events
    }

    // --- Lifecycle ---

    /// Bind a render target and render into it.
    ///
    /// # Errors
    ///
    /// Fails if the element is already attached or the surface does not
    /// resolve to exactly one target.
    pub fn attach(&mut self, surface: Box<dyn Surface>) -> Result<(), FormError> {
        if self.surface.is_some() {
            return Err(FormError::AlreadyAttached(self.id));
        }
        let found = surface.target_count();
        if found != 1 {
            return Err(FormError::InvalidTarget { found });
        }
        self.surface = Some(surface);
        self.update();
        Ok(())
    }

    /// Release the render target and drop every listener.
    pub fn detach(&mut self) -> Option<Box<dyn Surface>> {
        self.events.clear();
        let mut surface = self.surface.take()?;
        surface.clear();
        Some(surface)
    }

    /// Re-render into the bound surface, replacing what was there. No-op while unattached.
    pub fn update(&mut self) {
        if self.surface.is_none() {
            return;
        }
        let view = self.render();
        if let Some(surface) = self.surface.as_mut() {
            surface.mount(view);
        }
    }

    /// The view this element currently renders.
    #[must_use]
    pub fn render(&self) -> View {
        let mut view = View::new();
        if self.decorations.draggable {
            view.push(Control::DragHandle);
        }
        if self.decorations.selected {
            view.push(Control::SelectedMarker);
        }
        match &self.kind {
            FieldKind::Title { text } | FieldKind::Subtitle { text } => {
                view.push(Control::TextInput { id: ControlId::Value, value: text.clone(), disabled: self.locked });
            }
            FieldKind::Separator => view.push(Control::Rule),
            FieldKind::NameField { first, last } => {
                view.push(self.label_control(true));
                view.push(Control::TextInput { id: ControlId::FirstName, value: first.clone(), disabled: false });
                view.push(Control::TextInput { id: ControlId::LastName, value: last.clone(), disabled: false });
            }
            FieldKind::EntryField { text } => {
                view.push(self.label_control(true));
                view.push(Control::TextInput { id: ControlId::Value, value: text.clone(), disabled: false });
            }
            FieldKind::TextArea { text } => {
                view.push(self.label_control(true));
                view.push(Control::TextArea { id: ControlId::Value, value: text.clone() });
            }
            FieldKind::Button => {
                view.push(Control::Button { id: ControlId::Action, text: self.translator.translate(&self.label) });
            }
            FieldKind::Checkbox { checked } => {
                view.push(Control::Checkbox { id: ControlId::Value, checked: *checked });
                view.push(self.label_control(false));
            }
            FieldKind::DatePicker { date } => {
                view.push(self.label_control(true));
                view.push(Control::DatePicker { id: ControlId::Value, seed: *date });
            }
            FieldKind::DropdownList(list) => {
                view.push(self.label_control(true));
                view.push(Control::Select {
                    id: ControlId::Value,
                    options: list.items().to_vec(),
                    selected: list.selected(),
                });
            }
            FieldKind::RadioList(list) => {
                view.push(self.label_control(true));
                view.push(Control::RadioGroup {
                    id: ControlId::Value,
                    name: format!("spiffform-radio-{}", Uuid::new_v4().simple()),
                    options: list.items().to_vec(),
                    selected: list.selected(),
                });
            }
        }
        if let Some(message) = &self.error {
            view.push(Control::Error(message.clone()));
        }
        view
    }

    fn label_control(&self, colon: bool) -> Control {
        Control::Label { text: self.translator.translate(&self.label), required: self.required, colon }
    }

    // --- Setters ---

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.changed();
    }

    /// Set the required flag. Ignored for kinds that are never required.
    pub fn set_required(&mut self, required: bool) {
        if !self.handle().can_be_required() {
            return;
        }
        self.required = required;
        self.changed();
    }

    /// Set the text of a text-valued element. Returns `false` for other kinds.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let Some(slot) = self.kind.text_mut() else {
            return false;
        };
        *slot = text.into();
        self.changed();
        true
    }

    /// Set both halves of a name field. Returns `false` for other kinds.
    pub fn set_name_parts(&mut self, first: impl Into<String>, last: impl Into<String>) -> bool {
        let FieldKind::NameField { first: f, last: l } = &mut self.kind else {
            return false;
        };
        *f = first.into();
        *l = last.into();
        self.changed();
        true
    }

    /// Check or uncheck a checkbox; `None` means check. Returns `false` for other kinds.
    pub fn select(&mut self, selected: Option<bool>) -> bool {
        let FieldKind::Checkbox { checked } = &mut self.kind else {
            return false;
        };
        *checked = selected.unwrap_or(true);
        self.changed();
        true
    }

    /// Store the date chosen in the date picker. Returns `false` for other kinds.
    pub fn set_date(&mut self, date: Option<NaiveDate>) -> bool {
        let FieldKind::DatePicker { date: slot } = &mut self.kind else {
            return false;
        };
        *slot = date;
        self.changed();
        true
    }

    /// Append an option to a drop-down or radio list. Returns `false` for other kinds.
    pub fn add_option(&mut self, option: impl Into<String>) -> bool {
        let Some(list) = self.kind.options_mut() else {
            return false;
        };
        list.add_option(option);
        self.changed();
        true
    }

    /// Select an option of a drop-down or radio list. Returns `false` for other kinds.
    pub fn select_option(&mut self, index: Option<usize>) -> bool {
        let Some(list) = self.kind.options_mut() else {
            return false;
        };
        list.select(index);
        self.changed();
        true
    }

    /// Surface (or clear) a validation message and re-render.
    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
        self.update();
    }

    /// Lock or unlock title/subtitle inputs.
    pub fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            self.locked = locked;
            self.update();
        }
    }

    pub fn set_decorations(&mut self, decorations: Decorations) {
        if self.decorations != decorations {
            self.decorations = decorations;
            self.update();
        }
    }

    pub fn set_translator(&mut self, translator: Translator) {
        self.translator = translator;
        self.update();
    }

    fn changed(&mut self) {
        if self.error.is_some() {
            self.validate();
        } else {
            self.update();
        }
        self.events.emit(&ElementEvent::Changed(self.id));
    }

    // --- Validation ---

    /// Check the element, surfacing a message on failure and clearing it on success.
    pub fn validate(&mut self) -> bool {
        let failure = self.failure();
        let message = failure.map(|key| self.translator.translate(key));
        self.set_error(message);
        failure.is_none()
    }

    /// The message key of the rule this element currently violates.
    fn failure(&self) -> Option<&'static str> {
        if !self.required {
            return None;
        }
        let failed = match &self.kind {
            FieldKind::Title { text }
            | FieldKind::Subtitle { text }
            | FieldKind::EntryField { text }
            | FieldKind::TextArea { text } => text.is_empty(),
            FieldKind::NameField { first, last } => first.is_empty() || last.is_empty(),
            FieldKind::Checkbox { checked } => return (!checked).then_some(MSG_MUST_CHECK),
            FieldKind::DatePicker { date } => date.is_none(),
            FieldKind::DropdownList(list) | FieldKind::RadioList(list) => {
                list.selected_label().is_none_or(str::is_empty)
            }
            FieldKind::Separator | FieldKind::Button => false,
        };
        failed.then_some(MSG_REQUIRED)
    }

    // --- Input routing ---

    /// Apply input from the element's own rendered controls. Returns `false`
    /// when the control/value pair does not apply to this element.
    pub fn handle_input(&mut self, control: ControlId, value: InputValue) -> bool {
        match (control, value) {
            (ControlId::Value, InputValue::Text(text)) => {
                if self.locked {
                    return false;
                }
                self.set_text(text)
            }
            (ControlId::FirstName, InputValue::Text(first)) => {
                let last = match &self.kind {
                    FieldKind::NameField { last, .. } => last.clone(),
                    _ => return false,
                };
                self.set_name_parts(first, last)
            }
            (ControlId::LastName, InputValue::Text(last)) => {
                let first = match &self.kind {
                    FieldKind::NameField { first, .. } => first.clone(),
                    _ => return false,
                };
                self.set_name_parts(first, last)
            }
            (ControlId::Value, InputValue::Bool(checked)) => self.select(Some(checked)),
            (ControlId::Value, InputValue::Date(date)) => self.set_date(date),
            (ControlId::Value, InputValue::Index(index)) => self.select_option(index),
            (ControlId::Action, InputValue::Click) if self.handle() == Handle::Button => {
                self.events.emit(&ElementEvent::Activated(self.id));
                true
            }
            _ => false,
        }
    }

    // --- Properties ---

    /// Append this element's property editor to `view`.
    pub fn update_properties(&self, view: &mut View) {
        let t = &self.translator;
        if self.handle() == Handle::Separator {
            return;
        }
        view.push(Control::Label { text: t.translate("Label"), required: false, colon: true });
        view.push(Control::TextInput { id: ControlId::Label, value: self.label.clone(), disabled: false });

        match &self.kind {
            FieldKind::Title { text } | FieldKind::Subtitle { text } | FieldKind::EntryField { text } => {
                view.push(Control::Label { text: t.translate("Default"), required: false, colon: true });
                view.push(Control::TextInput { id: ControlId::Default, value: text.clone(), disabled: false });
            }
            FieldKind::TextArea { text } => {
                view.push(Control::Label { text: t.translate("Default"), required: false, colon: true });
                view.push(Control::TextArea { id: ControlId::Default, value: text.clone() });
            }
            FieldKind::NameField { first, last } => {
                view.push(Control::Label { text: t.translate("Default"), required: false, colon: true });
                view.push(Control::TextInput { id: ControlId::FirstName, value: first.clone(), disabled: false });
                view.push(Control::TextInput { id: ControlId::LastName, value: last.clone(), disabled: false });
            }
            FieldKind::Checkbox { checked } => {
                view.push(Control::Label { text: t.translate("Default"), required: false, colon: true });
                view.push(Control::Checkbox { id: ControlId::Default, checked: *checked });
            }
            FieldKind::DatePicker { date } => {
                view.push(Control::Label { text: t.translate("Default"), required: false, colon: true });
                view.push(Control::DatePicker { id: ControlId::Default, seed: *date });
            }
            FieldKind::DropdownList(list) | FieldKind::RadioList(list) => {
                view.push(Control::Label { text: t.translate("Options"), required: false, colon: true });
                for (index, row) in list.editor_rows().into_iter().enumerate() {
                    view.push(Control::TextInput { id: ControlId::OptionEntry(index), value: row, disabled: false });
                    view.push(Control::Button { id: ControlId::OptionDelete(index), text: "-".to_owned() });
                }
                view.push(Control::Label { text: t.translate("Default"), required: false, colon: true });
                view.push(Control::Select {
                    id: ControlId::Default,
                    options: list.items().to_vec(),
                    selected: list.selected(),
                });
            }
            FieldKind::Separator | FieldKind::Button => {}
        }

        if self.handle().can_be_required() {
            view.push(Control::Checkbox { id: ControlId::Required, checked: self.required });
            view.push(Control::Label { text: t.translate("Required field"), required: false, colon: false });
        }
    }

    /// Apply input from the property panel. Returns `false` when the
    /// control/value pair does not apply to this element.
    pub fn apply_property(&mut self, control: ControlId, value: InputValue) -> bool {
        match (control, value) {
            (ControlId::Label, InputValue::Text(label)) => {
                self.set_label(label);
                true
            }
            (ControlId::Required, InputValue::Bool(required)) if self.handle().can_be_required() => {
                self.set_required(required);
                true
            }
            (ControlId::Default, InputValue::Text(text)) => self.set_text(text),
            (ControlId::Default, InputValue::Bool(checked)) => self.select(Some(checked)),
            (ControlId::Default, InputValue::Date(date)) => self.set_date(date),
            (ControlId::Default, InputValue::Index(index)) => self.select_option(index),
            (ControlId::FirstName | ControlId::LastName, value @ InputValue::Text(_)) => {
                self.handle_input(control, value)
            }
            (ControlId::OptionEntry(index), InputValue::Text(text)) => {
                let Some(list) = self.kind.options_mut() else {
                    return false;
                };
                list.edit_entry(index, &text);
                self.changed();
                true
            }
            (ControlId::OptionDelete(index), InputValue::Click) => {
                let Some(list) = self.kind.options_mut() else {
                    return false;
                };
                list.delete_entry(index);
                self.changed();
                true
            }
            _ => false,
        }
    }

    // --- Serialization ---

    /// Encode this element through the serializer's codec for its handle.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::UnknownHandle`] if the serializer has no codec for it.
    pub fn serialize(&self, serializer: &Serializer) -> Result<ElementEntry, SerializeError> {
        serializer.serialize(self)
    }

    /// Build a fresh element from a document entry.
    ///
    /// # Errors
    ///
    /// Fails on an unknown handle or a value of the wrong shape.
    pub fn deserialize(serializer: &Serializer, entry: &ElementEntry) -> Result<Self, SerializeError> {
        serializer.deserialize(entry)
    }
}

impl fmt::Debug for FormElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormElement")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .field("error", &self.error)
            .field("attached", &self.surface.is_some())
            .finish_non_exhaustive()
    }
}
