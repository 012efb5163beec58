//! The editable form: fixed header, ordered element sequence, mode state
//! machine, selection, drag-and-drop and validation.
//!
//! DESIGN
//! ======
//! The form owns a fixed prefix (title, subtitle, separator) that is never
//! reordered, removed or serialized as an element, followed by the mutable
//! element sequence whose order is both the display and submission order.
//! Every mutation re-arranges the canvas before returning, so the rendered
//! order always matches `elements`.
//!
//! Edit mode is an [`EditSession`]: the drag gesture in progress plus one
//! change subscription per element. Leaving edit mode drops every one of
//! those subscriptions, then serializes the form and loads the document
//! back, which rebuilds all elements without edit-mode decorations.
//!
//! Selection is an explicit element id, never recovered from rendered output.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::config::FormConfig;
use crate::consts::{DEFAULT_SUBTITLE, DEFAULT_TITLE, HINT_DELETE, HINT_DRAG, MSG_CORRECT_ERRORS};
use crate::element::{ElementEvent, ElementId, FormElement, Handle};
use crate::error::{FormError, SerializeError};
use crate::event::{EventBus, SubscriptionId};
use crate::hit::{DropTarget, Row, resolve_drop};
use crate::i18n::Translator;
use crate::input::{DragEvent, DragSource, DragState, Key, KeyCommand, Mode};
use crate::panel::PropertyPanel;
use crate::registry::Registry;
use crate::serializer::{FormDocument, Serializer};
use crate::surface::{Canvas, Point};
use crate::view::{ControlId, Decorations, InputValue};

// =============================================================================
// TYPES
// =============================================================================

/// Events emitted by a form to external listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    ModeChanged(Mode),
    SelectionChanged(Option<ElementId>),
    ElementAdded(ElementId),
    ElementMoved { id: ElementId, index: usize },
    ElementRemoved(ElementId),
    /// An element's state changed while in edit mode.
    ElementChanged(ElementId),
    /// The submit gesture ran; `valid` is the result of validating every element.
    Submit { valid: bool },
}

/// What the hint line under the form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    Hidden,
    /// "Drag form elements from the right".
    Drag,
    /// "Drop here to remove", while an element is being dragged.
    Delete,
    /// A transient message that reverts to the default hint when it expires.
    Message(String),
}

/// Edit-mode bindings. Dropping the session without `unwatch`ing every
/// element would leak listeners, so the form always tears it down explicitly.
#[derive(Default)]
struct EditSession {
    drag: DragState,
    changes: Rc<RefCell<Vec<ElementId>>>,
    subscriptions: Vec<(ElementId, SubscriptionId)>,
}

impl EditSession {
    fn watch(&mut self, element: &mut FormElement) {
        let changes = Rc::clone(&self.changes);
        let sub = element.events_mut().subscribe(move |event| {
            if let ElementEvent::Changed(id) = event {
                changes.borrow_mut().push(*id);
            }
        });
        self.subscriptions.push((element.id(), sub));
    }

    fn unwatch(&mut self, element: &mut FormElement) {
        let id = element.id();
        let events = element.events_mut();
        self.subscriptions.retain(|(eid, sub)| {
            if *eid == id {
                events.unsubscribe(*sub);
                false
            } else {
                true
            }
        });
    }

    fn take_changes(&self) -> Vec<ElementId> {
        let mut changes = std::mem::take(&mut *self.changes.borrow_mut());
        changes.dedup();
        changes
    }
}

pub struct Form {
    canvas: Box<dyn Canvas>,
    config: FormConfig,
    translator: Translator,
    registry: Registry,
    serializer: Rc<Serializer>,
    prefix: Vec<FormElement>,
    elements: Vec<FormElement>,
    mode: Mode,
    selected: Option<ElementId>,
    panel: Option<PropertyPanel>,
    session: Option<EditSession>,
    hint: Hint,
    hint_ttl_ms: Option<u64>,
    events: EventBus<FormEvent>,
}

impl Form {
    /// Create a form on `canvas` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidTarget`] if the canvas does not resolve to exactly one target.
    pub fn new(canvas: Box<dyn Canvas>) -> Result<Self, FormError> {
        Self::with_config(canvas, FormConfig::default())
    }

    /// Create a form on `canvas` with `config`.
    ///
    /// # Errors
    ///
    /// Fails if the canvas does not resolve to exactly one target or the
    /// configured locale has no catalog.
    pub fn with_config(canvas: Box<dyn Canvas>, config: FormConfig) -> Result<Self, FormError> {
        let found = canvas.target_count();
        if found != 1 {
            return Err(FormError::InvalidTarget { found });
        }
        let translator = config.translator()?;
        let mut form = Self {
            canvas,
            config,
            translator,
            registry: Registry::builtin(),
            serializer: Rc::new(Serializer::builtin()),
            prefix: Vec::new(),
            elements: Vec::new(),
            mode: Mode::View,
            selected: None,
            panel: None,
            session: None,
            hint: Hint::Hidden,
            hint_ttl_ms: None,
            events: EventBus::new(),
        };
        let title = form.translator.translate(DEFAULT_TITLE);
        let subtitle = form.translator.translate(DEFAULT_SUBTITLE);
        form.rebuild_prefix(&title, &subtitle)?;
        form.set_hint(Hint::Hidden);
        Ok(form)
    }

    /// Replace the registry used for palette drops and [`Form::create`].
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the serializer used by mode transitions and (de)serialization.
    #[must_use]
    pub fn with_serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = Rc::new(serializer);
        self
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.prefix.first().and_then(FormElement::text).unwrap_or("")
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        self.prefix.get(1).and_then(FormElement::text).unwrap_or("")
    }

    /// The fixed prefix: title, subtitle, separator.
    #[must_use]
    pub fn prefix(&self) -> &[FormElement] {
        &self.prefix
    }

    /// The mutable elements in display order.
    #[must_use]
    pub fn elements(&self) -> &[FormElement] {
        &self.elements
    }

    /// Look up a mutable or prefix element by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&FormElement> {
        find(&self.prefix, &self.elements, id)
    }

    /// Mutable access to an element, for programmatic setup through its setters.
    ///
    /// In edit mode the changes made here are queued: `ElementChanged` and the
    /// panel refresh only happen on the next form call. Use
    /// [`Form::with_element`] to publish them immediately.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut FormElement> {
        self.prefix
            .iter_mut()
            .chain(self.elements.iter_mut())
            .find(|e| e.id() == id)
    }

    /// Run `f` on an element, then publish the changes it made.
    pub fn with_element<R>(&mut self, id: ElementId, f: impl FnOnce(&mut FormElement) -> R) -> Option<R> {
        let result = self.element_mut(id).map(f);
        self.flush_changes();
        result
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selected
    }

    #[must_use]
    pub fn hint(&self) -> &Hint {
        &self.hint
    }

    #[must_use]
    pub fn panel(&self) -> Option<&PropertyPanel> {
        self.panel.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Whether a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.drag.is_dragging())
    }

    #[must_use]
    pub fn events(&self) -> &EventBus<FormEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<FormEvent> {
        &mut self.events
    }

    // --- Header ---

    pub fn set_title(&mut self, title: impl Into<String>) {
        if let Some(element) = self.prefix.first_mut() {
            element.set_text(title);
        }
        self.flush_changes();
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        if let Some(element) = self.prefix.get_mut(1) {
            element.set_text(subtitle);
        }
        self.flush_changes();
    }

    // --- Panel ---

    /// Bind the property panel. At most one panel per form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::PanelAlreadyBound`] if a panel is already bound.
    pub fn bind_panel(&mut self, mut panel: PropertyPanel) -> Result<(), FormError> {
        if self.panel.is_some() {
            return Err(FormError::PanelAlreadyBound);
        }
        panel.set_translator(self.translator.clone());
        self.panel = Some(panel);
        self.refresh_panel();
        Ok(())
    }

    // --- Sequence mutation ---

    /// Construct a fresh, unattached element through the registry.
    #[must_use]
    pub fn create(&self, handle: Handle) -> Option<FormElement> {
        self.registry.create(handle)
    }

    /// Add `element` at the end of the mutable sequence.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadyAttached`] if the element is bound to another surface.
    pub fn append(&mut self, element: FormElement) -> Result<ElementId, FormError> {
        let index = self.elements.len();
        self.insert(index, element)
    }

    /// Insert `element` where a drop at `pt` landed. Drops outside the form
    /// are ignored and the element is discarded; `Ok(None)` reports that.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadyAttached`] if the element is bound to another surface.
    pub fn insert_at(&mut self, pt: Point, element: FormElement) -> Result<Option<ElementId>, FormError> {
        let index = match self.resolve(pt) {
            DropTarget::Outside => {
                debug!(x = pt.x, y = pt.y, "drop outside form ignored");
                return Ok(None);
            }
            DropTarget::AfterPrefix => 0,
            DropTarget::End => self.elements.len(),
            DropTarget::Before(target) => self.index_of(target).unwrap_or(self.elements.len()),
        };
        self.insert(index, element).map(Some)
    }

    fn insert(&mut self, index: usize, element: FormElement) -> Result<ElementId, FormError> {
        let element = self.adopt(element)?;
        let id = element.id();
        debug!(%id, handle = %element.handle(), index, "element inserted");
        self.elements.insert(index.min(self.elements.len()), element);
        self.arrange();
        self.events.emit(&FormEvent::ElementAdded(id));
        Ok(id)
    }

    /// Remove a mutable element, returning it detached. Prefix elements and
    /// unknown ids yield `None`.
    pub fn remove(&mut self, id: ElementId) -> Option<FormElement> {
        let index = self.index_of(id)?;
        if self.selected == Some(id) {
            self.unselect();
        }
        let mut element = self.elements.remove(index);
        self.release(&mut element);
        self.arrange();
        debug!(%id, "element removed");
        self.events.emit(&FormEvent::ElementRemoved(id));
        Some(element)
    }

    /// Move a mutable element to where a drop at `pt` landed.
    fn move_to(&mut self, id: ElementId, pt: Point) {
        let Some(from) = self.index_of(id) else {
            return;
        };
        let to = match self.resolve(pt) {
            DropTarget::Outside => {
                debug!(%id, "move outside form ignored");
                return;
            }
            DropTarget::AfterPrefix => 0,
            DropTarget::End => self.elements.len() - 1,
            DropTarget::Before(target) => match self.index_of(target) {
                Some(t) if t > from => t - 1,
                Some(t) => t,
                None => from,
            },
        };
        let element = self.elements.remove(from);
        self.elements.insert(to, element);
        self.arrange();
        self.events.emit(&FormEvent::ElementMoved { id, index: to });
    }

    // --- Selection ---

    /// Select a mutable element. Only possible in edit mode.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.mode != Mode::Edit || self.index_of(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        self.decorate();
        self.refresh_panel();
        self.events.emit(&FormEvent::SelectionChanged(Some(id)));
        true
    }

    /// Clear the selection and hide the property panel.
    pub fn unselect(&mut self) {
        let had_selection = self.selected.take().is_some();
        if let Some(panel) = self.panel.as_mut() {
            panel.hide();
        }
        self.decorate();
        if had_selection {
            self.events.emit(&FormEvent::SelectionChanged(None));
        }
    }

    // --- Mode ---

    /// Switch to edit mode: unlock the header, show the drag hint, start the
    /// edit session and show the panel for the current selection.
    pub fn enter_edit(&mut self) {
        if self.mode == Mode::Edit {
            return;
        }
        self.mode = Mode::Edit;
        let mut session = EditSession::default();
        for element in self.prefix.iter_mut().chain(self.elements.iter_mut()) {
            session.watch(element);
        }
        self.session = Some(session);
        self.lock_headings();
        self.decorate();
        self.set_hint(Hint::Drag);
        self.refresh_panel();
        info!(elements = self.elements.len(), "form entered edit mode");
        self.events.emit(&FormEvent::ModeChanged(Mode::Edit));
    }

    /// Switch back to view mode: save, drop every edit-mode binding, rebuild
    /// the header and load the saved document back in.
    ///
    /// # Errors
    ///
    /// Fails if an element has no codec or the saved document cannot be loaded.
    pub fn leave_edit(&mut self) -> Result<(), FormError> {
        if self.mode == Mode::View {
            return Ok(());
        }
        let document = self.serialize()?;
        if let Some(mut session) = self.session.take() {
            for element in self.prefix.iter_mut().chain(self.elements.iter_mut()) {
                session.unwatch(element);
            }
            debug!(leaked = session.subscriptions.len(), "edit session closed");
        }
        self.unselect();
        self.mode = Mode::View;
        self.rebuild_prefix(&document.title, &document.subtitle)?;
        self.deserialize(&document)?;
        self.set_hint(Hint::Hidden);
        info!(elements = self.elements.len(), "form left edit mode");
        self.events.emit(&FormEvent::ModeChanged(Mode::View));
        Ok(())
    }

    // --- Input ---

    /// Handle a key press. Only arrow up/down and delete are bound, and only
    /// in edit mode. Delete is ignored while a control has keyboard focus.
    pub fn on_key(&mut self, key: &Key) -> bool {
        if self.mode != Mode::Edit || self.elements.is_empty() {
            return false;
        }
        let Some(command) = key.command() else {
            return false;
        };
        let current = self.selected.and_then(|id| self.index_of(id));
        let last = self.elements.len() - 1;
        let next = match (command, current) {
            (KeyCommand::RemoveSelected, _) => {
                if self.control_has_focus() {
                    return false;
                }
                return self.selected.and_then(|id| self.remove(id)).is_some();
            }
            (KeyCommand::SelectPrevious, Some(i)) => i.saturating_sub(1),
            (KeyCommand::SelectPrevious, None) => last,
            (KeyCommand::SelectNext, Some(i)) => (i + 1).min(last),
            (KeyCommand::SelectNext, None) => 0,
        };
        let id = self.elements[next].id();
        self.select(id)
    }

    /// Feed a drag-and-drop event. Ignored outside edit mode.
    ///
    /// # Errors
    ///
    /// Propagates binding errors from inserting a palette element.
    pub fn on_drag(&mut self, event: DragEvent) -> Result<(), FormError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let finished = session.drag.apply(event);
        match event {
            DragEvent::Start(DragSource::Element(_)) => self.set_hint(Hint::Delete),
            DragEvent::Cancel => self.set_hint(Hint::Drag),
            _ => {}
        }
        let Some((source, placeholder_visible, pt)) = finished else {
            return Ok(());
        };
        self.set_hint(Hint::Drag);
        match (source, placeholder_visible) {
            (DragSource::Element(id), true) => self.move_to(id, pt),
            (DragSource::Element(id), false) => {
                debug!(%id, "dragged off every target; removing");
                self.remove(id);
            }
            (DragSource::Palette(handle), true) => {
                if let Some(element) = self.registry.create(handle) {
                    self.insert_at(pt, element)?;
                }
            }
            (DragSource::Palette(handle), false) => debug!(%handle, "palette drop outside target ignored"),
        }
        Ok(())
    }

    /// Route input from an element's rendered controls.
    pub fn element_input(&mut self, id: ElementId, control: ControlId, value: InputValue) -> bool {
        let applied = self
            .element_mut(id)
            .is_some_and(|element| element.handle_input(control, value));
        self.flush_changes();
        applied
    }

    /// Route input from the property panel to the element it displays.
    pub fn panel_input(&mut self, control: ControlId, value: InputValue) -> bool {
        let Some(id) = self.panel.as_ref().and_then(PropertyPanel::current) else {
            return false;
        };
        let applied = self
            .element_mut(id)
            .is_some_and(|element| element.apply_property(control, value));
        self.flush_changes();
        applied
    }

    // --- Validation ---

    /// Validate the header and every element. Shows the transient
    /// "please correct" hint when anything fails.
    pub fn validate_all(&mut self) -> bool {
        let mut valid = true;
        for element in self.prefix.iter_mut().chain(self.elements.iter_mut()) {
            valid &= element.validate();
        }
        if valid {
            if matches!(self.hint, Hint::Message(_)) {
                self.set_hint(self.default_hint());
            }
        } else {
            self.set_hint(Hint::Message(MSG_CORRECT_ERRORS.to_owned()));
        }
        self.flush_changes();
        valid
    }

    /// Validate everything, then tell listeners the form was submitted.
    /// Listeners decide what to do with an invalid form.
    pub fn submit(&mut self) -> bool {
        let valid = self.validate_all();
        debug!(valid, "form submitted");
        self.events.emit(&FormEvent::Submit { valid });
        valid
    }

    /// Advance the transient hint countdown by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u64) {
        let Some(ttl) = self.hint_ttl_ms else {
            return;
        };
        let remaining = ttl.saturating_sub(elapsed_ms);
        if remaining == 0 {
            self.set_hint(self.default_hint());
        } else {
            self.hint_ttl_ms = Some(remaining);
        }
    }

    // --- Serialization ---

    /// Serialize the form with its serializer.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::UnknownHandle`] if an element has no codec.
    pub fn serialize(&self) -> Result<FormDocument, SerializeError> {
        self.serializer.serialize_form(self)
    }

    /// Replace the form's content with `document`.
    ///
    /// # Errors
    ///
    /// Fails without touching the form if any entry cannot be decoded.
    pub fn deserialize(&mut self, document: &FormDocument) -> Result<(), FormError> {
        let serializer = Rc::clone(&self.serializer);
        serializer.deserialize_form(self, document)
    }

    /// Replace header text and every mutable element. Used by the serializer.
    pub(crate) fn load(&mut self, title: &str, subtitle: &str, elements: Vec<FormElement>) -> Result<(), FormError> {
        self.unselect();
        for mut element in std::mem::take(&mut self.elements) {
            self.release(&mut element);
        }
        self.set_title(title);
        self.set_subtitle(subtitle);
        for element in elements {
            let element = self.adopt(element)?;
            self.elements.push(element);
        }
        self.arrange();
        Ok(())
    }

    // --- Internals ---

    fn rebuild_prefix(&mut self, title: &str, subtitle: &str) -> Result<(), FormError> {
        for mut element in std::mem::take(&mut self.prefix) {
            self.release(&mut element);
        }
        let header = [FormElement::title(title), FormElement::subtitle(subtitle), FormElement::new(Handle::Separator)];
        for element in header {
            let element = self.adopt(element)?;
            self.prefix.push(element);
        }
        self.arrange();
        Ok(())
    }

    /// Bind a new element to a fresh canvas slot and to the edit session.
    fn adopt(&mut self, mut element: FormElement) -> Result<FormElement, FormError> {
        if element.is_attached() {
            return Err(FormError::AlreadyAttached(element.id()));
        }
        element.set_translator(self.translator.clone());
        if matches!(element.handle(), Handle::Title | Handle::Subtitle) {
            element.set_locked(self.mode == Mode::View);
        }
        let surface = self.canvas.create_surface(element.id());
        if let Err(e) = element.attach(surface) {
            self.canvas.release_surface(element.id());
            return Err(e);
        }
        if let Some(session) = self.session.as_mut() {
            session.watch(&mut element);
        }
        Ok(element)
    }

    /// Undo [`Form::adopt`].
    fn release(&mut self, element: &mut FormElement) {
        if let Some(session) = self.session.as_mut() {
            session.unwatch(element);
        }
        element.detach();
        self.canvas.release_surface(element.id());
    }

    fn arrange(&mut self) {
        let order: Vec<ElementId> = self
            .prefix
            .iter()
            .chain(self.elements.iter())
            .map(FormElement::id)
            .collect();
        self.canvas.arrange(&order);
        self.decorate();
    }

    fn decorate(&mut self) {
        let editing = self.mode == Mode::Edit;
        for element in &mut self.elements {
            element.set_decorations(Decorations {
                selected: editing && self.selected == Some(element.id()),
                draggable: editing,
            });
        }
    }

    fn lock_headings(&mut self) {
        let locked = self.mode == Mode::View;
        for element in self.prefix.iter_mut().chain(self.elements.iter_mut()) {
            if matches!(element.handle(), Handle::Title | Handle::Subtitle) {
                element.set_locked(locked);
            }
        }
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    fn resolve(&self, pt: Point) -> DropTarget {
        let rows: Vec<Row> = self
            .prefix
            .iter()
            .map(|e| (e, true))
            .chain(self.elements.iter().map(|e| (e, false)))
            .filter_map(|(e, fixed)| e.bounds().map(|bounds| Row { id: e.id(), bounds, fixed }))
            .collect();
        resolve_drop(pt, self.canvas.bounds(), self.config.drop_slop_px, &rows)
    }

    /// True while any prefix, element or panel control has keyboard focus.
    fn control_has_focus(&self) -> bool {
        self.panel.as_ref().and_then(PropertyPanel::focused_control).is_some()
            || self.prefix.iter().chain(&self.elements).any(|e| e.focused_control().is_some())
    }

    fn default_hint(&self) -> Hint {
        match self.mode {
            Mode::Edit => Hint::Drag,
            Mode::View => Hint::Hidden,
        }
    }

    fn set_hint(&mut self, hint: Hint) {
        self.hint_ttl_ms = match hint {
            Hint::Message(_) => Some(self.config.hint_dismiss_ms),
            _ => None,
        };
        let text = match &hint {
            Hint::Hidden => None,
            Hint::Drag => Some(self.translator.translate(HINT_DRAG)),
            Hint::Delete => Some(self.translator.translate(HINT_DELETE)),
            Hint::Message(key) => Some(self.translator.translate(key)),
        };
        self.canvas.show_hint(text.as_deref());
        self.hint = hint;
    }

    /// Show the panel for the selection, or hide it.
    fn refresh_panel(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let shown = match (self.mode, self.selected) {
            (Mode::Edit, Some(id)) => find(&self.prefix, &self.elements, id),
            _ => None,
        };
        match shown {
            Some(element) => panel.show_properties(element),
            None => panel.hide(),
        }
    }

    /// Drain change notifications collected by the edit session: re-emit them
    /// and re-render the panel if it shows a changed element.
    fn flush_changes(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let changes = session.take_changes();
        let shown = self.panel.as_ref().and_then(PropertyPanel::current);
        for id in changes {
            self.events.emit(&FormEvent::ElementChanged(id));
            if shown == Some(id) {
                self.refresh_panel();
            }
        }
    }
}

fn find<'a>(prefix: &'a [FormElement], elements: &'a [FormElement], id: ElementId) -> Option<&'a FormElement> {
    prefix.iter().chain(elements.iter()).find(|e| e.id() == id)
}
