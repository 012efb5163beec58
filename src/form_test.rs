use std::cell::RefCell;
use std::rc::Rc;

use crate::surface::{MemoryCanvas, MemorySurface};

use super::*;

const CORRECT: &str = "Please correct the errors above.";

fn form() -> (Form, MemoryCanvas) {
    let canvas = MemoryCanvas::new();
    (Form::new(Box::new(canvas.clone())).unwrap(), canvas)
}

/// A form holding three entry fields labelled A, B and C.
fn abc() -> (Form, MemoryCanvas, [ElementId; 3]) {
    let (mut form, canvas) = form();
    let ids = ["A", "B", "C"].map(|label| {
        let mut element = FormElement::new(Handle::EntryField);
        element.set_label(label);
        form.append(element).unwrap()
    });
    (form, canvas, ids)
}

fn labels(form: &Form) -> Vec<&str> {
    form.elements().iter().map(FormElement::label).collect()
}

fn record(form: &mut Form) -> Rc<RefCell<Vec<FormEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    form.events_mut().subscribe(move |e| sink.borrow_mut().push(*e));
    seen
}

fn with_panel(form: &mut Form) -> MemorySurface {
    let surface = MemorySurface::new();
    form.bind_panel(PropertyPanel::new(Box::new(surface.clone())).unwrap()).unwrap();
    surface
}

/// Canvas row of the mutable element at `index`, below the three prefix rows.
fn row(canvas: &MemoryCanvas, index: usize) -> Point {
    canvas.row_center(index + 3)
}

fn drag(form: &mut Form, source: DragSource, events: &[DragEvent]) {
    form.on_drag(DragEvent::Start(source)).unwrap();
    for event in events {
        form.on_drag(*event).unwrap();
    }
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_form_has_fixed_prefix() {
    let (form, canvas) = form();
    assert_eq!(form.mode(), Mode::View);
    assert_eq!(form.title(), "Untitled");
    assert_eq!(form.subtitle(), "Please fill out the form.");
    let handles: Vec<Handle> = form.prefix().iter().map(FormElement::handle).collect();
    assert_eq!(handles, vec![Handle::Title, Handle::Subtitle, Handle::Separator]);
    assert!(form.elements().is_empty());
    assert_eq!(canvas.order().len(), 3);
    assert_eq!(canvas.hint(), None);
    assert!(form.prefix()[0].is_locked());
}

#[test]
fn new_rejects_ambiguous_canvas() {
    assert!(matches!(
        Form::new(Box::new(MemoryCanvas::with_targets(0))),
        Err(FormError::InvalidTarget { found: 0 })
    ));
    assert!(matches!(
        Form::new(Box::new(MemoryCanvas::with_targets(2))),
        Err(FormError::InvalidTarget { found: 2 })
    ));
}

#[test]
fn localized_defaults() {
    let config = FormConfig::from_parts("de", 5_000, 40.0).unwrap();
    let form = Form::with_config(Box::new(MemoryCanvas::new()), config).unwrap();
    assert_eq!(form.title(), "Ohne Titel");
    assert_eq!(form.subtitle(), "Formular bitte ausfüllen.");
}

#[test]
fn set_title_and_subtitle() {
    let (mut form, canvas) = form();
    form.set_title("Feedback");
    form.set_subtitle("Tell us");
    assert_eq!(form.title(), "Feedback");
    assert_eq!(form.subtitle(), "Tell us");
    let title = canvas.surface(form.prefix()[0].id()).unwrap();
    assert!(matches!(
        title.view().find(ControlId::Value),
        Some(crate::view::Control::TextInput { value, disabled: true, .. }) if value == "Feedback"
    ));
}

#[test]
fn create_uses_registry() {
    let (form, _) = form();
    let element = form.create(Handle::RadioList).unwrap();
    assert_eq!(element.handle(), Handle::RadioList);
    assert!(!element.is_attached());
}

// =============================================================
// append / remove / insert_at
// =============================================================

#[test]
fn append_keeps_order_and_canvas_in_sync() {
    let (form, canvas, [a, b, c]) = abc();
    assert_eq!(labels(&form), vec!["A", "B", "C"]);
    assert_eq!(canvas.order()[3..], [a, b, c]);
    assert_eq!(canvas.slot_count(), 6);
    assert!(form.elements().iter().all(FormElement::is_attached));
}

#[test]
fn append_then_remove_first() {
    let (mut form, canvas) = form();
    let a = form.append(FormElement::new(Handle::EntryField)).unwrap();
    let b = form.append(FormElement::new(Handle::Checkbox)).unwrap();
    let removed = form.remove(a).unwrap();
    assert_eq!(removed.id(), a);
    assert!(!removed.is_attached());
    assert_eq!(form.elements().iter().map(FormElement::id).collect::<Vec<_>>(), vec![b]);
    assert!(canvas.surface(a).is_none());
    assert_eq!(canvas.order().len(), 4);
}

#[test]
fn append_rejects_attached_element() {
    let (mut form, _) = form();
    let mut element = FormElement::new(Handle::EntryField);
    element.attach(Box::new(MemorySurface::new())).unwrap();
    let id = element.id();
    assert!(matches!(form.append(element), Err(FormError::AlreadyAttached(e)) if e == id));
    assert!(form.elements().is_empty());
}

#[test]
fn prefix_cannot_be_removed() {
    let (mut form, _) = form();
    let title = form.prefix()[0].id();
    assert!(form.remove(title).is_none());
    assert_eq!(form.prefix().len(), 3);
}

#[test]
fn remove_unknown_is_none() {
    let (mut form, _, _) = abc();
    assert!(form.remove(uuid::Uuid::new_v4()).is_none());
    assert_eq!(form.elements().len(), 3);
}

#[test]
fn insert_before_hovered_element() {
    let (mut form, canvas, _) = abc();
    let mut element = FormElement::new(Handle::EntryField);
    element.set_label("X");
    let id = form.insert_at(row(&canvas, 1), element).unwrap();
    assert!(id.is_some());
    assert_eq!(labels(&form), vec!["A", "X", "B", "C"]);
}

#[test]
fn insert_on_prefix_goes_first() {
    let (mut form, canvas, _) = abc();
    let mut element = FormElement::new(Handle::EntryField);
    element.set_label("X");
    form.insert_at(canvas.row_center(0), element).unwrap();
    assert_eq!(labels(&form), vec!["X", "A", "B", "C"]);
}

#[test]
fn insert_below_elements_appends() {
    let (mut form, canvas, _) = abc();
    let mut element = FormElement::new(Handle::EntryField);
    element.set_label("X");
    form.insert_at(row(&canvas, 3), element).unwrap();
    assert_eq!(labels(&form), vec!["A", "B", "C", "X"]);
}

#[test]
fn insert_outside_is_ignored() {
    let (mut form, canvas, _) = abc();
    let result = form.insert_at(Point::new(300.0, -500.0), FormElement::new(Handle::EntryField)).unwrap();
    assert!(result.is_none());
    assert_eq!(labels(&form), vec!["A", "B", "C"]);
    assert_eq!(canvas.slot_count(), 6);
}

#[test]
fn insert_into_empty_form() {
    let (mut form, canvas) = form();
    let id = form.insert_at(row(&canvas, 0), FormElement::new(Handle::Button)).unwrap();
    assert_eq!(form.elements().len(), 1);
    assert_eq!(form.elements()[0].id(), id.unwrap());
}

#[test]
fn sequence_events() {
    let (mut form, _) = form();
    let seen = record(&mut form);
    let a = form.append(FormElement::new(Handle::EntryField)).unwrap();
    form.remove(a);
    assert_eq!(*seen.borrow(), vec![FormEvent::ElementAdded(a), FormEvent::ElementRemoved(a)]);
}

// =============================================================
// Mode transitions
// =============================================================

#[test]
fn enter_edit_unlocks_and_decorates() {
    let (mut form, canvas, _) = abc();
    let seen = record(&mut form);
    form.enter_edit();
    assert_eq!(form.mode(), Mode::Edit);
    assert_eq!(*form.hint(), Hint::Drag);
    assert_eq!(canvas.hint().as_deref(), Some("Drag form elements from the right"));
    assert!(!form.prefix()[0].is_locked());
    assert!(!form.prefix()[1].is_locked());
    assert!(form.elements().iter().all(|e| e.decorations().draggable));
    assert_eq!(*seen.borrow(), vec![FormEvent::ModeChanged(Mode::Edit)]);
}

#[test]
fn enter_edit_twice_is_noop() {
    let (mut form, _, _) = abc();
    form.enter_edit();
    form.enter_edit();
    assert_eq!(form.elements()[0].events().listener_count(), 1);
}

#[test]
fn leave_edit_without_changes_keeps_document() {
    let (mut form, _, _) = abc();
    form.set_title("Feedback");
    let before = form.serialize().unwrap();
    form.enter_edit();
    form.leave_edit().unwrap();
    assert_eq!(form.serialize().unwrap(), before);
}

#[test]
fn leave_edit_clears_edit_state() {
    let (mut form, canvas, [a, _, _]) = abc();
    let panel = with_panel(&mut form);
    form.enter_edit();
    form.select(a);
    assert!(panel.is_visible());

    form.leave_edit().unwrap();
    assert_eq!(form.mode(), Mode::View);
    assert_eq!(form.selection(), None);
    assert!(!panel.is_visible());
    assert_eq!(*form.hint(), Hint::Hidden);
    assert_eq!(canvas.hint(), None);
    assert!(form.prefix()[0].is_locked());
    for element in form.prefix().iter().chain(form.elements()) {
        assert_eq!(element.events().listener_count(), 0);
        assert_eq!(element.decorations(), Decorations::default());
    }
    assert_eq!(canvas.slot_count(), 6);
}

#[test]
fn edits_survive_leaving_edit_mode() {
    let (mut form, _, [a, _, _]) = abc();
    form.enter_edit();
    let title = form.prefix()[0].id();
    assert!(form.element_input(title, ControlId::Value, InputValue::Text("Survey".into())));
    assert!(form.element_input(a, ControlId::Value, InputValue::Text("typed".into())));
    form.leave_edit().unwrap();
    assert_eq!(form.title(), "Survey");
    assert_eq!(form.elements()[0].text(), Some("typed"));
}

#[test]
fn title_is_read_only_in_view_mode() {
    let (mut form, _) = form();
    let title = form.prefix()[0].id();
    assert!(!form.element_input(title, ControlId::Value, InputValue::Text("x".into())));
    assert_eq!(form.title(), "Untitled");
}

#[test]
fn leave_edit_in_view_mode_is_noop() {
    let (mut form, _, _) = abc();
    let seen = record(&mut form);
    form.leave_edit().unwrap();
    assert!(seen.borrow().is_empty());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selection_requires_edit_mode() {
    let (mut form, _, [a, _, _]) = abc();
    assert!(!form.select(a));
    form.enter_edit();
    assert!(form.select(a));
    assert_eq!(form.selection(), Some(a));
    assert!(form.element(a).unwrap().decorations().selected);
}

#[test]
fn prefix_cannot_be_selected() {
    let (mut form, _, _) = abc();
    form.enter_edit();
    let title = form.prefix()[0].id();
    assert!(!form.select(title));
    assert_eq!(form.selection(), None);
}

#[test]
fn selecting_moves_marker() {
    let (mut form, _, [a, b, _]) = abc();
    form.enter_edit();
    form.select(a);
    form.select(b);
    assert!(!form.element(a).unwrap().decorations().selected);
    assert!(form.element(b).unwrap().decorations().selected);
}

#[test]
fn removing_selected_clears_selection_and_panel() {
    let (mut form, _, [a, _, _]) = abc();
    let panel = with_panel(&mut form);
    form.enter_edit();
    form.select(a);
    form.remove(a);
    assert_eq!(form.selection(), None);
    assert!(!panel.is_visible());
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn arrows_walk_the_selection() {
    let (mut form, _, [a, b, c]) = abc();
    form.enter_edit();
    assert!(form.on_key(&Key::new("ArrowDown")));
    assert_eq!(form.selection(), Some(a));
    form.on_key(&Key::new("ArrowDown"));
    form.on_key(&Key::new("ArrowDown"));
    assert_eq!(form.selection(), Some(c));
    form.on_key(&Key::new("ArrowDown"));
    assert_eq!(form.selection(), Some(c));
    form.on_key(&Key::new("ArrowUp"));
    assert_eq!(form.selection(), Some(b));
}

#[test]
fn arrow_up_without_selection_picks_last() {
    let (mut form, _, [_, _, c]) = abc();
    form.enter_edit();
    form.on_key(&Key::new("ArrowUp"));
    assert_eq!(form.selection(), Some(c));
}

#[test]
fn delete_removes_selected() {
    let (mut form, _, [_, b, _]) = abc();
    form.enter_edit();
    form.select(b);
    assert!(form.on_key(&Key::new("Delete")));
    assert_eq!(labels(&form), vec!["A", "C"]);
    assert_eq!(form.selection(), None);
}

#[test]
fn delete_without_selection_does_nothing() {
    let (mut form, _, _) = abc();
    form.enter_edit();
    assert!(!form.on_key(&Key::new("Backspace")));
    assert_eq!(form.elements().len(), 3);
}

#[test]
fn delete_ignored_while_a_control_has_focus() {
    let (mut form, canvas, [a, _, _]) = abc();
    form.enter_edit();
    form.select(a);
    canvas.surface(a).unwrap().set_focused(Some(ControlId::Value));
    assert!(!form.on_key(&Key::new("Backspace")));
    assert_eq!(form.elements().len(), 3);
}

#[test]
fn delete_ignored_while_typing_in_the_title() {
    let (mut form, canvas, [a, _, _]) = abc();
    form.enter_edit();
    form.select(a);
    let title = form.prefix()[0].id();
    canvas.surface(title).unwrap().set_focused(Some(ControlId::Value));
    assert!(!form.on_key(&Key::new("Backspace")));
    assert_eq!(labels(&form), vec!["A", "B", "C"]);
}

#[test]
fn delete_ignored_while_another_element_has_focus() {
    let (mut form, canvas, [a, b, _]) = abc();
    form.enter_edit();
    form.select(a);
    canvas.surface(b).unwrap().set_focused(Some(ControlId::Value));
    assert!(!form.on_key(&Key::new("Delete")));
    assert_eq!(labels(&form), vec!["A", "B", "C"]);
}

#[test]
fn delete_ignored_while_panel_has_focus() {
    let (mut form, _, [a, _, _]) = abc();
    let panel = with_panel(&mut form);
    form.enter_edit();
    form.select(a);
    panel.set_focused(Some(ControlId::Label));
    assert!(!form.on_key(&Key::new("Delete")));
    assert_eq!(form.elements().len(), 3);
}

#[test]
fn keys_ignored_in_view_mode() {
    let (mut form, _, _) = abc();
    assert!(!form.on_key(&Key::new("ArrowDown")));
    assert_eq!(form.selection(), None);
}

#[test]
fn unbound_keys_ignored() {
    let (mut form, _, _) = abc();
    form.enter_edit();
    assert!(!form.on_key(&Key::new("Enter")));
}

// =============================================================
// Drag and drop
// =============================================================

#[test]
fn dragging_shows_delete_hint() {
    let (mut form, canvas, [a, _, _]) = abc();
    form.enter_edit();
    form.on_drag(DragEvent::Start(DragSource::Element(a))).unwrap();
    assert!(form.is_dragging());
    assert_eq!(*form.hint(), Hint::Delete);
    assert_eq!(canvas.hint().as_deref(), Some("Drop here to remove"));
}

#[test]
fn drop_on_later_element_moves_before_it() {
    let (mut form, canvas, [a, b, c]) = abc();
    form.enter_edit();
    let seen = record(&mut form);
    drag(&mut form, DragSource::Element(a), &[DragEvent::Over, DragEvent::Drop(row(&canvas, 2))]);
    assert_eq!(labels(&form), vec!["B", "A", "C"]);
    assert_eq!(canvas.order()[3..], [b, a, c]);
    assert_eq!(*form.hint(), Hint::Drag);
    assert!(seen.borrow().contains(&FormEvent::ElementMoved { id: a, index: 1 }));
}

#[test]
fn drop_on_earlier_element_moves_before_it() {
    let (mut form, canvas, [_, _, c]) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Element(c), &[DragEvent::Drop(row(&canvas, 0))]);
    assert_eq!(labels(&form), vec!["C", "A", "B"]);
}

#[test]
fn drop_below_elements_moves_to_end() {
    let (mut form, canvas, [a, _, _]) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Element(a), &[DragEvent::Drop(row(&canvas, 3))]);
    assert_eq!(labels(&form), vec!["B", "C", "A"]);
}

#[test]
fn drop_on_prefix_moves_to_front() {
    let (mut form, canvas, [_, b, _]) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Element(b), &[DragEvent::Drop(canvas.row_center(1))]);
    assert_eq!(labels(&form), vec!["B", "A", "C"]);
}

#[test]
fn drop_with_hidden_placeholder_deletes() {
    let (mut form, _, [_, b, _]) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Element(b), &[DragEvent::Leave, DragEvent::Drop(Point::new(2_000.0, 0.0))]);
    assert_eq!(labels(&form), vec!["A", "C"]);
    assert!(form.element(b).is_none());
    assert_eq!(*form.hint(), Hint::Drag);
}

#[test]
fn cancel_restores_hint_and_changes_nothing() {
    let (mut form, _, [a, _, _]) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Element(a), &[DragEvent::Leave, DragEvent::Cancel]);
    assert!(!form.is_dragging());
    assert_eq!(*form.hint(), Hint::Drag);
    assert_eq!(labels(&form), vec!["A", "B", "C"]);
}

#[test]
fn palette_drop_inserts_new_element() {
    let (mut form, canvas, _) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Palette(Handle::DatePicker), &[DragEvent::Over, DragEvent::Drop(row(&canvas, 1))]);
    assert_eq!(form.elements().len(), 4);
    assert_eq!(form.elements()[1].handle(), Handle::DatePicker);
    assert!(form.elements()[1].decorations().draggable);
    assert_eq!(form.elements()[1].events().listener_count(), 1);
}

#[test]
fn palette_drop_outside_target_is_ignored() {
    let (mut form, canvas, _) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Palette(Handle::Button), &[DragEvent::Leave, DragEvent::Drop(row(&canvas, 1))]);
    assert_eq!(form.elements().len(), 3);
}

#[test]
fn palette_drop_outside_form_is_ignored() {
    let (mut form, _, _) = abc();
    form.enter_edit();
    drag(&mut form, DragSource::Palette(Handle::Button), &[DragEvent::Drop(Point::new(300.0, 5_000.0))]);
    assert_eq!(form.elements().len(), 3);
}

#[test]
fn drag_ignored_in_view_mode() {
    let (mut form, canvas, [a, _, _]) = abc();
    drag(&mut form, DragSource::Element(a), &[DragEvent::Leave, DragEvent::Drop(row(&canvas, 0))]);
    assert_eq!(form.elements().len(), 3);
    assert!(!form.is_dragging());
}

// =============================================================
// Property panel
// =============================================================

#[test]
fn bind_panel_twice_fails() {
    let (mut form, _) = form();
    with_panel(&mut form);
    let second = PropertyPanel::new(Box::new(MemorySurface::new())).unwrap();
    assert!(matches!(form.bind_panel(second), Err(FormError::PanelAlreadyBound)));
}

#[test]
fn panel_follows_selection() {
    let (mut form, _, [a, b, _]) = abc();
    let surface = with_panel(&mut form);
    form.enter_edit();
    assert!(!surface.is_visible());
    form.select(a);
    assert_eq!(form.panel().and_then(PropertyPanel::current), Some(a));
    form.select(b);
    assert_eq!(form.panel().and_then(PropertyPanel::current), Some(b));
    form.unselect();
    assert!(!surface.is_visible());
}

#[test]
fn panel_input_updates_element_and_panel() {
    let (mut form, canvas, [a, _, _]) = abc();
    let surface = with_panel(&mut form);
    form.enter_edit();
    form.select(a);
    let seen = record(&mut form);

    assert!(form.panel_input(ControlId::Label, InputValue::Text("Email".into())));
    assert_eq!(form.element(a).unwrap().label(), "Email");
    assert!(matches!(
        surface.view().find(ControlId::Label),
        Some(crate::view::Control::TextInput { value, .. }) if value == "Email"
    ));
    assert!(matches!(
        canvas.surface(a).unwrap().view().controls().iter().find(|c| matches!(c, crate::view::Control::Label { .. })),
        Some(crate::view::Control::Label { text, .. }) if text == "Email"
    ));
    assert_eq!(*seen.borrow(), vec![FormEvent::ElementChanged(a)]);
}

#[test]
fn with_element_publishes_changes_at_once() {
    let (mut form, _, [a, b, _]) = abc();
    let surface = with_panel(&mut form);
    form.enter_edit();
    form.select(a);
    let seen = record(&mut form);

    assert_eq!(form.with_element(a, |e| e.set_label("Email")), Some(()));
    assert!(matches!(
        surface.view().find(ControlId::Label),
        Some(crate::view::Control::TextInput { value, .. }) if value == "Email"
    ));
    form.with_element(b, |e| e.set_label("Phone"));
    assert_eq!(*seen.borrow(), vec![FormEvent::ElementChanged(a), FormEvent::ElementChanged(b)]);
    assert_eq!(form.with_element(uuid::Uuid::new_v4(), |e| e.set_label("x")), None);
}

#[test]
fn panel_option_editor_grows() {
    let (mut form, _) = form();
    let surface = with_panel(&mut form);
    let list = form.append(FormElement::new(Handle::DropdownList)).unwrap();
    form.enter_edit();
    form.select(list);
    form.panel_input(ControlId::OptionEntry(0), InputValue::Text("Red".into()));
    form.panel_input(ControlId::OptionEntry(1), InputValue::Text("Blue".into()));
    let view = surface.view();
    assert!(view.find(ControlId::OptionEntry(2)).is_some());
    assert_eq!(
        form.element(list).and_then(FormElement::options).map(|o| o.items().to_vec()),
        Some(vec!["Red".to_owned(), "Blue".to_owned()])
    );
}

#[test]
fn panel_input_without_selection_is_ignored() {
    let (mut form, _, _) = abc();
    with_panel(&mut form);
    form.enter_edit();
    assert!(!form.panel_input(ControlId::Label, InputValue::Text("x".into())));
}

// =============================================================
// Validation and submit
// =============================================================

fn invalid_form() -> (Form, MemoryCanvas) {
    let (mut form, canvas) = form();
    form.append(FormElement::new(Handle::EntryField)).unwrap();
    form.append(FormElement::new(Handle::Checkbox)).unwrap();
    (form, canvas)
}

#[test]
fn validate_all_reports_every_failure() {
    let (mut form, canvas) = invalid_form();
    assert!(!form.validate_all());
    assert_eq!(form.elements()[0].error(), Some("This field is required."));
    assert_eq!(form.elements()[1].error(), Some("This box must be checked to continue."));
    assert_eq!(*form.hint(), Hint::Message(CORRECT.to_owned()));
    assert_eq!(canvas.hint().as_deref(), Some(CORRECT));
}

#[test]
fn validate_all_covers_prefix() {
    let (mut form, _) = form();
    form.set_title("");
    assert!(!form.validate_all());
    assert_eq!(form.prefix()[0].error(), Some("This field is required."));
}

#[test]
fn fixing_fields_validates() {
    let (mut form, _) = invalid_form();
    form.validate_all();
    let [entry, checkbox] = [form.elements()[0].id(), form.elements()[1].id()];
    form.element_input(entry, ControlId::Value, InputValue::Text("hello".into()));
    form.element_input(checkbox, ControlId::Value, InputValue::Bool(true));
    assert_eq!(form.elements()[0].error(), None);
    assert!(form.validate_all());
    assert_eq!(*form.hint(), Hint::Hidden);
}

#[test]
fn transient_hint_expires() {
    let (mut form, canvas) = invalid_form();
    form.validate_all();
    form.tick(4_999);
    assert_eq!(canvas.hint().as_deref(), Some(CORRECT));
    form.tick(1);
    assert_eq!(*form.hint(), Hint::Hidden);
    assert_eq!(canvas.hint(), None);
}

#[test]
fn transient_hint_reverts_to_drag_hint_in_edit_mode() {
    let config = FormConfig::from_parts("en", 100, 40.0).unwrap();
    let mut form = Form::with_config(Box::new(MemoryCanvas::new()), config).unwrap();
    form.append(FormElement::new(Handle::EntryField)).unwrap();
    form.enter_edit();
    form.validate_all();
    form.tick(250);
    assert_eq!(*form.hint(), Hint::Drag);
}

#[test]
fn tick_without_transient_hint_is_noop() {
    let (mut form, _) = form();
    form.enter_edit();
    form.tick(1_000_000);
    assert_eq!(*form.hint(), Hint::Drag);
}

#[test]
fn submit_emits_result() {
    let (mut form, _) = invalid_form();
    let seen = record(&mut form);
    assert!(!form.submit());
    assert_eq!(*seen.borrow(), vec![FormEvent::Submit { valid: false }]);
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn deserialize_replaces_content() {
    let (mut form, canvas, _) = abc();
    let document = FormDocument::from_json(
        r#"{"title": "T", "subtitle": "S", "elements": [
            {"handle": "checkbox", "label": "Agree", "value": true, "required": true}
        ]}"#,
    )
    .unwrap();
    form.deserialize(&document).unwrap();
    assert_eq!(form.title(), "T");
    assert_eq!(form.subtitle(), "S");
    assert_eq!(labels(&form), vec!["Agree"]);
    assert_eq!(canvas.slot_count(), 4);
    assert_eq!(canvas.order().len(), 4);
}

#[test]
fn failed_deserialize_leaves_form_untouched() {
    let (mut form, _, ids) = abc();
    let document = FormDocument::from_json(
        r#"{"title": "T", "subtitle": "S", "elements": [
            {"handle": "entryfield", "label": "ok", "value": "", "required": false},
            {"handle": "slider", "label": "bad", "value": null, "required": false}
        ]}"#,
    )
    .unwrap();
    let err = form.deserialize(&document).unwrap_err();
    assert!(matches!(err, FormError::Serialize(SerializeError::UnknownHandle(_))));
    assert_eq!(form.title(), "Untitled");
    assert_eq!(form.elements().iter().map(FormElement::id).collect::<Vec<_>>(), ids);
}

#[test]
fn custom_serializer_is_used() {
    let (form, _) = form();
    let mut form = form.with_serializer(Serializer::empty());
    form.append(FormElement::new(Handle::EntryField)).unwrap();
    assert!(matches!(form.serialize(), Err(SerializeError::UnknownHandle(_))));
}
