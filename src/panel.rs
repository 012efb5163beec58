//! Property panel: shows the editable settings of one element at a time.
//!
//! The panel keeps only the id of the element it displays. All controls it
//! renders come from [`FormElement::update_properties`], and the input they
//! produce is applied straight to the element by the form.

#[cfg(test)]
#[path = "panel_test.rs"]
mod panel_test;

use crate::element::{ElementId, FormElement};
use crate::error::FormError;
use crate::i18n::Translator;
use crate::surface::Surface;
use crate::view::{Control, ControlId, View};

pub struct PropertyPanel {
    surface: Box<dyn Surface>,
    current: Option<ElementId>,
    visible: bool,
    translator: Translator,
}

impl PropertyPanel {
    /// Bind a panel to its surface. The panel starts hidden.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidTarget`] if the surface does not resolve
    /// to exactly one target.
    pub fn new(mut surface: Box<dyn Surface>) -> Result<Self, FormError> {
        let found = surface.target_count();
        if found != 1 {
            return Err(FormError::InvalidTarget { found });
        }
        surface.clear();
        Ok(Self { surface, current: None, visible: false, translator: Translator::identity() })
    }

    pub fn set_translator(&mut self, translator: Translator) {
        self.translator = translator;
    }

    /// Render `element`'s properties, replacing whatever was shown.
    pub fn show_properties(&mut self, element: &FormElement) {
        self.surface.clear();
        let mut view = View::new();
        view.push(Control::Heading(format!("{} {}", element.name(), self.translator.translate("Properties"))));
        element.update_properties(&mut view);
        self.surface.mount(view);
        self.current = Some(element.id());
        self.visible = true;
    }

    /// Clear and hide the panel, releasing the displayed element.
    pub fn hide(&mut self) {
        self.surface.clear();
        self.current = None;
        self.visible = false;
    }

    /// Id of the element currently displayed.
    #[must_use]
    pub fn current(&self) -> Option<ElementId> {
        self.current
    }

    /// The panel control that has keyboard focus, if any.
    #[must_use]
    pub fn focused_control(&self) -> Option<ControlId> {
        if self.visible { self.surface.focused() } else { None }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
