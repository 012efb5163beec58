//! Field type registry: handle → constructor.
//!
//! The set of handles is closed ([`Handle`]), but the constructor behind each
//! one can be replaced, e.g. to give every new drop-down a starter option.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use crate::element::{FormElement, Handle};
use crate::error::SerializeError;
use crate::i18n::Translator;

/// Builds a fresh element for a palette entry.
pub type Constructor = fn() -> FormElement;

pub struct Registry {
    constructors: HashMap<Handle, Constructor>,
}

impl Registry {
    /// A registry with no handles registered.
    #[must_use]
    pub fn empty() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// A registry with the default constructor for every built-in handle.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Handle::Title, || FormElement::new(Handle::Title));
        registry.register(Handle::Subtitle, || FormElement::new(Handle::Subtitle));
        registry.register(Handle::Separator, || FormElement::new(Handle::Separator));
        registry.register(Handle::NameField, || FormElement::new(Handle::NameField));
        registry.register(Handle::EntryField, || FormElement::new(Handle::EntryField));
        registry.register(Handle::TextArea, || FormElement::new(Handle::TextArea));
        registry.register(Handle::Button, || FormElement::new(Handle::Button));
        registry.register(Handle::Checkbox, || FormElement::new(Handle::Checkbox));
        registry.register(Handle::DatePicker, || FormElement::new(Handle::DatePicker));
        registry.register(Handle::DropdownList, || FormElement::new(Handle::DropdownList));
        registry.register(Handle::RadioList, || FormElement::new(Handle::RadioList));
        registry
    }

    /// Register (or replace) the constructor for `handle`, returning the previous one.
    pub fn register(&mut self, handle: Handle, constructor: Constructor) -> Option<Constructor> {
        self.constructors.insert(handle, constructor)
    }

    /// Construct a fresh element for `handle`.
    ///
    /// Constructors must produce an element of the handle they are registered
    /// under; a mismatching result is discarded.
    #[must_use]
    pub fn create(&self, handle: Handle) -> Option<FormElement> {
        let element = (self.constructors.get(&handle)?)();
        (element.handle() == handle).then_some(element)
    }

    /// Construct a fresh element from a wire tag such as `"entryfield"`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::UnknownHandle`] if the tag is unknown or unregistered.
    pub fn create_by_tag(&self, tag: &str) -> Result<FormElement, SerializeError> {
        let handle: Handle = tag.parse()?;
        self.create(handle)
            .ok_or_else(|| SerializeError::UnknownHandle(tag.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.constructors.contains_key(&handle)
    }

    /// Registered handles with their localized display names, in palette order.
    #[must_use]
    pub fn palette(&self, translator: &Translator) -> Vec<(Handle, String)> {
        Handle::ALL
            .into_iter()
            .filter(|h| self.contains(*h))
            .map(|h| (h, translator.translate(h.display_name())))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
