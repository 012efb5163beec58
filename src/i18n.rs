//! Localization lookup: `translate(key) -> localized string`.
//!
//! Every user-facing string in the crate is a key in English. A
//! [`Translator`] maps keys to localized text and falls back to the key
//! itself when no entry exists, so the English "catalog" is empty.

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ConfigError;

/// German strings for the built-in catalog.
const GERMAN: &[(&str, &str)] = &[
    ("Drag form elements from the right", "Ziehen Sie Elemente von der rechten Seite"),
    ("Drop here to remove", "Hier loslassen um zu löschen"),
    ("Please correct the errors above.", "Bitte korrigieren Sie die obigen Fehler."),
    ("This field is required.", "Dieses Feld ist ein Pflichtfeld."),
    ("This box must be checked to continue.", "Bitte kreuzen Sie dieses Feld an, um fortzufahren."),
    ("Label", "Beschriftung"),
    ("Firstname/Lastname", "Vorname/Nachname"),
    ("First name", "Vorname"),
    ("Last name", "Nachname"),
    ("Please send more spam to my inbox", "Bestätigen Sie das Formular"),
    ("Date", "Datum"),
    ("Please choose", "Auswählen"),
    ("Required field", "Pflichtfeld"),
    ("Default", "Default"),
    ("Options", "Optionen"),
    ("Properties", "Eigenschaften"),
    ("unnamed", "Unbenannt"),
    ("Title", "Titel"),
    ("Untitled", "Ohne Titel"),
    ("Subtitle", "Untertitel"),
    ("Please fill out the form.", "Formular bitte ausfüllen."),
    ("Separator", "Trennzeichen"),
    ("Name Field", "Namensfeld"),
    ("Entry Field", "Eingabefeld"),
    ("Text Area", "Textfeld"),
    ("Button", "Schaltfläche"),
    ("Checkbox", "Ankreuzfeld"),
    ("Date Picker", "Datumsfeld"),
    ("Dropdown List", "Dropdownliste"),
    ("Radio List", "Auswahlliste"),
];

/// Cheaply clonable key → string lookup shared by a form and its elements.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    catalog: Rc<HashMap<String, String>>,
}

impl Translator {
    /// A translator that returns every key unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a translator from an explicit catalog.
    #[must_use]
    pub fn from_catalog(catalog: HashMap<String, String>) -> Self {
        Self { catalog: Rc::new(catalog) }
    }

    /// Look up one of the built-in catalogs by locale tag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLocale`] for anything other than `en` or `de`.
    pub fn for_locale(locale: &str) -> Result<Self, ConfigError> {
        match locale {
            "en" => Ok(Self::identity()),
            "de" => Ok(Self::from_catalog(
                GERMAN
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect(),
            )),
            other => Err(ConfigError::UnknownLocale(other.to_owned())),
        }
    }

    /// Translate `key`, falling back to the key itself.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.catalog
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}
