use super::*;

// =============================================================
// Translator
// =============================================================

#[test]
fn identity_returns_key() {
    let t = Translator::identity();
    assert_eq!(t.translate("This field is required."), "This field is required.");
    assert_eq!(t.translate(""), "");
}

#[test]
fn german_catalog_translates_known_keys() {
    let t = Translator::for_locale("de").unwrap();
    assert_eq!(t.translate("This field is required."), "Dieses Feld ist ein Pflichtfeld.");
    assert_eq!(t.translate("Drop here to remove"), "Hier loslassen um zu löschen");
    assert_eq!(t.translate("Dropdown List"), "Dropdownliste");
}

#[test]
fn german_catalog_falls_back_to_key() {
    let t = Translator::for_locale("de").unwrap();
    assert_eq!(t.translate("Complaint summary"), "Complaint summary");
}

#[test]
fn english_locale_is_identity() {
    let t = Translator::for_locale("en").unwrap();
    assert_eq!(t.translate("Untitled"), "Untitled");
}

#[test]
fn unknown_locale_is_rejected() {
    let err = Translator::for_locale("fr").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownLocale(ref l) if l == "fr"));
    assert!(err.to_string().contains("fr"));
}

#[test]
fn custom_catalog() {
    let mut catalog = HashMap::new();
    catalog.insert("Label".to_owned(), "Etikett".to_owned());
    let t = Translator::from_catalog(catalog);
    assert_eq!(t.translate("Label"), "Etikett");
    assert_eq!(t.translate("Options"), "Options");
}

#[test]
fn clones_share_catalog() {
    let t = Translator::for_locale("de").unwrap();
    let u = t.clone();
    assert!(Rc::ptr_eq(&t.catalog, &u.catalog));
}

#[test]
fn every_german_entry_is_nonempty() {
    for (key, value) in GERMAN {
        assert!(!key.is_empty());
        assert!(!value.is_empty(), "empty translation for {key}");
    }
}
