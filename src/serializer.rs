//! JSON document model and the per-handle serializer.
//!
//! DESIGN
//! ======
//! Each handle owns one [`Codec`]: an encode function turning the field's
//! state into the entry's `value` (and `items` for option lists) and a
//! decode function doing the reverse. An element serializes itself by
//! asking the serializer for its handle's codec, which keeps variant
//! specifics off the generic path. Dates travel as ISO `YYYY-MM-DD`
//! strings and are parsed back into dates on load.
//!
//! ERROR HANDLING
//! ==============
//! Loading is all-or-nothing: every entry is decoded before the form is
//! touched, so one unknown handle or malformed value aborts the load and
//! leaves the current elements in place.

#[cfg(test)]
#[path = "serializer_test.rs"]
mod serializer_test;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::element::{FieldKind, FormElement, Handle};
use crate::error::{FormError, SerializeError};
use crate::form::Form;
use crate::options::OptionList;

const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// DOCUMENT
// =============================================================================

/// Top-level serialized form. The fixed prefix is carried as `title` and
/// `subtitle` only; `elements` holds the mutable sequence in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub elements: Vec<ElementEntry>,
}

impl FormDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::Json`] if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, SerializeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SerializeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One serialized element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEntry {
    pub handle: String,
    pub label: String,
    pub value: Value,
    pub required: bool,
    /// Option labels of drop-down and radio lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

// =============================================================================
// CODECS
// =============================================================================

/// Encoded variant-specific part of an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub value: Value,
    pub items: Option<Vec<String>>,
}

impl Encoded {
    fn value(value: Value) -> Self {
        Self { value, items: None }
    }
}

pub type EncodeFn = fn(&FieldKind) -> Encoded;
pub type DecodeFn = fn(Handle, &ElementEntry) -> Result<FieldKind, SerializeError>;

#[derive(Clone, Copy)]
pub struct Codec {
    pub encode: EncodeFn,
    pub decode: DecodeFn,
}

/// Dispatch table from handle to codec.
pub struct Serializer {
    codecs: HashMap<Handle, Codec>,
}

impl Serializer {
    /// A serializer with no codecs.
    #[must_use]
    pub fn empty() -> Self {
        Self { codecs: HashMap::new() }
    }

    /// A serializer knowing every built-in handle.
    #[must_use]
    pub fn builtin() -> Self {
        let mut serializer = Self::empty();
        let text = Codec { encode: encode_text, decode: decode_text };
        for handle in [Handle::Title, Handle::Subtitle, Handle::EntryField, Handle::TextArea] {
            serializer.register(handle, text);
        }
        let unit = Codec { encode: encode_unit, decode: decode_unit };
        serializer.register(Handle::Separator, unit);
        serializer.register(Handle::Button, unit);
        serializer.register(Handle::NameField, Codec { encode: encode_name, decode: decode_name });
        serializer.register(Handle::Checkbox, Codec { encode: encode_checkbox, decode: decode_checkbox });
        serializer.register(Handle::DatePicker, Codec { encode: encode_date, decode: decode_date });
        let options = Codec { encode: encode_options, decode: decode_options };
        serializer.register(Handle::DropdownList, options);
        serializer.register(Handle::RadioList, options);
        serializer
    }

    /// Register (or replace) the codec for `handle`.
    pub fn register(&mut self, handle: Handle, codec: Codec) -> Option<Codec> {
        self.codecs.insert(handle, codec)
    }

    fn codec(&self, handle: Handle) -> Result<&Codec, SerializeError> {
        self.codecs
            .get(&handle)
            .ok_or_else(|| SerializeError::UnknownHandle(handle.as_str().to_owned()))
    }

    /// Encode one element.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::UnknownHandle`] if no codec is registered for its handle.
    pub fn serialize(&self, element: &FormElement) -> Result<ElementEntry, SerializeError> {
        let handle = element.handle();
        let encoded = (self.codec(handle)?.encode)(element.kind());
        Ok(ElementEntry {
            handle: handle.as_str().to_owned(),
            label: element.label().to_owned(),
            value: encoded.value,
            required: element.is_required(),
            items: encoded.items,
        })
    }

    /// Decode one entry into a fresh, unattached element.
    ///
    /// # Errors
    ///
    /// Fails on an unknown handle or a value of the wrong shape.
    pub fn deserialize(&self, entry: &ElementEntry) -> Result<FormElement, SerializeError> {
        let handle: Handle = entry.handle.parse()?;
        let kind = (self.codec(handle)?.decode)(handle, entry)?;
        Ok(FormElement::from_parts(kind, entry.label.clone(), entry.required))
    }

    /// Encode the form's title, subtitle and mutable elements in display order.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::UnknownHandle`] if an element has no codec.
    pub fn serialize_form(&self, form: &Form) -> Result<FormDocument, SerializeError> {
        let elements = form
            .elements()
            .iter()
            .map(|element| element.serialize(self))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FormDocument { title: form.title().to_owned(), subtitle: form.subtitle().to_owned(), elements })
    }

    /// Replace the form's title, subtitle and every mutable element with the
    /// document's content. Nothing changes if any entry fails to decode.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Serialize`] for the first entry that fails to decode.
    pub fn deserialize_form(&self, form: &mut Form, document: &FormDocument) -> Result<(), FormError> {
        let elements = document
            .elements
            .iter()
            .map(|entry| FormElement::deserialize(self, entry))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| warn!(error = %e, "form document rejected"))?;
        debug!(count = elements.len(), "loading form document");
        form.load(&document.title, &document.subtitle, elements)?;
        Ok(())
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// BUILT-IN CODECS
// =============================================================================

fn invalid(handle: Handle, reason: impl Into<String>) -> SerializeError {
    SerializeError::InvalidValue { handle: handle.as_str().to_owned(), reason: reason.into() }
}

fn encode_text(kind: &FieldKind) -> Encoded {
    match kind {
        FieldKind::Title { text }
        | FieldKind::Subtitle { text }
        | FieldKind::EntryField { text }
        | FieldKind::TextArea { text } => Encoded::value(Value::String(text.clone())),
        _ => Encoded::value(Value::Null),
    }
}

fn decode_text(handle: Handle, entry: &ElementEntry) -> Result<FieldKind, SerializeError> {
    let text = match &entry.value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => return Err(invalid(handle, format!("expected a string, got {other}"))),
    };
    Ok(match handle {
        Handle::Title => FieldKind::Title { text },
        Handle::Subtitle => FieldKind::Subtitle { text },
        Handle::TextArea => FieldKind::TextArea { text },
        Handle::EntryField => FieldKind::EntryField { text },
        other => return Err(invalid(other, "text codec does not apply")),
    })
}

fn encode_unit(_kind: &FieldKind) -> Encoded {
    Encoded::value(Value::Null)
}

fn decode_unit(handle: Handle, _entry: &ElementEntry) -> Result<FieldKind, SerializeError> {
    match handle {
        Handle::Separator | Handle::Button => Ok(FieldKind::empty(handle)),
        other => Err(invalid(other, "unit codec does not apply")),
    }
}

fn encode_name(kind: &FieldKind) -> Encoded {
    match kind {
        FieldKind::NameField { first, last } => Encoded::value(json!([first, last])),
        _ => Encoded::value(Value::Null),
    }
}

fn decode_name(handle: Handle, entry: &ElementEntry) -> Result<FieldKind, SerializeError> {
    match &entry.value {
        Value::Null => Ok(FieldKind::NameField { first: String::new(), last: String::new() }),
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(first), Value::String(last)] => {
                Ok(FieldKind::NameField { first: first.clone(), last: last.clone() })
            }
            _ => Err(invalid(handle, "expected [first, last] strings")),
        },
        other => Err(invalid(handle, format!("expected a pair of strings, got {other}"))),
    }
}

fn encode_checkbox(kind: &FieldKind) -> Encoded {
    match kind {
        FieldKind::Checkbox { checked } => Encoded::value(Value::Bool(*checked)),
        _ => Encoded::value(Value::Null),
    }
}

fn decode_checkbox(handle: Handle, entry: &ElementEntry) -> Result<FieldKind, SerializeError> {
    match &entry.value {
        Value::Null => Ok(FieldKind::Checkbox { checked: false }),
        Value::Bool(checked) => Ok(FieldKind::Checkbox { checked: *checked }),
        other => Err(invalid(handle, format!("expected a boolean, got {other}"))),
    }
}

fn encode_date(kind: &FieldKind) -> Encoded {
    match kind {
        FieldKind::DatePicker { date: Some(date) } => {
            Encoded::value(Value::String(date.format(DATE_FORMAT).to_string()))
        }
        _ => Encoded::value(Value::Null),
    }
}

/// Dates are stored as `YYYY-MM-DD`. Full RFC 3339 timestamps (as produced
/// by a browser's `Date` JSON encoding) are accepted and truncated to their date.
fn decode_date(handle: Handle, entry: &ElementEntry) -> Result<FieldKind, SerializeError> {
    match &entry.value {
        Value::Null => Ok(FieldKind::DatePicker { date: None }),
        Value::String(raw) => {
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
                .map_err(|e| invalid(handle, format!("invalid date `{raw}`: {e}")))?;
            Ok(FieldKind::DatePicker { date: Some(date) })
        }
        other => Err(invalid(handle, format!("expected a date string, got {other}"))),
    }
}

fn encode_options(kind: &FieldKind) -> Encoded {
    match kind {
        FieldKind::DropdownList(list) | FieldKind::RadioList(list) => Encoded {
            value: list.selected().map_or(Value::Null, |i| json!(i)),
            items: Some(list.items().to_vec()),
        },
        _ => Encoded::value(Value::Null),
    }
}

fn decode_options(handle: Handle, entry: &ElementEntry) -> Result<FieldKind, SerializeError> {
    let items = entry
        .items
        .clone()
        .ok_or_else(|| invalid(handle, "missing `items`"))?;
    let selected = match &entry.value {
        Value::Null => None,
        Value::Number(n) => match n.as_u64().map(usize::try_from) {
            Some(Ok(index)) => Some(index),
            _ => return Err(invalid(handle, format!("invalid selection index {n}"))),
        },
        other => return Err(invalid(handle, format!("expected a selection index, got {other}"))),
    };
    let list = OptionList::from_parts(items, selected);
    match handle {
        Handle::DropdownList => Ok(FieldKind::DropdownList(list)),
        Handle::RadioList => Ok(FieldKind::RadioList(list)),
        other => Err(invalid(other, "option codec does not apply")),
    }
}
