//! Error types.
//!
//! Only programmer errors (bad bindings), document errors and config errors
//! are represented here. Validation failures are ordinary `bool` results
//! with per-element messages, and gesture failures are silent no-ops.

use crate::element::ElementId;

/// Construction and binding errors. These indicate misuse by the host and
/// are not meant to be shown to end users.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A surface or canvas resolved to zero or several render targets.
    #[error("surface must resolve to exactly one target, found {found}")]
    InvalidTarget { found: usize },
    /// `attach` was called on an element that already has a surface.
    #[error("element {0} is already attached to a surface")]
    AlreadyAttached(ElementId),
    /// A second property panel was bound to a form.
    #[error("a property panel is already bound to this form")]
    PanelAlreadyBound,
    /// Loading a document failed.
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    /// The form configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while converting between elements and the JSON document.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// The entry's handle has no registered codec.
    #[error("no codec registered for handle `{0}`")]
    UnknownHandle(String),
    /// The entry's value does not have the shape its handle requires.
    #[error("invalid value for `{handle}`: {reason}")]
    InvalidValue { handle: String, reason: String },
    /// The document text is not valid JSON for a form document.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading [`crate::config::FormConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown locale: {0} (expected `en` or `de`)")]
    UnknownLocale(String),
}
