//! Headless engine for a visual form builder.
//!
//! A form is a fixed header (title, subtitle, separator) followed by an
//! ordered list of typed elements. In view mode the form is filled in and
//! validated; in edit mode elements are dragged in from a palette,
//! reordered, selected, configured through a property panel and dropped
//! off the form to delete them. Leaving edit mode saves the form to its JSON
//! document and loads it back.
//!
//! The engine never touches a DOM. Elements render into a [`view::View`]
//! mounted on a [`surface::Surface`], and the host feeds user input back as
//! [`view::ControlId`] / [`view::InputValue`] pairs, keys and drag events.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`form`] | The [`form::Form`] state machine: ordering, modes, selection, drag/drop |
//! | [`element`] | [`element::FormElement`] and the closed set of field kinds |
//! | [`registry`] | Handle → constructor table used by the palette |
//! | [`serializer`] | JSON document model and per-handle codecs |
//! | [`panel`] | Property panel showing one element's settings |
//! | [`options`] | Option lists of drop-down and radio elements |
//! | [`input`] | Modes, keys and the drag gesture state machine |
//! | [`hit`] | Resolving a drop point to an insertion position |
//! | [`surface`] | Render target traits and in-memory implementations |
//! | [`view`] | Rendered controls and the input they produce |
//! | [`event`] | Typed listener registry |
//! | [`i18n`] | Message translation |
//! | [`config`] | Environment configuration |
//! | [`consts`] | Shared constants and message keys |
//! | [`error`] | Error types |

pub mod config;
pub mod consts;
pub mod element;
pub mod error;
pub mod event;
pub mod form;
pub mod hit;
pub mod i18n;
pub mod input;
pub mod options;
pub mod panel;
pub mod registry;
pub mod serializer;
pub mod surface;
pub mod view;
