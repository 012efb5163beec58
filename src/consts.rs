//! Shared constants for the form builder.

// ── Timing ──────────────────────────────────────────────────────

/// Lifetime of a transient hint (e.g. the validation summary), in milliseconds.
pub const DEFAULT_HINT_DISMISS_MS: u64 = 5_000;

// ── Drop resolution ─────────────────────────────────────────────

/// Tolerance in pixels around the form bounds within which a drop still counts.
pub const DEFAULT_DROP_SLOP_PX: f64 = 40.0;

/// Row height used by the in-memory canvas when stacking element surfaces.
pub const MEMORY_ROW_HEIGHT_PX: f64 = 40.0;

/// Width of the in-memory canvas.
pub const MEMORY_CANVAS_WIDTH_PX: f64 = 600.0;

// ── Messages (localization keys) ────────────────────────────────

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_MUST_CHECK: &str = "This box must be checked to continue.";
pub const MSG_CORRECT_ERRORS: &str = "Please correct the errors above.";
pub const HINT_DRAG: &str = "Drag form elements from the right";
pub const HINT_DELETE: &str = "Drop here to remove";

// ── Fixed prefix defaults ───────────────────────────────────────

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_SUBTITLE: &str = "Please fill out the form.";
