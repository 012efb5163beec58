//! Option lists for drop-down and radio fields, and the self-growing
//! option editor shown in the property panel.
//!
//! The editor shows one text entry per stored option plus a single blank
//! entry at the end (omitted while some option is itself blank). Typing
//! into the blank entry appends an option, and a fresh blank entry
//! appears. Clearing the last option removes it while its entry box stays
//! on screen as the new trailing blank. The rows are derived from the
//! stored items, so the editor never holds a second copy of the state.

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

/// Ordered option labels plus the selected index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    items: Vec<String>,
    selected: Option<usize>,
}

impl OptionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from stored parts. A selection outside `items` is kept as-is;
    /// validation treats it as "nothing usable selected".
    #[must_use]
    pub fn from_parts(items: Vec<String>, selected: Option<usize>) -> Self {
        Self { items, selected }
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Text of the selected option, if the selection points at one.
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }

    pub fn add_option(&mut self, option: impl Into<String>) {
        self.items.push(option.into());
    }

    pub fn select(&mut self, selected: Option<usize>) {
        self.selected = selected;
    }

    /// Entry rows the option editor displays.
    #[must_use]
    pub fn editor_rows(&self) -> Vec<String> {
        let mut rows = self.items.clone();
        if !rows.iter().any(String::is_empty) {
            rows.push(String::new());
        }
        rows
    }

    /// Apply an edit of editor row `index` to `text`.
    ///
    /// The "last entry" is the row of the final stored option or the trailing
    /// blank row. Editing any other row overwrites its option in place, even
    /// with an empty string. Editing the last entry to an empty string removes
    /// that option; to a non-empty string writes or appends it.
    pub fn edit_entry(&mut self, index: usize, text: &str) {
        let is_last = index >= self.items.len().saturating_sub(1);
        if !is_last {
            self.items[index] = text.to_owned();
            return;
        }
        if text.is_empty() {
            if index < self.items.len() {
                self.remove(index);
            }
            return;
        }
        if index < self.items.len() {
            self.items[index] = text.to_owned();
        } else {
            self.items.push(text.to_owned());
        }
    }

    /// Delete editor row `index`, removing its stored option if there is one.
    pub fn delete_entry(&mut self, index: usize) {
        if index < self.items.len() {
            self.remove(index);
        }
    }

    fn remove(&mut self, index: usize) {
        self.items.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
    }
}
