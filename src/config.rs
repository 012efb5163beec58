//! Form configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_DROP_SLOP_PX, DEFAULT_HINT_DISMISS_MS};
use crate::error::ConfigError;
use crate::i18n::Translator;

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub locale: String,
    pub hint_dismiss_ms: u64,
    pub drop_slop_px: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_owned(),
            hint_dismiss_ms: DEFAULT_HINT_DISMISS_MS,
            drop_slop_px: DEFAULT_DROP_SLOP_PX,
        }
    }
}

impl FormConfig {
    /// Build typed form config from environment variables.
    ///
    /// Optional:
    /// - `SPIFFFORM_LOCALE`: `en` (default) or `de`
    /// - `SPIFFFORM_HINT_DISMISS_MS`: default 5000
    /// - `SPIFFFORM_DROP_SLOP_PX`: default 40
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLocale`] if the locale has no catalog.
    pub fn from_env() -> Result<Self, ConfigError> {
        let locale = std::env::var("SPIFFFORM_LOCALE").unwrap_or_else(|_| DEFAULT_LOCALE.to_owned());
        Self::from_parts(
            &locale,
            env_parse("SPIFFFORM_HINT_DISMISS_MS", DEFAULT_HINT_DISMISS_MS),
            env_parse("SPIFFFORM_DROP_SLOP_PX", DEFAULT_DROP_SLOP_PX),
        )
    }

    /// Build config from already-parsed values, validating the locale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLocale`] if the locale has no catalog.
    pub fn from_parts(locale: &str, hint_dismiss_ms: u64, drop_slop_px: f64) -> Result<Self, ConfigError> {
        Translator::for_locale(locale)?;
        Ok(Self { locale: locale.to_owned(), hint_dismiss_ms, drop_slop_px: drop_slop_px.max(0.0) })
    }

    /// The translator for the configured locale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLocale`] if the locale has no catalog.
    pub fn translator(&self) -> Result<Translator, ConfigError> {
        Translator::for_locale(&self.locale)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(&raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(raw: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    raw.trim().parse::<T>().unwrap_or(default)
}
