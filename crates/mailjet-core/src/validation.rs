//! `wait_for` duration validation
//!
//! `wait_for` is a duration string such as `"30s"` or `"1m 30s"`. When set it
//! must parse and be at least one second; null and unknown values pass and
//! mean "no bounded wait".

use crate::diagnostics::{AttributePath, Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use std::time::Duration;

/// Smallest accepted `wait_for` value
pub const MIN_WAIT_FOR: Duration = Duration::from_secs(1);

const WAIT_FOR_DESCRIPTION: &str = "must be a string representing a duration of at least 1 second";

/// A configuration value as seen by validators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValue<T> {
    /// Not set
    Null,
    /// Not known until apply
    Unknown,
    /// Known value
    Known(T),
}

impl<T> From<Option<T>> for ConfigValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => ConfigValue::Known(v),
            None => ConfigValue::Null,
        }
    }
}

/// Parse a `wait_for` string, enforcing the one second floor
pub fn parse_wait_for(raw: &str) -> Result<Duration> {
    let duration = humantime::parse_duration(raw.trim())
        .map_err(|e| Error::validation_input(format!("failed to parse {:?}: {}", raw, e)))?;

    if duration < MIN_WAIT_FOR {
        return Err(Error::validation_input(format!(
            "{:?} is shorter than 1 second",
            raw
        )));
    }

    Ok(duration)
}

/// Validate a `wait_for` attribute value
///
/// Returns one attribute diagnostic when the value is set and invalid.
pub fn validate_wait_for(path: &AttributePath, value: ConfigValue<&str>) -> Diagnostics {
    let raw = match value {
        ConfigValue::Null | ConfigValue::Unknown => return Diagnostics::new(),
        ConfigValue::Known(raw) => raw,
    };

    let detail = format!("{:?} {}", raw, WAIT_FOR_DESCRIPTION);

    match humantime::parse_duration(raw.trim()) {
        Err(_) => Diagnostic::attribute_error(
            path.clone(),
            "failed to parse the time duration",
            detail,
        )
        .into(),
        Ok(duration) if duration < MIN_WAIT_FOR => Diagnostic::attribute_error(
            path.clone(),
            "the time duration must be at least 1 second",
            detail,
        )
        .into(),
        Ok(_) => Diagnostics::new(),
    }
}
