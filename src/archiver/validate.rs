//! Validation functions for preset values.

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use sanitize_filename::{is_sanitized, sanitize};
use validator::ValidationError;

pub fn validate_valid_archive_name<S: AsRef<str>>(name: S) -> Result<(), ValidationError> {
    let name = name.as_ref();
    if name.is_empty() {
        return Err(ValidationError::new("InvalidArchiveName")
            .with_message("Archive name must not be empty".into()));
    }

    if !is_sanitized(name) {
        return Err(ValidationError::new("InvalidArchiveName").with_message(
            format!(
                "Invalid archive name {:?}, try sanitizing like {:?}",
                name,
                sanitize(name)
            )
            .into(),
        ));
    }

    Ok(())
}

/// A timestamp format must parse as strftime and render to text that can sit
/// inside a file name, so `%Y/%m` is rejected.
pub fn is_valid_timestamp_format<S: AsRef<str>>(format: S) -> bool {
    let format = format.as_ref();
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
        && is_sanitized(Local::now().format(format).to_string())
}

pub fn validate_timestamp_format<S: AsRef<str>>(format: S) -> Result<(), ValidationError> {
    let format = format.as_ref();
    if !is_valid_timestamp_format(format) {
        return Err(ValidationError::new("InvalidTimestampFormat")
            .with_message(
                format!("Invalid strftime format or not usable in a file name: {format:?}").into(),
            ));
    }

    Ok(())
}
