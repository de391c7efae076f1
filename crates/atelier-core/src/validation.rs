//! Input validation shared by folder and project records.

use crate::defaults::FOLDER_TITLE_MAX_CHARS;
use crate::{Error, Result};

/// Validate and normalize a display title.
///
/// Returns the trimmed title. Rejects titles that are empty after trimming
/// or longer than [`FOLDER_TITLE_MAX_CHARS`] characters.
pub fn validate_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("title cannot be empty".to_string()));
    }
    let len = title.chars().count();
    if len > FOLDER_TITLE_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "title is {} characters, maximum is {}",
            len, FOLDER_TITLE_MAX_CHARS
        )));
    }
    Ok(title.to_string())
}
