//! Filename generation and sanitizing.

use crate::error::{Error, Result};

/// Sanitize a path component (course, module or page name) coming from the
/// platform API by replacing characters that are unsafe in filenames.
///
/// Traversal patterns and empty results are rejected outright.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '^' | ' ' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty".to_string(),
        ));
    }

    Ok(sanitized)
}
