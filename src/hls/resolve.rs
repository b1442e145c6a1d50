//! URL reference resolution.

use url::Url;

use crate::error::Result;

/// Resolve a playlist reference against a base URL.
///
/// Absolute references pass through unchanged; scheme-relative,
/// authority-relative and path-relative references are resolved against
/// `base` per standard URL resolution rules.
pub fn resolve(base: &str, reference: &str) -> Result<Url> {
    let base = Url::parse(base)?;
    let resolved = base.join(reference)?;
    Ok(resolved)
}
