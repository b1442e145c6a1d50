//! Master playlist URL extraction from the embedded player page.
//!
//! The page endpoint hands out a player page URL rather than the playlist
//! itself; the playlist URL is embedded in the page's HTML after a
//! `mediaAssets` marker, with `\u00XX`-escaped characters.

use crate::error::{Error, Result};

/// Scrape the master playlist URL out of player page HTML.
pub fn extract_master_playlist_url(html: &str) -> Result<String> {
    let assets = html
        .find("mediaAssets")
        .ok_or_else(|| Error::Api("Player page has no mediaAssets section".into()))?;
    let rest = &html[assets..];

    let start = rest
        .find("https://")
        .ok_or_else(|| Error::Api("No playlist URL in mediaAssets section".into()))?;
    let rest = &rest[start..];

    let end = rest
        .find('"')
        .ok_or_else(|| Error::Api("Unterminated playlist URL in player page".into()))?;

    Ok(decode_unicode_escapes(&rest[..end]))
}

/// Decode `\uXXXX` escape sequences as the player's JSON-in-HTML emits
/// them. Malformed escapes are left as-is.
fn decode_unicode_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("\\u") {
        out.push_str(&rest[..pos]);
        let escape = &rest[pos + 2..];

        let decoded = escape
            .get(..4)
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &escape[4..];
            }
            None => {
                out.push_str("\\u");
                rest = escape;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_url_after_media_assets() {
        let html = r#"<script>{"mediaAssets":[{"url":"https://cdn.host/video/master.m3u8?sig=1"}]}</script>"#;
        assert_eq!(
            extract_master_playlist_url(html).unwrap(),
            "https://cdn.host/video/master.m3u8?sig=1"
        );
    }

    #[test]
    fn test_decodes_escaped_ampersands() {
        let html = "{\"mediaAssets\":[{\"url\":\"https://cdn.host/master.m3u8?a=1\\u0026b=2\"}]}";
        assert_eq!(
            extract_master_playlist_url(html).unwrap(),
            "https://cdn.host/master.m3u8?a=1&b=2"
        );
    }

    #[test]
    fn test_ignores_urls_before_marker() {
        let html = r#"{"thumbnail":"https://cdn.host/thumb.jpg","mediaAssets":[{"url":"https://cdn.host/master.m3u8"}]}"#;
        assert_eq!(
            extract_master_playlist_url(html).unwrap(),
            "https://cdn.host/master.m3u8"
        );
    }

    #[test]
    fn test_missing_marker_fails() {
        assert!(extract_master_playlist_url("<html></html>").is_err());
    }

    #[test]
    fn test_malformed_escape_left_alone() {
        assert_eq!(decode_unicode_escapes("a\\uZZZZb"), "a\\uZZZZb");
        assert_eq!(decode_unicode_escapes("tail\\u"), "tail\\u");
    }
}
