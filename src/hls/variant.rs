//! Best-quality variant selection from a master playlist.

use crate::error::{Error, Result};
use crate::hls::tag::{Playlist, Tag};

/// Select the variant with the numerically largest `RESOLUTION` width.
///
/// Ties break towards the first occurrence in parse order. Tags with a
/// missing or unparsable `RESOLUTION`, or without a URI line, are skipped
/// rather than aborting the selection.
pub fn select_variant(playlist: &Playlist) -> Result<&str> {
    let mut best: Option<(u32, &str)> = None;

    for tag in playlist.tags() {
        let Tag::StreamInf {
            attributes,
            uri: Some(uri),
        } = tag
        else {
            continue;
        };

        let Some(width) = attributes.get("RESOLUTION").and_then(parse_width) else {
            continue;
        };

        if best.map_or(true, |(best_width, _)| width > best_width) {
            best = Some((width, uri));
        }
    }

    best.map(|(_, uri)| uri).ok_or(Error::NoVariantFound)
}

/// Extract the width from a `"<width>x<height>"` resolution value.
fn parse_width(resolution: &str) -> Option<u32> {
    resolution.split_once('x')?.0.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hls::parser::parse;

    #[test]
    fn test_selects_largest_width() {
        let playlist = parse(
            "#EXT-X-STREAM-INF:RESOLUTION=640x360\nlow.m3u8\n\
             #EXT-X-STREAM-INF:RESOLUTION=1920x1080\nhigh.m3u8\n",
        )
        .unwrap();

        assert_eq!(select_variant(&playlist).unwrap(), "high.m3u8");
    }

    #[test]
    fn test_tie_breaks_towards_first() {
        let playlist = parse(
            "#EXT-X-STREAM-INF:RESOLUTION=1280x720\nfirst.m3u8\n\
             #EXT-X-STREAM-INF:RESOLUTION=1280x720\nsecond.m3u8\n",
        )
        .unwrap();

        assert_eq!(select_variant(&playlist).unwrap(), "first.m3u8");
    }

    #[test]
    fn test_unparsable_resolution_is_skipped() {
        let playlist = parse(
            "#EXT-X-STREAM-INF:RESOLUTION=garbage\nbad.m3u8\n\
             #EXT-X-STREAM-INF:RESOLUTION=640x360\ngood.m3u8\n",
        )
        .unwrap();

        assert_eq!(select_variant(&playlist).unwrap(), "good.m3u8");
    }

    #[test]
    fn test_no_qualifying_variant() {
        let playlist = parse("#EXT-X-STREAM-INF:BANDWIDTH=800000\nonly.m3u8\n").unwrap();
        assert!(matches!(
            select_variant(&playlist),
            Err(Error::NoVariantFound)
        ));
    }

    #[test]
    fn test_empty_playlist() {
        let playlist = parse("#EXTM3U\n").unwrap();
        assert!(matches!(
            select_variant(&playlist),
            Err(Error::NoVariantFound)
        ));
    }
}
