//! Playlist serialization back to directive text.

use std::path::Path;

use crate::error::{Error, Result};
use crate::hls::tag::{AttributeList, Playlist, Tag};

/// Serialize a playlist to directive text.
///
/// Directives are reconstructed from their kind and attribute list
/// (attribute order and quoting preserved); the URI line follows
/// immediately after directives that carry one. Passthrough lines are
/// emitted verbatim.
pub fn serialize(playlist: &Playlist) -> String {
    let mut out = String::new();

    for tag in playlist.tags() {
        match tag {
            Tag::StreamInf { attributes, uri } => {
                out.push_str("#EXT-X-STREAM-INF:");
                write_attributes(&mut out, attributes);
                out.push('\n');
                if let Some(uri) = uri {
                    out.push_str(uri);
                    out.push('\n');
                }
            }
            Tag::Key { attributes } => {
                out.push_str("#EXT-X-KEY:");
                write_attributes(&mut out, attributes);
                out.push('\n');
            }
            Tag::Extinf { info, uri, .. } => {
                out.push_str("#EXTINF:");
                out.push_str(info);
                out.push('\n');
                if let Some(uri) = uri {
                    out.push_str(uri);
                    out.push('\n');
                }
            }
            Tag::Passthrough { line } => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out
}

fn write_attributes(out: &mut String, attributes: &AttributeList) {
    for (index, attribute) in attributes.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&attribute.name);
        out.push('=');
        if attribute.quoted {
            out.push('"');
            out.push_str(&attribute.value);
            out.push('"');
        } else {
            out.push_str(&attribute.value);
        }
    }
}

/// Serialize a playlist and write it to `path`.
pub async fn write_playlist(playlist: &Playlist, path: &Path) -> Result<()> {
    tokio::fs::write(path, serialize(playlist))
        .await
        .map_err(Error::PlaylistWrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hls::parser::parse;

    const MEDIA: &str = "\
#EXTM3U
#EXT-X-VERSION:3
#EXT-X-KEY:METHOD=AES-128,URI=\"enc.key\"
#EXTINF:9.009,Intro
1.ts
#EXTINF:8.5,
2.ts
#EXT-X-ENDLIST
";

    #[test]
    fn test_round_trip_is_idempotent() {
        let once = serialize(&parse(MEDIA).unwrap());
        let twice = serialize(&parse(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_passthrough_fidelity() {
        let playlist = parse("#EXT-X-FOO:BAR=1\n").unwrap();
        assert_eq!(serialize(&playlist), "#EXT-X-FOO:BAR=1\n");
    }

    #[test]
    fn test_quoting_preserved() {
        let playlist = parse("#EXT-X-KEY:METHOD=AES-128,URI=\"enc.key\",IV=0x99\n").unwrap();
        assert_eq!(
            serialize(&playlist),
            "#EXT-X-KEY:METHOD=AES-128,URI=\"enc.key\",IV=0x99\n"
        );
    }

    #[test]
    fn test_uri_line_follows_directive() {
        let playlist = parse("#EXTINF:5.0,Title\nseg.ts\n").unwrap();
        assert_eq!(serialize(&playlist), "#EXTINF:5.0,Title\nseg.ts\n");
    }

    #[tokio::test]
    async fn test_write_playlist_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.m3u8");

        let playlist = parse(MEDIA).unwrap();
        write_playlist(&playlist, &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, serialize(&playlist));
    }
}
