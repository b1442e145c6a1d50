//! M3U8 playlist text parsing.

use crate::error::{Error, Result};
use crate::hls::tag::{AttributeList, Playlist, Tag};

const STREAM_INF: &str = "#EXT-X-STREAM-INF";
const KEY: &str = "#EXT-X-KEY";
const EXTINF: &str = "#EXTINF";

/// Parse playlist text into a [`Playlist`].
///
/// Parsing is purely lexical: it fails only on unbalanced quotes inside an
/// attribute list, never on semantic grounds. Blank lines and non-`EXT`
/// comments are dropped; unrecognized `#EXT*` directives are kept verbatim
/// as passthrough tags.
pub fn parse(input: &str) -> Result<Playlist> {
    let mut playlist = Playlist::new();
    let mut segments: u32 = 0;

    for line in input.lines() {
        let line = line.trim_end_matches('\r').trim();

        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            if !rest.starts_with("EXT") {
                // Plain comment, not a directive.
                continue;
            }

            let (name, value) = match line.split_once(':') {
                Some((name, value)) => (name, value),
                None => (line, ""),
            };

            let tag = match name {
                STREAM_INF => Tag::StreamInf {
                    attributes: parse_attributes(value)?,
                    uri: None,
                },
                KEY => Tag::Key {
                    attributes: parse_attributes(value)?,
                },
                EXTINF => Tag::Extinf {
                    info: value.to_string(),
                    uri: None,
                    number: None,
                },
                _ => Tag::Passthrough {
                    line: line.to_string(),
                },
            };

            playlist.push(tag);
        } else {
            // A URI line belongs to the directive right before it, and only
            // if that directive still expects one. Anything else is ignored.
            match playlist.last_mut() {
                Some(Tag::StreamInf { uri: uri @ None, .. }) => {
                    *uri = Some(line.to_string());
                }
                Some(Tag::Extinf {
                    uri: uri @ None,
                    number,
                    ..
                }) => {
                    *uri = Some(line.to_string());
                    segments += 1;
                    *number = Some(segments);
                }
                _ => {}
            }
        }
    }

    Ok(playlist)
}

/// Tokenize a comma-separated `KEY=VALUE` attribute list. Commas inside
/// quoted values are not separators; duplicate names resolve last-value-wins.
fn parse_attributes(input: &str) -> Result<AttributeList> {
    let mut attributes = AttributeList::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                push_attribute(&mut attributes, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(Error::MalformedPlaylist(format!(
            "unbalanced quote in attribute list: '{}'",
            input
        )));
    }

    push_attribute(&mut attributes, &current);

    Ok(attributes)
}

fn push_attribute(attributes: &mut AttributeList, token: &str) {
    let token = token.trim();

    if token.is_empty() {
        return;
    }

    let (name, value) = match token.split_once('=') {
        Some((name, value)) => (name, value),
        None => (token, ""),
    };

    let quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    let value = if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    };

    attributes.set(name, value.to_string(), quoted);
}
