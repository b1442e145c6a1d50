//! In-memory playlist model.
//!
//! A playlist is an ordered sequence of tags; the order is also the
//! key/segment discovery order and is preserved through every
//! transformation. Unrecognized directives are kept verbatim so they
//! survive a parse/serialize round trip.

/// One `KEY=VALUE` pair inside a directive's attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Whether the value was quoted in the source. Preserved on output.
    pub quoted: bool,
}

/// Ordered attribute list. Parse order is preserved; setting an existing
/// name overwrites its value in place (last value wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    attributes: Vec<Attribute>,
}

impl AttributeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value, keeping the original position if the name
    /// already exists.
    pub fn set(&mut self, name: &str, value: String, quoted: bool) {
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value;
            existing.quoted = quoted;
        } else {
            self.attributes.push(Attribute {
                name: name.to_string(),
                value,
                quoted,
            });
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }
}

/// One playlist directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// `#EXT-X-STREAM-INF`: a variant declaration in a master playlist,
    /// followed by the variant's URI line.
    StreamInf {
        attributes: AttributeList,
        uri: Option<String>,
    },

    /// `#EXT-X-KEY`: an encryption key declaration. The key's location
    /// lives in the `URI` attribute, not on a following line.
    Key { attributes: AttributeList },

    /// `#EXTINF`: a segment marker. `info` is the verbatim text after the
    /// colon (duration and title, not an attribute list). `number` is
    /// assigned when the URI line is attached and never changes afterwards.
    Extinf {
        info: String,
        uri: Option<String>,
        number: Option<u32>,
    },

    /// Any other `#EXT*` line, re-emitted unchanged.
    Passthrough { line: String },
}

impl Tag {
    /// Whether this directive type expects a following URI line.
    pub fn expects_uri(&self) -> bool {
        matches!(
            self,
            Tag::StreamInf { uri: None, .. } | Tag::Extinf { uri: None, .. }
        )
    }

    /// The reference this tag carries, if any. For `Key` tags this reads
    /// the `URI` attribute.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Tag::StreamInf { uri, .. } | Tag::Extinf { uri, .. } => uri.as_deref(),
            Tag::Key { attributes } => attributes.get("URI"),
            Tag::Passthrough { .. } => None,
        }
    }
}

/// An ordered sequence of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    tags: Vec<Tag>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut [Tag] {
        &mut self.tags
    }

    pub fn last_mut(&mut self) -> Option<&mut Tag> {
        self.tags.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Number of segments, i.e. `EXTINF` tags that carry a URI.
    pub fn segment_count(&self) -> usize {
        self.tags
            .iter()
            .filter(|t| matches!(t, Tag::Extinf { uri: Some(_), .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_list_preserves_order() {
        let mut attrs = AttributeList::new();
        attrs.set("BANDWIDTH", "1000".into(), false);
        attrs.set("RESOLUTION", "1920x1080".into(), false);
        attrs.set("CODECS", "avc1".into(), true);

        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["BANDWIDTH", "RESOLUTION", "CODECS"]);
    }

    #[test]
    fn test_attribute_list_last_value_wins() {
        let mut attrs = AttributeList::new();
        attrs.set("URI", "first".into(), true);
        attrs.set("URI", "second".into(), true);

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("URI"), Some("second"));
    }

    #[test]
    fn test_key_uri_reads_attribute() {
        let mut attrs = AttributeList::new();
        attrs.set("METHOD", "AES-128".into(), false);
        attrs.set("URI", "https://host/key".into(), true);

        let tag = Tag::Key { attributes: attrs };
        assert_eq!(tag.uri(), Some("https://host/key"));
        assert!(!tag.expects_uri());
    }

    #[test]
    fn test_segment_count_ignores_extinf_without_uri() {
        let mut playlist = Playlist::new();
        playlist.push(Tag::Extinf {
            info: "10.0,".into(),
            uri: Some("1.ts".into()),
            number: Some(1),
        });
        playlist.push(Tag::Extinf {
            info: "10.0,".into(),
            uri: None,
            number: None,
        });

        assert_eq!(playlist.segment_count(), 1);
    }
}
