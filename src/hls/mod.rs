//! HLS playlist engine.
//!
//! This module covers the two-tier M3U8 playlist protocol:
//! - parsing directive text into an ordered tag sequence
//! - selecting the best-quality variant from a master playlist
//! - resolving relative references against a base URL
//! - serializing a (possibly rewritten) playlist back to text

pub mod parser;
pub mod resolve;
pub mod tag;
pub mod variant;
pub mod writer;

pub use parser::parse;
pub use resolve::resolve;
pub use tag::{Attribute, AttributeList, Playlist, Tag};
pub use variant::select_variant;
pub use writer::{serialize, write_playlist};
