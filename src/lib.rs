//! Hotmart Downloader - download purchased video courses from Hotmart.
//!
//! This library fetches a course's module/page catalog over the Hotmart
//! club API and downloads each lesson's HLS stream: the master playlist is
//! parsed, the best-quality variant selected, encryption keys and segments
//! fetched under a bounded concurrency cap, and the rewritten playlist
//! remuxed into a single MP4 via ffmpeg.
//!
//! # Features
//!
//! - OAuth password-grant authentication with on-disk credentials cache
//! - Course/module/page catalog traversal
//! - M3U8 parsing with verbatim passthrough of unknown directives
//! - All-or-nothing segment batches with deterministic file naming
//! - Lesson attachment downloads
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use hotmart_downloader::{authorize, download_hls_media, HlsOptions, HotmartApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = authorize("user@example.com", "secret", "my-agent").await?;
//!     let api = HotmartApi::new(credentials.access_token, "my-agent")?;
//!
//!     let options = HlsOptions {
//!         concurrency: 30,
//!         keep_segments: false,
//!         show_progress: true,
//!     };
//!     download_hls_media(&api, "https://cdn.host/master.m3u8", Path::new("lesson"), options)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod hls;
pub mod output;

// Re-exports for convenience
pub use api::{authorize, Credentials, HotmartApi};
pub use config::Config;
pub use download::{download_hls_media, HlsOptions};
pub use error::{Error, Result};
pub use hls::{Playlist, Tag};
