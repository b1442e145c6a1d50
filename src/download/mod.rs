//! Download module.
//!
//! This module provides:
//! - the bounded-concurrency key/segment coordinator
//! - the end-to-end HLS pipeline for one media item
//! - ffmpeg remuxing of the local playlist
//! - attachment downloading
//! - download statistics

pub mod attachment;
pub mod coordinator;
pub mod hls;
pub mod remux;
pub mod state;

pub use attachment::download_attachment;
pub use coordinator::{download_batch, SegmentSource, DEFAULT_CONCURRENCY};
pub use hls::{download_hls_media, HlsOptions};
pub use remux::remux_playlist;
pub use state::{CourseStats, RunStats};
