//! Hotmart API module.
//!
//! Covers authentication (OAuth password grant + on-disk credentials
//! cache), catalog traversal (courses, modules, pages) and media/attachment
//! URL resolution.

pub mod auth;
pub mod client;
pub mod player;
pub mod types;

pub use auth::{authorize, Credentials};
pub use client::HotmartApi;
pub use types::{AttachmentRef, Course, MediaSource, Module, PageDetail, PageRef};
