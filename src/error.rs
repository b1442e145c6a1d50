//! Error types for the hotmart-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    // Playlist errors
    #[error("Malformed playlist: {0}")]
    MalformedPlaylist(String),

    #[error("No suitable variant found in master playlist")]
    NoVariantFound,

    #[error("Missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("Failed to write playlist: {0}")]
    PlaylistWrite(#[source] std::io::Error),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Transfer failed for '{url}': {source}")]
    TransferFailed {
        url: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Batch download failed: {0}")]
    DownloadFailed(#[source] Box<Error>),

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // External tool errors
    #[error("FFmpeg error: {0}")]
    FFmpeg(String),

    #[error("FFmpeg not found. Please install ffmpeg and ensure it's in your PATH.")]
    FFmpegNotFound,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
