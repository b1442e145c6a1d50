//! External remuxing via ffmpeg.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Remux a local playlist (segments + optional key) into a single output
/// file with stream copy. Exit code 0 is success; anything else fails.
pub async fn remux_playlist(playlist_path: &Path, output: &Path) -> Result<()> {
    let playlist_str = playlist_path
        .to_str()
        .ok_or_else(|| Error::FFmpeg("Invalid path encoding for playlist".into()))?;
    let output_str = output
        .to_str()
        .ok_or_else(|| Error::FFmpeg("Invalid path encoding for output".into()))?;

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-loglevel",
            "error",
            "-allowed_extensions",
            "ALL",
            "-i",
            playlist_str,
            "-c",
            "copy",
            "-movflags",
            "+faststart",
            "-map_metadata",
            "-1",
            output_str,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FFmpegNotFound
            } else {
                Error::FFmpeg(format!("Failed to run ffmpeg: {}", e))
            }
        })?;

    if !status.success() {
        return Err(Error::FFmpeg(format!(
            "ffmpeg exited with status: {}",
            status
        )));
    }

    Ok(())
}
