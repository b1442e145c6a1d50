//! Lesson attachment downloading.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::header;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::{AttachmentRef, HotmartApi};
use crate::error::{Error, Result};
use crate::fs::sanitize_path_component;
use crate::output::progress::create_download_bar;

/// Minimum size to show a progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Download one attachment into `target_dir`. Returns `None` when the file
/// already exists.
pub async fn download_attachment(
    api: &HotmartApi,
    subdomain: &str,
    attachment: &AttachmentRef,
    target_dir: &Path,
    show_progress: bool,
) -> Result<Option<PathBuf>> {
    let url = api
        .get_attachment_url(subdomain, &attachment.file_membership_id)
        .await?;

    let response = api.download_file(&url).await?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let filename = attachment_filename(attachment, content_type)?;
    let output_path = target_dir.join(&filename);

    if output_path.exists() {
        tracing::debug!("Skipping existing attachment: {}", output_path.display());
        return Ok(None);
    }

    let content_length = response.content_length();
    let progress = if show_progress && content_length.map_or(false, |l| l > PROGRESS_THRESHOLD) {
        Some(create_download_bar(content_length.unwrap_or(0)))
    } else {
        None
    };

    let mut file = File::create(&output_path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(ref bar) = progress {
            bar.set_position(downloaded);
        }
    }

    file.flush().await?;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    Ok(Some(output_path))
}

/// Pick a filename for the attachment: the API-provided name when present,
/// otherwise its membership id with an extension guessed from the response
/// content type. Both come from remote JSON, so both branches sanitize.
fn attachment_filename(attachment: &AttachmentRef, content_type: Option<&str>) -> Result<String> {
    if let Some(name) = &attachment.file_name {
        return sanitize_path_component(name);
    }

    let extension = content_type
        .and_then(|ct| mime_guess::get_mime_extensions_str(ct))
        .and_then(|exts| exts.first())
        .copied()
        .unwrap_or("bin");

    sanitize_path_component(&format!(
        "{}.{}",
        attachment.file_membership_id, extension
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(id: &str, file_name: Option<&str>) -> AttachmentRef {
        AttachmentRef {
            file_membership_id: id.to_string(),
            file_name: file_name.map(str::to_string),
        }
    }

    #[test]
    fn test_fallback_name_from_id_and_content_type() {
        let name =
            attachment_filename(&attachment("f1", None), Some("application/pdf")).unwrap();
        assert_eq!(name, "f1.pdf");
    }

    #[test]
    fn test_fallback_name_without_content_type() {
        let name = attachment_filename(&attachment("f1", None), None).unwrap();
        assert_eq!(name, "f1.bin");
    }

    #[test]
    fn test_traversal_in_id_rejected() {
        assert!(attachment_filename(&attachment("../../etc/cron", None), None).is_err());
    }

    #[test]
    fn test_separator_in_id_replaced() {
        let name = attachment_filename(&attachment("a/b", None), None).unwrap();
        assert_eq!(name, "a_b.bin");
    }

    #[test]
    fn test_api_provided_name_sanitized() {
        let name = attachment_filename(&attachment("f1", Some("notes?.pdf")), None).unwrap();
        assert_eq!(name, "notes_.pdf");
    }
}
