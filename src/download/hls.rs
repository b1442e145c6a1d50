//! End-to-end HLS pipeline for one media item.
//!
//! master text -> parse -> select variant -> resolve -> media text ->
//! parse -> resolve references -> batch download -> write local playlist
//! -> remux to MP4.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use indicatif::ProgressBar;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::api::HotmartApi;
use crate::download::coordinator::{download_batch, SegmentSource};
use crate::download::remux::remux_playlist;
use crate::error::{Error, Result};
use crate::hls::{self, resolve, Playlist, Tag};
use crate::output::progress::create_segment_bar;

/// Local playlist filename inside the working directory.
const LOCAL_PLAYLIST_FILENAME: &str = "playlist.m3u8";

/// Per-item download options.
#[derive(Debug, Clone, Copy)]
pub struct HlsOptions {
    /// Cap on concurrent in-flight transfers.
    pub concurrency: usize,
    /// Keep the working directory (segments + local playlist) after a
    /// successful remux.
    pub keep_segments: bool,
    /// Show a progress bar while the batch runs.
    pub show_progress: bool,
}

/// Download one HLS media item and remux it into a single MP4 at
/// `output_path` (extension forced to `.mp4`).
pub async fn download_hls_media(
    api: &HotmartApi,
    master_url: &str,
    output_path: &Path,
    options: HlsOptions,
) -> Result<PathBuf> {
    let output_path = output_path.with_extension("mp4");

    let master_text = fetch_playlist_text(api, master_url).await?;
    let master = hls::parse(&master_text)?;

    let variant_uri = hls::select_variant(&master)?;
    let media_url = resolve(master_url, variant_uri)?;
    tracing::debug!("Selected variant playlist: {}", media_url);

    let media_text = fetch_playlist_text(api, media_url.as_str()).await?;
    let mut playlist = hls::parse(&media_text)?;
    resolve_references(&mut playlist, media_url.as_str())?;

    let parent = output_path
        .parent()
        .ok_or_else(|| Error::Download("Output path has no parent directory".into()))?;
    let stem = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("media");
    let work_dir = parent.join(format!(".hls_{}", stem));
    fs::create_dir_all(&work_dir).await?;

    tracing::info!(
        "Downloading {} segments into {}",
        playlist.segment_count(),
        work_dir.display()
    );

    let bar = segment_progress(options.show_progress, transfer_count(&playlist) as u64);
    let source = ProgressSource {
        inner: api,
        bar: &bar,
    };
    let batch = download_batch(&source, &mut playlist, &work_dir, options.concurrency).await;
    bar.finish_and_clear();

    if let Err(e) = batch {
        let _ = fs::remove_dir_all(&work_dir).await;
        return Err(e);
    }

    let playlist_path = work_dir.join(LOCAL_PLAYLIST_FILENAME);
    hls::write_playlist(&playlist, &playlist_path).await?;

    if let Err(e) = remux_playlist(&playlist_path, &output_path).await {
        // Keep the working directory for a retry, but never leave a partial
        // output file behind.
        let _ = fs::remove_file(&output_path).await;
        return Err(e);
    }

    if !options.keep_segments {
        let _ = fs::remove_dir_all(&work_dir).await;
    }

    Ok(output_path)
}

/// Progress bar for the batch, or a hidden one in quiet mode. The bar
/// counts transfers, which includes the key alongside segments.
fn segment_progress(show: bool, total: u64) -> ProgressBar {
    if show {
        create_segment_bar(total)
    } else {
        ProgressBar::hidden()
    }
}

/// Number of transfers a batch for this playlist will run: one per
/// segment, plus one per key that carries a URI.
fn transfer_count(playlist: &Playlist) -> usize {
    playlist
        .tags()
        .iter()
        .filter(|tag| match tag {
            Tag::Key { attributes } => attributes.get("URI").is_some(),
            Tag::Extinf { uri, .. } => uri.is_some(),
            _ => false,
        })
        .count()
}

/// Fetch playlist text from a URL.
async fn fetch_playlist_text(api: &HotmartApi, url: &str) -> Result<String> {
    let response = api.download_file(url).await?;
    let text = response
        .text()
        .await
        .map_err(|e| Error::Download(format!("Failed to read playlist: {}", e)))?;
    Ok(text)
}

/// Rewrite every key/segment reference to an absolute URL resolved against
/// the media playlist's own URL.
fn resolve_references(playlist: &mut Playlist, base: &str) -> Result<()> {
    for tag in playlist.tags_mut() {
        match tag {
            Tag::Key { attributes } => {
                if let Some(uri) = attributes.get("URI") {
                    let absolute = resolve(base, uri)?.to_string();
                    attributes.set("URI", absolute, true);
                }
            }
            Tag::Extinf { uri: Some(uri), .. } => {
                *uri = resolve(base, uri)?.to_string();
            }
            _ => {}
        }
    }

    Ok(())
}

#[async_trait]
impl SegmentSource for HotmartApi {
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.download_file(url).await?;

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(())
    }
}

/// Ticks the segment progress bar as transfers complete.
struct ProgressSource<'a, S> {
    inner: &'a S,
    bar: &'a ProgressBar,
}

#[async_trait]
impl<S: SegmentSource> SegmentSource for ProgressSource<'_, S> {
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<()> {
        self.inner.fetch_to(url, dest).await?;
        self.bar.inc(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hls::parse;

    #[test]
    fn test_resolve_references_makes_urls_absolute() {
        let mut playlist = parse(
            "#EXT-X-KEY:METHOD=AES-128,URI=\"enc.key\"\n\
             #EXTINF:10.0,\nseg1.ts\n\
             #EXTINF:10.0,\nhttps://other/seg2.ts\n",
        )
        .unwrap();

        resolve_references(&mut playlist, "https://host/dir/media.m3u8").unwrap();

        match &playlist.tags()[0] {
            Tag::Key { attributes } => {
                assert_eq!(attributes.get("URI"), Some("https://host/dir/enc.key"));
            }
            other => panic!("expected key, got {:?}", other),
        }

        assert_eq!(
            playlist.tags()[1].uri(),
            Some("https://host/dir/seg1.ts")
        );
        assert_eq!(playlist.tags()[2].uri(), Some("https://other/seg2.ts"));
    }

    #[test]
    fn test_transfer_count_includes_key() {
        let playlist = parse(
            "#EXT-X-KEY:METHOD=AES-128,URI=\"enc.key\"\n\
             #EXTINF:10.0,\nseg1.ts\n\
             #EXTINF:10.0,\nseg2.ts\n",
        )
        .unwrap();

        assert_eq!(playlist.segment_count(), 2);
        assert_eq!(transfer_count(&playlist), 3);
    }

    #[test]
    fn test_transfer_count_skips_keyless_and_passthrough() {
        let playlist = parse("#EXTM3U\n#EXT-X-ENDLIST\n#EXTINF:10.0,\nseg1.ts\n").unwrap();
        assert_eq!(transfer_count(&playlist), 1);
    }

    #[test]
    fn test_quiet_mode_uses_hidden_progress() {
        assert!(segment_progress(false, 5).is_hidden());
        assert!(!segment_progress(true, 5).is_hidden());
    }
}
