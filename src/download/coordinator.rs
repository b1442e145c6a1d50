//! Bounded-concurrency key/segment downloading.
//!
//! Filenames are computed from each tag's fixed playlist position before
//! any transfer starts, so on-disk names always match playlist order no
//! matter which transfer finishes first. A batch is all-or-nothing: the
//! first failure stops admission, every file the batch created is removed,
//! and the whole batch reports one error.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::{Error, Result};
use crate::hls::tag::{Playlist, Tag};

/// Default cap on concurrent in-flight transfers.
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Local filename for a playlist's encryption key.
const KEY_FILENAME: &str = "key.key";

/// Fallback extension when a segment URL has none.
const DEFAULT_SEGMENT_EXTENSION: &str = "ts";

/// Fetches one remote object and streams its bytes to a local file.
///
/// Implementations must not buffer whole bodies; memory use has to stay
/// bounded regardless of segment size.
#[async_trait]
pub trait SegmentSource: Send + Sync {
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<()>;
}

/// One planned transfer.
#[derive(Debug)]
struct Job {
    url: String,
    path: PathBuf,
}

/// Download every key and segment of `playlist` into `dest_dir`, rewriting
/// each tag's URI (for keys, the `URI` attribute) to its local filename.
///
/// The playlist must already carry absolute URLs. On success the playlist
/// references only local names and all files exist; on failure no file
/// created by this batch remains on disk and the playlist should be
/// discarded.
pub async fn download_batch<S: SegmentSource>(
    source: &S,
    playlist: &mut Playlist,
    dest_dir: &Path,
    concurrency: usize,
) -> Result<()> {
    let jobs = plan_jobs(playlist, dest_dir)?;

    if jobs.is_empty() {
        return Ok(());
    }

    tracing::debug!(
        "Starting batch of {} transfers (concurrency {})",
        jobs.len(),
        concurrency
    );

    match run_jobs(source, &jobs, concurrency.max(1)).await {
        Ok(()) => Ok(()),
        Err(e) => {
            cleanup(&jobs).await;
            Err(Error::DownloadFailed(Box::new(e)))
        }
    }
}

/// Walk the playlist in order, assign each key/segment its local filename
/// and collect the transfer list. Tags are rewritten but never removed,
/// so a failed batch still serializes the full original sequence.
fn plan_jobs(playlist: &mut Playlist, dest_dir: &Path) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();

    for tag in playlist.tags_mut() {
        match tag {
            Tag::Key { attributes } => {
                let url = attributes
                    .get("URI")
                    .ok_or(Error::MissingAttribute("URI"))?
                    .to_string();

                jobs.push(Job {
                    url,
                    path: dest_dir.join(KEY_FILENAME),
                });

                attributes.set("URI", KEY_FILENAME.to_string(), true);
            }
            Tag::Extinf {
                uri: Some(uri),
                number: Some(number),
                ..
            } => {
                let filename = format!("{}.{}", number, segment_extension(uri));

                jobs.push(Job {
                    url: uri.clone(),
                    path: dest_dir.join(&filename),
                });

                *uri = filename;
            }
            _ => {}
        }
    }

    Ok(jobs)
}

/// Run the transfers through a pool bounded at `concurrency` in-flight
/// jobs. Returns on the first failure; dropping the pool cancels jobs
/// still in flight.
async fn run_jobs<S: SegmentSource>(source: &S, jobs: &[Job], concurrency: usize) -> Result<()> {
    let mut pool = stream::iter(jobs.iter().map(|job| async move {
        tracing::debug!("Fetching '{}' -> '{}'", job.url, job.path.display());

        source
            .fetch_to(&job.url, &job.path)
            .await
            .map_err(|e| Error::TransferFailed {
                url: job.url.clone(),
                source: Box::new(e),
            })
    }))
    .buffer_unordered(concurrency);

    while let Some(result) = pool.next().await {
        result?;
    }

    Ok(())
}

/// Remove every file the batch may have created, successes included.
/// A playlist with even one missing segment is unplayable.
async fn cleanup(jobs: &[Job]) {
    for job in jobs {
        if let Err(e) = tokio::fs::remove_file(&job.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove '{}': {}", job.path.display(), e);
            }
        }
    }
}

/// Derive a segment file extension from its URL path.
fn segment_extension(uri: &str) -> String {
    let path = match Url::parse(uri) {
        Ok(url) => url.path().to_string(),
        Err(_) => uri.to_string(),
    };

    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_string())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_SEGMENT_EXTENSION.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::hls::parser::parse;

    /// Test double that writes the URL itself as file content, with
    /// per-URL latency and failure injection.
    #[derive(Default)]
    struct FakeSource {
        delays: HashMap<String, u64>,
        fail: Vec<String>,
    }

    #[async_trait]
    impl SegmentSource for FakeSource {
        async fn fetch_to(&self, url: &str, dest: &Path) -> Result<()> {
            if let Some(millis) = self.delays.get(url) {
                sleep(Duration::from_millis(*millis)).await;
            }

            if self.fail.iter().any(|u| u == url) {
                return Err(Error::Download(format!("injected failure for {}", url)));
            }

            tokio::fs::write(dest, url).await?;
            Ok(())
        }
    }

    fn media_playlist(segments: usize) -> Playlist {
        let mut text = String::from("#EXTM3U\n");
        for i in 1..=segments {
            text.push_str(&format!("#EXTINF:10.0,\nhttps://host/dir/s{}.ts\n", i));
        }
        parse(&text).unwrap()
    }

    #[tokio::test]
    async fn test_deterministic_naming_under_out_of_order_completion() {
        let dir = tempfile::tempdir().unwrap();
        let mut playlist = media_playlist(5);

        // Segment 1 finishes last.
        let mut delays = HashMap::new();
        delays.insert("https://host/dir/s1.ts".to_string(), 200);
        let source = FakeSource {
            delays,
            fail: Vec::new(),
        };

        download_batch(&source, &mut playlist, dir.path(), 5)
            .await
            .unwrap();

        for i in 1..=5 {
            let content = std::fs::read_to_string(dir.path().join(format!("{}.ts", i))).unwrap();
            assert_eq!(content, format!("https://host/dir/s{}.ts", i));
        }
    }

    #[tokio::test]
    async fn test_partial_failure_removes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut playlist = media_playlist(5);

        let source = FakeSource {
            delays: HashMap::new(),
            fail: vec!["https://host/dir/s3.ts".to_string()],
        };

        let result = download_batch(&source, &mut playlist, dir.path(), 2).await;
        assert!(matches!(result, Err(Error::DownloadFailed(_))));

        for i in 1..=5 {
            assert!(!dir.path().join(format!("{}.ts", i)).exists());
        }
    }

    #[tokio::test]
    async fn test_key_rewritten_to_local_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut playlist = parse(
            "#EXT-X-KEY:METHOD=AES-128,URI=\"https://host/keys/enc\"\n\
             #EXTINF:10.0,\nhttps://host/dir/s1.ts\n",
        )
        .unwrap();

        let source = FakeSource::default();
        download_batch(&source, &mut playlist, dir.path(), 4)
            .await
            .unwrap();

        match &playlist.tags()[0] {
            Tag::Key { attributes } => assert_eq!(attributes.get("URI"), Some("key.key")),
            other => panic!("expected key, got {:?}", other),
        }

        assert!(dir.path().join("key.key").exists());
        assert!(dir.path().join("1.ts").exists());
    }

    #[tokio::test]
    async fn test_failure_keeps_full_tag_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut playlist = media_playlist(3);
        let tags_before = playlist.len();

        let source = FakeSource {
            delays: HashMap::new(),
            fail: vec!["https://host/dir/s2.ts".to_string()],
        };

        let _ = download_batch(&source, &mut playlist, dir.path(), 1).await;
        assert_eq!(playlist.len(), tags_before);
    }

    #[tokio::test]
    async fn test_empty_playlist_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut playlist = parse("#EXTM3U\n#EXT-X-ENDLIST\n").unwrap();

        let source = FakeSource::default();
        download_batch(&source, &mut playlist, dir.path(), 4)
            .await
            .unwrap();
    }

    #[test]
    fn test_segment_extension() {
        assert_eq!(segment_extension("https://host/dir/s1.ts"), "ts");
        assert_eq!(segment_extension("https://host/dir/s1.m4s?token=abc"), "m4s");
        assert_eq!(segment_extension("https://host/dir/noext"), "ts");
        assert_eq!(segment_extension("https://host/dir/weird.%41"), "ts");
    }
}
