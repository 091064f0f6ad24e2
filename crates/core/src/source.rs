use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    error::{NotetakerError, Result},
    types::{PlaylistInfo, VideoEntry, VideoInfo},
};

/// Returned in place of captions when a video has none we can fetch.
pub const TRANSCRIPT_NOT_AVAILABLE: &str = "Transcript not available.";

const CAPTION_TIMEOUT: Duration = Duration::from_secs(30);
const CAPTION_LANG: &str = "en";

/// Where playlist metadata, video metadata and raw caption tracks come from.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn playlist_info(&self, url: &str) -> Result<PlaylistInfo>;
    async fn video_info(&self, url: &str) -> Result<VideoInfo>;
    /// Raw caption track text, or [`TRANSCRIPT_NOT_AVAILABLE`].
    async fn transcript(&self, url: &str) -> Result<String>;
}

/// [`VideoSource`] backed by the `yt-dlp` executable.
pub struct YtDlpSource {
    client: reqwest::Client,
}

impl YtDlpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CAPTION_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    async fn dump_json(url: &str, extra_args: &[&str]) -> Result<serde_json::Value> {
        let output = Command::new("yt-dlp")
            .arg("--dump-single-json")
            .arg("--no-warnings")
            .args(extra_args)
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            return Err(NotetakerError::SourceFailed {
                url: url.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn download_caption(&self, caption_url: &str) -> Result<Option<String>> {
        let response = self.client.get(caption_url).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "caption download refused");
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn playlist_info(&self, url: &str) -> Result<PlaylistInfo> {
        let info = Self::dump_json(url, &["--flat-playlist"]).await?;
        Ok(playlist_from_json(&info))
    }

    async fn video_info(&self, url: &str) -> Result<VideoInfo> {
        let info = Self::dump_json(url, &["--skip-download"]).await?;
        Ok(video_from_json(&info))
    }

    async fn transcript(&self, url: &str) -> Result<String> {
        let info = Self::dump_json(
            url,
            &[
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-langs",
                CAPTION_LANG,
            ],
        )
        .await?;

        for caption_url in caption_urls(&info) {
            debug!(%url, "downloading captions");
            if let Some(text) = self.download_caption(&caption_url).await? {
                return Ok(text);
            }
        }

        Ok(TRANSCRIPT_NOT_AVAILABLE.to_string())
    }
}

fn playlist_from_json(info: &serde_json::Value) -> PlaylistInfo {
    let entries = info["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e.is_object())
                .map(|e| VideoEntry {
                    title: e["title"].as_str().unwrap_or("Untitled").to_string(),
                    id: e["id"].as_str().map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    PlaylistInfo {
        title: info["title"].as_str().unwrap_or("Playlist").to_string(),
        entries,
    }
}

fn video_from_json(info: &serde_json::Value) -> VideoInfo {
    VideoInfo {
        id: info["id"].as_str().map(str::to_string),
        title: info["title"].as_str().unwrap_or("Video").to_string(),
        duration_seconds: info["duration"].as_f64().map(|d| d as u64).unwrap_or(0),
    }
}

/// Candidate caption URLs: the requested manual track first, then the
/// automatic English track (WebVTT preferred).
fn caption_urls(info: &serde_json::Value) -> Vec<String> {
    let mut urls = Vec::new();

    if let Some(url) = info["requested_subtitles"][CAPTION_LANG]["url"].as_str() {
        urls.push(url.to_string());
    }

    if let Some(tracks) = info["automatic_captions"][CAPTION_LANG].as_array() {
        let track = tracks
            .iter()
            .find(|t| t["ext"].as_str() == Some("vtt"))
            .or_else(|| tracks.first());
        if let Some(url) = track.and_then(|t| t["url"].as_str()) {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
    }

    urls
}
