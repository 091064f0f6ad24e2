use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-level note outline. Order at every level mirrors the source video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A fixed-duration time bucket of caption text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: u64,
    pub start_seconds: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub title: String,
    pub id: Option<String>,
}

impl VideoEntry {
    pub fn watch_url(&self) -> Option<String> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistInfo {
    pub title: String,
    pub entries: Vec<VideoEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: Option<String>,
    pub title: String,
    pub duration_seconds: u64,
}

/// Why a single video in a run produced no outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoFailed {
    pub stage: &'static str,
    pub message: String,
}

impl VideoFailed {
    pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for VideoFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome for one video, tagged with its position in the source list.
#[derive(Debug, Clone)]
pub struct VideoNotes {
    pub index: usize,
    pub title: String,
    pub video_id: Option<String>,
    pub transcript: Option<String>,
    pub result: Result<Outline, VideoFailed>,
}

#[derive(Debug, Clone)]
pub struct PlaylistNotes {
    pub title: String,
    pub videos: Vec<VideoNotes>,
}

impl PlaylistNotes {
    pub fn failed_count(&self) -> usize {
        self.videos.iter().filter(|v| v.result.is_err()).count()
    }
}
