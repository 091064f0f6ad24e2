//! Notetaker Core Library
//!
//! Turns YouTube captions into ordered, LLM-distilled note outlines: caption
//! cleanup, time segmentation, per-segment extraction and merging, and a
//! bounded worker pool for playlists.

pub mod cache;
pub mod captions;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod outliner;
pub mod pipeline;
pub mod provider;
pub mod segmenter;
pub mod source;
pub mod types;
pub mod workers;

// Re-export commonly used items at crate root
pub use cache::{OutlineCache, get_root_cache_dir, outline_tag};
pub use captions::normalize;
pub use config::PipelineConfig;
pub use document::write_document;
pub use error::{NotetakerError, Result};
pub use format::{format_playlist_markdown, format_video_markdown};
pub use outliner::{ChatOutliner, NoopOutliner, NoteMode, OutlineExtractor, OutlineMerger};
pub use pipeline::{Notetaker, part_title, produce_outline};
pub use provider::{Provider, ProviderConfig};
pub use segmenter::segment;
pub use source::{TRANSCRIPT_NOT_AVAILABLE, VideoSource, YtDlpSource};
pub use types::{
    Outline, PlaylistInfo, PlaylistNotes, Section, Segment, Subsection, VideoEntry, VideoFailed,
    VideoInfo, VideoNotes,
};
pub use workers::WorkerPool;
