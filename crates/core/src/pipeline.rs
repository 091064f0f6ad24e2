use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    cache::OutlineCache,
    captions::normalize,
    config::PipelineConfig,
    error::{NotetakerError, Result},
    format::format_timestamp,
    outliner::{OutlineExtractor, OutlineMerger},
    segmenter::segment,
    source::VideoSource,
    types::{Outline, PlaylistNotes, VideoEntry, VideoFailed, VideoNotes},
    workers::WorkerPool,
};

/// Title given to the extraction call for one segment of a long video.
pub fn part_title(title: &str, segment_index: u64) -> String {
    format!("{} — Part {}", title, segment_index + 1)
}

/// Produce one outline for one video transcript.
///
/// Transcripts no longer than `threshold_seconds` go to the extractor whole.
/// Longer ones are cut into `threshold_seconds` segments, extracted one after
/// another in segment order, and merged once.
pub async fn produce_outline<E, M>(
    extractor: &E,
    merger: &M,
    title: &str,
    transcript_raw: &str,
    duration_seconds: u64,
    threshold_seconds: u64,
) -> Result<Outline>
where
    E: OutlineExtractor + ?Sized,
    M: OutlineMerger + ?Sized,
{
    if duration_seconds <= threshold_seconds {
        debug!(video = %title, duration_seconds, "single extraction");
        let text = normalize(transcript_raw);
        return extractor.extract(title, &text).await;
    }

    let segments = segment(transcript_raw, threshold_seconds);
    info!(video = %title, duration_seconds, segments = segments.len(), "segmented transcript");

    if segments.is_empty() {
        return Ok(Outline::default());
    }

    let mut outlines = Vec::with_capacity(segments.len());
    for seg in &segments {
        debug!(
            video = %title,
            part = seg.index + 1,
            start = %format_timestamp(seg.start_seconds as f64),
            chars = seg.text.len(),
            "extracting segment"
        );
        let outline = extractor
            .extract(&part_title(title, seg.index), &seg.text)
            .await?;
        outlines.push(outline);
    }

    merger.merge(title, &outlines).await
}

type StageError = (&'static str, NotetakerError);

struct Processed {
    outline: Outline,
    transcript: Option<String>,
}

/// Runs single videos and whole playlists through fetch, outline and merge.
#[derive(Clone)]
pub struct Notetaker {
    inner: Arc<NotetakerInner>,
}

struct NotetakerInner {
    source: Arc<dyn VideoSource>,
    extractor: Arc<dyn OutlineExtractor>,
    merger: Arc<dyn OutlineMerger>,
    cache: Option<OutlineCache>,
    config: PipelineConfig,
}

impl Notetaker {
    pub fn new(
        source: Arc<dyn VideoSource>,
        extractor: Arc<dyn OutlineExtractor>,
        merger: Arc<dyn OutlineMerger>,
        cache: Option<OutlineCache>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(NotetakerInner {
                source,
                extractor,
                merger,
                cache,
                config,
            }),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    /// Notes for one video. Any failure is returned to the caller.
    pub async fn video_notes(&self, video_url: &str) -> Result<VideoNotes> {
        let info = self.inner.source.video_info(video_url).await?;
        let processed = self
            .process_video(&info.title, video_url, Some(info.duration_seconds))
            .await
            .map_err(|(_, e)| e)?;

        Ok(VideoNotes {
            index: 0,
            title: info.title,
            video_id: info.id,
            transcript: processed.transcript,
            result: Ok(processed.outline),
        })
    }

    /// Notes for every video of a playlist, in playlist order.
    ///
    /// Only a failure to read the playlist itself is returned as an error;
    /// per-video failures are recorded on the matching [`VideoNotes`].
    pub async fn playlist_notes(&self, playlist_url: &str) -> Result<PlaylistNotes> {
        let session = Uuid::new_v4();
        let playlist = self.inner.source.playlist_info(playlist_url).await?;
        info!(%session, playlist = %playlist.title, videos = playlist.entries.len(), "processing playlist");

        let titles: Vec<String> = playlist.entries.iter().map(|e| e.title.clone()).collect();
        let pool = WorkerPool::new(self.inner.config.max_workers);
        let this = self.clone();

        let slots = pool
            .run(playlist.entries, move |index, entry| {
                let this = this.clone();
                let span = info_span!("video", %session, index);
                async move { this.entry_notes(index, entry).await }.instrument(span)
            })
            .await;

        let videos: Vec<VideoNotes> = slots
            .into_iter()
            .zip(titles)
            .enumerate()
            .map(|(index, (slot, title))| {
                slot.unwrap_or_else(|| VideoNotes {
                    index,
                    title,
                    video_id: None,
                    transcript: None,
                    result: Err(VideoFailed::new("pool", "No result")),
                })
            })
            .collect();

        let notes = PlaylistNotes {
            title: playlist.title,
            videos,
        };
        info!(%session, failed = notes.failed_count(), "playlist done");
        Ok(notes)
    }

    async fn entry_notes(&self, index: usize, entry: VideoEntry) -> VideoNotes {
        let mut notes = VideoNotes {
            index,
            title: entry.title.clone(),
            video_id: entry.id.clone(),
            transcript: None,
            result: Ok(Outline::default()),
        };

        let Some(video_url) = entry.watch_url() else {
            warn!(video = %entry.title, "playlist entry has no video id");
            notes.result = Err(VideoFailed::new(
                "source",
                NotetakerError::MissingVideoId.to_string(),
            ));
            return notes;
        };

        match self.process_video(&entry.title, &video_url, None).await {
            Ok(processed) => {
                notes.transcript = processed.transcript;
                notes.result = Ok(processed.outline);
            }
            Err((stage, e)) => {
                warn!(video = %entry.title, stage, error = %e, "video failed");
                notes.result = Err(VideoFailed::new(stage, e.to_string()));
            }
        }
        notes
    }

    async fn process_video(
        &self,
        title: &str,
        video_url: &str,
        known_duration: Option<u64>,
    ) -> std::result::Result<Processed, StageError> {
        let config = &self.inner.config;

        let cached = if config.use_llm && !config.force {
            self.load_cached(video_url).await
        } else {
            None
        };

        let needs_transcript =
            config.include_raw_transcript || (config.use_llm && cached.is_none());
        let raw = if needs_transcript {
            let raw = self
                .inner
                .source
                .transcript(video_url)
                .await
                .map_err(|e| ("source", e))?;
            Some(raw)
        } else {
            None
        };

        let transcript = if config.include_raw_transcript {
            raw.as_deref().map(normalize)
        } else {
            None
        };

        let outline = match (cached, raw) {
            (Some(outline), _) => {
                debug!(video = %title, "outline cache hit");
                outline
            }
            (None, Some(raw)) if config.use_llm => {
                let duration_seconds = match known_duration {
                    Some(d) => d,
                    None => {
                        self.inner
                            .source
                            .video_info(video_url)
                            .await
                            .map_err(|e| ("source", e))?
                            .duration_seconds
                    }
                };

                let outline = produce_outline(
                    self.inner.extractor.as_ref(),
                    self.inner.merger.as_ref(),
                    title,
                    &raw,
                    duration_seconds,
                    config.threshold_seconds,
                )
                .await
                .map_err(|e| ("outline", e))?;

                self.store_cached(video_url, &outline).await;
                outline
            }
            _ => Outline::default(),
        };

        Ok(Processed {
            outline,
            transcript,
        })
    }

    async fn load_cached(&self, video_url: &str) -> Option<Outline> {
        let cache = self.inner.cache.as_ref()?;
        match cache.load(video_url).await {
            Ok(outline) => outline,
            Err(e) => {
                warn!(url = %video_url, error = %e, "ignoring unreadable cached outline");
                None
            }
        }
    }

    async fn store_cached(&self, video_url: &str, outline: &Outline) {
        let Some(cache) = &self.inner.cache else {
            return;
        };
        if let Err(e) = cache.store(video_url, outline).await {
            warn!(url = %video_url, error = %e, "failed to cache outline");
        }
    }
}
