/// Duration above which a transcript is split into segments, and the segment length.
pub const DEFAULT_THRESHOLD_SECONDS: u64 = 1800;

pub const DEFAULT_MAX_WORKERS: usize = 250;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub threshold_seconds: u64,
    pub max_workers: usize,
    /// When false no model calls are made and every outline is empty.
    pub use_llm: bool,
    pub include_raw_transcript: bool,
    /// Ignore cached outlines.
    pub force: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold_seconds: DEFAULT_THRESHOLD_SECONDS,
            max_workers: DEFAULT_MAX_WORKERS,
            use_llm: true,
            include_raw_transcript: false,
            force: false,
        }
    }
}
