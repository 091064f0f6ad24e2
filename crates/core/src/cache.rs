use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use tokio::fs;

use crate::{error::Result, outliner::NoteMode, types::Outline};

/// Get the cache directory for a given URL
pub fn get_cache_dir(root: &Path, url: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    let url_hash = hasher.finish();

    root.join(url_hash.to_string())
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("notetaker")
}

/// Get the path for a cached outline file (provider and model aware)
pub fn get_outline_path(cache_dir: &Path, tag: &str) -> PathBuf {
    let tag: String = tag
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    cache_dir.join(format!("outline_{}.json", tag))
}

/// Tag naming everything that shapes an outline besides the video itself.
pub fn outline_tag(provider_slug: &str, model: &str, mode: NoteMode, threshold_seconds: u64) -> String {
    format!("{}_{}_{}_{}s", provider_slug, model, mode.slug(), threshold_seconds)
}

/// Finished outlines keyed by video URL and by which backend produced them.
#[derive(Clone, Debug)]
pub struct OutlineCache {
    root: PathBuf,
    tag: String,
}

impl OutlineCache {
    pub fn new(root: impl Into<PathBuf>, tag: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            tag: tag.into(),
        }
    }

    pub fn path_for(&self, video_url: &str) -> PathBuf {
        get_outline_path(&get_cache_dir(&self.root, video_url), &self.tag)
    }

    pub async fn load(&self, video_url: &str) -> Result<Option<Outline>> {
        let path = self.path_for(video_url);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let json_content = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&json_content)?))
    }

    pub async fn store(&self, video_url: &str, outline: &Outline) -> Result<()> {
        let path = self.path_for(video_url);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let pretty_json = serde_json::to_string_pretty(outline)?;
        fs::write(&path, &pretty_json).await?;
        Ok(())
    }
}
