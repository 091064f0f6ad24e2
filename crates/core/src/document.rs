use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::Result;

/// File stem for a human-readable title.
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim().trim_matches('.').trim();

    if stem.is_empty() {
        "notes".to_string()
    } else {
        stem.to_string()
    }
}

/// Write `content` to `<output_dir>/<title>.md`, creating the directory if needed.
pub async fn write_document(output_dir: &Path, title: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(format!("{}.md", file_stem(title)));
    fs::write(&path, content).await?;
    Ok(path)
}
