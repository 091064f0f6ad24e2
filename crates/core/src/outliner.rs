use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::{NotetakerError, Result},
    provider::{Provider, ProviderConfig},
    types::Outline,
};

/// Turns a block of transcript text into an outline.
#[async_trait]
pub trait OutlineExtractor: Send + Sync {
    async fn extract(&self, title: &str, text: &str) -> Result<Outline>;
}

/// Folds ordered outlines into one, keeping cumulative topic order.
#[async_trait]
pub trait OutlineMerger: Send + Sync {
    async fn merge(&self, title: &str, outlines: &[Outline]) -> Result<Outline>;
}

static PLAYLIST_NOTE_TAKER_PROMPT: &str = "You are an expert note-taker. Given a YouTube video title and its transcript, \
produce structured notes that follow the same teaching flow as the video. \
Maintain the original order of topics and explanations. Use clear language without adding new facts. \
Outline format: H2 sections for major topics, under each H2 create several H3 subtopics with 3-7 bullet points. \
Bullets should be faithful to the transcript: explanations, examples, formulas, and key takeaways.";

static SINGLE_VIDEO_NOTE_TAKER_PROMPT: &str = "You are an expert note-taker for a single video. Given the video title and transcript, \
produce structured notes that follow the video's sequence exactly. \
Use H2 sections for major parts of the video, with H3 subtopics and 3-7 concise bullets each. \
Do not invent content; reflect the video faithfully.";

static MERGE_PROMPT: &str = "You are a master note merger. Merge multiple JSON note outlines into one coherent outline. \
Preserve the original order of topics as much as possible and avoid duplication. \
Return the same JSON schema with consolidated sections.";

static JSON_SCHEMA_INSTRUCTIONS: &str = r#"Return JSON only, no prose. Schema:
{
  "sections": [
    {
      "title": "string",
      "subsections": [
        {
          "title": "string",
          "bullets": ["string"]
        }
      ]
    }
  ]
}
"#;

/// Transcript characters sent per extraction call.
pub const MAX_TRANSCRIPT_CHARS: usize = 15_000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteMode {
    Playlist,
    Single,
}

impl NoteMode {
    pub fn slug(self) -> &'static str {
        match self {
            NoteMode::Playlist => "playlist",
            NoteMode::Single => "single",
        }
    }

    fn system_prompt(self) -> &'static str {
        match self {
            NoteMode::Playlist => PLAYLIST_NOTE_TAKER_PROMPT,
            NoteMode::Single => SINGLE_VIDEO_NOTE_TAKER_PROMPT,
        }
    }
}

/// Extractor and merger backed by an OpenAI-compatible chat completions API.
pub struct ChatOutliner {
    client: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
    mode: NoteMode,
}

impl ChatOutliner {
    pub fn new(provider: &Provider, model: Option<&str>, mode: NoteMode) -> Result<Self> {
        let api_key = provider.validate_api_key()?;
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            config: provider.config_with_model(model),
            api_key,
            mode,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, system_prompt: &str, user_prompt: String) -> Result<Outline> {
        debug!(model = %self.config.model, prompt_chars = user_prompt.len(), "chat completion request");

        let response = self
            .client
            .post(self.config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt,
                    },
                    {
                        "role": "user",
                        "content": user_prompt,
                    },
                ],
                "temperature": 0,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotetakerError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response = response.json::<serde_json::Value>().await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| NotetakerError::InvalidApiResponse {
                reason: format!("{:?}", response),
            })?;

        parse_outline_reply(content)
    }
}

#[async_trait]
impl OutlineExtractor for ChatOutliner {
    async fn extract(&self, title: &str, text: &str) -> Result<Outline> {
        let user_prompt = extraction_prompt(title, text);
        self.complete(self.mode.system_prompt(), user_prompt).await
    }
}

#[async_trait]
impl OutlineMerger for ChatOutliner {
    async fn merge(&self, title: &str, outlines: &[Outline]) -> Result<Outline> {
        let outlines_json = serde_json::to_string(outlines)?;
        let user_prompt = format!(
            "Title: {}\n\nOutlines (JSON array):\n{}\n\n{}",
            title, outlines_json, JSON_SCHEMA_INSTRUCTIONS
        );
        self.complete(MERGE_PROMPT, user_prompt).await
    }
}

/// Stand-in used when model calls are switched off: every outline is empty.
pub struct NoopOutliner;

#[async_trait]
impl OutlineExtractor for NoopOutliner {
    async fn extract(&self, _title: &str, _text: &str) -> Result<Outline> {
        Ok(Outline::default())
    }
}

#[async_trait]
impl OutlineMerger for NoopOutliner {
    async fn merge(&self, _title: &str, _outlines: &[Outline]) -> Result<Outline> {
        Ok(Outline::default())
    }
}

fn extraction_prompt(title: &str, text: &str) -> String {
    let clipped: String = text.chars().take(MAX_TRANSCRIPT_CHARS).collect();
    format!(
        "Title: {}\n\nTranscript (plaintext):\n{}\n\n{}",
        title, clipped, JSON_SCHEMA_INSTRUCTIONS
    )
}

/// Remove a surrounding markdown code fence (optionally tagged `json`).
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let inner = trimmed.trim_matches('`').trim_start();
    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };
    inner.trim()
}

/// Parse a model reply into an outline, failing on anything that is not the outline schema.
pub fn parse_outline_reply(content: &str) -> Result<Outline> {
    serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        NotetakerError::InvalidModelOutput {
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Section, Subsection};

    #[test]
    fn parses_bare_json() {
        let outline = parse_outline_reply(
            r#"{"sections":[{"title":"Intro","subsections":[{"title":"Why","bullets":["a","b"]}]}]}"#,
        )
        .unwrap();

        assert_eq!(
            outline,
            Outline {
                sections: vec![Section {
                    title: "Intro".into(),
                    subsections: vec![Subsection {
                        title: "Why".into(),
                        bullets: vec!["a".into(), "b".into()],
                    }],
                }],
            }
        );
    }

    #[test]
    fn strips_fenced_json() {
        let reply = "```json\n{\"sections\": [{\"title\": \"Only\"}]}\n```";
        let outline = parse_outline_reply(reply).unwrap();
        assert_eq!(outline.sections.len(), 1);
        assert_eq!(outline.sections[0].title, "Only");
        assert!(outline.sections[0].subsections.is_empty());
    }

    #[test]
    fn strips_untagged_fence() {
        let reply = "```\n{\"sections\": []}\n```";
        assert!(parse_outline_reply(reply).unwrap().is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        assert!(parse_outline_reply("{}").unwrap().is_empty());
    }

    #[test]
    fn rejects_prose() {
        let err = parse_outline_reply("Sure! Here are your notes.").unwrap_err();
        assert!(matches!(err, NotetakerError::InvalidModelOutput { .. }));
    }

    #[test]
    fn rejects_wrong_schema() {
        let err = parse_outline_reply(r#"{"sections": "nope"}"#).unwrap_err();
        assert!(matches!(err, NotetakerError::InvalidModelOutput { .. }));
    }

    #[test]
    fn extraction_prompt_clips_transcript() {
        let text = "z".repeat(MAX_TRANSCRIPT_CHARS + 500);
        let prompt = extraction_prompt("Talk", &text);
        assert!(prompt.starts_with("Title: Talk\n\nTranscript (plaintext):\n"));
        assert_eq!(prompt.matches('z').count(), MAX_TRANSCRIPT_CHARS);
    }
}
