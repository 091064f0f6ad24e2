use crate::types::{Outline, PlaylistNotes, VideoNotes};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Append an outline with its top level at heading depth `level`.
fn push_outline(output: &mut String, outline: &Outline, level: usize) {
    let section_marks = "#".repeat(level);
    let subsection_marks = "#".repeat(level + 1);

    for section in &outline.sections {
        output.push_str(&format!("{} {}\n\n", section_marks, section.title));
        for sub in &section.subsections {
            output.push_str(&format!("{} {}\n\n", subsection_marks, sub.title));
            for bullet in &sub.bullets {
                output.push_str(&format!("- {}\n", bullet));
            }
            if !sub.bullets.is_empty() {
                output.push('\n');
            }
        }
    }
}

/// Markdown notes for a whole playlist: one `##` block per video, in playlist order.
pub fn format_playlist_markdown(notes: &PlaylistNotes) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", notes.title));

    for video in &notes.videos {
        output.push_str(&format!("## {}\n\n", video.title));
        push_video_body(&mut output, video, 3);
    }

    output
}

/// Markdown notes for a single video.
pub fn format_video_markdown(notes: &VideoNotes) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", notes.title));
    push_video_body(&mut output, notes, 2);
    output
}

fn push_video_body(output: &mut String, video: &VideoNotes, level: usize) {
    if let Some(transcript) = video.transcript.as_deref().filter(|t| !t.is_empty()) {
        output.push_str(&format!("> {}\n\n", transcript));
    }

    match &video.result {
        Ok(outline) => push_outline(output, outline, level),
        Err(err) => output.push_str(&format!("LLM summarization failed: {}\n\n", err)),
    }
}
