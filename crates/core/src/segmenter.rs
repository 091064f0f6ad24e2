//! Rough time bucketing of caption tracks.
//!
//! Buckets only bound how much text goes into one model call; they are not
//! topic boundaries.

use std::collections::BTreeMap;

use crate::{
    captions::{collapse_whitespace, parse_timestamp, strip_tags},
    types::Segment,
};

const RANGE_SEPARATOR: &str = "-->";

/// Bucket caption cue text into windows of `duration_seconds` by cue start time.
///
/// Text seen before the first parsable timestamp is dropped. A range line whose
/// start cannot be parsed leaves the previous start in effect. Only buckets that
/// received text are returned, ordered by index.
pub fn segment(raw: &str, duration_seconds: u64) -> Vec<Segment> {
    let duration = duration_seconds.max(1);
    let mut current_start: Option<f64> = None;
    let mut buckets: BTreeMap<u64, Vec<String>> = BTreeMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((left, _)) = line.split_once(RANGE_SEPARATOR) {
            if let Some(start) = parse_timestamp(left) {
                current_start = Some(start);
                continue;
            }
        }

        let Some(start) = current_start else {
            continue;
        };

        let index = (start / duration as f64).floor() as u64;
        buckets.entry(index).or_default().push(strip_tags(line));
    }

    buckets
        .into_iter()
        .map(|(index, lines)| Segment {
            index,
            start_seconds: index * duration,
            text: collapse_whitespace(&lines.join(" ")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(index: u64, start_seconds: u64, text: &str) -> Segment {
        Segment {
            index,
            start_seconds,
            text: text.to_string(),
        }
    }

    #[test]
    fn buckets_by_cue_start() {
        let raw = "WEBVTT\n\n00:00:05.000 --> 00:00:07.000\nA\n\n00:31:10.000 --> 00:31:12.000\nB\n";
        assert_eq!(
            segment(raw, 1800),
            vec![seg(0, 0, "A"), seg(1, 1800, "B")]
        );
    }

    #[test]
    fn joins_lines_within_a_bucket() {
        let raw = "1\n00:00:01,000 --> 00:00:02,000\nfirst <b>line</b>\nsecond   line\n\n2\n00:10:00,000 --> 00:10:02,000\nthird\n";
        assert_eq!(
            segment(raw, 1800),
            vec![seg(0, 0, "first line second line third")]
        );
    }

    #[test]
    fn drops_text_before_first_timestamp() {
        let raw = "WEBVTT\nKind: captions\nstray noise\n00:00:01.000 --> 00:00:02.000\nkept\n";
        let segments = segment(raw, 60);
        assert_eq!(segments, vec![seg(0, 0, "kept")]);
        assert!(segments.iter().all(|s| !s.text.contains("noise")));
    }

    #[test]
    fn malformed_range_keeps_previous_start() {
        let raw = "00:00:01.000 --> 00:00:02.000\none\n00:40:00.000 --> 00:40:01.000\ntwo\nbogus --> nowhere\nthree\n";
        assert_eq!(
            segment(raw, 1800),
            vec![seg(0, 0, "one"), seg(1, 1800, "two bogus --> nowhere three")]
        );
    }

    #[test]
    fn malformed_range_without_prior_start_is_dropped() {
        let raw = "bogus --> nowhere\ntext\n";
        assert!(segment(raw, 1800).is_empty());
    }

    #[test]
    fn skips_empty_windows() {
        let raw = "00:00:01 --> 00:00:02\na\n02:00:00 --> 02:00:01\nb\n";
        let segments = segment(raw, 1800);
        assert_eq!(segments, vec![seg(0, 0, "a"), seg(4, 7200, "b")]);
    }

    #[test]
    fn indices_strictly_increase_for_unordered_cues() {
        let raw = "01:30:00.000 --> 01:30:01.000\nlate\n00:00:01.000 --> 00:00:02.000\nearly\n00:45:00.000 --> 00:45:01.000\nmiddle\n";
        let segments = segment(raw, 1800);
        assert!(segments.windows(2).all(|w| w[0].index < w[1].index));
        assert_eq!(segments[0].text, "early");
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert!(segment("", 1800).is_empty());
    }

    #[test]
    fn minute_timestamps_are_accepted() {
        let raw = "05:00.000 --> 05:01.000\nfive\n";
        assert_eq!(segment(raw, 120), vec![seg(2, 240, "five")]);
    }
}
