//! Segment plans and run results.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where a segment's audio comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSource {
    /// User-supplied clip.
    Clip,
    /// Silence generated into the scratch area.
    Silence,
}

/// One playable file in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Index of the producing step in the sequence.
    pub step_index: usize,
    /// Id of the producing step.
    pub step_id: String,
    pub source: SegmentSource,
    pub path: PathBuf,
}

/// Ordered segments, one per contributing step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPlan {
    segments: Vec<Segment>,
}

impl SegmentPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Segment paths in playback order.
    pub fn paths(&self) -> Vec<&Path> {
        self.segments.iter().map(|s| s.path.as_path()).collect()
    }

    pub fn clip_count(&self) -> usize {
        self.count(SegmentSource::Clip)
    }

    pub fn silence_count(&self) -> usize {
        self.count(SegmentSource::Silence)
    }

    fn count(&self, source: SegmentSource) -> usize {
        self.segments.iter().filter(|s| s.source == source).count()
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// The assembled file.
    pub output_path: PathBuf,
    /// Duration reported by ffprobe, in seconds.
    pub audio_length_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(index: usize, source: SegmentSource, path: &str) -> Segment {
        Segment {
            step_index: index,
            step_id: index.to_string(),
            source,
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn keeps_push_order_and_counts() {
        let mut plan = SegmentPlan::new();
        assert!(plan.is_empty());

        plan.push(segment(0, SegmentSource::Clip, "a.mp3"));
        plan.push(segment(1, SegmentSource::Silence, "silence-1.mp3"));
        plan.push(segment(2, SegmentSource::Clip, "b.mp3"));

        assert_eq!(plan.len(), 3);
        assert_eq!(
            plan.paths(),
            vec![
                Path::new("a.mp3"),
                Path::new("silence-1.mp3"),
                Path::new("b.mp3")
            ]
        );
        assert_eq!(plan.clip_count(), 2);
        assert_eq!(plan.silence_count(), 1);
    }
}
