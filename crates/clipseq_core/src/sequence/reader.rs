//! Comma-separated sequence files.
//!
//! ```text
//! # id, clip, pause
//! id,clip,pause
//! intro,clips/intro.mp3,
//! gap,,2.5
//! "outro, long","clips/outro ""final"".mp3",
//! ```
//!
//! The header row is optional; without it columns are `id, clip, pause`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::SequenceError;
use crate::models::{Step, StepKind};

/// Parsed sequence plus the data-quality warnings found on the way.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    pub steps: Vec<Step>,
    pub warnings: Vec<SequenceWarning>,
}

/// A row that was accepted but not taken at face value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceWarning {
    pub line: usize,
    pub step_id: String,
    pub message: String,
}

/// Read and parse a sequence file.
pub fn read_sequence(path: &Path) -> Result<Sequence, SequenceError> {
    let content = fs::read_to_string(path).map_err(|source| SequenceError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sequence(&content)
}

/// Parse sequence text.
pub fn parse_sequence(content: &str) -> Result<Sequence, SequenceError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut rows = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        rows.push((line, split_row(raw, line)?));
    }

    let mut rows = rows.into_iter().peekable();
    let columns = match rows.peek().and_then(|(_, cells)| ColumnMap::from_header(cells)) {
        Some(map) => {
            rows.next();
            map
        }
        None => ColumnMap::POSITIONAL,
    };

    let mut sequence = Sequence::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (line, cells) in rows {
        let id = columns.cell(&cells, columns.id).unwrap_or_default();
        if id.is_empty() {
            return Err(SequenceError::MissingId { line });
        }
        if let Some(&first_line) = seen.get(id) {
            return Err(SequenceError::DuplicateId {
                id: id.to_string(),
                line,
                first_line,
            });
        }
        seen.insert(id.to_string(), line);

        let clip = columns
            .clip
            .and_then(|c| columns.cell(&cells, c))
            .filter(|c| !c.is_empty());
        let pause_cell = columns
            .pause
            .and_then(|c| columns.cell(&cells, c))
            .filter(|c| !c.is_empty());

        let mut warn = |message: String| {
            tracing::warn!("Sequence line {} (step '{}'): {}", line, id, message);
            sequence.warnings.push(SequenceWarning {
                line,
                step_id: id.to_string(),
                message,
            });
        };

        let pause = pause_cell.and_then(|cell| match parse_pause(cell) {
            Some(seconds) => Some(seconds),
            None => {
                warn(format!("pause '{}' is not a valid duration, ignored", cell));
                None
            }
        });

        let kind = match (clip, pause) {
            (Some(clip), Some(_)) => {
                warn("row has both a clip and a pause, pause ignored".to_string());
                StepKind::Clip {
                    path: PathBuf::from(clip),
                }
            }
            (Some(clip), None) => StepKind::Clip {
                path: PathBuf::from(clip),
            },
            (None, Some(seconds)) => StepKind::Pause { seconds },
            (None, None) => StepKind::Empty,
        };

        sequence.steps.push(Step {
            id: id.to_string(),
            kind,
        });
    }

    if sequence.steps.is_empty() {
        return Err(SequenceError::Empty);
    }

    Ok(sequence)
}

/// Finite, non-negative seconds.
fn parse_pause(cell: &str) -> Option<f64> {
    cell.parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
}

/// Column positions of the fields we read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    id: usize,
    clip: Option<usize>,
    pause: Option<usize>,
}

impl ColumnMap {
    const POSITIONAL: ColumnMap = ColumnMap {
        id: 0,
        clip: Some(1),
        pause: Some(2),
    };

    /// Treat the row as a header if it names the id column and one other known column.
    fn from_header(cells: &[String]) -> Option<Self> {
        let mut id = None;
        let mut clip = None;
        let mut pause = None;

        for (index, cell) in cells.iter().enumerate() {
            match cell.trim().to_ascii_lowercase().as_str() {
                "id" => id = id.or(Some(index)),
                "clip" | "audio" | "file" | "clip_reference" => clip = clip.or(Some(index)),
                "pause" | "pause_seconds" | "silence" => pause = pause.or(Some(index)),
                _ => {}
            }
        }

        match id {
            Some(id) if clip.is_some() || pause.is_some() => Some(Self { id, clip, pause }),
            _ => None,
        }
    }

    fn cell<'a>(&self, cells: &'a [String], index: usize) -> Option<&'a str> {
        cells.get(index).map(|c| c.trim())
    }
}

/// Split one line into fields, honoring double quotes.
fn split_row(raw: &str, line: usize) -> Result<Vec<String>, SequenceError> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    current.push('"');
                }
                '"' => in_quotes = false,
                _ => current.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => cells.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }

    if in_quotes {
        return Err(SequenceError::UnterminatedQuote { line });
    }
    cells.push(current);
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_rows_in_order() {
        let seq = parse_sequence("1,a.mp3,\n2,,2.5\n3,b.mp3\n").unwrap();
        assert_eq!(
            seq.steps,
            vec![
                Step::clip("1", "a.mp3"),
                Step::pause("2", 2.5),
                Step::clip("3", "b.mp3"),
            ]
        );
        assert!(seq.warnings.is_empty());
    }

    #[test]
    fn header_maps_columns_by_name() {
        let content = "Pause,Notes,ID,Audio\n,first,intro,intro.mp3\n1.0,,gap,\n";
        let seq = parse_sequence(content).unwrap();
        assert_eq!(
            seq.steps,
            vec![Step::clip("intro", "intro.mp3"), Step::pause("gap", 1.0)]
        );
    }

    #[test]
    fn skips_comments_blank_lines_and_bom() {
        let content = "\u{feff}# my sequence\n\nid,clip,pause\n  \n1,a.mp3,\n";
        let seq = parse_sequence(content).unwrap();
        assert_eq!(seq.steps, vec![Step::clip("1", "a.mp3")]);
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let content = "\"x, y\",\"it's \"\"loud\"\".mp3\",\n";
        let seq = parse_sequence(content).unwrap();
        assert_eq!(seq.steps, vec![Step::clip("x, y", "it's \"loud\".mp3")]);
    }

    #[test]
    fn invalid_pause_becomes_empty_with_warning() {
        let seq = parse_sequence("1,,abc\n2,,-1\n3,,inf\n4,,0\n").unwrap();
        assert_eq!(seq.steps[0], Step::empty("1"));
        assert_eq!(seq.steps[1], Step::empty("2"));
        assert_eq!(seq.steps[2], Step::empty("3"));
        assert_eq!(seq.steps[3], Step::pause("4", 0.0));
        assert_eq!(seq.warnings.len(), 3);
        assert_eq!(seq.warnings[0].line, 1);
        assert_eq!(seq.warnings[0].step_id, "1");
    }

    #[test]
    fn clip_wins_over_pause() {
        let seq = parse_sequence("1,a.mp3,3\n").unwrap();
        assert_eq!(seq.steps, vec![Step::clip("1", "a.mp3")]);
        assert_eq!(seq.warnings.len(), 1);
        assert!(seq.warnings[0].message.contains("pause ignored"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = parse_sequence("a,x.mp3,\n# gap\na,,1\n").unwrap_err();
        match err {
            SequenceError::DuplicateId {
                id,
                line,
                first_line,
            } => {
                assert_eq!(id, "a");
                assert_eq!(line, 3);
                assert_eq!(first_line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_missing_id_and_open_quote() {
        assert!(matches!(
            parse_sequence("1,a.mp3,\n,b.mp3,\n"),
            Err(SequenceError::MissingId { line: 2 })
        ));
        assert!(matches!(
            parse_sequence("1,\"a.mp3,\n"),
            Err(SequenceError::UnterminatedQuote { line: 1 })
        ));
    }

    #[test]
    fn rejects_empty_sequences() {
        assert!(matches!(parse_sequence(""), Err(SequenceError::Empty)));
        assert!(matches!(
            parse_sequence("id,clip,pause\n"),
            Err(SequenceError::Empty)
        ));
    }

    #[test]
    fn read_sequence_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_sequence(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, SequenceError::ReadError { .. }));
        assert!(err.line().is_none());
    }
}
