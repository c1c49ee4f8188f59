use serde::{Deserialize, Serialize};
use thiserror::Error;

mod commands;
pub use commands::*;
mod edit_operations;
pub use edit_operations::*;
mod timecode;
pub use timecode::*;

/// Whole seconds on the prompt timeline.
pub type Seconds = u32;

/// Fixed length of every prompt timeline.
pub const TOTAL_BUDGET: Seconds = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("timeline has no sequences")]
    Empty,
    #[error("timeline has {0} sequences, at most {max} fit", max = TOTAL_BUDGET)]
    TooManySequences(usize),
    #[error("sequence at position {position} is numbered {found}, expected {expected}")]
    IndexMismatch {
        position: usize,
        expected: u32,
        found: u32,
    },
    #[error("sequence {0} has zero duration")]
    ZeroDuration(u32),
    #[error("sequence {index} starts at {found}s, expected {expected}s")]
    NotContiguous {
        index: u32,
        expected: Seconds,
        found: Seconds,
    },
    #[error("sequence {index} ends at {end}s, past the {budget}s budget", budget = TOTAL_BUDGET)]
    OverBudget { index: u32, end: Seconds },
    #[error("invalid timestamp label: {0}")]
    InvalidLabel(String),
    #[error("sequence {index} timing overflows: starts at {start}s, lasts {duration}s")]
    TimingOverflow {
        index: u32,
        start: Seconds,
        duration: Seconds,
    },
}

/// One entry of the prompt timeline.
///
/// Timing fields are private so the `MM:SS-MM:SS` label can never drift
/// from them; every constructor and setter recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSequence")]
pub struct Sequence {
    #[serde(rename = "sequence")]
    pub index: u32,
    #[serde(rename = "timestamp")]
    label: String,
    pub action: String,
    pub audio: String,
    #[serde(rename = "startTime")]
    start_time: Seconds,
    duration: Seconds,
}

// Mirror of the stored shape. The timestamp is always rebuilt from timing.
#[derive(Deserialize)]
struct RawSequence {
    sequence: u32,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    action: String,
    #[serde(default)]
    audio: String,
    #[serde(rename = "startTime")]
    start_time: Seconds,
    duration: Seconds,
}

impl TryFrom<RawSequence> for Sequence {
    type Error = TimelineError;

    fn try_from(raw: RawSequence) -> Result<Self, Self::Error> {
        if raw.start_time.checked_add(raw.duration).is_none() {
            return Err(TimelineError::TimingOverflow {
                index: raw.sequence,
                start: raw.start_time,
                duration: raw.duration,
            });
        }
        let mut seq = Sequence::new(raw.sequence, raw.start_time, raw.duration);
        if let Some(stored) = raw.timestamp.as_deref() {
            match parse_label(stored) {
                Ok(span) if span == (seq.start_time, seq.end()) => {}
                Ok(_) | Err(_) => tracing::debug!(
                    sequence = seq.index,
                    stored,
                    rebuilt = %seq.label,
                    "replacing stale sequence timestamp"
                ),
            }
        }
        seq.action = raw.action;
        seq.audio = raw.audio;
        Ok(seq)
    }
}

impl Sequence {
    pub fn new(index: u32, start_time: Seconds, duration: Seconds) -> Self {
        Self {
            index,
            label: label(start_time, duration),
            action: String::new(),
            audio: String::new(),
            start_time,
            duration,
        }
    }

    pub fn with_text(mut self, action: impl Into<String>, audio: impl Into<String>) -> Self {
        self.action = action.into();
        self.audio = audio.into();
        self
    }

    pub fn start_time(&self) -> Seconds {
        self.start_time
    }

    pub fn duration(&self) -> Seconds {
        self.duration
    }

    pub fn end(&self) -> Seconds {
        self.start_time + self.duration
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn set_timing(&mut self, start_time: Seconds, duration: Seconds) {
        self.start_time = start_time;
        self.duration = duration;
        self.label = label(start_time, duration);
    }
}

/// The starting timeline: one empty one-second sequence.
pub fn initial_sequences() -> Vec<Sequence> {
    vec![Sequence::new(1, 0, 1)]
}

/// End of the last sequence, or 0 for an empty list.
pub fn total_duration(sequences: &[Sequence]) -> Seconds {
    sequences.last().map(Sequence::end).unwrap_or(0)
}

pub fn remaining(sequences: &[Sequence]) -> Seconds {
    TOTAL_BUDGET.saturating_sub(total_duration(sequences))
}

/// Check every timeline invariant, reporting the first violation.
pub fn validate(sequences: &[Sequence]) -> Result<(), TimelineError> {
    if sequences.is_empty() {
        return Err(TimelineError::Empty);
    }
    if sequences.len() > TOTAL_BUDGET as usize {
        return Err(TimelineError::TooManySequences(sequences.len()));
    }

    let mut expected_start: Seconds = 0;
    for (position, seq) in sequences.iter().enumerate() {
        let expected = position as u32 + 1;
        if seq.index != expected {
            return Err(TimelineError::IndexMismatch {
                position,
                expected,
                found: seq.index,
            });
        }
        if seq.duration == 0 {
            return Err(TimelineError::ZeroDuration(seq.index));
        }
        if seq.start_time != expected_start {
            return Err(TimelineError::NotContiguous {
                index: seq.index,
                expected: expected_start,
                found: seq.start_time,
            });
        }
        if seq.end() > TOTAL_BUDGET {
            return Err(TimelineError::OverBudget {
                index: seq.index,
                end: seq.end(),
            });
        }
        expected_start = seq.end();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(layout: &[(Seconds, Seconds)]) -> Vec<Sequence> {
        layout.iter()
            .enumerate()
            .map(|(i, &(start, dur))| Sequence::new(i as u32 + 1, start, dur))
            .collect()
    }

    #[test]
    fn test_initial_sequences_are_valid() {
        let seqs = initial_sequences();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].label(), "00:00-00:01");
        assert!(validate(&seqs).is_ok());
        assert_eq!(total_duration(&seqs), 1);
        assert_eq!(remaining(&seqs), 7);
    }

    #[test]
    fn test_validate_reports_violations() {
        assert_eq!(validate(&[]), Err(TimelineError::Empty));

        let gap = timeline(&[(0, 1), (2, 1)]);
        assert_eq!(
            validate(&gap),
            Err(TimelineError::NotContiguous {
                index: 2,
                expected: 1,
                found: 2
            })
        );

        let over = timeline(&[(0, 5), (5, 4)]);
        assert_eq!(
            validate(&over),
            Err(TimelineError::OverBudget { index: 2, end: 9 })
        );

        let mut renumbered = timeline(&[(0, 1), (1, 1)]);
        renumbered[1].index = 3;
        assert!(matches!(
            validate(&renumbered),
            Err(TimelineError::IndexMismatch { position: 1, .. })
        ));

        let zero = timeline(&[(0, 0)]);
        assert_eq!(validate(&zero), Err(TimelineError::ZeroDuration(1)));

        let nine: Vec<Sequence> = (0..9).map(|i| Sequence::new(i + 1, i, 1)).collect();
        assert_eq!(validate(&nine), Err(TimelineError::TooManySequences(9)));
    }

    #[test]
    fn test_deserialize_recomputes_stale_timestamp() {
        let json = r#"{"sequence":2,"timestamp":"99:99-99:99","action":"walk","audio":"","startTime":3,"duration":2}"#;
        let seq: Sequence = serde_json::from_str(json).unwrap();
        assert_eq!(seq.label(), "00:03-00:05");
        assert_eq!(seq.action, "walk");
        assert_eq!(seq.start_time(), 3);
    }

    #[test]
    fn test_deserialize_rejects_overflowing_timing() {
        let json = r#"{"sequence":1,"timestamp":"00:00-00:01","action":"","audio":"","startTime":4294967295,"duration":1}"#;
        let err = serde_json::from_str::<Sequence>(json).unwrap_err();
        assert!(err.to_string().contains("timing overflows"));
    }

    #[test]
    fn test_deserialize_tolerates_oversized_timestamp() {
        let json = r#"{"sequence":1,"timestamp":"99999999:00-99999999:01","action":"","audio":"","startTime":0,"duration":1}"#;
        let seq: Sequence = serde_json::from_str(json).unwrap();
        assert_eq!(seq.label(), "00:00-00:01");
    }

    #[test]
    fn test_serialize_uses_stored_field_names() {
        let seq = Sequence::new(1, 0, 2).with_text("wave", "wind");
        let value = serde_json::to_value(&seq).unwrap();
        assert_eq!(value["sequence"], 1);
        assert_eq!(value["timestamp"], "00:00-00:02");
        assert_eq!(value["startTime"], 0);
        assert_eq!(value["duration"], 2);
        assert_eq!(value["audio"], "wind");
    }
}
