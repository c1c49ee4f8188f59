use serde::{Deserialize, Serialize};

use crate::{append, remove, set_action, set_audio, set_duration, Sequence};

/// A single user edit. Positions are 0-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TimelineCommand {
    SetDuration { position: usize, duration: i64 },
    Append,
    Remove { position: usize },
    SetAction { position: usize, text: String },
    SetAudio { position: usize, text: String },
}

pub fn apply_command(sequences: &[Sequence], command: &TimelineCommand) -> Vec<Sequence> {
    match command {
        TimelineCommand::SetDuration { position, duration } => {
            set_duration(sequences, *position, *duration)
        }
        TimelineCommand::Append => append(sequences),
        TimelineCommand::Remove { position } => remove(sequences, *position),
        TimelineCommand::SetAction { position, text } => set_action(sequences, *position, text),
        TimelineCommand::SetAudio { position, text } => set_audio(sequences, *position, text),
    }
}

/// How an applied command differed from what was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// The requested duration was clamped to `applied`.
    Clamped { index: u32, requested: i64, applied: u32 },
    /// Later sequences were shortened to stay within the budget.
    Shortened { indices: Vec<u32> },
    /// Trailing sequences no longer fit and were dropped.
    Truncated { dropped: usize },
    /// The command changed nothing.
    Rejected,
}

/// Compare a command's result against the request. Empty when the edit
/// went through exactly as asked.
pub fn adjustments(
    before: &[Sequence],
    command: &TimelineCommand,
    after: &[Sequence],
) -> Vec<Adjustment> {
    let mut out = Vec::new();
    match command {
        TimelineCommand::SetDuration { position, duration } => {
            let Some(target) = after.get(*position) else {
                out.push(Adjustment::Rejected);
                return out;
            };
            if target.duration() as i64 != *duration {
                out.push(Adjustment::Clamped {
                    index: target.index,
                    requested: *duration,
                    applied: target.duration(),
                });
            }
            let shortened: Vec<u32> = before
                .iter()
                .zip(after.iter())
                .skip(position + 1)
                .filter(|(old, new)| new.duration() < old.duration())
                .map(|(_, new)| new.index)
                .collect();
            if !shortened.is_empty() {
                out.push(Adjustment::Shortened { indices: shortened });
            }
            if after.len() < before.len() {
                out.push(Adjustment::Truncated {
                    dropped: before.len() - after.len(),
                });
            }
        }
        TimelineCommand::Append | TimelineCommand::Remove { .. } => {
            if before == after {
                out.push(Adjustment::Rejected);
            }
        }
        TimelineCommand::SetAction { position, .. } | TimelineCommand::SetAudio { position, .. } => {
            if *position >= before.len() {
                out.push(Adjustment::Rejected);
            }
        }
    }
    out
}
