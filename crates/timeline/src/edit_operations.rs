//! Timeline edit operations with waterfall re-flow.
//! Every operation takes the current list and returns a new one.

use tracing::debug;

use crate::{Seconds, Sequence, TOTAL_BUDGET};

/// Largest duration the sequence at `position` can take without pushing
/// any later sequence past the budget. May be below 1 for broken inputs.
pub fn max_duration_at(sequences: &[Sequence], position: usize) -> i64 {
    let Some(target) = sequences.get(position) else {
        return 0;
    };
    let sum_after: i64 = sequences[position + 1..]
        .iter()
        .map(|s| s.duration() as i64)
        .sum();
    TOTAL_BUDGET as i64 - target.start_time() as i64 - sum_after
}

/// Resize the sequence at `position` (0-based) and ripple every later
/// sequence. The request is clamped to `[1, max_duration_at]`, with the
/// floor of 1 winning when the two conflict.
pub fn set_duration(sequences: &[Sequence], position: usize, requested: i64) -> Vec<Sequence> {
    if position >= sequences.len() {
        debug!(position, len = sequences.len(), "set_duration target out of range");
        return sequences.to_vec();
    }

    let max_duration = max_duration_at(sequences, position);
    let final_duration = requested.min(max_duration).max(1) as Seconds;
    if final_duration as i64 != requested {
        debug!(
            sequence = sequences[position].index,
            requested, max_duration, final_duration, "clamped requested duration"
        );
    }

    let mut next = sequences.to_vec();
    let start = next[position].start_time();
    next[position].set_timing(start, final_duration);
    waterfall(next, position)
}

/// Re-flow every sequence after `from` so each starts where its
/// predecessor ends. Sequences that would start at or past the budget are
/// dropped along with everything after them; one that would end past the
/// budget is shortened to fit.
pub fn waterfall(mut sequences: Vec<Sequence>, from: usize) -> Vec<Sequence> {
    let mut i = from + 1;
    while i < sequences.len() {
        let start = sequences[i - 1].end();
        if start >= TOTAL_BUDGET {
            debug!(
                dropped = sequences.len() - i,
                from_sequence = sequences[i].index,
                "truncating timeline past budget"
            );
            sequences.truncate(i);
            break;
        }

        let mut duration = sequences[i].duration();
        if start + duration > TOTAL_BUDGET {
            debug!(
                sequence = sequences[i].index,
                duration,
                clamped = TOTAL_BUDGET - start,
                "shortening sequence to fit budget"
            );
            duration = TOTAL_BUDGET - start;
        }
        sequences[i].set_timing(start, duration);
        i += 1;
    }
    sequences
}

/// Add a one-second sequence at the end. No-op when the budget is used up.
pub fn append(sequences: &[Sequence]) -> Vec<Sequence> {
    let Some(last) = sequences.last() else {
        return crate::initial_sequences();
    };

    let new_start = last.end();
    if new_start >= TOTAL_BUDGET || sequences.len() >= TOTAL_BUDGET as usize {
        debug!(new_start, len = sequences.len(), "append rejected, no room left");
        return sequences.to_vec();
    }

    let mut next = sequences.to_vec();
    let duration = Seconds::min(1, TOTAL_BUDGET - new_start);
    next.push(Sequence::new(
        sequences.len() as u32 + 1,
        new_start,
        duration,
    ));
    next
}

/// Delete the sequence at `position` (0-based), renumber the rest and
/// restack them from zero. Durations are untouched. The last remaining
/// sequence can't be removed.
pub fn remove(sequences: &[Sequence], position: usize) -> Vec<Sequence> {
    if sequences.len() <= 1 || position >= sequences.len() {
        debug!(position, len = sequences.len(), "remove rejected");
        return sequences.to_vec();
    }

    let mut next = sequences.to_vec();
    next.remove(position);

    let mut start: Seconds = 0;
    for (i, seq) in next.iter_mut().enumerate() {
        seq.index = i as u32 + 1;
        let duration = seq.duration();
        seq.set_timing(start, duration);
        start += duration;
    }
    next
}

pub fn set_action(sequences: &[Sequence], position: usize, text: &str) -> Vec<Sequence> {
    let mut next = sequences.to_vec();
    match next.get_mut(position) {
        Some(seq) => seq.action = text.to_string(),
        None => debug!(position, "set_action target out of range"),
    }
    next
}

pub fn set_audio(sequences: &[Sequence], position: usize, text: &str) -> Vec<Sequence> {
    let mut next = sequences.to_vec();
    match next.get_mut(position) {
        Some(seq) => seq.audio = text.to_string(),
        None => debug!(position, "set_audio target out of range"),
    }
    next
}
