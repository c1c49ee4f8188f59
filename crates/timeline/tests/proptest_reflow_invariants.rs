//! Property-based invariant tests for the timeline re-flow operations.
//!
//! For any valid timeline and any sequence of edits:
//!
//! 1. The result passes `validate` (dense indices, contiguity, budget).
//! 2. Every stored label equals the label recomputed from its timing.
//! 3. Removal never changes the surviving durations.
//! 4. Append grows the list by at most one.
//! 5. The input list is never modified.

use proptest::prelude::*;
use timeline::{
    append, apply_command, label, remove, set_duration, validate, Sequence, TimelineCommand,
    TOTAL_BUDGET,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn valid_timeline() -> impl Strategy<Value = Vec<Sequence>> {
    proptest::collection::vec(1u32..=TOTAL_BUDGET, 1..=TOTAL_BUDGET as usize).prop_map(
        |durations| {
            let mut out = Vec::new();
            let mut start = 0;
            for duration in durations {
                let duration = duration.min(TOTAL_BUDGET - start);
                if duration == 0 {
                    break;
                }
                out.push(Sequence::new(out.len() as u32 + 1, start, duration));
                start += duration;
            }
            out
        },
    )
}

fn any_command() -> impl Strategy<Value = TimelineCommand> {
    prop_oneof![
        (0usize..10, -4i64..16).prop_map(|(position, duration)| {
            TimelineCommand::SetDuration { position, duration }
        }),
        Just(TimelineCommand::Append),
        (0usize..10).prop_map(|position| TimelineCommand::Remove { position }),
        (0usize..10, "[a-z ]{0,12}")
            .prop_map(|(position, text)| TimelineCommand::SetAction { position, text }),
        (0usize..10, "[a-z ]{0,12}")
            .prop_map(|(position, text)| TimelineCommand::SetAudio { position, text }),
    ]
}

fn labels_consistent(sequences: &[Sequence]) -> bool {
    sequences
        .iter()
        .all(|s| s.label() == label(s.start_time(), s.duration()))
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Any edit sequence keeps every invariant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edits_preserve_invariants(
        start in valid_timeline(),
        commands in proptest::collection::vec(any_command(), 1..20),
    ) {
        let mut seqs = start;
        for cmd in &commands {
            seqs = apply_command(&seqs, cmd);
            prop_assert!(validate(&seqs).is_ok(), "{:?} broke {:?}", cmd, seqs);
            prop_assert!(labels_consistent(&seqs));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// set_duration respects the clamp window
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_duration_applies_clamped_value(
        seqs in valid_timeline(),
        pick in 0usize..8,
        requested in -10i64..20,
    ) {
        let position = pick % seqs.len();
        let result = set_duration(&seqs, position, requested);

        let max = timeline::max_duration_at(&seqs, position);
        let expected = requested.min(max).max(1);
        prop_assert_eq!(result[position].duration() as i64, expected);
        prop_assert_eq!(result[position].start_time(), seqs[position].start_time());
        // Valid input leaves room for every later sequence, so nothing is lost.
        prop_assert_eq!(result.len(), seqs.len());
        for (old, new) in seqs.iter().zip(result.iter()).skip(position + 1) {
            prop_assert_eq!(old.duration(), new.duration());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Removal keeps durations
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn remove_keeps_surviving_durations(seqs in valid_timeline(), pick in 0usize..8) {
        let position = pick % seqs.len();
        let result = remove(&seqs, position);

        if seqs.len() == 1 {
            prop_assert_eq!(&result, &seqs);
        } else {
            let mut expected: Vec<u32> = seqs.iter().map(Sequence::duration).collect();
            expected.remove(position);
            let actual: Vec<u32> = result.iter().map(Sequence::duration).collect();
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(result[0].start_time(), 0);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4 + 5. Append growth and input immutability
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn append_grows_by_at_most_one(seqs in valid_timeline()) {
        let before = seqs.clone();
        let result = append(&seqs);

        prop_assert_eq!(&seqs, &before);
        let used: u32 = seqs.iter().map(Sequence::duration).sum();
        if used < TOTAL_BUDGET {
            prop_assert_eq!(result.len(), seqs.len() + 1);
            let last = &result[result.len() - 1];
            prop_assert_eq!(last.duration(), 1);
            prop_assert_eq!(last.start_time(), used);
        } else {
            prop_assert_eq!(result, seqs);
        }
    }
}
