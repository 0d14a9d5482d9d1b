//! Property-based tests for convopack.
//!
//! These tests generate random record streams to find segmentation edge cases.

use proptest::prelude::*;

use convopack::config::SegmenterConfig;
use convopack::core::{Role, segment, segment_with_stats};
use convopack::RawRecord;

const MINUTE: i64 = 60 * 1000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

fn config() -> SegmenterConfig {
    SegmenterConfig::new("gabe")
}

/// One step of a stream: conversation id, gap to the previous record, sender.
fn arb_step() -> impl Strategy<Value = (&'static str, i64, &'static str)> {
    (
        prop::sample::select(vec!["a", "b", "c"]),
        prop_oneof![
            0..=HOUR,
            HOUR..=2 * HOUR,
            DAY - 1..=DAY + 1,
            Just(0i64),
            2 * DAY..=3 * DAY,
        ],
        prop::sample::select(vec!["gabe", "Alice", "Bob"]),
    )
}

/// Builds a stream with unique message texts `m0`, `m1`, ...
fn arb_records(max_len: usize) -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(arb_step(), 0..max_len).prop_map(|steps| {
        let mut ts = 1_700_000_000_000i64;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (convo, gap, sender))| {
                ts += gap;
                RawRecord::new(convo, ts, sender, format!("m{i}"))
            })
            .collect()
    })
}

fn message_index(text: &str) -> usize {
    text.trim_start_matches('m').parse().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================
    // OUTPUT VALIDITY
    // ============================================

    /// Every emitted conversation has a user and an assistant turn
    #[test]
    fn emitted_conversations_have_both_roles(records in arb_records(40)) {
        for convo in segment(&records, &config()) {
            prop_assert!(convo.turns().iter().any(|t| t.role == Role::User));
            prop_assert!(convo.turns().iter().any(|t| t.role == Role::Assistant));
        }
    }

    /// Segmentation never creates turns out of nothing
    #[test]
    fn turns_never_exceed_records(records in arb_records(40)) {
        let (conversations, stats) = segment_with_stats(&records, &config());
        let turns: usize = conversations.iter().map(|c| c.len()).sum();
        prop_assert!(turns <= records.len());
        prop_assert_eq!(turns, stats.turns);
        prop_assert_eq!(stats.records, records.len());
    }

    /// Emitted text appears in input order, each message at most once
    #[test]
    fn segmentation_never_reorders(records in arb_records(40)) {
        let indices: Vec<usize> = segment(&records, &config())
            .iter()
            .flat_map(|c| c.turns().iter())
            .flat_map(|t| t.content.split('\n'))
            .map(message_index)
            .collect();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    /// A turn only ever holds messages of its own role
    #[test]
    fn merged_turns_keep_role(records in arb_records(40)) {
        for convo in segment(&records, &config()) {
            for turn in convo.turns() {
                for part in turn.content.split('\n') {
                    let sender = &records[message_index(part)].sender;
                    let expected = if sender == "gabe" { Role::Assistant } else { Role::User };
                    prop_assert_eq!(turn.role, expected);
                }
            }
        }
    }

    /// Emitted + discarded accounts for every flushed accumulator
    #[test]
    fn every_boundary_flushes_once(records in arb_records(40)) {
        let (_, stats) = segment_with_stats(&records, &config());
        if records.is_empty() {
            prop_assert_eq!(stats.emitted + stats.discarded, 0);
        } else {
            prop_assert_eq!(stats.emitted + stats.discarded, stats.splits + 1);
        }
    }

    /// Distinct conversation ids never share an output conversation
    #[test]
    fn conversations_never_span_ids(records in arb_records(40)) {
        for convo in segment(&records, &config()) {
            let mut ids = convo
                .turns()
                .iter()
                .flat_map(|t| t.content.split('\n'))
                .map(|m| records[message_index(m)].conversation_id.as_str());
            let first = ids.next().unwrap();
            prop_assert!(ids.all(|id| id == first));
        }
    }

    /// With one thread and no gap limits, roles strictly alternate
    #[test]
    fn single_thread_without_limits_alternates(records in arb_records(40)) {
        let records: Vec<RawRecord> = records
            .into_iter()
            .map(|r| RawRecord { conversation_id: "x".into(), ..r })
            .collect();
        let config = config()
            .with_conversation_gap_ms(i64::MAX / 2)
            .with_merge_gap_ms(i64::MAX / 2);

        for convo in segment(&records, &config) {
            prop_assert!(convo.turns().windows(2).all(|w| w[0].role != w[1].role));
        }
    }

    /// Re-running is deterministic
    #[test]
    fn segmentation_is_deterministic(records in arb_records(30)) {
        prop_assert_eq!(segment(&records, &config()), segment(&records, &config()));
    }
}
