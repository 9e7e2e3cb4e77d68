//! Property-based tests for the command output buffer
//!
//! Validates buffer invariants:
//! - N records produce keys 1..=N in call order
//! - Clearing restarts numbering at 1
//! - Snapshots are unaffected by later writes

use commandbox_proxy::CommandSink;
use proptest::prelude::*;

proptest! {
    /// Property: Sequence numbers are contiguous from 1 in arrival order
    #[test]
    fn records_are_numbered_in_order(
        lines in prop::collection::vec(".{0,24}", 0..64),
    ) {
        let mut sink = CommandSink::default();
        for line in &lines {
            sink.record(line.clone());
        }

        prop_assert_eq!(sink.len(), lines.len());
        for (index, (seq, line)) in sink.read().iter().enumerate() {
            prop_assert_eq!(*seq as usize, index + 1);
            prop_assert_eq!(line, &lines[index]);
        }
    }

    /// Property: Numbering restarts at 1 after every clear
    #[test]
    fn clear_restarts_numbering(
        before in 0usize..32,
        after in 0usize..32,
    ) {
        let mut sink = CommandSink::default();
        for i in 0..before {
            sink.record(format!("old {i}"));
        }
        sink.clear();
        for i in 0..after {
            sink.record(format!("new {i}"));
        }

        let keys: Vec<u32> = sink.read().keys().copied().collect();
        let expected: Vec<u32> = (1..=after as u32).collect();
        prop_assert_eq!(keys, expected);
        prop_assert!(sink.lines().all(|line| line.starts_with("new")));
    }

    /// Property: A snapshot never observes later clears or records
    #[test]
    fn snapshot_is_independent(
        initial in prop::collection::vec("[a-z]{1,8}", 0..16),
        later in prop::collection::vec("[A-Z]{1,8}", 0..16),
        clear_first in any::<bool>(),
    ) {
        let mut sink = CommandSink::default();
        for line in &initial {
            sink.record(line.clone());
        }
        let snapshot = sink.snapshot();

        if clear_first {
            sink.clear();
        }
        for line in &later {
            sink.record(line.clone());
        }

        let captured: Vec<String> = snapshot.values().cloned().collect();
        prop_assert_eq!(captured, initial);
    }
}
