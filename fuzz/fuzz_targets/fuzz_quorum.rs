#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mirror_core::{MonitorHistory, QuorumEvaluator, HISTORY_WINDOW};

#[derive(Debug, Arbitrary)]
struct Input {
    monitors: Vec<Vec<String>>,
}

fuzz_target!(|input: Input| {
    let histories: Vec<MonitorHistory> = input
        .monitors
        .into_iter()
        .enumerate()
        .map(|(i, lines)| MonitorHistory::from_lines(format!("logInfo{}.txt", i), lines))
        .collect();

    for history in &histories {
        assert!(history.len() <= HISTORY_WINDOW);
    }

    // Evaluation either fails on a bad tree size or selects a line it was given
    if let Ok(selection) = QuorumEvaluator::new().evaluate(&histories) {
        if let Some(accepted) = &selection.accepted {
            let size = accepted.tree_size().unwrap();
            assert!(selection.tally.count(size) >= selection.threshold);
            assert!(histories.iter().any(|h| h.checkpoints.contains(accepted)));
        }
    }
});
