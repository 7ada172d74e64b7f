#![no_main]

use libfuzzer_sys::fuzz_target;
use mirror_core::Checkpoint;

fuzz_target!(|line: &str| {
    let chpt = Checkpoint::new(line);

    // Field accessors should not panic
    let _ = chpt.origin();
    let _ = chpt.root_hash();
    let _ = chpt.timestamp();

    // Tree size failures are never recoverable
    if let Err(e) = chpt.tree_size() {
        assert!(!e.is_recoverable());
    }

    // The raw line is preserved
    assert_eq!(chpt.to_string(), line);
});
