#![no_main]

use cachesim::ds::FrequencyIndex;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on FrequencyIndex
//
// Random interleavings of insert, touch, remove, pop_min, peek_min, and
// clear, validating structural invariants after every mutation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mut index: FrequencyIndex<u32> = FrequencyIndex::new();

    for chunk in data.chunks(2) {
        if chunk.len() < 2 {
            break;
        }
        let op = chunk[0] % 8;
        let key = u32::from(chunk[1]);

        match op {
            0 | 1 => {
                index.insert(key);
            }
            2 | 3 => {
                index.touch(&key);
            }
            4 => {
                index.remove(&key);
            }
            5 => {
                index.pop_min();
            }
            6 => {
                let _ = index.peek_min();
                let _ = index.frequency(&key);
                let _ = index.min_freq();
            }
            7 => {
                if key % 17 == 0 {
                    index.clear();
                }
            }
            _ => unreachable!(),
        }

        index.debug_validate_invariants();
        assert!(index.len() <= 256, "more keys than the key space allows");
    }
});
