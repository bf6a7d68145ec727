#![no_main]

use cachesim::store::OrderedStore;
use libfuzzer_sys::fuzz_target;

// Fuzz insert/search sequences on OrderedStore
//
// Inserts arbitrary ids and cross-checks search/contains against a sorted
// shadow model, validating tree structure after every insert.
fuzz_target!(|data: &[u8]| {
    let mut store: OrderedStore<u64> = OrderedStore::new();
    let mut shadow: Vec<u64> = Vec::new();

    for chunk in data.chunks(2) {
        if chunk.len() < 2 {
            break;
        }
        let id = u64::from(u16::from_le_bytes([chunk[0], chunk[1]]));

        // The tree does not deduplicate; mirror that in the shadow.
        store.insert(id);
        match shadow.binary_search(&id) {
            Ok(pos) | Err(pos) => shadow.insert(pos, id),
        }

        assert_eq!(store.len(), shadow.len());
        assert!(store.contains(id));
        assert_eq!(store.search(id), Some(&id));

        let probe = id ^ 0xAAAA;
        assert_eq!(store.contains(probe), shadow.binary_search(&probe).is_ok());
    }
});
