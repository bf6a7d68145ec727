use cachesim::manager::CacheManager;

fn main() {
    let mut cache = CacheManager::new(3).expect("capacity > 0");
    cache.initialize((0..10u64).collect());

    for _ in 0..4 {
        cache.get(1);
    }
    cache.get(2);
    cache.get(9); // miss: fetched from storage, evicts the coldest key

    let mut keys = cache.cache_keys();
    keys.sort_unstable();
    println!("cached keys: {keys:?}");

    let stats = cache.statistics();
    println!(
        "hits={} misses={} evictions={} hit_rate={:.1}%",
        stats.hits, stats.misses, stats.evictions, stats.hit_rate
    );
}

// Expected output:
// cached keys: [1, 2, 9]
// hits=5 misses=1 evictions=1 hit_rate=83.3%
//
// Explanation: capacity=3 preloads keys 0..3; key 0 is never accessed, so
// fetching key 9 evicts it.
