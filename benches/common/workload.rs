//! Deterministic key streams for cache evaluation.
//!
//! Every pattern is seeded and reproducible; no external RNG crate is
//! pulled into the bench harness.

use cachesim::manager::CacheManager;
use cachesim::stats::CacheStats;
use cachesim::traits::Keyed;

/// Shape of the generated request stream.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Uniform random ids in `[0, universe)`.
    Uniform,
    /// A hot subset takes most of the traffic: `hot_fraction` of the
    /// keyspace receives `hot_prob` of the requests.
    HotCold { hot_fraction: f64, hot_prob: f64 },
    /// Sequential sweep over `[0, universe)`.
    Scan,
    /// Zipfian-distributed ids; `theta` controls skew (0 = uniform,
    /// 0.99 = heavily skewed, the YCSB default).
    Zipfian { theta: f64 },
}

impl Pattern {
    /// The 80/20 split over the first fifth of the keyspace used by the
    /// standard comparison reports.
    pub fn classic_hot_cold() -> Self {
        Pattern::HotCold {
            hot_fraction: 0.2,
            hot_prob: 0.8,
        }
    }
}

/// Seeded stream of request ids following a [`Pattern`].
#[derive(Debug, Clone)]
pub struct KeyStream {
    universe: u64,
    pattern: Pattern,
    rng: XorShift64,
    cursor: u64,
    zipf: Option<Zipfian>,
}

impl KeyStream {
    pub fn new(universe: u64, pattern: Pattern, seed: u64) -> Self {
        let universe = universe.max(1);
        let zipf = match pattern {
            Pattern::Zipfian { theta } => Some(Zipfian::new(universe, theta)),
            _ => None,
        };
        Self {
            universe,
            pattern,
            rng: XorShift64::new(seed),
            cursor: 0,
            zipf,
        }
    }

    pub fn next_key(&mut self) -> u64 {
        match self.pattern {
            Pattern::Uniform => self.rng.next_u64() % self.universe,
            Pattern::HotCold {
                hot_fraction,
                hot_prob,
            } => {
                let hot = (((self.universe as f64) * hot_fraction.clamp(0.0, 1.0)) as u64)
                    .clamp(1, self.universe);
                if self.rng.next_f64() < hot_prob.clamp(0.0, 1.0) || hot == self.universe {
                    self.rng.next_u64() % hot
                } else {
                    hot + self.rng.next_u64() % (self.universe - hot)
                }
            }
            Pattern::Scan => {
                let key = self.cursor;
                self.cursor = (self.cursor + 1) % self.universe;
                key
            }
            Pattern::Zipfian { .. } => {
                let u = self.rng.next_f64();
                self.zipf.as_ref().expect("zipfian state missing").sample(u)
            }
        }
    }

    /// Materializes the next `count` keys; handy for replaying the same
    /// stream against two subjects.
    pub fn take_keys(&mut self, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.next_key()).collect()
    }
}

/// Drives `requests` lookups through the manager and returns the final
/// statistics snapshot.
pub fn drive<T>(cache: &mut CacheManager<T>, stream: &mut KeyStream, requests: usize) -> CacheStats
where
    T: Keyed + Clone,
{
    for _ in 0..requests {
        let key = stream.next_key();
        let _ = cache.get(key);
    }
    cache.statistics()
}

/// Zipfian sampling via the YCSB inverse-CDF construction.
#[derive(Debug, Clone)]
struct Zipfian {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl Zipfian {
    fn new(n: u64, theta: f64) -> Self {
        let theta = theta.clamp(0.0, 0.9999);
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        Self {
            n,
            theta,
            zeta_n,
            alpha: 1.0 / (1.0 - theta),
            eta: (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n),
        }
    }

    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 {
            return 0;
        }
        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }
        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) * (1.0 / u64::MAX as f64)
    }
}
