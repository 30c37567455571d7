//! Small deterministic random source shared by every animation model.
//!
//! Simulation code never reaches for a global RNG; it takes `&mut impl Random`
//! so tests can pin a seed (or script the exact draws).

use web_sys::window;

/// Uniform random draws in `[0, 1)` plus the handful of helpers the show needs.
pub trait Random {
    fn next_f64(&mut self) -> f64;

    /// Uniform draw in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Symmetric jitter in `[-half_width, half_width)`.
    fn jitter(&mut self, half_width: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * half_width
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// xorshift64* generator. Not crypto secure, plenty for sparkles.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn seeded(seed: u64) -> Self {
        // splitmix the seed so small / zero seeds still produce a busy state
        let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        Self {
            state: if z == 0 { 0x2545_F491_4F6C_DD1D } else { z },
        }
    }

    /// Seed from the host: crypto randomness when the `rng` feature is on,
    /// otherwise the high-resolution page clock.
    pub fn from_host() -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return Self::seeded(u64::from_le_bytes(buf));
            }
        }
        let now = window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        Self::seeded((now * 1000.0) as u64)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl Random for XorShift64 {
    fn next_f64(&mut self) -> f64 {
        // top 53 bits -> [0, 1)
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of draws in a loop. Handy for pinning exact values in tests.
#[derive(Clone, Debug)]
pub struct Scripted {
    values: Vec<f64>,
    cursor: usize,
}

impl Scripted {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }
}

impl Random for Scripted {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
