use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::VecDeque;

// Draws feed Symbol::from_unit, so every source must stay inside [0, 1).

pub type HmacSha256 = Hmac<Sha256>;

pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Maps a big-endian u32 onto `[0, 1)`.
pub fn unit_from_chunk(chunk: [u8; 4]) -> f64 {
    let v = u32::from_be_bytes(chunk);
    (v as f64) / (u32::MAX as f64 + 1.0)
}

/// Reproducible stream: HMAC-SHA256 keyed by the seed over a block counter, eight draws
/// per block.
#[derive(Debug, Clone)]
pub struct SeededStream {
    seed: String,
    block: u64,
    buffer: [u8; 32],
    cursor: usize,
}

impl SeededStream {
    pub fn new(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let buffer = block_bytes(&seed, 0);
        Self {
            seed,
            block: 0,
            buffer,
            cursor: 0,
        }
    }

    /// Public fingerprint of the seed; does not reveal it.
    pub fn seed_hash_hex(&self) -> String {
        derive_hash_hex(self.seed.as_bytes())
    }

    pub fn block(&self) -> u64 {
        self.block
    }
}

fn block_bytes(seed: &str, block: u64) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(seed.as_bytes()).expect("HMAC key");
    mac.update(format!("block:{block}").as_bytes());
    let res = mac.finalize().into_bytes();
    let mut out = [0u8; 32];
    out.copy_from_slice(&res);
    out
}

impl RandomSource for SeededStream {
    fn next_unit(&mut self) -> f64 {
        if self.cursor + 4 > self.buffer.len() {
            self.block += 1;
            self.buffer = block_bytes(&self.seed, self.block);
            self.cursor = 0;
        }
        let c = &self.buffer[self.cursor..self.cursor + 4];
        self.cursor += 4;
        unit_from_chunk([c[0], c[1], c[2], c[3]])
    }
}

/// Replays a fixed list of draws, then keeps returning `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Draws that land exactly on the given stops.
    pub fn for_stops(stops: impl IntoIterator<Item = u8>) -> Self {
        Self::new(stops.into_iter().map(|s| (s as f64 + 0.5) / 10.0))
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(0.0).clamp(0.0, 0.999_999_999)
    }
}

#[cfg(feature = "thread-rng")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

#[cfg(feature = "thread-rng")]
impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        use rand::Rng;
        rand::rng().random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = SeededStream::new("server");
        let mut b = SeededStream::new("server");
        let xs: Vec<f64> = (0..20).map(|_| a.next_unit()).collect();
        let ys: Vec<f64> = (0..20).map(|_| b.next_unit()).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.seed_hash_hex(), b.seed_hash_hex());
    }

    #[test]
    fn stream_rolls_over_blocks() {
        let mut s = SeededStream::new("seed");
        for _ in 0..8 {
            let u = s.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
        assert_eq!(s.block(), 0);
        s.next_unit();
        assert_eq!(s.block(), 1);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededStream::new("a");
        let mut b = SeededStream::new("b");
        let xs: Vec<f64> = (0..4).map(|_| a.next_unit()).collect();
        let ys: Vec<f64> = (0..4).map(|_| b.next_unit()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn chunk_bounds() {
        assert_eq!(unit_from_chunk([0, 0, 0, 0]), 0.0);
        assert!(unit_from_chunk([0xff, 0xff, 0xff, 0xff]) < 1.0);
    }

    #[test]
    fn scripted_replays_then_zero() {
        let mut s = ScriptedSource::for_stops([3, 9]);
        assert!((s.next_unit() - 0.35).abs() < 1e-12);
        assert!((s.next_unit() - 0.95).abs() < 1e-12);
        assert_eq!(s.next_unit(), 0.0);
    }
}
