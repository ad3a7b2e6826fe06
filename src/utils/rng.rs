use std::f64::consts::TAU;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::error::{Error, Result};

const INV_2_53: f64 = 1.0 / (1u64 << 53) as f64;

/// SplitMix64 finalizer, used to decorrelate derived seeds.
#[inline]
pub fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Deterministic per-worker stream derived from a master seed.
pub fn substream(master: u64, stream_id: u64) -> ChaCha20Rng {
    let x = master ^ stream_id.wrapping_mul(0x9E3779B97F4A7C15);
    ChaCha20Rng::seed_from_u64(mix64(x))
}

/// Uniform draw in `[0, 1)` with 53 bits of precision.
///
/// Goes through `try_fill_bytes` so that a bounded source can report
/// exhaustion instead of silently repeating values.
#[inline]
pub fn uniform01<R: RngCore + ?Sized>(rng: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    rng.try_fill_bytes(&mut buf).map_err(|e| {
        let draws = e
            .inner()
            .downcast_ref::<TapeExhausted>()
            .map_or(0, |t| t.draws);
        Error::RandomSourceExhausted { draws }
    })?;
    Ok((u64::from_le_bytes(buf) >> 11) as f64 * INV_2_53)
}

/// Raw 64-bit draw, e.g. for seeding substreams.
#[inline]
pub fn next_seed<R: RngCore + ?Sized>(rng: &mut R) -> Result<u64> {
    Ok(mix64((uniform01(rng)? / INV_2_53) as u64))
}

/// Uniform angle in `[0, 2π)`.
#[inline]
pub fn uniform_angle<R: RngCore + ?Sized>(rng: &mut R) -> Result<f64> {
    Ok(reduce_angle(uniform01(rng)? * TAU))
}

/// Uniform index in `0..bound` (`bound > 0`).
#[inline]
pub fn index_below<R: RngCore + ?Sized>(rng: &mut R, bound: usize) -> Result<usize> {
    let j = (uniform01(rng)? * bound as f64) as usize;
    Ok(j.min(bound - 1))
}

/// In-place Fisher-Yates shuffle driven by fallible draws.
pub fn shuffle<T, R: RngCore + ?Sized>(items: &mut [T], rng: &mut R) -> Result<()> {
    for i in (1..items.len()).rev() {
        let j = index_below(rng, i + 1)?;
        items.swap(i, j);
    }
    Ok(())
}

/// Reduce any finite angle into `[0, 2π)`.
#[inline]
pub fn reduce_angle(theta: f64) -> f64 {
    let r = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Wrap an angle difference into `(-π, π]`.
#[inline]
pub fn wrap_difference(d: f64) -> f64 {
    let r = reduce_angle(d);
    if r > std::f64::consts::PI {
        r - TAU
    } else {
        r
    }
}

#[derive(Error, Debug)]
#[error("tape exhausted after {draws} draws")]
pub struct TapeExhausted {
    pub draws: u64,
}

/// A bounded random source that replays a fixed sequence of 64-bit words.
///
/// Only `try_fill_bytes` reports exhaustion; the infallible methods return
/// zeros once the tape is used up.
#[derive(Debug, Clone)]
pub struct TapeRng {
    words: Vec<u64>,
    pos: usize,
}

impl TapeRng {
    pub fn new(words: Vec<u64>) -> Self {
        Self { words, pos: 0 }
    }

    /// Build a tape whose successive `uniform01` draws reproduce `values`
    /// (exact up to 2^-53).
    pub fn from_uniforms(values: &[f64]) -> Self {
        let words = values
            .iter()
            .map(|&u| {
                let u = u.clamp(0.0, 1.0 - INV_2_53);
                ((u / INV_2_53) as u64) << 11
            })
            .collect();
        Self::new(words)
    }

    pub fn remaining(&self) -> usize {
        self.words.len() - self.pos
    }

    pub fn consumed(&self) -> usize {
        self.pos
    }

    fn next_word(&mut self) -> Option<u64> {
        let w = self.words.get(self.pos).copied()?;
        self.pos += 1;
        Some(w)
    }
}

impl RngCore for TapeRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_word().unwrap_or(0)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if self.try_fill_bytes(dest).is_err() {
            dest.fill(0);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        for chunk in dest.chunks_mut(8) {
            let w = self.next_word().ok_or_else(|| {
                rand::Error::new(TapeExhausted {
                    draws: self.pos as u64,
                })
            })?;
            chunk.copy_from_slice(&w.to_le_bytes()[..chunk.len()]);
        }
        Ok(())
    }
}
