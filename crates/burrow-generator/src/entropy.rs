use crate::Result;
use burrow_core::GenerateError;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng, TryRngCore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A supplier of unpredictable bytes.
///
/// Implementations must be safe to share between concurrent callers.
pub trait EntropySource: Send + Sync + 'static {
    /// Fills `buf` and returns how many bytes were written.
    ///
    /// Writing fewer bytes than `buf.len()` is allowed; callers treat it as a
    /// failed draw.
    fn fill(&self, buf: &mut [u8]) -> Result<usize>;
}

impl<E: EntropySource + ?Sized> EntropySource for Arc<E> {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        (**self).fill(buf)
    }
}

/// The operating system's cryptographically secure random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| GenerateError::Entropy(e.to_string()))?;
        Ok(buf.len())
    }
}

/// A reproducible pseudo-random source seeded from a `u64`.
///
/// Not suitable for production codes; two instances with the same seed yield
/// the same sequence.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GenerateError::Entropy("seeded rng lock is poisoned".to_string()))?;
        rng.fill_bytes(buf);
        Ok(buf.len())
    }
}

/// Cycles through a fixed list of byte patterns, one pattern per draw.
///
/// With only a handful of patterns the set of reachable codes is tiny, which
/// makes collisions certain after a few draws.
#[derive(Debug)]
pub struct CyclicEntropy {
    patterns: Vec<Vec<u8>>,
    next: AtomicUsize,
}

impl CyclicEntropy {
    /// # Panics
    ///
    /// Panics if `patterns` is empty.
    pub fn new(patterns: Vec<Vec<u8>>) -> Self {
        assert!(!patterns.is_empty(), "cyclic entropy needs at least one pattern");
        Self {
            patterns,
            next: AtomicUsize::new(0),
        }
    }
}

impl EntropySource for CyclicEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        let index = self.next.fetch_add(1, Ordering::SeqCst) % self.patterns.len();
        Ok(copy_pattern(&self.patterns[index], buf))
    }
}

/// Hands out a scripted queue of byte patterns, then defers to `fallback`.
#[derive(Debug)]
pub struct ScriptedEntropy<E> {
    script: Mutex<VecDeque<Vec<u8>>>,
    fallback: E,
}

impl<E: EntropySource> ScriptedEntropy<E> {
    pub fn new(script: impl IntoIterator<Item = Vec<u8>>, fallback: E) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
        }
    }

    /// Number of scripted patterns not yet handed out.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|script| script.len()).unwrap_or(0)
    }
}

impl<E: EntropySource> EntropySource for ScriptedEntropy<E> {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        let next = self
            .script
            .lock()
            .map_err(|_| GenerateError::Entropy("entropy script lock is poisoned".to_string()))?
            .pop_front();

        match next {
            Some(pattern) => Ok(copy_pattern(&pattern, buf)),
            None => self.fallback.fill(buf),
        }
    }
}

fn copy_pattern(pattern: &[u8], buf: &mut [u8]) -> usize {
    let n = pattern.len().min(buf.len());
    buf[..n].copy_from_slice(&pattern[..n]);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_entropy_fills_whole_buffer() {
        let mut buf = [0u8; 32];
        assert_eq!(OsEntropy.fill(&mut buf).unwrap(), 32);
        // 32 zero bytes from a CSPRNG would be a broken source.
        assert_ne!(buf, [0u8; 32]);
    }

    #[test]
    fn seeded_entropy_is_reproducible() {
        let a = SeededEntropy::new(42);
        let b = SeededEntropy::new(42);

        let (mut x, mut y) = ([0u8; 6], [0u8; 6]);
        for _ in 0..10 {
            a.fill(&mut x).unwrap();
            b.fill(&mut y).unwrap();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn cyclic_entropy_wraps_around() {
        let source = CyclicEntropy::new(vec![vec![b'A'; 6], vec![b'B'; 6]]);
        let mut buf = [0u8; 6];

        let mut seen = Vec::new();
        for _ in 0..4 {
            source.fill(&mut buf).unwrap();
            seen.push(buf[0]);
        }
        assert_eq!(seen, vec![b'A', b'B', b'A', b'B']);
    }

    #[test]
    fn scripted_entropy_falls_back_after_script() {
        let source = ScriptedEntropy::new(vec![vec![7; 6]], CyclicEntropy::new(vec![vec![9; 6]]));
        let mut buf = [0u8; 6];

        source.fill(&mut buf).unwrap();
        assert_eq!(buf, [7; 6]);
        assert_eq!(source.remaining(), 0);

        source.fill(&mut buf).unwrap();
        assert_eq!(buf, [9; 6]);
    }

    #[test]
    fn short_pattern_reports_partial_fill() {
        let source = CyclicEntropy::new(vec![vec![1, 2]]);
        let mut buf = [0u8; 6];
        assert_eq!(source.fill(&mut buf).unwrap(), 2);
    }
}
