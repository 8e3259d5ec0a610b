use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use sha2::{Digest, Sha256};

///
/// StreamKind
///
/// Identifier families draw from their own sub-streams, so adding records of
/// one kind never shifts the identifiers of another. The offsets are fixed
/// protocol constants; changing them changes every derived id.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StreamKind {
    Workspace,
    Users,
    Channels,
    Messages,
    Files,
}

impl StreamKind {
    #[must_use]
    pub const fn offset(self) -> u64 {
        match self {
            Self::Workspace => 1001,
            Self::Users => 1003,
            Self::Channels => 1009,
            Self::Messages => 1021,
            Self::Files => 1031,
        }
    }
}

///
/// SeedStream
///
/// A ChaCha8 draw stream. `from_seed` yields the run's general-purpose
/// stream; `derive` yields a sub-stream keyed by kind offset and namespace
/// via `sha256("{seed}:{offset}:{namespace}")`, taking the first eight digest
/// bytes as a big-endian u64 seed.
///

pub struct SeedStream {
    rng: ChaCha8Rng,
}

impl SeedStream {
    /// General-purpose stream seeded directly from the run seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Sub-stream scoped by kind offset and namespace.
    #[must_use]
    pub fn derive(seed: u64, kind: StreamKind, namespace: &str) -> Self {
        let key = format!("{seed}:{offset}:{namespace}", offset = kind.offset());
        let digest = Sha256::digest(key.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);

        Self {
            rng: ChaCha8Rng::seed_from_u64(u64::from_be_bytes(prefix)),
        }
    }

    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest);
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform float in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        let mantissa = self.rng.next_u64() >> 11;
        #[allow(clippy::cast_precision_loss)]
        {
            mantissa as f64 / ((1_u64 << 53) as f64)
        }
    }

    /// True with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform integer in `[low, high]`, inclusive on both ends.
    pub fn int_in(&mut self, low: i64, high: i64) -> i64 {
        debug_assert!(low <= high);
        if low >= high {
            return low;
        }
        let span = high.abs_diff(low).saturating_add(1);
        low.wrapping_add_unsigned(self.next_below(span))
    }

    /// Uniform count in `[low, high]`, inclusive on both ends.
    pub fn count_in(&mut self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high);
        if low >= high {
            return low;
        }
        let span = u64::from(high - low).saturating_add(1);
        let draw = u32::try_from(self.next_below(span)).unwrap_or(u32::MAX);
        low.saturating_add(draw)
    }

    /// Uniform reference into a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let bound = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let index = usize::try_from(self.next_below(bound)).unwrap_or(usize::MAX);
        items.get(index)
    }

    /// Sample `count` distinct elements without replacement, cloned in draw
    /// order. Asking for more than the slice holds returns the whole slice
    /// in a shuffled order.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let count = count.min(items.len());
        let mut indices: Vec<usize> = (0..items.len()).collect();
        let mut picked = Vec::with_capacity(count);

        // Partial Fisher-Yates: only the first `count` slots are settled.
        for step in 0..count {
            let remaining = u64::try_from(indices.len() - step).unwrap_or(u64::MAX);
            let jump = usize::try_from(self.next_below(remaining)).unwrap_or(usize::MAX);
            indices.swap(step, step + jump);
            picked.push(items[indices[step]].clone());
        }

        picked
    }

    /// Uniform integer in `[0, bound)` via modulo with rejection of the
    /// biased low zone.
    fn next_below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let raw = self.rng.next_u64();
            if raw >= threshold {
                return raw % bound;
            }
        }
    }
}

///
/// TESTS
///
