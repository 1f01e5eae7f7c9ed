// =============================================================================
// seed.rs — Deterministic value generator (seed path → float)
// =============================================================================
//
// Every "weight" in the simulator is a pure function of a seed path:
//
//   (stream, component, component, ...)  ──xxh64──►  u64  ──top 24 bits──►  f32
//
// Components are either integers or strings.  Each one is written into the
// hash input with a one-byte type tag (strings also carry their length), so
// ("ab", "c") and ("a", "bc") hash differently and the encoding is
// order-sensitive.  No wall-clock, counter or global state is involved: the
// same path yields the same value in every run and every process.
// =============================================================================

use xxhash_rust::xxh64::xxh64;

/// Fixed xxh64 seed.  Changing it changes every generated weight.
pub const HASH_SEED: u64 = 0x5EED_0F_5A_A5E_u64;

/// 2^24: the number of distinct values produced per range (exact in f32).
const MANTISSA_STEPS: f32 = 16_777_216.0;

/// Component limit of `signed_at` (stream byte + 9 bytes per component).
pub const MAX_FAST_PATH: usize = 5;

const TAG_INT: u8 = 0x01;
const TAG_STR: u8 = 0x02;

/// Independent value families.  The stream tag is the first hashed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Stream {
    Embedding = 1,
    EntryProjection = 2,
    Gate = 3,
    GateBias = 4,
    Expert = 5,
}

/// An order-sensitive seed path under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPath {
    bytes: Vec<u8>,
}

impl SeedPath {
    pub fn new(stream: Stream) -> Self {
        let mut bytes = Vec::with_capacity(48);
        bytes.push(stream as u8);
        Self { bytes }
    }

    /// Append an integer component.
    pub fn int(mut self, v: u64) -> Self {
        self.bytes.push(TAG_INT);
        self.bytes.extend_from_slice(&v.to_le_bytes());
        self
    }

    /// Append a string component.
    pub fn text(mut self, s: &str) -> Self {
        self.bytes.push(TAG_STR);
        self.bytes.extend_from_slice(&(s.len() as u64).to_le_bytes());
        self.bytes.extend_from_slice(s.as_bytes());
        self
    }

    pub fn hash(&self) -> u64 {
        xxh64(&self.bytes, HASH_SEED)
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&self) -> f32 {
        hash_to_unit(self.hash())
    }

    /// Uniform value in `[-1, 1)`.
    pub fn signed(&self) -> f32 {
        hash_to_signed(self.hash())
    }
}

#[inline(always)]
pub fn hash_to_unit(h: u64) -> f32 {
    (h >> 40) as f32 / MANTISSA_STEPS
}

#[inline(always)]
pub fn hash_to_signed(h: u64) -> f32 {
    hash_to_unit(h) * 2.0 - 1.0
}

/// Hot-path helper: signed value for a purely integer path, without building
/// a `SeedPath`.  Produces exactly the same value as the builder form.
///
/// Paths are limited to `MAX_FAST_PATH` components; longer paths panic.
/// Use `SeedPath` for those.
#[inline]
pub fn signed_at(stream: Stream, path: &[u64]) -> f32 {
    assert!(
        path.len() <= MAX_FAST_PATH,
        "seed path has {} components, fast path holds {}",
        path.len(),
        MAX_FAST_PATH
    );
    let mut buf = [0u8; 1 + MAX_FAST_PATH * 9];
    buf[0] = stream as u8;
    let mut len = 1;
    for &v in path {
        buf[len] = TAG_INT;
        buf[len + 1..len + 9].copy_from_slice(&v.to_le_bytes());
        len += 9;
    }
    hash_to_signed(xxh64(&buf[..len], HASH_SEED))
}
