//! Deterministic byte-string hash functions.
//!
//! The table only ever feeds a key to a hasher with a single
//! [`Hasher::write`] call and keeps the low 32 bits of [`Hasher::finish`], so
//! any [`BuildHasher`] works. The hashers here are the small, seedless (or
//! fixed-seed) functions traditionally used for symbol tables; none of them
//! resist adversarial inputs.

use core::hash::BuildHasher;
use core::hash::BuildHasherDefault;
use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hash builder used when none is given explicitly.
        ///
        /// With the `foldhash` feature this is foldhash's fixed-seed fast
        /// hasher, so hashes are stable across runs and processes.
        pub type DefaultHashBuilder = foldhash::fast::FixedState;
    } else {
        /// The hash builder used when none is given explicitly.
        ///
        /// Without the `foldhash` feature this is the ELF hash.
        pub type DefaultHashBuilder = ElfBuildHasher;
    }
}

/// Hashes `key` the way the table does: one `write`, truncated to 32 bits.
#[inline]
pub fn hash_key<S: BuildHasher>(hash_builder: &S, key: &[u8]) -> u32 {
    let mut hasher = hash_builder.build_hasher();
    hasher.write(key);
    hasher.finish() as u32
}

/// The ELF object-file symbol hash.
///
/// A 4-bit rolling hash whose top nibble is folded back into bits 4..8, so
/// results always fit in 28 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElfHasher {
    h: u32,
}

impl Hasher for ElfHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut h = self.h;
        for &b in bytes {
            h = (h << 4).wrapping_add(b as u32);
            let g = h & 0xf000_0000;
            if g != 0 {
                h ^= g >> 24;
            }
            h &= !g;
        }
        self.h = h;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.h as u64
    }
}

/// Builds [`ElfHasher`]s.
pub type ElfBuildHasher = BuildHasherDefault<ElfHasher>;

/// Shift-Add-XOR hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct SaxHasher {
    h: u32,
}

impl Hasher for SaxHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut h = self.h;
        for &b in bytes {
            h = h.wrapping_add(b as u32);
            h = (h << 3).wrapping_add(h >> 5).wrapping_add(b as u32);
        }
        self.h = h;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.h as u64
    }
}

/// Builds [`SaxHasher`]s.
pub type SaxBuildHasher = BuildHasherDefault<SaxHasher>;

const MURMUR_C1: u32 = 0xcc9e_2d51;
const MURMUR_C2: u32 = 0x1b87_3593;

#[inline(always)]
fn murmur_scramble(k1: u32) -> u32 {
    k1.wrapping_mul(MURMUR_C1)
        .rotate_left(15)
        .wrapping_mul(MURMUR_C2)
}

/// 32-bit MurmurHash3 (x86 variant).
///
/// Blocks are read little-endian regardless of the host, and input may be
/// split across any number of `write` calls without changing the result.
#[derive(Clone, Copy, Debug)]
pub struct Murmur3Hasher {
    h1: u32,
    tail: [u8; 4],
    tail_len: usize,
    len: u32,
}

impl Murmur3Hasher {
    /// Seed used by [`Murmur3BuildHasher::default`].
    pub const DEFAULT_SEED: u32 = 0x0050_4345;

    /// Creates a hasher starting from `seed`.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            h1: seed,
            tail: [0; 4],
            tail_len: 0,
            len: 0,
        }
    }

    #[inline(always)]
    fn mix_block(&mut self, k1: u32) {
        self.h1 ^= murmur_scramble(k1);
        self.h1 = self
            .h1
            .rotate_left(13)
            .wrapping_mul(5)
            .wrapping_add(0xe654_6b64);
    }
}

impl Default for Murmur3Hasher {
    fn default() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }
}

impl Hasher for Murmur3Hasher {
    fn write(&mut self, mut bytes: &[u8]) {
        self.len = self.len.wrapping_add(bytes.len() as u32);

        if self.tail_len > 0 {
            let take = (4 - self.tail_len).min(bytes.len());
            self.tail[self.tail_len..self.tail_len + take].copy_from_slice(&bytes[..take]);
            self.tail_len += take;
            bytes = &bytes[take..];
            if self.tail_len < 4 {
                return;
            }
            self.mix_block(u32::from_le_bytes(self.tail));
            self.tail_len = 0;
        }

        let mut blocks = bytes.chunks_exact(4);
        for block in &mut blocks {
            self.mix_block(u32::from_le_bytes([block[0], block[1], block[2], block[3]]));
        }

        let rest = blocks.remainder();
        self.tail[..rest.len()].copy_from_slice(rest);
        self.tail_len = rest.len();
    }

    fn finish(&self) -> u64 {
        let mut h1 = self.h1;

        if self.tail_len > 0 {
            let k1 = self.tail[..self.tail_len]
                .iter()
                .enumerate()
                .fold(0u32, |k1, (i, &b)| k1 ^ ((b as u32) << (8 * i)));
            h1 ^= murmur_scramble(k1);
        }

        h1 ^= self.len;
        h1 ^= h1 >> 16;
        h1 = h1.wrapping_mul(0x85eb_ca6b);
        h1 ^= h1 >> 13;
        h1 = h1.wrapping_mul(0xc2b2_ae35);
        h1 ^= h1 >> 16;
        h1 as u64
    }
}

/// Builds [`Murmur3Hasher`]s sharing one seed.
#[derive(Clone, Copy, Debug)]
pub struct Murmur3BuildHasher {
    seed: u32,
}

impl Murmur3BuildHasher {
    /// Creates a builder whose hashers start from `seed`.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl Default for Murmur3BuildHasher {
    fn default() -> Self {
        Self::with_seed(Murmur3Hasher::DEFAULT_SEED)
    }
}

impl BuildHasher for Murmur3BuildHasher {
    type Hasher = Murmur3Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Murmur3Hasher::with_seed(self.seed)
    }
}
