//! Key/value sequence generation
//!
//! Keys and values are fixed-width byte buffers treated as little-endian
//! counters. Every write advances both by one, so the set of written keys is
//! always the contiguous range `0..n` in counter order. Lookups are sampled
//! byte-wise below the current key, which keeps them biased towards that
//! populated range.

use rand::Rng;

/// Advance `buf` by one, carrying from byte 0 upwards.
///
/// Once every byte has wrapped the buffer is all zero again and the carry is
/// dropped.
pub fn increment(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            return;
        }
    }
}

/// Fill `dst` with a random key drawn below `reference`.
///
/// Each `dst[i]` is uniform in `[0, reference[i])`, or `0` where
/// `reference[i]` is zero.
///
/// # Panics
/// If `dst` and `reference` differ in length.
pub fn sample<R: Rng + ?Sized>(dst: &mut [u8], reference: &[u8], rng: &mut R) {
    assert_eq!(
        dst.len(),
        reference.len(),
        "invalid byte slice for random"
    );
    for (out, &bound) in dst.iter_mut().zip(reference) {
        *out = if bound == 0 { 0 } else { rng.gen_range(0..bound) };
    }
}

/// Evolving (key, value) write cursor of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    key: Vec<u8>,
    value: Vec<u8>,
}

impl Sequence {
    /// Zero key and value of the given widths
    pub fn new(key_size: usize, value_size: usize) -> Self {
        Self {
            key: vec![0; key_size],
            value: vec![0; value_size],
        }
    }

    /// Start from a previously reached key, with a zero value.
    ///
    /// `start_key` is copied into the key buffer; a shorter slice only
    /// overwrites the low bytes and a longer one is cut to the key width.
    pub fn resume(key_size: usize, value_size: usize, start_key: &[u8]) -> Self {
        let mut seq = Self::new(key_size, value_size);
        let n = key_size.min(start_key.len());
        seq.key[..n].copy_from_slice(&start_key[..n]);
        seq
    }

    /// Current key
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Current value
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Move both cursors to the next pair
    pub fn advance(&mut self) {
        increment(&mut self.key);
        increment(&mut self.value);
    }

    /// Give up the sequence, keeping the key
    pub fn into_key(self) -> Vec<u8> {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_increment_carries_once_after_256() {
        let mut buf = [0u8; 4];
        for _ in 0..255 {
            increment(&mut buf);
        }
        assert_eq!(buf, [255, 0, 0, 0]);

        increment(&mut buf);
        assert_eq!(buf, [0, 1, 0, 0]);
    }

    #[test]
    fn test_increment_single_byte_wraps_without_carry() {
        let mut buf = [0u8; 1];
        for _ in 0..256 {
            increment(&mut buf);
        }
        assert_eq!(buf, [0]);
    }

    #[test]
    fn test_increment_exhausted_counter_is_zero() {
        let mut buf = [255u8; 3];
        increment(&mut buf);
        assert_eq!(buf, [0, 0, 0]);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_increment_empty_buffer() {
        let mut buf: [u8; 0] = [];
        increment(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_increment_matches_little_endian_count() {
        let mut buf = [0u8; 3];
        let steps: u32 = 70_000;
        for _ in 0..steps {
            increment(&mut buf);
        }
        assert_eq!(buf[..], steps.to_le_bytes()[..3]);

        // 2^24 + 5 wraps back to 5 for a three byte counter
        let mut buf = [255u8, 255, 255];
        for _ in 0..6 {
            increment(&mut buf);
        }
        assert_eq!(buf, [5, 0, 0]);
    }

    #[test]
    fn test_sample_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let reference = [0u8, 1, 2, 17, 128, 255, 0, 3];
        let mut out = [0u8; 8];

        for _ in 0..10_000 {
            sample(&mut out, &reference, &mut rng);
            for (o, r) in out.iter().zip(reference.iter()) {
                if *r == 0 {
                    assert_eq!(*o, 0);
                } else {
                    assert!(*o < *r, "{} >= {}", o, r);
                }
            }
        }
    }

    #[test]
    fn test_sample_covers_range() {
        let mut rng = SmallRng::seed_from_u64(11);
        let reference = [4u8];
        let mut seen = [false; 4];
        let mut out = [0u8];

        for _ in 0..1_000 {
            sample(&mut out, &reference, &mut rng);
            seen[out[0] as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    #[should_panic(expected = "invalid byte slice for random")]
    fn test_sample_length_mismatch_panics() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut out = [0u8; 3];
        sample(&mut out, &[1, 2, 3, 4], &mut rng);
    }

    #[test]
    fn test_sequence_advance() {
        let mut seq = Sequence::new(2, 3);
        seq.advance();
        seq.advance();
        assert_eq!(seq.key(), &[2, 0]);
        assert_eq!(seq.value(), &[2, 0, 0]);
    }

    #[test]
    fn test_sequence_resume() {
        let seq = Sequence::resume(4, 2, &[9, 8]);
        assert_eq!(seq.key(), &[9, 8, 0, 0]);
        assert_eq!(seq.value(), &[0, 0]);

        let seq = Sequence::resume(2, 2, &[1, 2, 3]);
        assert_eq!(seq.into_key(), vec![1, 2]);
    }
}
