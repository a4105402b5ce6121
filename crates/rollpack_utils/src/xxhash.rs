// Copied from https://github.com/rollup/rollup/blob/080d2245ab6b6298229ebe7258c2b96816e7c52d/rust/xxhash/src/lib.rs

use base_encode::to_string;
use xxhash_rust::xxh3::{xxh3_128, xxh3_64};

use crate::base64::to_url_safe_base64;

pub fn xxhash_base64_url(input: &[u8]) -> String {
  let hash = xxh3_128(input).to_le_bytes();
  to_url_safe_base64(hash)
}

const CHARACTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

pub fn xxhash_with_base(input: &[u8], base: u8) -> String {
  let hash = if input.len() == 16 { input } else { &xxh3_128(input).to_le_bytes() };

  to_string(hash, base, CHARACTERS).unwrap_or_default()
}

/// Fixed-length base64 digest, left-padded so every hash of a given length has that exact length.
pub fn xxhash_fixed_len(input: &[u8], len: usize) -> String {
  let hash = xxhash_with_base(input, 64);
  if hash.len() >= len {
    hash[..len].to_string()
  } else {
    let mut padded = "A".repeat(len - hash.len());
    padded.push_str(&hash);
    padded
  }
}

pub fn xxhash_u64(input: &[u8]) -> u64 {
  xxh3_64(input)
}

#[test]
fn test_xxhash_with_base() {
  assert_eq!(&xxhash_with_base(b"hello", 64), "YOFJeqs95x38-Gwetwem1");
  assert_eq!(&xxhash_with_base(b"hello", 36), "bpwli5k6mqm0gij09mxrh9npj");
  assert_eq!(&xxhash_with_base(b"hello", 16), "1838525eaacf79c77f3e1b07adc1e9b5");
}

#[test]
fn test_xxhash_fixed_len() {
  assert_eq!(xxhash_fixed_len(b"hello", 8), "YOFJeqs9");
  assert_eq!(xxhash_fixed_len(b"hello", 21).len(), 21);
}
