use std::fmt::{Debug, Display};

/// Fixed-size set of entry bits. Two modules reached by the same entries share an equal bitset.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
  entries: Vec<u8>,
}

impl BitSet {
  pub fn new(max_bit_count: u32) -> Self {
    Self { entries: vec![0; max_bit_count.div_ceil(8) as usize] }
  }

  pub fn has_bit(&self, bit: u32) -> bool {
    (self.entries[bit as usize / 8] & (1 << (bit & 7))) != 0
  }

  pub fn set_bit(&mut self, bit: u32) {
    self.entries[bit as usize / 8] |= 1 << (bit & 7);
  }

  pub fn is_empty(&self) -> bool {
    self.entries.iter().all(|byte| *byte == 0)
  }

  pub fn bit_count(&self) -> u32 {
    self.entries.iter().map(|byte| byte.count_ones()).sum()
  }

  /// Adds every bit of `other`, which must have been created with the same size.
  pub fn union(&mut self, other: &Self) {
    debug_assert_eq!(self.entries.len(), other.entries.len());
    for (byte, other) in self.entries.iter_mut().zip(&other.entries) {
      *byte |= other;
    }
  }

  pub fn iter_bits(&self) -> impl Iterator<Item = u32> + '_ {
    let max = u32::try_from(self.entries.len() * 8).unwrap_or(u32::MAX);
    (0..max).filter(|bit| self.has_bit(*bit))
  }
}

impl Display for BitSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let bits: String =
      self.entries.iter().rev().map(|byte| format!("{byte:08b}")).collect::<Vec<_>>().join("_");
    f.write_str(&bits)
  }
}

impl Debug for BitSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("BitSet").field(&self.to_string()).finish()
  }
}

#[test]
fn test_bitset() {
  let mut bits = BitSet::new(10);
  assert!(bits.is_empty());
  bits.set_bit(0);
  bits.set_bit(9);
  assert!(bits.has_bit(9));
  assert!(!bits.has_bit(8));
  assert_eq!(bits.bit_count(), 2);
  assert_eq!(bits.iter_bits().collect::<Vec<_>>(), vec![0, 9]);
  assert_eq!(bits.to_string(), "00000010_00000001");
}

#[test]
fn test_bitset_union() {
  let mut a = BitSet::new(12);
  a.set_bit(1);
  let mut b = BitSet::new(12);
  b.set_bit(1);
  b.set_bit(11);
  a.union(&b);
  assert_eq!(a.iter_bits().collect::<Vec<_>>(), vec![1, 11]);
}
