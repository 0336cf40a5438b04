//! Property-based tests: the algebraic laws every model must satisfy on
//! every input, over randomized buffers and split points.

use kernel::{
  ByteTable, CombTable, WordSize, WordTables, crc_bitwise, crc_bytewise, crc_combine, crc_wordwise, crc_zeros,
  crc_zeros_bitwise,
};
use model::{Model, read_model};
use proptest::prelude::*;

/// A spread of register conventions: reflected and not, narrow and wide,
/// zero and all-ones init/xorout, and the lone mixed-reflection model.
const LINES: &[&str] = &[
  "w=3 p=3 x=7 r=f c=4 n=\"CRC-3/GSM\"",
  "w=5 p=5 i=0x1f x=0x1f r=t c=0x19 n=\"CRC-5/USB\"",
  "w=8 p=7 r=f c=0xf4 n=\"CRC-8/SMBUS\"",
  "w=12 p=0x80f r=f refo=t c=0xdaf n=\"CRC-12/UMTS\"",
  "w=16 p=4129 r=t c=8585 n=KERMIT",
  "w=16 p=0x1021 i=-1 r=f c=0x29b1 n=\"CRC-16/CCITT-FALSE\"",
  "w=24 p=0x864cfb i=0xb704ce r=f c=0x21cf02 n=\"CRC-24/OPENPGP\"",
  "w=32 p=0x04c11db7 i=-1 x=-1 r=t c=0xcbf43926 n=\"CRC-32/ISO-HDLC\"",
  "w=64 p=0x42f0e1eba9ea3693 i=-1 x=-1 r=t c=0x995dc9bbdf1939fa n=\"CRC-64/XZ\"",
];

fn models() -> Vec<Model> {
  LINES
    .iter()
    .map(|line| {
      let mut m = read_model(line, false).unwrap();
      m.process();
      m
    })
    .collect()
}

fn arb_data() -> impl Strategy<Value = Vec<u8>> {
  prop::collection::vec(any::<u8>(), 0..512)
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(128))]

  #[test]
  fn three_paths_agree(data in arb_data()) {
    for m in &models() {
      let byte = ByteTable::new(m);
      let start = crc_bitwise(m, 0, None);
      let bit = crc_bitwise(m, start, Some(&data));
      prop_assert_eq!(crc_bytewise(m, &byte, start, Some(&data)), bit, "byte {}", &m.name);
      for (little, size) in [(true, WordSize::W64), (false, WordSize::W64), (true, WordSize::W32)] {
        if m.width > size.bits() {
          continue;
        }
        let word = WordTables::new(m, little, size);
        prop_assert_eq!(
          crc_wordwise(m, &word, start, Some(&data)),
          bit,
          "word {} little={} bits={}", &m.name, little, size.bits()
        );
      }
    }
  }

  #[test]
  fn chunking(data in arb_data(), split in 0usize..512) {
    let split_at = |len: usize| split.min(len);
    for m in &models() {
      let byte = ByteTable::new(m);
      let word = WordTables::new(m, true, WordSize::W64);
      let (a, b) = data.split_at(split_at(data.len()));

      let start = crc_bitwise(m, 0, None);
      let oneshot = crc_bitwise(m, start, Some(&data));
      prop_assert_eq!(crc_bitwise(m, crc_bitwise(m, start, Some(a)), Some(b)), oneshot);
      prop_assert_eq!(
        crc_bytewise(m, &byte, crc_bytewise(m, &byte, start, Some(a)), Some(b)),
        oneshot
      );
      prop_assert_eq!(
        crc_wordwise(m, &word, crc_wordwise(m, &word, start, Some(a)), Some(b)),
        oneshot
      );
    }
  }

  #[test]
  fn combine_law(data in arb_data(), split in 0usize..512) {
    for m in &models() {
      let comb = CombTable::new(m);
      let (a, b) = data.split_at(split.min(data.len()));
      let start = crc_bitwise(m, 0, None);
      let crc_a = crc_bitwise(m, start, Some(a));
      let crc_b = crc_bitwise(m, start, Some(b));
      let whole = crc_bitwise(m, start, Some(&data));
      prop_assert_eq!(
        crc_combine(m, &comb, crc_a, crc_b, b.len() as u64),
        whole,
        "{}", &m.name
      );
    }
  }

  #[test]
  fn combine_is_associative(data in arb_data(), cut1 in 0usize..512, cut2 in 0usize..512) {
    for m in &models() {
      let comb = CombTable::new(m);
      let c1 = cut1.min(data.len());
      let c2 = c1.max(cut2.min(data.len()));
      let (a, bc) = data.split_at(c1);
      let (b, c) = bc.split_at(c2 - c1);
      let start = crc_bitwise(m, 0, None);
      let crc_a = crc_bitwise(m, start, Some(a));
      let crc_b = crc_bitwise(m, start, Some(b));
      let crc_c = crc_bitwise(m, start, Some(c));
      let ab = crc_combine(m, &comb, crc_a, crc_b, b.len() as u64);
      let abc = crc_combine(m, &comb, ab, crc_c, c.len() as u64);
      prop_assert_eq!(abc, crc_bitwise(m, start, Some(&data)), "{}", &m.name);
    }
  }

  #[test]
  fn zeros_consistency(k in 0usize..1024, seed in any::<u64>()) {
    let zeros = vec![0u8; k];
    for m in &models() {
      let comb = CombTable::new(m);
      let crc = (crc_bitwise(m, 0, None) ^ seed) & model::ones(m.width);
      prop_assert_eq!(
        crc_zeros(m, &comb, crc, 8 * k),
        crc_bitwise(m, crc, Some(&zeros)),
        "{} k={}", &m.name, k
      );
      prop_assert_eq!(crc_zeros_bitwise(m, crc, 8 * k), crc_zeros(m, &comb, crc, 8 * k));
    }
  }

  #[test]
  fn alignment_independence(data in prop::collection::vec(any::<u8>(), 64..256), offset in 0usize..8) {
    for m in &models() {
      let word = WordTables::new(m, true, WordSize::W64);
      let buf = &data[offset..];
      let start = crc_bitwise(m, 0, None);
      prop_assert_eq!(
        crc_wordwise(m, &word, start, Some(buf)),
        crc_bitwise(m, start, Some(buf)),
        "{} offset={}", &m.name, offset
      );
    }
  }
}
