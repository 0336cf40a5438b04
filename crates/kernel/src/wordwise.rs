//! Word-at-a-time CRC evaluation.
//!
//! The fastest portable path: xor one memory word into the positioned
//! register, then replace it with the xor of one table lookup per byte
//! lane. An alignment prologue walks single bytes until the data pointer
//! reaches a word boundary, and a tail finishes whatever is left.
//!
//! The bulk loop honors the byte order the tables were built for: words
//! are read with that endianness, so table sets built for either target
//! evaluate correctly on any host. Entering the bulk loop, the register
//! is shifted to the top of the word for non-reflected CRCs and
//! byte-swapped when the table orientation opposes the register direction
//! (little-endian with non-reflected, big-endian with reflected); both
//! are undone on exit.

use model::{Model, ones, reflect_bits};

use crate::tables::{WordTables, swap_word, table_step};

#[inline]
fn load_le(chunk: &[u8]) -> u64 {
  let mut w = 0u64;
  for (j, &b) in chunk.iter().enumerate() {
    w |= u64::from(b) << (8 * j);
  }
  w
}

#[inline]
fn load_be(chunk: &[u8]) -> u64 {
  let mut w = 0u64;
  for &b in chunk {
    w = (w << 8) | u64::from(b);
  }
  w
}

/// Equivalent to [`crc_bitwise`](crate::crc_bitwise), one word per step
/// through the bulk of the buffer.
#[must_use]
pub fn crc_wordwise(model: &Model, tables: &WordTables, crc: u64, buf: Option<&[u8]>) -> u64 {
  let Some(mut data) = buf else {
    return model.init as u64;
  };

  let width = model.width;
  let size = tables.size();
  let word_bytes = size.bytes();
  let little = tables.little();
  let top = if model.reflect { 0 } else { size.bits() - width.max(8) };
  let shift = if width <= 8 { 8 - width } else { width - 8 };
  let byte = tables.byte().entries();

  let mut crc = crc;
  if model.rev {
    crc = reflect_bits(crc, width);
  }
  if model.reflect {
    crc &= ones(width);
  } else if width <= 8 {
    crc <<= shift;
  }

  // Up to word_bytes - 1 single bytes until the pointer is word-aligned.
  while !data.is_empty() && (data.as_ptr() as usize) & (word_bytes - 1) != 0 {
    crc = table_step(model, byte, crc, data[0]);
    data = &data[1..];
  }

  if data.len() >= word_bytes {
    let opp = little != model.reflect;
    crc <<= top;
    if opp {
      crc = swap_word(crc, size);
    }
    let bulk_len = data.len() & !(word_bytes - 1);
    let (bulk, rest) = data.split_at(bulk_len);
    let lanes = tables.lanes();
    if little {
      for chunk in bulk.chunks_exact(word_bytes) {
        crc ^= load_le(chunk);
        let mut next = 0u64;
        for (j, lane) in lanes[..word_bytes].iter().rev().enumerate() {
          next ^= lane[((crc >> (8 * j)) & 0xFF) as usize];
        }
        crc = next;
      }
    } else {
      for chunk in bulk.chunks_exact(word_bytes) {
        crc ^= load_be(chunk);
        let mut next = 0u64;
        for (j, lane) in lanes[..word_bytes].iter().enumerate() {
          next ^= lane[((crc >> (8 * j)) & 0xFF) as usize];
        }
        crc = next;
      }
    }
    data = rest;
    if opp {
      crc = swap_word(crc, size);
    }
    crc >>= top;
  }

  for &b in data {
    crc = table_step(model, byte, crc, b);
  }

  if !model.reflect {
    if width <= 8 {
      crc >>= shift;
    } else {
      crc &= ones(width);
    }
  }
  if model.rev {
    crc = reflect_bits(crc, width);
  }
  crc
}

#[cfg(test)]
mod tests {
  use model::read_model;

  use super::*;
  use crate::{bitwise::crc_bitwise, tables::WordSize};

  const CHECK_INPUT: &[u8] = b"123456789";

  fn processed(line: &str) -> Model {
    let mut m = read_model(line, false).unwrap();
    m.process();
    m
  }

  const LINES: &[&str] = &[
    "w=16 p=4129 r=t c=8585 n=KERMIT",
    "w=16 p=0x1021 i=-1 r=f c=0x29b1 n=\"CRC-16/CCITT-FALSE\"",
    "w=8 p=7 r=f c=0xf4 n=\"CRC-8/SMBUS\"",
    "w=3 p=3 x=7 r=f c=4 n=\"CRC-3/GSM\"",
    "w=3 p=3 i=7 r=t c=6 n=\"CRC-3/ROHC\"",
    "w=12 p=0x80f r=f refo=t c=0xdaf n=\"CRC-12/UMTS\"",
    "w=32 p=0x04c11db7 i=-1 x=-1 r=t c=0xcbf43926 n=\"CRC-32/ISO-HDLC\"",
    "w=64 p=0x42f0e1eba9ea3693 i=-1 x=-1 r=t c=0x995dc9bbdf1939fa n=\"CRC-64/XZ\"",
  ];

  #[test]
  fn matches_check_values_on_and_off_boundary() {
    // Two copies of the check string at offsets 0 and 15 so different
    // prologue lengths and the bulk loop all run.
    let mut arena = [0u8; 32];
    arena[..9].copy_from_slice(CHECK_INPUT);
    arena[15..24].copy_from_slice(CHECK_INPUT);
    for line in LINES {
      let m = processed(line);
      for (little, size) in [(true, WordSize::W64), (false, WordSize::W64), (true, WordSize::W32)] {
        if m.width > size.bits() {
          continue;
        }
        let t = WordTables::new(&m, little, size);
        for range in [0..9, 15..24] {
          let crc = crc_wordwise(&m, &t, 0, None);
          let crc = crc_wordwise(&m, &t, crc, Some(&arena[range.clone()]));
          assert_eq!(u128::from(crc), m.check, "{} little={little} {range:?}", m.name);
        }
      }
    }
  }

  #[test]
  fn agrees_with_bitwise_at_every_offset() {
    let data: std::vec::Vec<u8> = (0..192u32).map(|i| (i.wrapping_mul(151) >> 2) as u8).collect();
    for line in LINES {
      let m = processed(line);
      let t = WordTables::new(&m, true, WordSize::W64);
      let start = crc_bitwise(&m, 0, None);
      for off in 0..8 {
        let buf = &data[off..];
        assert_eq!(
          crc_wordwise(&m, &t, start, Some(buf)),
          crc_bitwise(&m, start, Some(buf)),
          "{} offset {off}",
          m.name
        );
      }
    }
  }

  #[test]
  fn short_buffers_skip_the_bulk_loop() {
    for line in LINES {
      let m = processed(line);
      let t = WordTables::new(&m, true, WordSize::W64);
      for len in 0..8 {
        let buf = &CHECK_INPUT[..len.min(CHECK_INPUT.len())];
        let start = crc_bitwise(&m, 0, None);
        assert_eq!(
          crc_wordwise(&m, &t, start, Some(buf)),
          crc_bitwise(&m, start, Some(buf)),
          "{} len {len}",
          m.name
        );
      }
    }
  }
}
