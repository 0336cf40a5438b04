//! Byte-at-a-time CRC evaluation.
//!
//! One table lookup per input byte. Requires a [`ByteTable`] built for the
//! same model; `xorout` stays folded inside the table entries, so this
//! path touches it only through them.

use model::{Model, ones, reflect_bits};

use crate::tables::ByteTable;

/// Equivalent to [`crc_bitwise`](crate::crc_bitwise), one byte per step.
#[must_use]
pub fn crc_bytewise(model: &Model, table: &ByteTable, crc: u64, buf: Option<&[u8]>) -> u64 {
  debug_assert!(model.width <= 64);
  let Some(buf) = buf else {
    return model.init as u64;
  };
  let t = table.entries();

  let mut crc = crc;
  if model.rev {
    crc = reflect_bits(crc, model.width);
  }

  if model.reflect {
    crc &= ones(model.width);
    for &b in buf {
      crc = (crc >> 8) ^ t[((crc ^ u64::from(b)) & 0xFF) as usize];
    }
  } else if model.width <= 8 {
    let shift = 8 - model.width;
    crc <<= shift;
    for &b in buf {
      crc = t[((crc ^ u64::from(b)) & 0xFF) as usize];
    }
    crc >>= shift;
  } else {
    let shift = model.width - 8;
    for &b in buf {
      crc = (crc << 8) ^ t[(((crc >> shift) ^ u64::from(b)) & 0xFF) as usize];
    }
    crc &= ones(model.width);
  }

  if model.rev {
    crc = reflect_bits(crc, model.width);
  }
  crc
}

#[cfg(test)]
mod tests {
  use model::read_model;

  use super::*;
  use crate::bitwise::crc_bitwise;

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
  fn matches_check_values() {
    for line in LINES {
      let m = processed(line);
      let t = ByteTable::new(&m);
      let crc = crc_bytewise(&m, &t, 0, None);
      let crc = crc_bytewise(&m, &t, crc, Some(CHECK_INPUT));
      assert_eq!(u128::from(crc), m.check, "{}", m.name);
    }
  }

  #[test]
  fn agrees_with_bitwise_on_arbitrary_data() {
    let data: std::vec::Vec<u8> = (0..257u32).map(|i| (i.wrapping_mul(73) >> 3) as u8).collect();
    for line in LINES {
      let m = processed(line);
      let t = ByteTable::new(&m);
      for cut in [0, 1, 7, 64, data.len()] {
        let buf = &data[..cut];
        let start = crc_bitwise(&m, 0, None);
        assert_eq!(
          crc_bytewise(&m, &t, start, Some(buf)),
          crc_bitwise(&m, start, Some(buf)),
          "{} len {cut}",
          m.name
        );
      }
    }
  }
}
