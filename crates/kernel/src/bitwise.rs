//! Bit-serial CRC computation.
//!
//! The reference implementations: one shift-and-conditional-xor per input
//! bit, directly mirroring polynomial division. Intentionally slow (~8
//! operations per bit); these exist to be obviously correct, to populate
//! tables, and to serve as the oracle the table-driven paths are verified
//! against.
//!
//! Three branches cover the parameter space: reflected (LSB-first
//! register), non-reflected narrower than a byte (register pre-shifted so
//! the byte's top bit lands on bit 7), and non-reflected wider than a
//! byte. The double-wide variants run the same three shapes over `u128`
//! for widths above the 64-bit host word.

use model::{Model, ones, ones_dbl, reflect_bits, reflect_bits_dbl};

/// Run `buf` through the CRC described by `model`, one bit at a time.
///
/// `None` asks for the CRC of nothing: the empty-message CRC that also
/// starts a chunked computation. The model width must be at most 64; use
/// [`crc_bitwise_dbl`] beyond that.
#[must_use]
pub fn crc_bitwise(model: &Model, crc: u64, buf: Option<&[u8]>) -> u64 {
  debug_assert!(model.width <= 64);
  let poly = model.poly as u64;
  let xorout = model.xorout as u64;
  let width = model.width;

  let Some(buf) = buf else {
    return model.init as u64;
  };

  let mut crc = crc ^ xorout;
  if model.rev {
    crc = reflect_bits(crc, width);
  }

  if model.reflect {
    crc &= ones(width);
    for &b in buf {
      crc ^= u64::from(b);
      for _ in 0..8 {
        crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
      }
    }
  } else if width <= 8 {
    let shift = 8 - width;
    let poly = poly << shift;
    crc <<= shift;
    for &b in buf {
      crc ^= u64::from(b);
      for _ in 0..8 {
        crc = if crc & 0x80 != 0 { (crc << 1) ^ poly } else { crc << 1 };
      }
    }
    crc >>= shift;
    crc &= ones(width);
  } else {
    let mask = 1u64 << (width - 1);
    let shift = width - 8;
    for &b in buf {
      crc ^= u64::from(b) << shift;
      for _ in 0..8 {
        crc = if crc & mask != 0 { (crc << 1) ^ poly } else { crc << 1 };
      }
    }
    crc &= ones(width);
  }

  if model.rev {
    crc = reflect_bits(crc, width);
  }
  crc ^ xorout
}

/// Run `count` zero bits through the CRC, one bit at a time.
///
/// Like [`crc_bitwise`] without the input-byte xor. For large counts
/// prefer [`crc_zeros`](crate::crc_zeros), which is O(log n).
#[must_use]
pub fn crc_zeros_bitwise(model: &Model, crc: u64, count: usize) -> u64 {
  debug_assert!(model.width <= 64);
  let poly = model.poly as u64;
  let xorout = model.xorout as u64;
  let width = model.width;

  let mut crc = crc ^ xorout;
  if model.rev {
    crc = reflect_bits(crc, width);
  }

  if model.reflect {
    crc &= ones(width);
    for _ in 0..count {
      crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
    }
  } else {
    let mask = 1u64 << (width - 1);
    for _ in 0..count {
      crc = if crc & mask != 0 { (crc << 1) ^ poly } else { crc << 1 };
    }
    crc &= ones(width);
  }

  if model.rev {
    crc = reflect_bits(crc, width);
  }
  crc ^ xorout
}

/// Double-wide [`crc_bitwise`]: widths up to 128 bits, register in `u128`.
///
/// Drops to the single-word path when the width fits a word. The shift
/// and exclusive-or structure is the same as the single-word evaluator
/// with the byte injected at the high word's boundary.
#[must_use]
pub fn crc_bitwise_dbl(model: &Model, crc: u128, buf: Option<&[u8]>) -> u128 {
  if model.width <= 64 {
    return u128::from(crc_bitwise(model, crc as u64, buf));
  }

  let Some(buf) = buf else {
    return model.init;
  };

  let poly = model.poly;
  let width = model.width;
  let mut crc = crc ^ model.xorout;
  if model.rev {
    crc = reflect_bits_dbl(crc, width);
  }

  if model.reflect {
    crc &= ones_dbl(width);
    for &b in buf {
      crc ^= u128::from(b);
      for _ in 0..8 {
        crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
      }
    }
  } else if width - 64 <= 8 {
    // The byte crosses the word boundary: shift so its top bit sits just
    // above the low word, at bit 71.
    let shift = 8 - (width - 64);
    let poly = poly << shift;
    let mask = 1u128 << 71;
    crc <<= shift;
    for &b in buf {
      crc ^= u128::from(b) << 64;
      for _ in 0..8 {
        crc = if crc & mask != 0 { (crc << 1) ^ poly } else { crc << 1 };
      }
    }
    crc >>= shift;
    crc &= ones_dbl(width);
  } else {
    let mask = 1u128 << (width - 1);
    let shift = width - 8;
    for &b in buf {
      crc ^= u128::from(b) << shift;
      for _ in 0..8 {
        crc = if crc & mask != 0 { (crc << 1) ^ poly } else { crc << 1 };
      }
    }
    crc &= ones_dbl(width);
  }

  if model.rev {
    crc = reflect_bits_dbl(crc, width);
  }
  crc ^ model.xorout
}

/// Double-wide [`crc_zeros_bitwise`].
#[must_use]
pub fn crc_zeros_bitwise_dbl(model: &Model, crc: u128, count: usize) -> u128 {
  if model.width <= 64 {
    return u128::from(crc_zeros_bitwise(model, crc as u64, count));
  }

  let poly = model.poly;
  let width = model.width;
  let mut crc = crc ^ model.xorout;
  if model.rev {
    crc = reflect_bits_dbl(crc, width);
  }

  if model.reflect {
    crc &= ones_dbl(width);
    for _ in 0..count {
      crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
    }
  } else {
    let mask = 1u128 << (width - 1);
    for _ in 0..count {
      crc = if crc & mask != 0 { (crc << 1) ^ poly } else { crc << 1 };
    }
    crc &= ones_dbl(width);
  }

  if model.rev {
    crc = reflect_bits_dbl(crc, width);
  }
  crc ^ model.xorout
}
