//! Lookup-table construction for the byte-wise and word-wise paths.
//!
//! Tables hold the values the evaluators fold with, built once from a
//! frozen model by the bit-serial reference:
//!
//! - `ByteTable` entry `k` is the running CRC after the single byte `k`,
//!   with `xorout` folded in (the evaluators keep `xorout` folded into the
//!   register across table crossings and return the pipeline result
//!   directly). For non-reflected widths under 8 the entry is pre-shifted
//!   left so an incoming byte xors in without repositioning.
//! - `WordTables` lane `[n][k]` is the CRC register after byte `k`
//!   followed by `n` zero bytes, positioned at the top of the word for
//!   non-reflected CRCs and byte-swapped when the table's target
//!   endianness runs against the register direction, so that one
//!   word-sized memory xor advances the CRC by a full word.
//!
//! Word tables are built for an explicit target endianness and word size;
//! the evaluator honors whatever the tables were built with, so the same
//! host can exercise (and generate code for) both byte orders.

use model::Model;

use crate::bitwise::crc_bitwise;

/// Word size for the word-at-a-time tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordSize {
  /// Four-byte words (`uint32_t` tables in generated code).
  W32,
  /// Eight-byte words (`uint64_t` tables in generated code).
  W64,
}

impl WordSize {
  /// Bytes per word.
  #[inline]
  #[must_use]
  pub const fn bytes(self) -> usize {
    match self {
      Self::W32 => 4,
      Self::W64 => 8,
    }
  }

  /// Bits per word.
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u32 {
    match self {
      Self::W32 => 32,
      Self::W64 => 64,
    }
  }
}

/// 256-entry table for the byte-wise calculation. Width at most 64.
#[derive(Clone)]
pub struct ByteTable {
  table: [u64; 256],
}

impl ByteTable {
  /// Build the byte table for a processed model.
  #[must_use]
  pub fn new(model: &Model) -> Self {
    debug_assert!(model.width <= 64);
    let mut table = [0u64; 256];
    for (k, slot) in table.iter_mut().enumerate() {
      let mut crc = crc_bitwise(model, 0, Some(&[k as u8]));
      if model.rev {
        crc = model::reflect_bits(crc, model.width);
      }
      if model.width < 8 && !model.reflect {
        crc <<= 8 - model.width;
      }
      *slot = crc;
    }
    Self { table }
  }

  /// The raw entries, as emitted into generated code.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[u64; 256] {
    &self.table
  }
}

/// Advance `crc` by one input byte using the byte table, in whichever of
/// the three register conventions the model runs.
#[inline]
pub(crate) fn table_step(model: &Model, table: &[u64; 256], crc: u64, b: u8) -> u64 {
  if model.reflect {
    (crc >> 8) ^ table[((crc ^ u64::from(b)) & 0xFF) as usize]
  } else if model.width <= 8 {
    table[((crc ^ u64::from(b)) & 0xFF) as usize]
  } else {
    (crc << 8) ^ table[(((crc >> (model.width - 8)) ^ u64::from(b)) & 0xFF) as usize]
  }
}

/// Byte-lane tables for the word-wise calculation, together with the byte
/// table the prologue and tail fall back on.
#[derive(Clone)]
pub struct WordTables {
  byte: ByteTable,
  lanes: [[u64; 256]; 8],
  little: bool,
  size: WordSize,
}

impl WordTables {
  /// Build the word tables for a processed model.
  ///
  /// `little` selects the target byte order and `size` the word width the
  /// bulk loop loads. The model width must fit the word.
  #[must_use]
  pub fn new(model: &Model, little: bool, size: WordSize) -> Self {
    assert!(
      model.width <= size.bits(),
      "width {} exceeds {}-bit word tables",
      model.width,
      size.bits()
    );
    let byte = ByteTable::new(model);
    let word_bytes = size.bytes();
    let top = if model.reflect { 0 } else { size.bits() - model.width.max(8) };
    let opp = little != model.reflect;

    // The table entries carry xorout folded in; converting through a raw
    // zero-byte advance needs it taken out and put back.
    let mut xor = model.xorout as u64;
    if model.width < 8 && !model.reflect {
      xor <<= 8 - model.width;
    }

    let position = |crc: u64| {
      let v = crc << top;
      if opp { swap_word(v, size) } else { v }
    };

    let mut lanes = [[0u64; 256]; 8];
    for k in 0..256 {
      let mut crc = byte.table[k];
      lanes[0][k] = position(crc);
      for n in 1..word_bytes {
        crc ^= xor;
        crc = table_step(model, &byte.table, crc, 0);
        crc ^= xor;
        lanes[n][k] = position(crc);
      }
    }
    Self {
      byte,
      lanes,
      little,
      size,
    }
  }

  /// The embedded byte table.
  #[inline]
  #[must_use]
  pub fn byte(&self) -> &ByteTable {
    &self.byte
  }

  /// The per-lane tables; only the first `size().bytes()` rows are used.
  #[inline]
  #[must_use]
  pub fn lanes(&self) -> &[[u64; 256]; 8] {
    &self.lanes
  }

  /// Target byte order the tables were built for.
  #[inline]
  #[must_use]
  pub fn little(&self) -> bool {
    self.little
  }

  /// Word size the tables were built for.
  #[inline]
  #[must_use]
  pub fn size(&self) -> WordSize {
    self.size
  }

  /// True when lane 0 is bit-identical to the byte table, letting
  /// generated code elide the duplicate: reflected little-endian tables,
  /// or non-reflected big-endian tables of full word width.
  #[must_use]
  pub fn shares_byte_table(&self, model: &Model) -> bool {
    (model.reflect && self.little) || (!model.reflect && !self.little && model.width == self.size.bits())
  }
}

/// Swap the bytes of a word-sized value.
#[inline]
pub(crate) fn swap_word(x: u64, size: WordSize) -> u64 {
  match size {
    WordSize::W64 => x.swap_bytes(),
    WordSize::W32 => u64::from((x as u32).swap_bytes()),
  }
}
