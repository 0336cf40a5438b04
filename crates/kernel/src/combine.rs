//! Polynomial arithmetic modulo p(x): zeros in O(log n) and CRC
//! concatenation.
//!
//! Concatenation rests on one identity over GF(2):
//!
//! ```text
//! crc(A || B) = crc(A) * x^(8*len(B)) + crc(B)    (mod p(x))
//! ```
//!
//! where `+` is xor and the CRCs are taken in linear form (the affine
//! empty-message offset removed). Raising x to a large power uses a table
//! of `x^(2^k) mod p(x)` built by repeated squaring; the sequence of
//! squarings falls into a short cycle for every practical polynomial, and
//! the table records where, so walks over arbitrarily large exponents
//! stay inside it.
//!
//! Everything here is single-word: combine and fast zeros apply to widths
//! up to 64 (wider models keep the bit-serial paths).

use model::{Model, ones, reflect_bits};

use crate::bitwise::crc_zeros_bitwise;

/// Entries in the x^(2^k) table: enough for 64-bit byte lengths (k up to
/// 3 + 64) with margin, though cycle detection fires long before the end
/// for every catalogued polynomial.
pub const COMB: usize = 67;

/// Multiply `a(x)` by `b(x)` modulo p(x), in the model's bit ordering.
///
/// Operands and result are width-bit register values of the processed
/// model.
#[must_use]
pub fn multmodp(model: &Model, a: u64, b: u64) -> u64 {
  debug_assert!(model.width <= 64);
  let poly = model.poly as u64;
  let top = 1u64 << (model.width - 1);
  let (mut a, mut b) = (a, b);
  let mut prod = 0u64;
  if a == 0 {
    return 0;
  }
  if model.reflect {
    // Reflected: degrees run from the top bit down.
    loop {
      if a & top != 0 {
        prod ^= b;
        if a & (top - 1) == 0 {
          break;
        }
      }
      a <<= 1;
      b = if b & 1 != 0 { (b >> 1) ^ poly } else { b >> 1 };
    }
  } else {
    loop {
      if a & 1 != 0 {
        prod ^= b;
        if a == 1 {
          break;
        }
      }
      a >>= 1;
      b = if b & top != 0 {
        ((b << 1) ^ poly) & ones(model.width)
      } else {
        b << 1
      };
    }
  }
  prod
}

/// One step of the register recurrence: multiply by x.
#[inline]
fn step_x(model: &Model, b: u64) -> u64 {
  let poly = model.poly as u64;
  if model.reflect {
    if b & 1 != 0 { (b >> 1) ^ poly } else { b >> 1 }
  } else {
    let top = 1u64 << (model.width - 1);
    if b & top != 0 {
      ((b << 1) ^ poly) & ones(model.width)
    } else {
      b << 1
    }
  }
}

/// The register value of x^0.
#[inline]
fn one_x(model: &Model) -> u64 {
  if model.reflect { 1u64 << (model.width - 1) } else { 1 }
}

/// Table of `x^(2^k) mod p(x)` with cycle detection.
///
/// `pow[k]` starts at x^1 and squares upward. On the first repeat of an
/// earlier entry the build stops and records the jump target, so index
/// walks can run past the stored prefix forever. Width at most 64.
#[derive(Clone)]
pub struct CombTable {
  pow: [u64; COMB],
  cycle: usize,
  back: Option<usize>,
}

impl CombTable {
  /// Build the combine table for a processed model.
  #[must_use]
  pub fn new(model: &Model) -> Self {
    debug_assert!(model.width <= 64);
    let mut pow = [0u64; COMB];
    pow[0] = step_x(model, one_x(model));
    let mut cycle = 1;
    let mut back = None;
    while cycle < COMB {
      let p = multmodp(model, pow[cycle - 1], pow[cycle - 1]);
      if let Some(j) = pow[..cycle].iter().position(|&q| q == p) {
        back = Some(j);
        break;
      }
      pow[cycle] = p;
      cycle += 1;
    }
    Self { pow, cycle, back }
  }

  /// The stored prefix of the power sequence, as emitted into generated
  /// code.
  #[must_use]
  pub fn entries(&self) -> &[u64] {
    &self.pow[..self.cycle]
  }

  /// Length of the stored prefix.
  #[must_use]
  pub fn cycle(&self) -> usize {
    self.cycle
  }

  /// Index the sequence re-enters after the stored prefix, when a cycle
  /// was found.
  #[must_use]
  pub fn back(&self) -> Option<usize> {
    self.back
  }

  /// `x^(8n) mod p(x)`: the operator that appends `n` zero bytes.
  #[must_use]
  pub fn x8nmodp(&self, model: &Model, mut n: u64) -> u64 {
    let mut xp = one_x(model);
    let mut cur = PowCursor::new(self);
    // Skip to x^8 = x^(2^3); bit k of n selects x^(2^(k+3)).
    cur.advance(model);
    cur.advance(model);
    cur.advance(model);
    loop {
      if n & 1 != 0 {
        xp = multmodp(model, cur.get(), xp);
      }
      n >>= 1;
      if n == 0 {
        break;
      }
      cur.advance(model);
    }
    xp
  }
}

/// Walks the power sequence by index, following the cycle jump; if the
/// table filled without a repeat, keeps squaring past the stored prefix.
struct PowCursor<'a> {
  comb: &'a CombTable,
  idx: usize,
  over: Option<u64>,
}

impl<'a> PowCursor<'a> {
  fn new(comb: &'a CombTable) -> Self {
    Self {
      comb,
      idx: 0,
      over: None,
    }
  }

  fn get(&self) -> u64 {
    self.over.unwrap_or(self.comb.pow[self.idx])
  }

  fn advance(&mut self, model: &Model) {
    if let Some(q) = self.over {
      self.over = Some(multmodp(model, q, q));
    } else if self.idx + 1 < self.comb.cycle {
      self.idx += 1;
    } else if let Some(back) = self.comb.back {
      self.idx = back;
    } else {
      let q = self.comb.pow[self.idx];
      self.over = Some(multmodp(model, q, q));
    }
  }
}

/// Run `count` zero bits through the CRC.
///
/// Small counts take the bit-serial path; from 128 bits up, the count is
/// applied as a single multiplication by `x^count mod p(x)`.
#[must_use]
pub fn crc_zeros(model: &Model, comb: &CombTable, crc: u64, count: usize) -> u64 {
  debug_assert!(model.width <= 64);
  if count < 128 {
    return crc_zeros_bitwise(model, crc, count);
  }

  let width = model.width;
  let mut crc = crc ^ model.xorout as u64;
  if model.rev {
    crc = reflect_bits(crc, width);
  }
  crc &= ones(width);

  let mut n = count;
  let mut cur = PowCursor::new(comb);
  loop {
    if n & 1 != 0 {
      crc = multmodp(model, cur.get(), crc);
    }
    n >>= 1;
    if n == 0 {
      break;
    }
    cur.advance(model);
  }

  if model.rev {
    crc = reflect_bits(crc, width);
  }
  crc ^ model.xorout as u64
}

/// CRC of a concatenation: combine `crc1 = crc(A)` and `crc2 = crc(B)`
/// given only `len2 = |B|` in bytes.
#[must_use]
pub fn crc_combine(model: &Model, comb: &CombTable, crc1: u64, crc2: u64, len2: u64) -> u64 {
  debug_assert!(model.width <= 64);
  // Undo the empty-message offset folded into init to reach linear form.
  let mut crc1 = crc1 ^ model.init as u64;
  let mut crc2 = crc2;
  if model.rev {
    crc1 = reflect_bits(crc1, model.width);
    crc2 = reflect_bits(crc2, model.width);
  }
  let mut crc = multmodp(model, comb.x8nmodp(model, len2), crc1) ^ crc2;
  if model.rev {
    crc = reflect_bits(crc, model.width);
  }
  crc
}
