//! Parameter-line parsing.
//!
//! One CRC model per line, as `name=value` pairs separated by whitespace
//! (see the crate docs for the grammar). Parameter names may be
//! abbreviated to any unambiguous prefix: `w`, `p`, `i`, `r`, `refo`, `x`,
//! `c`, `res`, and `n`. Integer values are decimal, octal (leading `0`),
//! or hexadecimal (leading `0x`), with an optional leading `-` giving the
//! two's complement within the model width. A value starting with a double
//! quote runs to the closing quote, with `""` standing for an embedded
//! quote.
//!
//! All problems found on a line are accumulated and reported together, so
//! a single diagnostic names every unknown, repeated, out-of-range, and
//! missing parameter at once.

use alloc::{
  borrow::Cow,
  string::{String, ToString},
};
use core::fmt;

use crate::params::Model;

// Parameter bits, in diagnostic order.
const WIDTH: u16 = 1 << 0;
const POLY: u16 = 1 << 1;
const INIT: u16 = 1 << 2;
const REFIN: u16 = 1 << 3;
const REFOUT: u16 = 1 << 4;
const XOROUT: u16 = 1 << 5;
const CHECK: u16 = 1 << 6;
const RES: u16 = 1 << 7;
const NAME: u16 = 1 << 8;
const ALL: u16 = WIDTH | POLY | INIT | REFIN | REFOUT | XOROUT | CHECK | RES | NAME;

const PARAM_NAMES: [&str; 9] = [
  "width", "poly", "init", "refin", "refout", "xorout", "check", "residue", "name",
];

/// A set of parameter names, used in diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParamSet(u16);

impl ParamSet {
  #[inline]
  fn insert(&mut self, bit: u16) {
    self.0 |= bit;
  }

  /// True when no parameter is in the set.
  #[inline]
  #[must_use]
  pub fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Iterate the parameter names in the set.
  pub fn iter(self) -> impl Iterator<Item = &'static str> {
    PARAM_NAMES
      .iter()
      .enumerate()
      .filter(move |(k, _)| self.0 & (1 << k) != 0)
      .map(|(_, n)| *n)
  }
}

/// Why a parameter line could not be turned into a usable [`Model`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelError {
  /// The line does not scan as `parm=value` pairs; carries the unparsed
  /// remainder.
  Syntax(String),
  /// The line scanned, but the model is unusable. All problems found are
  /// carried at once.
  Invalid {
    /// Model name if one was seen, for diagnostics.
    name: String,
    /// First unrecognized parameter name, if any.
    unknown: Option<String>,
    /// Parameters given more than once.
    repeated: ParamSet,
    /// Parameters whose value is malformed or outside the width.
    out_of_range: ParamSet,
    /// Required parameters that were not given.
    missing: ParamSet,
  },
}

impl fmt::Display for ModelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Syntax(at) => write!(f, "bad syntax (not 'parm=value') at: '{at}'"),
      Self::Invalid {
        name,
        unknown,
        repeated,
        out_of_range,
        missing,
      } => {
        let mut first = true;
        let mut line = |f: &mut fmt::Formatter<'_>, msg: fmt::Arguments<'_>| -> fmt::Result {
          if !first {
            writeln!(f)?;
          }
          first = false;
          write!(f, "{name}: {msg}")
        };
        if let Some(unk) = unknown {
          line(f, format_args!("unknown parameter {unk}"))?;
        }
        for p in repeated.iter() {
          line(f, format_args!("{p} repeated"))?;
        }
        for p in out_of_range.iter() {
          line(f, format_args!("{p} out of range"))?;
        }
        for p in missing.iter() {
          line(f, format_args!("{p} missing"))?;
        }
        if first {
          write!(f, "{name}: unusable model")?;
        }
        Ok(())
      }
    }
  }
}

impl core::error::Error for ModelError {}

/// Read one `name=value` pair. Returns `Ok(None)` at end of line, or `Err`
/// for unscannable input (no `=`, empty name or value, unclosed quote).
fn read_var<'a>(s: &mut &'a str) -> Result<Option<(&'a str, Cow<'a, str>)>, ()> {
  let t = s.trim_start();
  *s = t;
  if t.is_empty() {
    return Ok(None);
  }

  let stop = t.find(|c: char| c.is_whitespace() || c == '=').ok_or(())?;
  if stop == 0 || !t[stop..].starts_with('=') {
    return Err(());
  }
  let name = &t[..stop];
  let rest = &t[stop + 1..];

  if let Some(mut r) = rest.strip_prefix('"') {
    // Quoted value; "" stands for an embedded quote.
    let mut val = String::new();
    loop {
      let q = r.find('"').ok_or(())?;
      val.push_str(&r[..q]);
      r = &r[q + 1..];
      match r.strip_prefix('"') {
        Some(r2) => {
          val.push('"');
          r = r2;
        }
        None => break,
      }
    }
    *s = r;
    Ok(Some((name, Cow::Owned(val))))
  } else {
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    if end == 0 {
      return Err(());
    }
    *s = &rest[end..];
    Ok(Some((name, Cow::Borrowed(&rest[..end]))))
  }
}

/// Parse an integer value: decimal, octal (`0`), or hex (`0x`), with an
/// optional leading `-` for two's complement. `None` on a bad digit or on
/// overflow of the double-wide accumulator.
fn parse_int(s: &str) -> Option<u128> {
  let (neg, s) = match s.strip_prefix('-') {
    Some(r) => (true, r),
    None => (false, s),
  };
  let (base, digits) = if let Some(r) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
    (16, r)
  } else if let Some(r) = s.strip_prefix('0') {
    (8, r)
  } else {
    (10, s)
  };
  let mut v: u128 = 0;
  for c in digits.chars() {
    let d = c.to_digit(base)?;
    v = v.checked_mul(u128::from(base))?.checked_add(u128::from(d))?;
  }
  Some(if neg { v.wrapping_neg() } else { v })
}

/// Case-insensitive prefix match with a minimum unambiguous length.
fn is_prefix(given: &str, full: &str, min: usize) -> bool {
  given.len() >= min && given.len() <= full.len() && full[..given.len()].eq_ignore_ascii_case(given)
}

/// `true`/`false`, abbreviated to any prefix.
fn parse_bool(s: &str) -> Option<bool> {
  if is_prefix(s, "true", 1) {
    Some(true)
  } else if is_prefix(s, "false", 1) {
    Some(false)
  } else {
    None
  }
}

/// Record one integer parameter: repeated, malformed, or accepted.
fn take_int(state: &mut ReadState, bit: u16, value: &str, slot: &mut u128) {
  if state.got & bit != 0 {
    state.repeated.insert(bit);
  } else {
    match parse_int(value) {
      Some(v) => {
        *slot = v;
        state.got |= bit;
      }
      None => state.out_of_range.insert(bit),
    }
  }
}

/// Record one boolean parameter.
fn take_bool(state: &mut ReadState, bit: u16, value: &str, slot: &mut bool) {
  if state.got & bit != 0 {
    state.repeated.insert(bit);
  } else {
    match parse_bool(value) {
      Some(v) => {
        *slot = v;
        state.got |= bit;
      }
      None => state.out_of_range.insert(bit),
    }
  }
}

#[derive(Default)]
struct ReadState {
  got: u16,
  repeated: ParamSet,
  out_of_range: ParamSet,
}

/// Check that bits at and above `width` are all zero or all one; all-one
/// (a negative literal) is normalized away. Returns false when the value
/// does not fit.
fn fits_width(v: &mut u128, width: u32) -> bool {
  if width >= 128 {
    return true;
  }
  let high = u128::MAX << width;
  if *v & high == high {
    *v &= !high;
    return true;
  }
  *v & high == 0
}

/// Read and verify a CRC model description from one parameter line.
///
/// The returned model is in raw catalogue form; call
/// [`Model::process`] before computing with it. With `lenient` set, the
/// `check` parameter may be omitted (the code generator accepts models
/// without a check value); everything else is as the grammar requires.
pub fn read_model(line: &str, lenient: bool) -> Result<Model, ModelError> {
  let mut s = line;
  let mut st = ReadState::default();
  let mut unknown: Option<String> = None;

  let mut width_val: u128 = 0;
  let mut poly: u128 = 0;
  let mut init: u128 = 0;
  let mut refin = false;
  let mut refout = false;
  let mut xorout: u128 = 0;
  let mut check: u128 = 0;
  let mut residue: u128 = 0;
  let mut name: Option<String> = None;

  loop {
    let (key, value) = match read_var(&mut s) {
      Ok(Some(pair)) => pair,
      Ok(None) => break,
      Err(()) => return Err(ModelError::Syntax(s.to_string())),
    };

    // One arm per parameter, in the same order the diagnostics use.
    // refout and residue need at least four and three characters to stay
    // unambiguous against refin and the rest.
    if is_prefix(key, "width", 1) {
      take_int(&mut st, WIDTH, &value, &mut width_val);
    } else if is_prefix(key, "poly", 1) {
      take_int(&mut st, POLY, &value, &mut poly);
    } else if is_prefix(key, "init", 1) {
      take_int(&mut st, INIT, &value, &mut init);
    } else if is_prefix(key, "refin", 1) {
      take_bool(&mut st, REFIN, &value, &mut refin);
    } else if is_prefix(key, "refout", 4) {
      take_bool(&mut st, REFOUT, &value, &mut refout);
    } else if is_prefix(key, "xorout", 1) {
      take_int(&mut st, XOROUT, &value, &mut xorout);
    } else if is_prefix(key, "check", 1) {
      take_int(&mut st, CHECK, &value, &mut check);
    } else if is_prefix(key, "residue", 3) {
      take_int(&mut st, RES, &value, &mut residue);
    } else if is_prefix(key, "name", 1) {
      if st.got & NAME != 0 {
        st.repeated.insert(NAME);
      } else {
        name = Some(value.into_owned());
        st.got |= NAME;
      }
    } else if unknown.is_none() {
      unknown = Some(key.to_string());
    }
  }
  let ReadState {
    mut got,
    repeated,
    mut out_of_range,
  } = st;

  // Defaults: init, xorout, and residue are zero when absent; a missing
  // refin or refout copies the other.
  if got & INIT == 0 {
    got |= INIT;
  }
  if got & (REFIN | REFOUT) == REFIN {
    refout = refin;
    got |= REFOUT;
  } else if got & (REFIN | REFOUT) == REFOUT {
    refin = refout;
    got |= REFIN;
  }
  if got & XOROUT == 0 {
    got |= XOROUT;
  }
  if got & RES == 0 {
    got |= RES;
  }
  if lenient && got & CHECK == 0 {
    got |= CHECK;
  }

  // Range checks require a usable width.
  if got & WIDTH != 0 {
    if width_val < 1 || width_val > 128 {
      out_of_range.insert(WIDTH);
    } else {
      let width = width_val as u32;
      if got & POLY != 0 && (!fits_width(&mut poly, width) || poly & 1 != 1) {
        out_of_range.insert(POLY);
      }
      if !fits_width(&mut init, width) {
        out_of_range.insert(INIT);
      }
      if !fits_width(&mut xorout, width) {
        out_of_range.insert(XOROUT);
      }
      if got & CHECK != 0 && !fits_width(&mut check, width) {
        out_of_range.insert(CHECK);
      }
      if got & RES != 0 && !fits_width(&mut residue, width) {
        out_of_range.insert(RES);
      }
    }
  }

  let missing = ParamSet((got ^ ALL) & !out_of_range.0);
  if unknown.is_some() || !repeated.is_empty() || !out_of_range.is_empty() || got != ALL {
    return Err(ModelError::Invalid {
      name: name.unwrap_or_else(|| "<no name>".to_string()),
      unknown,
      repeated,
      out_of_range,
      missing,
    });
  }

  Ok(Model {
    width: width_val as u32,
    reflect: refin,
    rev: refout,
    poly,
    init,
    xorout,
    check,
    residue,
    name: name.unwrap_or_default(),
  })
}
