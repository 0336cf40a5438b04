//! Minimum-length parameter-line encoding.
//!
//! Re-encodes a raw (unprocessed) model as the shortest equivalent line:
//! parameter names abbreviated, values at their defaults dropped, each
//! number printed as decimal, hex, or a two's-complement negative
//! (whichever re-parses to the same value in the fewest characters), and
//! the name quoted only when necessary.

use alloc::{
  format,
  string::{String, ToString},
};
use core::fmt::Write as _;

use crate::params::{Model, ones_dbl};

/// Shortest spelling of `v` that re-parses to `v` within `width` bits.
/// Ties prefer decimal, then hex, then the negative forms.
fn min_num(v: u128, width: u32) -> String {
  let mut best = v.to_string();
  let hex = format!("{v:#x}");
  if hex.len() < best.len() {
    best = hex;
  }
  if v != 0 {
    let n = v.wrapping_neg() & ones_dbl(width);
    for cand in [format!("-{n}"), format!("-{n:#x}")] {
      if cand.len() < best.len() {
        best = cand;
      }
    }
  }
  best
}

fn push_parm(out: &mut String, name: &str, v: u128, width: u32) {
  let _ = write!(out, "{name}={} ", min_num(v, width));
}

/// Append the name, double-quoted only when it contains whitespace (or
/// could not otherwise be re-read), with embedded quotes doubled.
fn push_name(out: &mut String, name: &str) {
  out.push_str("n=");
  if !name.is_empty() && !name.contains(char::is_whitespace) && !name.starts_with('"') {
    out.push_str(name);
    return;
  }
  out.push('"');
  for c in name.chars() {
    if c == '"' {
      out.push('"');
    }
    out.push(c);
  }
  out.push('"');
}

/// Write a raw model back out maximally compressed.
#[must_use]
pub fn minify(model: &Model) -> String {
  let mut out = String::new();
  push_parm(&mut out, "w", u128::from(model.width), 64);
  push_parm(&mut out, "p", model.poly, model.width);
  if model.init != 0 {
    push_parm(&mut out, "i", model.init, model.width);
  }
  let _ = write!(out, "r={} ", if model.reflect { 't' } else { 'f' });
  if model.rev != model.reflect {
    let _ = write!(out, "refo={} ", if model.rev { 't' } else { 'f' });
  }
  if model.xorout != 0 {
    push_parm(&mut out, "x", model.xorout, model.width);
  }
  push_parm(&mut out, "c", model.check, model.width);
  if model.residue != 0 {
    push_parm(&mut out, "res", model.residue, model.width);
  }
  push_name(&mut out, &model.name);
  out
}
