//! Generated-symbol name normalization.
//!
//! Every generated routine family is prefixed `crc<width><suffix>`, where
//! the suffix comes from the catalogue name with the leading
//! `crc[-digits][/]` stripped and non-alphanumerics mapped to `_`. The
//! transformation is tuned to the names in the RevEng catalogue, e.g.
//! `CRC-32/ISO-HDLC` becomes `crc32iso_hdlc`.

use alloc::string::String;
use core::fmt::Write as _;

use crate::params::Model;

/// Derive the routine and file name prefix for a model.
#[must_use]
pub fn crc_name(model: &Model) -> String {
  let mut name = String::with_capacity(8 + model.name.len());
  name.push_str("crc");
  let _ = write!(name, "{}", model.width);

  let mut id = model.name.as_str();
  if id.len() >= 3 && id[..3].eq_ignore_ascii_case("crc") {
    id = &id[3..];
    id = id.strip_prefix('-').unwrap_or(id);
    id = id.trim_start_matches(|c: char| c.is_ascii_digit());
    id = id.strip_prefix('/').unwrap_or(id);
  }

  let suffix_start = name.len();
  for c in id.chars() {
    if c.is_ascii_alphanumeric() {
      if name.len() == suffix_start && c.is_ascii_digit() {
        name.push('_');
      }
      name.push(c.to_ascii_lowercase());
    } else if c == '-' {
      name.push('_');
    }
  }
  name
}

#[cfg(test)]
mod tests {
  use alloc::string::ToString;

  use super::*;
  use crate::params::Model;

  fn named(width: u32, name: &str) -> Model {
    Model {
      width,
      reflect: true,
      rev: true,
      poly: 1,
      init: 0,
      xorout: 0,
      check: 0,
      residue: 0,
      name: name.to_string(),
    }
  }

  #[test]
  fn catalogue_names() {
    assert_eq!(crc_name(&named(32, "CRC-32/ISO-HDLC")), "crc32iso_hdlc");
    assert_eq!(crc_name(&named(16, "CRC-16/KERMIT")), "crc16kermit");
    assert_eq!(crc_name(&named(8, "CRC-8/SMBUS")), "crc8smbus");
    assert_eq!(crc_name(&named(64, "CRC-64/XZ")), "crc64xz");
  }

  #[test]
  fn leading_digit_gets_underscore() {
    assert_eq!(crc_name(&named(16, "CRC-16/3GPP")), "crc16_3gpp");
  }

  #[test]
  fn non_catalogue_name_kept_whole() {
    assert_eq!(crc_name(&named(16, "XMODEM")), "crc16xmodem");
    assert_eq!(crc_name(&named(16, "my crc (alt)")), "crc16mycrcalt");
  }

  #[test]
  fn bare_crc_prefix() {
    assert_eq!(crc_name(&named(32, "CRC-32")), "crc32");
  }
}
