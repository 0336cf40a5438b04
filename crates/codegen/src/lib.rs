//! Specialized C source emission for CRC models.
//!
//! For one fixed model this emits a self-contained `NAME.h`/`NAME.c` pair
//! realizing five entry points (`_bit`, `_rem`, `_byte`, `_word`, and
//! `_comb`) with every constant inlined, the byte/word/combine tables as
//! static arrays, and no dependency beyond `<stddef.h>`/`<stdint.h>`.
//! Aggregate test and discovery sources covering a whole batch of models
//! come from [`TestFiles`].
//!
//! The three drivers live in `src/bin/`:
//!
//! | Driver | Reads stdin, per line | Writes |
//! |--------|-----------------------|--------|
//! | `crctest` | a CRC model | pass/fail report on stdout |
//! | `crcgen` | a CRC model | `src/NAME.[ch]` + aggregates |
//! | `mincrc` | a CRC model | its minimal parameter line |

mod crcgen;
mod revgen;
mod source;
mod testgen;

pub use crcgen::crc_gen;
pub use revgen::rev_gen;
pub use source::create_source;
pub use testgen::TestFiles;

/// Strip embedded nuls and trailing whitespace from an input line.
#[must_use]
pub fn clean_line(raw: &str) -> String {
  let mut line: String = raw.chars().filter(|&c| c != '\0').collect();
  line.truncate(line.trim_end().len());
  line
}
