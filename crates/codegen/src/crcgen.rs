//! CRC source emission.
//!
//! [`crc_gen`] writes a header and code file realizing one model as five
//! self-contained C functions over the smallest sufficient integer type:
//!
//! - `_bit`: the three-branch bit-serial evaluator with all constants
//!   inlined, and `~crc` replacing the xorout xor when xorout is all
//!   ones of a full-type width,
//! - `_rem`: `_bit` for a caller-supplied count of 0..8 bits,
//! - `_byte`: the byte-table walk (xorout folded into the table),
//! - `_word`: alignment prologue, unrolled word-lane fold for the chosen
//!   endianness and word size, and tail, with a minimal byte-swap
//!   helper only when the table orientation requires one,
//! - `_comb`: `multmodp`, the x^2^k table with its cycle jump, and the
//!   length walk `x8nmodp`.
//!
//! The byte table is elided when it is provably identical to the first
//! word-table lane (reflected little-endian, or non-reflected big-endian
//! at full word width); generated code then indexes `table_word[0]`.

use std::io::{self, Write};

use kernel::{CombTable, WordSize, WordTables};
use model::{Model, ones};

use crate::revgen::{rev_gen, uint_for};

/// How the register is positioned entering and leaving the bulk loop.
enum Swap {
  /// Shift to the word top only (or nothing at all when `top` is 0).
  None,
  /// Little-endian non-reflected: byte-reverse the CRC-bearing bytes.
  Low { pad: u32 },
  /// Big-endian reflected: full word byte reverse (involutive).
  Max,
}

struct Gen<'a> {
  model: &'a Model,
  name: &'a str,
  little: bool,
  size: WordSize,
  ctype: &'static str,
  type_bits: u32,
  wtype: &'static str,
}

/// Generate the header and code for one processed model.
///
/// `name` is the symbol prefix (see [`model::crc_name`]); `little` and
/// `word_bits` (32 or 64) choose the word-table orientation. The model
/// width must fit the word.
pub fn crc_gen(
  model: &Model,
  name: &str,
  little: bool,
  word_bits: u32,
  head: &mut dyn Write,
  code: &mut dyn Write,
) -> io::Result<()> {
  let size = match word_bits {
    32 => WordSize::W32,
    64 => WordSize::W64,
    _ => {
      return Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("word size must be 32 or 64 bits, not {word_bits}"),
      ));
    }
  };
  if model.width > word_bits {
    return Err(io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("{}-bit CRC does not fit {word_bits}-bit words", model.width),
    ));
  }

  let (ctype, type_bits) = uint_for(model.width);
  let g = Gen {
    model,
    name,
    little,
    size,
    ctype,
    type_bits,
    wtype: if word_bits == 64 { "uint64_t" } else { "uint32_t" },
  };

  let word = WordTables::new(model, little, size);
  let comb = CombTable::new(model);

  g.emit_head(head)?;
  g.emit_code(code, &word, &comb)
}

impl Gen<'_> {
  fn width(&self) -> u32 {
    self.model.width
  }

  /// A plain C hex literal of a width-bit constant.
  fn lit(&self, v: u64) -> String {
    format!("{v:#x}")
  }

  fn mask(&self) -> String {
    self.lit(ones(self.width()))
  }

  /// The xorout application, `~` when that saves the constant load.
  fn xor_line(&self) -> Option<String> {
    let xorout = self.model.xorout as u64;
    if xorout == 0 {
      None
    } else if xorout == ones(self.width()) && self.width() == self.type_bits {
      Some("    crc = ~crc;".into())
    } else {
      Some(format!("    crc ^= {};", self.lit(xorout)))
    }
  }

  fn rev_line(&self, var: &str) -> String {
    format!("    {var} = revlow{}({var});", self.width())
  }

  /// Whether a branch needs an explicit width mask.
  fn needs_mask(&self) -> bool {
    self.width() != self.type_bits && !self.model.rev
  }

  /// The byte-at-a-time step expression over the named table.
  fn byte_step(&self, tbl: &str) -> String {
    if self.model.reflect {
      if self.width() > 8 {
        format!("(crc >> 8) ^ {tbl}[(crc ^ *data++) & 0xff]")
      } else {
        format!("{tbl}[(crc ^ *data++) & 0xff]")
      }
    } else if self.width() <= 8 {
      format!("{tbl}[crc ^ *data++]")
    } else {
      format!(
        "(crc << 8) ^ {tbl}[((crc >> {}) ^ *data++) & 0xff]",
        self.width() - 8
      )
    }
  }

  // ───────────────────────────────────────────────────────────────────
  // Header
  // ───────────────────────────────────────────────────────────────────

  fn emit_head(&self, head: &mut dyn Write) -> io::Result<()> {
    let n = self.name;
    let ct = self.ctype;
    let guard = format!("{}_H", n.to_uppercase());
    writeln!(head, "// {n}.h -- CRC computation for {}", self.model.name)?;
    writeln!(head, "//")?;
    writeln!(head, "// Generated code; edits will be lost.")?;
    writeln!(head)?;
    writeln!(head, "#ifndef {guard}")?;
    writeln!(head, "#define {guard}")?;
    writeln!(head)?;
    writeln!(head, "#include <stddef.h>")?;
    writeln!(head, "#include <stdint.h>")?;
    writeln!(head)?;
    writeln!(head, "// Compute the CRC of the len bytes at mem, starting with crc. If mem")?;
    writeln!(head, "// is NULL, return the CRC of a zero-length message regardless of the")?;
    writeln!(head, "// other arguments; a fresh computation starts from that value. The")?;
    writeln!(head, "// result is always in the low {} bits.", self.width())?;
    writeln!(head, "{ct} {n}_bit({ct} crc, void const *mem, size_t len);")?;
    writeln!(head)?;
    writeln!(head, "// Apply bits more bits (0..8) of val to crc: the low bits of val for")?;
    writeln!(head, "// a reflected CRC, the high bits of its low byte otherwise.")?;
    writeln!(head, "{ct} {n}_rem({ct} crc, unsigned val, unsigned bits);")?;
    writeln!(head)?;
    writeln!(head, "// Byte-at-a-time version of {n}_bit().")?;
    writeln!(head, "{ct} {n}_byte({ct} crc, void const *mem, size_t len);")?;
    writeln!(head)?;
    writeln!(head, "// Word-at-a-time version of {n}_bit().")?;
    writeln!(head, "{ct} {n}_word({ct} crc, void const *mem, size_t len);")?;
    writeln!(head)?;
    writeln!(head, "// CRC of a concatenation: crc1 = CRC(a), crc2 = CRC(b), len2 = |b|")?;
    writeln!(head, "// in bytes.")?;
    writeln!(head, "{ct} {n}_comb({ct} crc1, {ct} crc2, uintmax_t len2);")?;
    writeln!(head)?;
    writeln!(head, "#endif")
  }

  // ───────────────────────────────────────────────────────────────────
  // Code
  // ───────────────────────────────────────────────────────────────────

  fn emit_code(&self, code: &mut dyn Write, word: &WordTables, comb: &CombTable) -> io::Result<()> {
    writeln!(code, "// {}.c -- CRC computation for {}", self.name, self.model.name)?;
    writeln!(code)?;
    writeln!(code, "#include \"{}.h\"", self.name)?;
    if comb.back().is_none() {
      writeln!(code, "#include <assert.h>")?;
    }

    if self.model.rev {
      rev_gen(self.width(), code)?;
    }
    self.emit_bit(code)?;
    self.emit_rem(code)?;

    let shared = word.shares_byte_table(self.model);
    let byte_tbl = if shared { "table_word[0]" } else { "table_byte" };
    if !shared {
      let ebits = if !self.model.reflect && self.width() < 8 { 8 } else { self.width() };
      write_table(
        code,
        &format!("static {} const table_byte[256]", table_type(ebits)),
        word.byte().entries(),
        (ebits as usize).div_ceil(4),
      )?;
    }

    self.emit_word_table(code, word)?;
    self.emit_byte(code, byte_tbl)?;
    self.emit_word(code, byte_tbl)?;
    self.emit_comb(code, comb)
  }

  fn emit_bit(&self, code: &mut dyn Write) -> io::Result<()> {
    let n = self.name;
    let ct = self.ctype;
    let w = self.width();
    let poly = self.model.poly as u64;

    writeln!(code)?;
    writeln!(code, "{ct} {n}_bit({ct} crc, void const *mem, size_t len) {{")?;
    writeln!(code, "    unsigned char const *data = mem;")?;
    writeln!(code, "    if (data == NULL)")?;
    writeln!(code, "        return {};", self.lit(self.model.init as u64))?;
    if let Some(line) = self.xor_line() {
      writeln!(code, "{line}")?;
    }
    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }

    if self.model.reflect {
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
      writeln!(code, "    while (len--) {{")?;
      writeln!(code, "        crc ^= *data++;")?;
      writeln!(code, "        for (unsigned k = 0; k < 8; k++)")?;
      writeln!(
        code,
        "            crc = crc & 1 ? (crc >> 1) ^ {} : crc >> 1;",
        self.lit(poly)
      )?;
      writeln!(code, "    }}")?;
    } else if w <= 8 {
      let shift = 8 - w;
      if shift > 0 {
        writeln!(code, "    crc <<= {shift};")?;
      }
      writeln!(code, "    while (len--) {{")?;
      writeln!(code, "        crc ^= *data++;")?;
      writeln!(code, "        for (unsigned k = 0; k < 8; k++)")?;
      writeln!(
        code,
        "            crc = crc & 0x80 ? (crc << 1) ^ {} : crc << 1;",
        self.lit(poly << shift)
      )?;
      writeln!(code, "    }}")?;
      if shift > 0 {
        writeln!(code, "    crc >>= {shift};")?;
      }
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
    } else {
      writeln!(code, "    while (len--) {{")?;
      writeln!(code, "        crc ^= ({ct})(*data++) << {};", w - 8)?;
      writeln!(code, "        for (unsigned k = 0; k < 8; k++)")?;
      writeln!(
        code,
        "            crc = crc & {} ? (crc << 1) ^ {} : crc << 1;",
        self.lit(1u64 << (w - 1)),
        self.lit(poly)
      )?;
      writeln!(code, "    }}")?;
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
    }

    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }
    if let Some(line) = self.xor_line() {
      writeln!(code, "{line}")?;
    }
    writeln!(code, "    return crc;")?;
    writeln!(code, "}}")
  }

  fn emit_rem(&self, code: &mut dyn Write) -> io::Result<()> {
    let n = self.name;
    let ct = self.ctype;
    let w = self.width();
    let poly = self.model.poly as u64;

    writeln!(code)?;
    writeln!(code, "{ct} {n}_rem({ct} crc, unsigned val, unsigned bits) {{")?;
    if let Some(line) = self.xor_line() {
      writeln!(code, "{line}")?;
    }
    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }

    if self.model.reflect {
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
      writeln!(code, "    val &= (1U << bits) - 1;")?;
      writeln!(code, "    crc ^= val;")?;
      writeln!(code, "    while (bits--)")?;
      writeln!(
        code,
        "        crc = crc & 1 ? (crc >> 1) ^ {} : crc >> 1;",
        self.lit(poly)
      )?;
    } else if w <= 8 {
      let shift = 8 - w;
      writeln!(code, "    val &= 0x100 - (0x100 >> bits);")?;
      if shift > 0 {
        writeln!(code, "    crc <<= {shift};")?;
      }
      writeln!(code, "    crc ^= val;")?;
      writeln!(code, "    while (bits--)")?;
      writeln!(
        code,
        "        crc = crc & 0x80 ? (crc << 1) ^ {} : crc << 1;",
        self.lit(poly << shift)
      )?;
      if shift > 0 {
        writeln!(code, "    crc >>= {shift};")?;
      }
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
    } else {
      writeln!(code, "    val &= 0x100 - (0x100 >> bits);")?;
      writeln!(code, "    crc ^= ({ct})val << {};", w - 8)?;
      writeln!(code, "    while (bits--)")?;
      writeln!(
        code,
        "        crc = crc & {} ? (crc << 1) ^ {} : crc << 1;",
        self.lit(1u64 << (w - 1)),
        self.lit(poly)
      )?;
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
    }

    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }
    if let Some(line) = self.xor_line() {
      writeln!(code, "{line}")?;
    }
    writeln!(code, "    return crc;")?;
    writeln!(code, "}}")
  }

  fn emit_byte(&self, code: &mut dyn Write, tbl: &str) -> io::Result<()> {
    let n = self.name;
    let ct = self.ctype;
    let w = self.width();

    writeln!(code)?;
    writeln!(code, "{ct} {n}_byte({ct} crc, void const *mem, size_t len) {{")?;
    writeln!(code, "    unsigned char const *data = mem;")?;
    writeln!(code, "    if (data == NULL)")?;
    writeln!(code, "        return {};", self.lit(self.model.init as u64))?;
    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }

    if self.model.reflect {
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
      writeln!(code, "    while (len--)")?;
      writeln!(code, "        crc = {};", self.byte_step(tbl))?;
    } else if w <= 8 {
      let shift = 8 - w;
      if shift > 0 {
        writeln!(code, "    crc <<= {shift};")?;
      }
      writeln!(code, "    while (len--)")?;
      writeln!(code, "        crc = {};", self.byte_step(tbl))?;
      if shift > 0 {
        writeln!(code, "    crc >>= {shift};")?;
      }
    } else {
      writeln!(code, "    while (len--)")?;
      writeln!(code, "        crc = {};", self.byte_step(tbl))?;
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
    }

    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }
    writeln!(code, "    return crc;")?;
    writeln!(code, "}}")
  }

  fn emit_word_table(&self, code: &mut dyn Write, word: &WordTables) -> io::Result<()> {
    let wb = self.size.bytes();
    let digits = (self.size.bits() / 4) as usize;
    writeln!(code)?;
    writeln!(code, "static {} const table_word[{wb}][256] = {{", self.wtype)?;
    for lane in &word.lanes()[..wb] {
      writeln!(code, "    {{")?;
      write_rows(code, lane, digits, "        ")?;
      writeln!(code, "    }},")?;
    }
    writeln!(code, "}};")
  }

  /// The register positioning needed to enter the bulk loop.
  fn swap_kind(&self) -> Swap {
    let k_bytes = self.width().max(8).div_ceil(8);
    if self.little == self.model.reflect {
      Swap::None
    } else if self.little {
      if k_bytes == 1 {
        Swap::None
      } else {
        Swap::Low {
          pad: 8 * k_bytes - self.width().max(8),
        }
      }
    } else {
      Swap::Max
    }
  }

  fn emit_swap_helper(&self, code: &mut dyn Write) -> io::Result<()> {
    let wt = self.wtype;
    match self.swap_kind() {
      Swap::None => Ok(()),
      Swap::Low { .. } => {
        // Byte-reverse just the CRC-bearing low bytes.
        let k = self.width().max(8).div_ceil(8);
        let mut terms = Vec::new();
        for i in 0..k {
          let from = 8 * i;
          let to = 8 * (k - 1 - i);
          terms.push(match (from, to) {
            (0, to) => format!("(x & 0xff) << {to}"),
            (from, 0) => format!("(x >> {from}) & 0xff"),
            (from, to) => format!("((x >> {from}) & 0xff) << {to}"),
          });
        }
        writeln!(code)?;
        writeln!(code, "static inline {wt} swaplow({wt} x) {{")?;
        writeln!(code, "    return {};", terms.join(" | "))?;
        writeln!(code, "}}")
      }
      Swap::Max => {
        let bits = self.size.bits();
        writeln!(code)?;
        writeln!(code, "static inline {wt} swapmax({wt} x) {{")?;
        if bits == 64 {
          writeln!(code, "    x = (x << 32) | (x >> 32);")?;
          writeln!(
            code,
            "    x = ((x & 0xffff0000ffff0000) >> 16) | ((x & 0x0000ffff0000ffff) << 16);"
          )?;
          writeln!(
            code,
            "    x = ((x & 0xff00ff00ff00ff00) >> 8) | ((x & 0x00ff00ff00ff00ff) << 8);"
          )?;
        } else {
          writeln!(code, "    x = (x << 16) | (x >> 16);")?;
          writeln!(code, "    x = ((x & 0xff00ff00) >> 8) | ((x & 0x00ff00ff) << 8);")?;
        }
        writeln!(code, "    return x;")?;
        writeln!(code, "}}")
      }
    }
  }

  /// Bulk-loop entry and exit statements for the positioned register.
  fn bulk_entry_exit(&self) -> (String, String) {
    let wt = self.wtype;
    let ct = self.ctype;
    // The little-endian swap paths absorb the top-of-word positioning
    // (for a single CRC-bearing byte it cancels out entirely), so the
    // explicit shift remains only for the big-endian non-reflected case.
    let top = if self.model.reflect || self.little {
      0
    } else {
      self.size.bits() - self.width().max(8)
    };
    let cast_in = if self.type_bits == self.size.bits() {
      "crc".to_string()
    } else {
      format!("({wt})crc")
    };
    let narrow = |expr: String| {
      if self.type_bits == self.size.bits() {
        format!("    crc = {expr};")
      } else {
        format!("    crc = ({ct})({expr});")
      }
    };
    match self.swap_kind() {
      Swap::None if top == 0 => (format!("    {wt} word = crc;"), narrow("word".into())),
      Swap::None => (
        format!("    {wt} word = {cast_in} << {top};"),
        narrow(format!("word >> {top}")),
      ),
      Swap::Low { pad: 0 } => (
        format!("    {wt} word = swaplow(crc);"),
        narrow("swaplow(word)".into()),
      ),
      Swap::Low { pad } => (
        format!("    {wt} word = swaplow({cast_in} << {pad});"),
        narrow(format!("swaplow(word) >> {pad}")),
      ),
      Swap::Max => (
        format!("    {wt} word = swapmax(crc);"),
        narrow("swapmax(word)".into()),
      ),
    }
  }

  fn emit_word(&self, code: &mut dyn Write, tbl: &str) -> io::Result<()> {
    let n = self.name;
    let ct = self.ctype;
    let w = self.width();
    let wb = self.size.bytes();
    let wt = self.wtype;

    self.emit_swap_helper(code)?;

    writeln!(code)?;
    writeln!(code, "{ct} {n}_word({ct} crc, void const *mem, size_t len) {{")?;
    writeln!(code, "    unsigned char const *data = mem;")?;
    writeln!(code, "    if (data == NULL)")?;
    writeln!(code, "        return {};", self.lit(self.model.init as u64))?;
    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }
    let shift = if w <= 8 { 8 - w } else { w - 8 };
    if self.model.reflect {
      if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
    } else if w <= 8 && shift > 0 {
      writeln!(code, "    crc <<= {shift};")?;
    }

    // Single bytes until the data pointer hits a word boundary.
    writeln!(code, "    while (len && (uintptr_t)data & {}) {{", wb - 1)?;
    writeln!(code, "        crc = {};", self.byte_step(tbl))?;
    writeln!(code, "        len--;")?;
    writeln!(code, "    }}")?;

    // Bulk: one aligned word per iteration, one table lookup per lane.
    writeln!(code, "    if (len >= {wb}) {{")?;
    let (entry, exit) = self.bulk_entry_exit();
    writeln!(code, "    {entry}")?;
    writeln!(code, "        do {{")?;
    writeln!(code, "            word ^= *({wt} const *)data;")?;
    for j in 0..wb {
      let lane = if self.little { wb - 1 - j } else { j };
      let idx = if j == 0 {
        "word & 0xff".to_string()
      } else if j == wb - 1 {
        format!("word >> {}", 8 * j)
      } else {
        format!("(word >> {}) & 0xff", 8 * j)
      };
      if j == 0 {
        writeln!(code, "            word = table_word[{lane}][{idx}]")?;
      } else {
        let end = if j == wb - 1 { ";" } else { "" };
        writeln!(code, "                 ^ table_word[{lane}][{idx}]{end}")?;
      }
    }
    writeln!(code, "            data += {wb};")?;
    writeln!(code, "            len -= {wb};")?;
    writeln!(code, "        }} while (len >= {wb});")?;
    writeln!(code, "    {exit}")?;
    writeln!(code, "    }}")?;

    // Tail bytes.
    writeln!(code, "    while (len--)")?;
    writeln!(code, "        crc = {};", self.byte_step(tbl))?;

    if !self.model.reflect {
      if w <= 8 {
        if shift > 0 {
          writeln!(code, "    crc >>= {shift};")?;
        }
      } else if self.needs_mask() {
        writeln!(code, "    crc &= {};", self.mask())?;
      }
    }
    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }
    writeln!(code, "    return crc;")?;
    writeln!(code, "}}")
  }

  fn emit_comb(&self, code: &mut dyn Write, comb: &CombTable) -> io::Result<()> {
    let n = self.name;
    let ct = self.ctype;
    let w = self.width();
    let poly = self.lit(self.model.poly as u64);
    let top = self.lit(1u64 << (w - 1));

    writeln!(code)?;
    writeln!(code, "// Multiply a(x) by b(x) modulo p(x). a must not be zero.")?;
    writeln!(code, "static {ct} multmodp({ct} a, {ct} b) {{")?;
    writeln!(code, "    {ct} prod = 0;")?;
    writeln!(code, "    for (;;) {{")?;
    if self.model.reflect {
      writeln!(code, "        if (a & {top}) {{")?;
      writeln!(code, "            prod ^= b;")?;
      writeln!(code, "            if ((a & {}) == 0)", self.lit((1u64 << (w - 1)) - 1))?;
      writeln!(code, "                break;")?;
      writeln!(code, "        }}")?;
      writeln!(code, "        a <<= 1;")?;
      writeln!(code, "        b = b & 1 ? (b >> 1) ^ {poly} : b >> 1;")?;
    } else {
      writeln!(code, "        if (a & 1) {{")?;
      writeln!(code, "            prod ^= b;")?;
      writeln!(code, "            if (a == 1)")?;
      writeln!(code, "                break;")?;
      writeln!(code, "        }}")?;
      writeln!(code, "        a >>= 1;")?;
      if self.width() == self.type_bits {
        writeln!(code, "        b = b & {top} ? (b << 1) ^ {poly} : b << 1;")?;
      } else {
        writeln!(
          code,
          "        b = b & {top} ? ((b << 1) ^ {poly}) & {} : b << 1;",
          self.mask()
        )?;
      }
    }
    writeln!(code, "    }}")?;
    writeln!(code, "    return prod;")?;
    writeln!(code, "}}")?;

    write_table(
      code,
      &format!("static {ct} const table_comb[{}]", comb.cycle()),
      comb.entries(),
      (w as usize).div_ceil(4),
    )?;

    let x0 = if self.model.reflect { self.lit(1u64 << (w - 1)) } else { "1".to_string() };
    let start = if 3 < comb.cycle() {
      3
    } else {
      match comb.back() {
        Some(b) => b + (3 - b) % (comb.cycle() - b),
        None => 3,
      }
    };
    writeln!(code)?;
    writeln!(code, "// Return x^(8n) modulo p(x).")?;
    writeln!(code, "static {ct} x8nmodp(uintmax_t n) {{")?;
    writeln!(code, "    {ct} xp = {x0};")?;
    writeln!(code, "    unsigned k = {start};")?;
    writeln!(code, "    for (;;) {{")?;
    writeln!(code, "        if (n & 1)")?;
    writeln!(code, "            xp = multmodp(table_comb[k], xp);")?;
    writeln!(code, "        n >>= 1;")?;
    writeln!(code, "        if (n == 0)")?;
    writeln!(code, "            break;")?;
    match comb.back() {
      Some(back) => {
        writeln!(code, "        if (++k == {})", comb.cycle())?;
        writeln!(code, "            k = {back};")?;
      }
      None => {
        writeln!(code, "        k++;")?;
        writeln!(code, "        assert(k < {});", comb.cycle())?;
      }
    }
    writeln!(code, "    }}")?;
    writeln!(code, "    return xp;")?;
    writeln!(code, "}}")?;

    writeln!(code)?;
    writeln!(code, "{ct} {n}_comb({ct} crc1, {ct} crc2, uintmax_t len2) {{")?;
    if self.model.init != 0 {
      writeln!(code, "    crc1 ^= {};", self.lit(self.model.init as u64))?;
    }
    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc1"))?;
      writeln!(code, "{}", self.rev_line("crc2"))?;
    }
    writeln!(code, "    {ct} crc = multmodp(x8nmodp(len2), crc1) ^ crc2;")?;
    if self.model.rev {
      writeln!(code, "{}", self.rev_line("crc"))?;
    }
    writeln!(code, "    return crc;")?;
    writeln!(code, "}}")
  }
}

/// Table entry type: entries can exceed the width for narrow
/// non-reflected models, whose byte table is pre-shifted into 8 bits.
fn table_type(entry_bits: u32) -> &'static str {
  uint_for(entry_bits).0
}

/// Emit a one-dimensional constant table.
fn write_table(code: &mut dyn Write, decl: &str, values: &[u64], digits: usize) -> io::Result<()> {
  writeln!(code)?;
  writeln!(code, "{decl} = {{")?;
  write_rows(code, values, digits, "    ")?;
  writeln!(code, "}};")
}

/// Comma-separated zero-padded hex entries, wrapped to keep lines short.
fn write_rows(code: &mut dyn Write, values: &[u64], digits: usize, indent: &str) -> io::Result<()> {
  let per_line = ((76 - indent.len()) / (digits + 4)).max(1);
  for row in values.chunks(per_line) {
    let line: Vec<String> = row.iter().map(|v| format!("0x{v:0digits$x}")).collect();
    writeln!(code, "{indent}{},", line.join(", "))?;
  }
  Ok(())
}
