//! Aggregate source emission for a generated batch.
//!
//! Alongside the per-model pairs, a batch run produces:
//!
//! - `test_src.[ch]`: a runtime self-test. For every generated CRC it
//!   checks the five functions against the model's check value, a random
//!   31-byte buffer (bit-wise result taken as the reference), a partial
//!   byte fed through `_rem`, and the combine of a split check string.
//! - `allcrcs.[ch]`: a discovery table of
//!   `{name, normalized_name, width, function_pointer}` over uniform
//!   `uintmax_t` wrappers of each `_word` function.

use std::io::{self, Write};

use model::Model;

/// Writer set for the aggregate sources, with the discovery-table rows
/// buffered so the header can declare the wrappers before the table.
pub struct TestFiles<W: Write> {
  defs: W,
  test: W,
  allh: W,
  allc: W,
  entries: String,
}

impl<W: Write> TestFiles<W> {
  /// Start the aggregate files: `defs`/`test` become `test_src.[ch]`,
  /// `allh`/`allc` become `allcrcs.[ch]`.
  pub fn new(mut defs: W, mut test: W, mut allh: W, mut allc: W) -> io::Result<Self> {
    writeln!(defs, "// test_src.h -- include every generated CRC header")?;

    writeln!(test, "// test_src.c -- check every generated CRC")?;
    writeln!(test)?;
    writeln!(test, "#include <stdio.h>")?;
    writeln!(test, "#include <stdlib.h>")?;
    writeln!(test, "#include <stdint.h>")?;
    writeln!(test, "#include <time.h>")?;
    writeln!(test, "#include \"test_src.h\"")?;
    writeln!(test)?;
    writeln!(test, "int main(void) {{")?;
    writeln!(test, "    unsigned char data[31];")?;
    writeln!(test, "    srand(time(NULL));")?;
    writeln!(test, "    for (size_t i = 0; i < sizeof(data); i++)")?;
    writeln!(test, "        data[i] = rand() >> 3;")?;
    writeln!(test, "    uintmax_t init, crc;")?;
    writeln!(test, "    int err = 0;")?;

    writeln!(allh, "// allcrcs.h -- table of all generated CRC functions")?;
    writeln!(allh)?;
    writeln!(allh, "#include <stdint.h>")?;
    writeln!(allh, "#include <stddef.h>")?;
    writeln!(allh)?;
    writeln!(allh, "typedef uintmax_t (*crc_f)(uintmax_t, void const *, size_t);")?;
    writeln!(allh)?;

    writeln!(allc, "// allcrcs.c -- uniform wrappers over the word-wise functions")?;
    writeln!(allc)?;
    writeln!(allc, "#include <stdint.h>")?;
    writeln!(allc, "#include <stddef.h>")?;

    Ok(Self {
      defs,
      test,
      allh,
      allc,
      entries: String::new(),
    })
  }

  /// Append one generated model to every aggregate.
  pub fn add(&mut self, model: &Model, name: &str) -> io::Result<()> {
    writeln!(self.defs, "#include \"{name}.h\"")?;

    let check = format!("{:#x}", model.check as u64);
    let t = &mut self.test;
    writeln!(t)?;
    writeln!(t, "    // {}", model.name)?;
    writeln!(t, "    init = {name}_bit(0, NULL, 0);")?;
    writeln!(t, "    if ({name}_bit(init, \"123456789\", 9) != {check})")?;
    writeln!(t, "        fputs(\"bit-wise mismatch for {name}\\n\", stderr), err++;")?;
    writeln!(t, "    crc = {name}_bit(init, data, sizeof(data));")?;
    // One byte split into 3 + 5 bits through _rem; a reflected CRC takes
    // the low bits first, a non-reflected one the high bits.
    if model.reflect {
      writeln!(t, "    if ({name}_bit(init, \"\\xda\", 1) !=")?;
      writeln!(t, "        {name}_rem({name}_rem(init, 0xda, 3), 0x1b, 5))")?;
    } else {
      writeln!(t, "    if ({name}_bit(init, \"\\xda\", 1) !=")?;
      writeln!(t, "        {name}_rem({name}_rem(init, 0xda, 3), 0xd0, 5))")?;
    }
    writeln!(t, "        fputs(\"small bits mismatch for {name}\\n\", stderr), err++;")?;
    writeln!(t, "    if ({name}_byte(0, NULL, 0) != init ||")?;
    writeln!(t, "        {name}_byte(init, \"123456789\", 9) != {check} ||")?;
    writeln!(t, "        {name}_byte(init, data, sizeof(data)) != crc)")?;
    writeln!(t, "        fputs(\"byte-wise mismatch for {name}\\n\", stderr), err++;")?;
    writeln!(t, "    if ({name}_word(0, NULL, 0) != init ||")?;
    writeln!(t, "        {name}_word(init, \"123456789\", 9) != {check} ||")?;
    writeln!(t, "        {name}_word(init, data + 1, sizeof(data) - 1) !=")?;
    writeln!(t, "            {name}_bit(init, data + 1, sizeof(data) - 1))")?;
    writeln!(t, "        fputs(\"word-wise mismatch for {name}\\n\", stderr), err++;")?;
    writeln!(t, "    if ({name}_comb({name}_bit(init, \"12345\", 5),")?;
    writeln!(t, "                    {name}_bit(init, \"6789\", 4), 4) != {check})")?;
    writeln!(t, "        fputs(\"combine mismatch for {name}\\n\", stderr), err++;")?;

    writeln!(self.allc)?;
    writeln!(self.allc, "#include \"{name}.h\"")?;
    writeln!(
      self.allc,
      "uintmax_t {name}(uintmax_t crc, void const *mem, size_t len) {{"
    )?;
    writeln!(self.allc, "    return {name}_word(crc, mem, len);")?;
    writeln!(self.allc, "}}")?;

    writeln!(self.allh, "uintmax_t {name}(uintmax_t, void const *, size_t);")?;
    let matchname: String = name
      .strip_prefix("crc")
      .unwrap_or(name)
      .chars()
      .filter(char::is_ascii_alphanumeric)
      .collect();
    self.entries.push_str(&format!(
      "    {{\"{}\", \"{matchname}\", {}, {name}}},\n",
      model.name.replace('"', "\\\""),
      model.width
    ));
    Ok(())
  }

  /// Close out every aggregate file.
  pub fn finish(mut self) -> io::Result<()> {
    writeln!(self.test)?;
    writeln!(self.test, "    fputs(err ? \"** verification failed\\n\" :")?;
    writeln!(self.test, "                \"-- all good\\n\", stderr);")?;
    writeln!(self.test, "    return err != 0;")?;
    writeln!(self.test, "}}")?;

    writeln!(self.allh)?;
    writeln!(self.allh, "static struct {{")?;
    writeln!(self.allh, "    char const *name;")?;
    writeln!(self.allh, "    char const *match;")?;
    writeln!(self.allh, "    unsigned short width;")?;
    writeln!(self.allh, "    crc_f func;")?;
    writeln!(self.allh, "}} const all[] = {{")?;
    self.allh.write_all(self.entries.as_bytes())?;
    writeln!(self.allh, "    {{\"\", \"\", 0, NULL}}")?;
    writeln!(self.allh, "}};")?;

    self.defs.flush()?;
    self.test.flush()?;
    self.allh.flush()?;
    self.allc.flush()
  }
}
