//! Verify CRC models read from stdin.
//!
//! For each parameter line: check the bit-wise path (double-wide, so all
//! widths run) and the residue; for widths that fit the host word, also
//! check the byte-wise and word-wise paths on and off a word boundary and
//! the combine of a split check string. Prints per-model failures and a
//! summary; exits non-zero if any verification failed.

use std::{
  io::{self, BufRead},
  process::ExitCode,
};

use codegen::clean_line;
use kernel::{
  ByteTable, CombTable, WordSize, WordTables, crc_bitwise_dbl, crc_bytewise, crc_combine, crc_wordwise,
  crc_zeros_bitwise_dbl,
};
use model::read_model;

const CHECK_INPUT: &[u8] = b"123456789";

fn main() -> ExitCode {
  let little = cfg!(target_endian = "little");

  // The check string twice in one arena: word-aligned-ish at 0 and
  // deliberately off a word boundary at 15.
  let mut arena = [0u8; 32];
  arena[..9].copy_from_slice(CHECK_INPUT);
  arena[15..24].copy_from_slice(CHECK_INPUT);

  let mut inval = 0u32;
  let mut num = 0u32;
  let mut good = 0u32;
  let mut goodres = 0u32;
  let mut numall = 0u32;
  let mut goodbyte = 0u32;
  let mut goodword = 0u32;
  let mut goodcomb = 0u32;

  for line in io::stdin().lock().lines() {
    let line = match line {
      Ok(line) => clean_line(&line),
      Err(err) => {
        eprintln!("error reading stdin: {err}");
        return ExitCode::FAILURE;
      }
    };
    if line.is_empty() {
      continue;
    }
    let mut m = match read_model(&line, false) {
      Ok(m) => m,
      Err(err) => {
        eprintln!("{err}");
        inval += 1;
        continue;
      }
    };
    m.process();
    num += 1;

    let mut fails: Vec<&str> = Vec::new();

    // Bit-wise, any width.
    let crc = crc_bitwise_dbl(&m, 0, None);
    let crc = crc_bitwise_dbl(&m, crc, Some(CHECK_INPUT));
    if crc == m.check {
      good += 1;
    } else {
      fails.push("bit");
    }

    // Residue: the model width's worth of zero bits from a zero CRC.
    let res = crc_zeros_bitwise_dbl(&m, 0, m.width as usize) ^ m.xorout;
    if res == m.residue {
      goodres += 1;
    } else {
      fails.push("residue");
    }

    if m.width > 64 {
      // Table paths and combine need the CRC to fit the host word.
      println!(
        "{}:{} (CRC too long for byte, word, combine)",
        m.name,
        if fails.is_empty() { " bit-wise and residue pass" } else { " bit/residue FAIL" }
      );
      continue;
    }
    numall += 1;

    let byte = ByteTable::new(&m);
    let crc = crc_bytewise(&m, &byte, 0, None);
    let crc = crc_bytewise(&m, &byte, crc, Some(CHECK_INPUT));
    if u128::from(crc) == m.check {
      goodbyte += 1;
    } else {
      fails.push("byte");
    }

    let word = WordTables::new(&m, little, WordSize::W64);
    let on = crc_wordwise(&m, &word, crc_wordwise(&m, &word, 0, None), Some(&arena[..9]));
    let off = crc_wordwise(&m, &word, crc_wordwise(&m, &word, 0, None), Some(&arena[15..24]));
    if u128::from(on) == m.check && u128::from(off) == m.check {
      goodword += 1;
    } else {
      fails.push("word");
    }

    let comb = CombTable::new(&m);
    let start = kernel::crc_bitwise(&m, 0, None);
    let crc_a = kernel::crc_bitwise(&m, start, Some(b"12345"));
    let crc_b = kernel::crc_bitwise(&m, start, Some(b"6789"));
    if u128::from(crc_combine(&m, &comb, crc_a, crc_b, 4)) == m.check {
      goodcomb += 1;
    } else {
      fails.push("combine");
    }

    if !fails.is_empty() {
      println!("{}: {} fail", m.name, fails.join(", "));
    }
  }

  println!("{good} models verified bit-wise out of {num} usable ({inval} unusable models)");
  println!("{goodres} model residues verified out of {num} usable");
  println!("{goodbyte} models verified byte-wise out of {numall} usable");
  println!(
    "{goodword} models verified word-wise out of {numall} usable ({}-endian)",
    if little { "little" } else { "big" }
  );
  println!("{goodcomb} model combines verified out of {numall} usable");

  let all_good =
    good == num && goodres == num && goodbyte == numall && goodword == numall && goodcomb == numall;
  println!("{}", if all_good { "-- all good" } else { "** verification failed" });
  if all_good { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
