//! Rewrite CRC parameter lines from stdin in their shortest form.
//!
//! Parameter names are abbreviated, defaulted values dropped, numbers
//! printed as decimal or hex (or a negative), whichever is shortest, and
//! names quoted only when needed. Unusable models are reported to stderr
//! and skipped.

use std::{
  io::{self, BufRead},
  process::ExitCode,
};

use codegen::clean_line;
use model::{minify, read_model};

fn main() -> ExitCode {
  let mut status = ExitCode::SUCCESS;
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
    match read_model(&line, false) {
      Ok(m) => println!("{}", minify(&m)),
      Err(err) => {
        eprintln!("{err}");
        eprintln!("-- unusable model, skipping");
        status = ExitCode::FAILURE;
      }
    }
  }
  status
}
