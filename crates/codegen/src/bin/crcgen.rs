//! Generate C source for CRC models read from stdin.
//!
//! Each model gets its own `src/NAME.h` and `src/NAME.c`; a batch also
//! gets `src/test_src.[ch]` (runtime self-test) and `src/allcrcs.[ch]`
//! (discovery table). Existing files are never overwritten.
//!
//! Usage: `crcgen [-b] [-l] [-4] < crc-defs`
//!
//!   -b  generate for a big-endian target
//!   -l  generate for a little-endian target (default: host order)
//!   -4  use 32-bit words in the word-wise code (default: 64-bit)

use std::{
  env,
  io::{self, BufRead, BufWriter, Write as _},
  path::Path,
  process::ExitCode,
};

use codegen::{TestFiles, clean_line, crc_gen, create_source};
use model::{crc_name, read_model};

const SRC: &str = "src";

fn usage() {
  eprintln!("usage: crcgen [-b] [-l] [-4] < crc-defs");
  eprintln!("    -b for big endian");
  eprintln!("    -l (ell) for little endian");
  eprintln!("    -4 for four-byte words");
}

fn main() -> ExitCode {
  let mut little = cfg!(target_endian = "little");
  let mut word_bits = 64u32;

  for arg in env::args().skip(1) {
    let Some(opts) = arg.strip_prefix('-') else {
      eprintln!("must precede options with a dash");
      return ExitCode::FAILURE;
    };
    for opt in opts.chars() {
      match opt {
        'b' => little = false,
        'l' => little = true,
        '4' => word_bits = 32,
        'h' => {
          usage();
          return ExitCode::SUCCESS;
        }
        other => {
          eprintln!("unknown option: {other}");
          return ExitCode::FAILURE;
        }
      }
    }
  }

  let src = Path::new(SRC);
  let aggregates = create_source(src, "test_src").and_then(|(defs, test)| {
    let (allh, allc) = create_source(src, "allcrcs")?;
    TestFiles::new(
      BufWriter::new(defs),
      BufWriter::new(test),
      BufWriter::new(allh),
      BufWriter::new(allc),
    )
  });
  let mut tests = match aggregates {
    Ok(t) => t,
    Err(err) => {
      eprintln!("could not create test code files ({err}) -- aborting");
      return ExitCode::FAILURE;
    }
  };

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
        eprintln!("-- unusable model, skipping");
        continue;
      }
    };
    if m.width > word_bits {
      eprintln!("{} is too wide ({} bits) -- skipping", m.name, m.width);
      continue;
    }
    m.process();

    let name = crc_name(&m);
    let (head, code) = match create_source(src, &name) {
      Ok(pair) => pair,
      Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
        eprintln!("{SRC}/{name}.[ch] exists -- skipping");
        continue;
      }
      Err(err) => {
        eprintln!("{SRC}/{name}.[ch] create error ({err}) -- skipping");
        continue;
      }
    };
    let mut head = BufWriter::new(head);
    let mut code = BufWriter::new(code);
    let written = crc_gen(&m, &name, little, word_bits, &mut head, &mut code)
      .and_then(|()| head.flush())
      .and_then(|()| code.flush())
      .and_then(|()| tests.add(&m, &name));
    if let Err(err) = written {
      eprintln!("error writing {SRC}/{name}.[ch]: {err}");
      return ExitCode::FAILURE;
    }
  }

  if let Err(err) = tests.finish() {
    eprintln!("error writing test code files: {err}");
    return ExitCode::FAILURE;
  }
  ExitCode::SUCCESS
}
