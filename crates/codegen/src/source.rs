//! Output-file management for generated sources.
//!
//! Generated pairs land in a `src/` directory that is created on demand.
//! Existing files are never overwritten: creation is exclusive, and a
//! collision surfaces as `AlreadyExists` so the driver can report the
//! model as skipped. If the header was created but the code file was not,
//! the orphan header is removed.

use std::{
  fs::{self, File, OpenOptions},
  io,
  path::Path,
};

/// Create `dir/name.h` and `dir/name.c` for writing, creating `dir`
/// first if needed.
///
/// Returns the header and code files, in that order. Fails with
/// `AlreadyExists` when either file is already present; any header
/// created before such a failure is unlinked again.
pub fn create_source(dir: &Path, name: &str) -> io::Result<(File, File)> {
  match fs::create_dir(dir) {
    Ok(()) => {}
    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
    Err(e) => return Err(e),
  }

  let head_path = dir.join(format!("{name}.h"));
  let code_path = dir.join(format!("{name}.c"));
  let new_file = |path: &Path| OpenOptions::new().write(true).create_new(true).open(path);

  let head = new_file(&head_path)?;
  let code = match new_file(&code_path) {
    Ok(f) => f,
    Err(e) => {
      drop(head);
      let _ = fs::remove_file(&head_path);
      return Err(e);
    }
  };
  Ok((head, code))
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  fn scratch(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("crc-source-{tag}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
  }

  #[test]
  fn creates_directory_and_pair() {
    let dir = scratch("pair");
    let sub = dir.join("src");
    let (mut head, mut code) = create_source(&sub, "crc16kermit").unwrap();
    head.write_all(b"// h\n").unwrap();
    code.write_all(b"// c\n").unwrap();
    assert!(sub.join("crc16kermit.h").exists());
    assert!(sub.join("crc16kermit.c").exists());
    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn refuses_to_overwrite() {
    let dir = scratch("collide");
    let sub = dir.join("src");
    let _pair = create_source(&sub, "crc8smbus").unwrap();
    let err = create_source(&sub, "crc8smbus").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn unlinks_header_when_code_collides() {
    let dir = scratch("orphan");
    let sub = dir.join("src");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("crc3gsm.c"), b"stale").unwrap();
    let err = create_source(&sub, "crc3gsm").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    assert!(!sub.join("crc3gsm.h").exists(), "orphan header left behind");
    fs::remove_dir_all(&dir).unwrap();
  }
}
