//! Emitted-source checks: the generated C for known models carries the
//! right types, constants, tables, and helpers.

use codegen::{TestFiles, crc_gen, create_source};
use kernel::ByteTable;
use model::{Model, crc_name, read_model};

fn processed(line: &str) -> Model {
  let mut m = read_model(line, false).unwrap();
  m.process();
  m
}

fn generate(line: &str, little: bool, word_bits: u32) -> (String, String, String) {
  let m = processed(line);
  let name = crc_name(&m);
  let mut head = Vec::new();
  let mut code = Vec::new();
  crc_gen(&m, &name, little, word_bits, &mut head, &mut code).unwrap();
  (
    name,
    String::from_utf8(head).unwrap(),
    String::from_utf8(code).unwrap(),
  )
}

const KERMIT: &str = "w=16 p=4129 r=t c=8585 n=\"CRC-16/KERMIT\"";
const CCITT: &str = "w=16 p=0x1021 i=-1 r=f c=0x29b1 n=\"CRC-16/CCITT-FALSE\"";
const ISO_HDLC: &str = "w=32 p=0x04c11db7 i=-1 x=-1 r=t c=0xcbf43926 n=\"CRC-32/ISO-HDLC\"";
const UMTS: &str = "w=12 p=0x80f r=f refo=t c=0xdaf n=\"CRC-12/UMTS\"";
const GSM: &str = "w=3 p=3 x=7 r=f c=4 n=\"CRC-3/GSM\"";

#[test]
fn header_declares_the_five_functions() {
  let (name, head, _) = generate(KERMIT, true, 64);
  assert_eq!(name, "crc16kermit");
  for f in ["_bit", "_byte", "_word"] {
    let proto = format!("uint16_t crc16kermit{f}(uint16_t crc, void const *mem, size_t len);");
    assert!(head.contains(&proto), "{f} missing");
  }
  assert!(head.contains("uint16_t crc16kermit_rem(uint16_t crc, unsigned val, unsigned bits);"));
  assert!(head.contains("uint16_t crc16kermit_comb(uint16_t crc1, uint16_t crc2, uintmax_t len2);"));
  assert!(head.contains("#include <stdint.h>"));
}

#[test]
fn reflected_little_elides_the_byte_table() {
  let (_, _, code) = generate(KERMIT, true, 64);
  assert!(!code.contains("table_byte"), "byte table should be table_word[0]");
  assert!(code.contains("static uint64_t const table_word[8][256]"));
  assert!(code.contains("table_word[0][(crc ^ *data++) & 0xff]"));
  // Reflected polynomial inlined.
  assert!(code.contains("(crc >> 1) ^ 0x8408"));
}

#[test]
fn non_reflected_little_needs_byte_table_and_swap() {
  let (_, _, code) = generate(CCITT, true, 64);
  assert!(code.contains("static uint16_t const table_byte[256]"));
  assert!(code.contains("static inline uint64_t swaplow(uint64_t x)"));
  assert!(code.contains("swaplow(word)"));
}

#[test]
fn non_reflected_big_shifts_to_the_top() {
  let (_, _, code) = generate(CCITT, false, 64);
  assert!(!code.contains("swaplow") && !code.contains("swapmax"));
  assert!(code.contains("(uint64_t)crc << 48"));
  assert!(code.contains("word >> 48"));
}

#[test]
fn reflected_big_uses_the_involutive_swap() {
  let (_, _, code) = generate(KERMIT, false, 64);
  assert!(code.contains("static inline uint64_t swapmax(uint64_t x)"));
}

#[test]
fn all_ones_xorout_becomes_not() {
  let (_, _, code) = generate(ISO_HDLC, true, 64);
  assert!(code.contains("crc = ~crc;"));
  assert!(!code.contains("crc ^= 0xffffffff;"));
}

#[test]
fn mixed_reflection_emits_a_reverser() {
  let (_, _, code) = generate(UMTS, true, 64);
  assert!(code.contains("static inline uint16_t revlow12(uint16_t x)"));
  assert!(code.contains("crc = revlow12(crc);"));
  // The combine path reverses both operands.
  assert!(code.contains("crc1 = revlow12(crc1);"));
}

#[test]
fn narrow_non_reflected_preshifts() {
  let (_, _, code) = generate(GSM, true, 64);
  // width 3: register runs pre-shifted by 5, poly shifted alongside.
  assert!(code.contains("crc <<= 5;"));
  assert!(code.contains("(crc << 1) ^ 0x60"));
  assert!(code.contains("static uint8_t const table_byte[256]"));
}

#[test]
fn byte_table_entries_match_the_kernel() {
  let m = processed(CCITT);
  let table = ByteTable::new(&m);
  let (_, _, code) = generate(CCITT, true, 64);
  let first = format!("0x{:04x}, 0x{:04x}", table.entries()[0], table.entries()[1]);
  assert!(code.contains(&first), "expected `{first}` in emitted table");
}

#[test]
fn combine_section_is_complete() {
  let (_, _, code) = generate(KERMIT, true, 64);
  assert!(code.contains("static uint16_t multmodp(uint16_t a, uint16_t b)"));
  assert!(code.contains("static uint16_t x8nmodp(uintmax_t n)"));
  assert!(code.contains("table_comb["));
  // Every catalogued polynomial cycles, so the jump is unconditional.
  assert!(code.contains("k = "));
  assert!(!code.contains("assert("));
}

#[test]
fn word_size_must_fit_the_width() {
  let m = processed("w=64 p=0x42f0e1eba9ea3693 i=-1 x=-1 r=t c=0x995dc9bbdf1939fa n=\"CRC-64/XZ\"");
  let mut head = Vec::new();
  let mut code = Vec::new();
  let err = crc_gen(&m, "crc64xz", true, 32, &mut head, &mut code).unwrap_err();
  assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[test]
fn thirty_two_bit_words_generate_four_lanes() {
  let (_, _, code) = generate(KERMIT, true, 32);
  assert!(code.contains("static uint32_t const table_word[4][256]"));
  assert!(code.contains("*(uint32_t const *)data"));
  assert!(code.contains("(uintptr_t)data & 3"));
}

#[test]
fn aggregates_cover_each_model() {
  let dir = std::env::temp_dir().join(format!("crc-emit-{}", std::process::id()));
  let _ = std::fs::remove_dir_all(&dir);
  let src = dir.join("src");

  let (defs, test) = create_source(&src, "test_src").unwrap();
  let (allh, allc) = create_source(&src, "allcrcs").unwrap();
  let mut files = TestFiles::new(defs, test, allh, allc).unwrap();
  for line in [KERMIT, CCITT] {
    let m = processed(line);
    files.add(&m, &crc_name(&m)).unwrap();
  }
  files.finish().unwrap();

  let test_c = std::fs::read_to_string(src.join("test_src.c")).unwrap();
  assert!(test_c.contains("crc16kermit_bit(init, \"123456789\", 9) != 0x2189"));
  assert!(test_c.contains("crc16ccitt_false_comb"));
  assert!(test_c.contains("crc16kermit_rem(init, 0xda, 3), 0x1b, 5"));
  assert!(test_c.contains("crc16ccitt_false_rem(init, 0xda, 3), 0xd0, 5"));

  let allh_text = std::fs::read_to_string(src.join("allcrcs.h")).unwrap();
  assert!(allh_text.contains("uintmax_t crc16kermit(uintmax_t, void const *, size_t);"));
  assert!(allh_text.contains("{\"CRC-16/KERMIT\", \"16kermit\", 16, crc16kermit},"));
  assert!(allh_text.contains("{\"\", \"\", 0, NULL}"));

  let allc_text = std::fs::read_to_string(src.join("allcrcs.c")).unwrap();
  assert!(allc_text.contains("return crc16kermit_word(crc, mem, len);"));

  std::fs::remove_dir_all(&dir).unwrap();
}
