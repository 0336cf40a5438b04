//! Width-parametric CRC computation kernels.
//!
//! Everything here is driven by a processed [`model::Model`]: any CRC from
//! the Williams/RevEng parameter family, 1 to 128 bits wide, reflected or
//! not, with any init/xorout. Three equivalent evaluation strategies are
//! provided, plus the polynomial-combine subsystem:
//!
//! | Path | Function | Speed | Width |
//! |------|----------|-------|-------|
//! | bit-serial | [`crc_bitwise`] / [`crc_bitwise_dbl`] | reference | <= 64 / <= 128 |
//! | byte table | [`crc_bytewise`] | fast | <= 64 |
//! | word table | [`crc_wordwise`] | fastest | <= word size |
//! | zeros | [`crc_zeros`] | O(log n) | <= 64 |
//! | combine | [`crc_combine`] | O(log n) | <= 64 |
//!
//! The bit-serial path is the canonical source of truth; the table paths
//! must agree with it bit-exactly on every `(model, buffer)` pair, and the
//! test suites hold them to that.
//!
//! # Chunked evaluation
//!
//! Every evaluator takes the running CRC and `Option<&[u8]>`; `None`
//! returns the model's empty-message CRC, which doubles as the starting
//! value:
//!
//! ```
//! use kernel::crc_bitwise;
//! use model::read_model;
//!
//! let mut m = read_model("w=16 p=4129 r=t c=8585 n=KERMIT", false).unwrap();
//! m.process();
//! let crc = crc_bitwise(&m, 0, None);
//! let crc = crc_bitwise(&m, crc, Some(b"1234"));
//! let crc = crc_bitwise(&m, crc, Some(b"56789"));
//! assert_eq!(u128::from(crc), m.check);
//! ```
//!
//! # Tables
//!
//! The table paths need their tables built first: [`ByteTable`] for the
//! byte-wise path, [`WordTables`] (which embeds a byte table) for the
//! word-wise path, and [`CombTable`] for zeros/combine. Tables are plain
//! values derived from a frozen model; once built they are read-only and
//! freely shareable across threads. Word tables take the target
//! endianness and word size as build-time parameters.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod bitwise;
mod bytewise;
mod combine;
mod tables;
mod wordwise;

pub use bitwise::{crc_bitwise, crc_bitwise_dbl, crc_zeros_bitwise, crc_zeros_bitwise_dbl};
pub use bytewise::crc_bytewise;
pub use combine::{COMB, CombTable, crc_combine, crc_zeros, multmodp};
pub use tables::{ByteTable, WordSize, WordTables};
pub use wordwise::crc_wordwise;
