//! CRC parameter models.
//!
//! This crate defines the [`Model`] entity for the Williams/RevEng CRC
//! parameter family and everything needed to get one in and out of text
//! form:
//!
//! - [`read_model`] parses a RevEng-catalogue parameter line
//!   (`width=16 poly=0x1021 ... name="KERMIT"`),
//! - [`Model::process`] canonicalizes the parameters for the computation
//!   kernels (reflected polynomial storage, `init` repurposed as the CRC of
//!   the empty message),
//! - [`crc_name`] derives the symbol prefix used for generated code,
//! - [`minify`] re-encodes a model as its minimum-length parameter line.
//!
//! # Widths
//!
//! The host computation word is `u64` ([`WORD_BITS`]); models up to twice
//! that width (128 bits) are representable, with all parameter values held
//! in `u128`.
//!
//! # Example
//!
//! ```
//! use model::read_model;
//!
//! let mut m = read_model(
//!   "width=16 poly=0x1021 refin=true refout=true check=0x2189 name=KERMIT",
//!   false,
//! )
//! .unwrap();
//! m.process();
//! assert!(m.reflect);
//! assert_eq!(m.poly, 0x8408); // stored reflected
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod minify;
mod name;
mod params;
mod read;
mod reverse;

pub use minify::minify;
pub use name::crc_name;
pub use params::{Model, WORD_BITS, WORD_BYTES, ones, ones_dbl};
pub use read::{ModelError, ParamSet, read_model};
pub use reverse::{reflect_bits, reflect_bits_dbl};
