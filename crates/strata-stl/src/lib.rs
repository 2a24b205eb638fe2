#![warn(missing_docs)]

//! STL mesh reading for the strata slicer.
//!
//! Parses both flavors of the format into a flat facet table: the binary
//! layout (80-byte header, little-endian count, 50-byte records) and the
//! ASCII grammar (`solid` / `facet normal` / `outer loop` / `vertex`
//! triplets). A stream is treated as ASCII iff it opens with exactly
//! `solid `.

pub mod error;
pub mod parser;
pub mod scanner;
pub mod serializer;

pub use error::{Result, StlError};
pub use parser::{parse, parse_bytes, Model};
pub use serializer::write_ascii;
