//! Immutable JSON values with exact numbers.
//!
//! This crate keeps three guarantees that general-purpose JSON crates
//! relax:
//!
//! - **UTF-8 correctness.** Strings are validated on the way in, and the
//!   encoder either escapes, passes through, replaces, or rejects
//!   problematic data under explicit [`EncodeOptions`].
//! - **Structural immutability.** A [`Value`] never changes after
//!   construction; string, array and object bodies are shared through
//!   `Arc`, so cloning is cheap and values are safe to hand across
//!   threads. Edits go through [`modify`], which rebuilds only the path
//!   being changed.
//! - **Lossless numbers.** Integer literals keep their exact value,
//!   float literals remember their significant-digit count, and
//!   [`ExactNumber`] carries arbitrary decimals through parse and
//!   encode without rounding.
//!
//! ```
//! use exactjson::{encode, modify, parse};
//!
//! let mut value = parse(r#"
//!     { // comments are allowed
//!       "temperature": 23.5,
//!       "samples": [1, 2]
//!     }"#)?;
//! modify(&mut value).key("samples").push(3.into())?;
//! assert_eq!(encode(&value), r#"{"samples":[1,2,3],"temperature":23.5}"#);
//! # Ok::<(), exactjson::Error>(())
//! ```
//!
//! Values form a total order (null, booleans, numbers, strings, arrays,
//! objects) in which numbers compare by numeric value across
//! representations, so values work as keys in sorted collections.

mod encode;
mod error;
mod impls;
mod modify;
mod number;
mod parser;
mod utf8;
mod value;

pub use encode::{encode, encode_with, write_json_string, EncodeOptions, Tightness};
pub use error::{Error, ErrorKind};
pub use modify::{modify, Modify, PathSegment};
pub use number::ExactNumber;
pub use parser::{parse, parse_with, ParseOptions};
pub use value::{ObjectEntry, TypeTag, Value};
