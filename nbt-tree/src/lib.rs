#![forbid(unsafe_code)]

//! # `nbt-tree`
//!
//! Decoder for the Named Binary Tag format: a self-describing, big-endian
//! tree of eleven value kinds. The whole tree is materialized in memory and
//! is immutable once parsed.
//!
//! ```text
//! tag      := kind:u8 [name value]      (End carries neither)
//! name     := len:u16 utf8[len]
//! compound := tag* End
//! list     := element_kind:u8 count:i32 value[count]
//! ```

mod dump;
mod error;
mod kind;
mod reader;
mod value;

#[cfg(any(test, feature = "writer"))]
pub mod writer;

pub use dump::Dump;
pub use error::{Error, Result};
pub use kind::Kind;
pub use reader::{parse, Reader, MAX_DEPTH};
pub use value::{Compound, List, Tag, Value};
