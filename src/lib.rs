//! Typed record layouts for GPU vertex and index buffers.
//!
//! A [`Format`] describes one record as an ordered list of named, typed,
//! fixed-count fields and is parsed from a compact string:
//!
//! ```
//! use glbuffers::{Value, parse_format, pack_many, unpack_one};
//!
//! let format = parse_format("(3f)[vertex] (4B)[color]").unwrap();
//! assert_eq!(format.record_size(), 16);
//!
//! let records = [
//!     Value::from(([0.0, 1.0, 0.0], [255, 0, 0, 255])),
//!     Value::from(([1.0, 0.0, 0.0], [0, 255, 0, 255])),
//! ];
//! let bytes = pack_many(&format, &records).unwrap();
//! assert_eq!(bytes.len(), 32);
//!
//! let second = unpack_one(&format, &bytes, 1).unwrap();
//! assert_eq!(second, records[1]);
//! ```
//!
//! Packed blocks are native-endian with no padding between fields, ready to
//! hand to a buffer upload. [`buffer::Buffer`] pairs a format with a buffer
//! object behind any [`buffer::BufferBackend`].

pub mod buffer;
pub mod error;
pub mod format;
pub mod pack;
pub mod value;

pub use error::{BufferError, FormatError, PackError};
pub use format::{ElementType, Field, Format, FormatCache, IntoFormat, parse_format};
pub use pack::{Record, pack_many, pack_one, unpack_one};
pub use value::Value;
