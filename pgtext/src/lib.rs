//! Postgres Text-Format Value Codec
//!
//! Conversion between the text representation postgres uses for scalar and
//! array values and native in-memory values, in both directions, including
//! `NULL`, quoting and escaping, nested dimensionality, and the numeric
//! special values (`NaN`, `±Infinity`).
//!
//! The codec sits at the row/parameter boundary of a driver: the transport
//! layer hands in raw text plus a type oid and receives a typed [`Value`],
//! or hands in a [`Value`] and receives the text to transmit. Everything
//! else, the wire protocol, connection lifecycle, statement preparation,
//! belongs to the driver and is not found here.
//!
//! # Examples
//!
//! Decode a column value by oid:
//!
//! ```
//! use pgtext::{TextCodec, Value};
//!
//! # fn main() -> pgtext::Result<()> {
//! let codec = TextCodec::new();
//!
//! // 1009 is `text[]`
//! let value = codec.parse_value(r#"{NULL,"b and \"c\""}"#, 1009)?;
//!
//! assert_eq!(value, Value::Array(vec![
//!     Value::Null,
//!     Value::Text("b and \"c\"".into()),
//! ]));
//! # Ok(())
//! # }
//! ```
//!
//! Format a bind parameter:
//!
//! ```
//! use pgtext::{PgType, TextCodec, Value};
//!
//! # fn main() -> pgtext::Result<()> {
//! let codec = TextCodec::new();
//!
//! let text = codec.format_value(&Value::Int(420), Some(PgType::Int8))?;
//! assert_eq!(text.as_deref(), Some("420"));
//!
//! // NULL has no text form, it is transmitted out-of-band
//! assert_eq!(codec.format_value(&Value::Null, None)?, None);
//! # Ok(())
//! # }
//! ```

mod common;

// Values
mod numeric;
mod value;

// Codec
pub mod pg_type;
pub mod scalar;
pub mod array;
pub mod codec;

mod error;


pub use numeric::Numeric;
pub use value::Value;

pub use pg_type::{Oid, PgType, TypeMap};
pub use scalar::ByteaOutput;
pub use array::ArrayCodec;
#[doc(inline)]
pub use codec::{TextCodec, parse_value, format_value};

pub use error::{Error, Result};
