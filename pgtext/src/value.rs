use bytes::Bytes;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::{
    error::Error,
    numeric::Numeric,
    pg_type::PgType,
};

/// A single postgres value in native form.
///
/// Exactly one variant is active. `Null` carries no payload. Arrays hold one
/// dimension, nested arrays are `Array` elements of an `Array`.
///
/// Equality follows the numeric special values: `Float(NaN)` and
/// `Numeric(NaN)` compare equal to nothing, themselves included. Use
/// [`is_nan`][Value::is_nan] instead of `==` for those.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Numeric(Numeric),
    Text(String),
    Bytes(Bytes),
    Date(Date),
    Timestamp(PrimitiveDateTime),
    TimestampTz(OffsetDateTime),
    Array(Vec<Value>),
}

impl Value {
    /// Return `true` if self is `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Return `true` if self is a float or numeric `NaN`.
    pub const fn is_nan(&self) -> bool {
        match self {
            Value::Float(f) => f.is_nan(),
            Value::Numeric(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Name of the active variant, for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Numeric(_) => "numeric",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Array(_) => "array",
        }
    }

    /// Best-effort postgres type for this value, used when a bind parameter
    /// carries no declared type.
    ///
    /// Returns [`None`] for `Null`. An array infers from its first non-null
    /// leaf, and falls back to `text[]` when there is none.
    pub fn infer_type(&self) -> Option<PgType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(PgType::Bool),
            Value::Int(_) => Some(PgType::Int8),
            Value::Float(_) => Some(PgType::Float8),
            Value::Numeric(_) => Some(PgType::Numeric),
            Value::Text(_) => Some(PgType::Text),
            Value::Bytes(_) => Some(PgType::Bytea),
            Value::Date(_) => Some(PgType::Date),
            Value::Timestamp(_) => Some(PgType::Timestamp),
            Value::TimestampTz(_) => Some(PgType::Timestamptz),
            Value::Array(elems) => {
                let elem = leaf_type(elems).unwrap_or(PgType::Text);
                Some(elem.to_array())
            }
        }
    }

    /// Try narrow self into an `i32`.
    ///
    /// The codec always parses integers at full width; narrowing is the
    /// caller's decision and this is where it fails.
    pub fn try_into_i32(self) -> Result<i32, Error> {
        match self {
            Value::Int(i) => i32::try_from(i).map_err(|_| Error::PrecisionLoss {
                text: itoa::Buffer::new().format(i).into(),
                ty: "int4",
            }),
            other => Err(Error::TypeMismatch { value: other.type_name(), ty: "int4" }),
        }
    }
}

/// Scalar type of the first non-null leaf.
fn leaf_type(elems: &[Value]) -> Option<PgType> {
    for elem in elems {
        match elem {
            Value::Null => continue,
            Value::Array(inner) => match leaf_type(inner) {
                Some(ty) => return Some(ty),
                None => continue,
            },
            scalar => return scalar.infer_type(),
        }
    }
    None
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Value {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

from!(<bool>v => Value::Bool(v));
from!(<i16>v => Value::Int(v.into()));
from!(<i32>v => Value::Int(v.into()));
from!(<i64>v => Value::Int(v));
from!(<f32>v => Value::Float(v.into()));
from!(<f64>v => Value::Float(v));
from!(<Numeric>v => Value::Numeric(v));
from!(<&str>v => Value::Text(v.into()));
from!(<String>v => Value::Text(v));
from!(<Bytes>v => Value::Bytes(v));
from!(<Vec<u8>>v => Value::Bytes(v.into()));
from!(<Date>v => Value::Date(v));
from!(<PrimitiveDateTime>v => Value::Timestamp(v));
from!(<OffsetDateTime>v => Value::TimestampTz(v));
from!(<Vec<Value>>v => Value::Array(v));

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
