//! Per-type scalar cast rules.
//!
//! One parse/format pair per logical type. All of them are total over their
//! input: malformed text yields [`Error::MalformedLiteral`], never a panic
//! and never a silently substituted default.
//!
//! The array codec delegates to these for each leaf element; the
//! [`codec`][crate::codec] boundary applies them to single column values and
//! bind parameters.
mod bytea;
mod time;

pub use bytea::{ByteaOutput, format_bytea, parse_bytea};
pub use self::time::{
    format_date, format_timestamp, format_timestamptz,
    parse_date, parse_timestamp, parse_timestamptz,
};

use crate::{
    error::{Error, Result},
    numeric::Numeric,
    pg_type::PgType,
    value::Value,
};

/// Parse a postgres integer literal at full width.
pub fn parse_int(text: &str) -> Result<i64> {
    text.parse().map_err(|_| Error::malformed(text, "int8"))
}

/// Format an integer as postgres text.
pub fn format_int(value: i64) -> String {
    itoa::Buffer::new().format(value).into()
}

/// Parse a postgres float literal.
///
/// The special values spell `NaN`, `Infinity` and `-Infinity`.
pub fn parse_float(text: &str) -> Result<f64> {
    match text {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => text.parse().map_err(|_| Error::malformed(text, "float8")),
    }
}

/// Format a float as postgres text.
///
/// Reparsing the output reproduces the same value, the special values
/// included.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value == f64::INFINITY {
        "Infinity".into()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".into()
    } else {
        value.to_string()
    }
}

/// Parse a postgres boolean literal.
///
/// The parser is lenient the way the server output contract allows: a
/// leading `t` is true, anything else is false.
pub fn parse_bool(text: &str) -> bool {
    text.starts_with('t')
}

/// Format a boolean as postgres text.
pub const fn format_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Parse a postgres `numeric` literal, `NaN` included.
pub fn parse_numeric(text: &str) -> Result<Numeric> {
    text.parse()
}

/// Parse a scalar leaf as the given type.
pub fn parse(ty: PgType, text: &str) -> Result<Value> {
    match ty {
        PgType::Bool => Ok(Value::Bool(parse_bool(text))),
        PgType::Int2 | PgType::Int4 | PgType::Int8 => parse_int(text).map(Value::Int),
        PgType::Float4 | PgType::Float8 => parse_float(text).map(Value::Float),
        PgType::Numeric => parse_numeric(text).map(Value::Numeric),
        PgType::Text | PgType::Varchar | PgType::Bpchar | PgType::Char => {
            Ok(Value::Text(text.into()))
        }
        PgType::Bytea => parse_bytea(text).map(Value::Bytes),
        PgType::Date => parse_date(text).map(Value::Date),
        PgType::Timestamp => parse_timestamp(text).map(Value::Timestamp),
        PgType::Timestamptz => parse_timestamptz(text).map(Value::TimestampTz),
        array => Err(Error::UnsupportedType(array.oid())),
    }
}

/// Format a scalar value declared as the given type.
pub fn format(value: &Value, ty: PgType, bytea_output: ByteaOutput) -> Result<String> {
    let mut out = String::new();
    format_into(&mut out, value, ty, bytea_output)?;
    Ok(out)
}

pub(crate) fn format_into(
    out: &mut String,
    value: &Value,
    ty: PgType,
    bytea_output: ByteaOutput,
) -> Result<()> {
    use PgType::*;
    match (value, ty) {
        (Value::Bool(b), Bool) => out.push_str(format_bool(*b)),
        // integers are valid text for the wider numeric families
        (Value::Int(i), Int2 | Int4 | Int8 | Float4 | Float8 | Numeric) => {
            out.push_str(itoa::Buffer::new().format(*i));
        }
        (Value::Float(f), Float4 | Float8) => out.push_str(&format_float(*f)),
        (Value::Numeric(n), Numeric) => out.push_str(&n.to_string()),
        (Value::Text(s), Text | Varchar | Bpchar | Char) => out.push_str(s),
        (Value::Bytes(b), Bytea) => bytea::format_bytea_into(out, b, bytea_output),
        (Value::Date(d), Date) => time::format_date_into(out, *d),
        (Value::Timestamp(ts), Timestamp) => time::format_timestamp_into(out, *ts),
        (Value::TimestampTz(ts), Timestamptz) => time::format_timestamptz_into(out, *ts),
        (value, ty) => {
            return Err(Error::TypeMismatch { value: value.type_name(), ty: ty.name() })
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn int_round_trip() {
        assert_eq!(parse_int("42").unwrap(), 42);
        assert_eq!(parse_int("-42").unwrap(), -42);
        assert_eq!(format_int(i64::MIN), "-9223372036854775808");
        assert_eq!(parse_int(&format_int(i64::MAX)).unwrap(), i64::MAX);
        assert!(matches!(
            parse_int("7up"),
            Err(Error::MalformedLiteral { ty: "int8", .. }),
        ));
    }

    #[test]
    fn float_special_values() {
        assert!(parse_float("NaN").unwrap().is_nan());
        assert_eq!(parse_float("Infinity").unwrap(), f64::INFINITY);
        assert_eq!(parse_float("-Infinity").unwrap(), f64::NEG_INFINITY);

        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "Infinity");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Infinity");

        // the formatted special values reparse to themselves
        assert!(parse_float(&format_float(f64::NAN)).unwrap().is_nan());
        assert_eq!(
            parse_float(&format_float(f64::NEG_INFINITY)).unwrap(),
            f64::NEG_INFINITY,
        );
    }

    #[test]
    fn float_round_trip() {
        for v in [0.0, 1.2, -7.25, 1e300, f64::MIN_POSITIVE] {
            assert_eq!(parse_float(&format_float(v)).unwrap(), v);
        }
        assert!(parse_float("1.2e3.4").is_err());
    }

    #[test]
    fn bool_lenient_parse_strict_format() {
        assert!(parse_bool("t"));
        assert!(parse_bool("true"));
        assert!(!parse_bool("f"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
        assert!(!parse_bool("yes"));

        assert_eq!(format_bool(true), "true");
        assert_eq!(format_bool(false), "false");
    }

    #[test]
    fn leaf_dispatch() {
        assert_eq!(parse(PgType::Int4, "7").unwrap(), Value::Int(7));
        assert_eq!(parse(PgType::Varchar, "7").unwrap(), Value::Text("7".into()));
        assert!(parse(PgType::Numeric, "NaN").unwrap().is_nan());
        assert!(matches!(
            parse(PgType::TextArray, "x"),
            Err(Error::UnsupportedType(1009)),
        ));
    }

    #[test]
    fn format_type_check() {
        let out = format(&Value::Int(42), PgType::Numeric, ByteaOutput::Hex).unwrap();
        assert_eq!(out, "42");

        assert!(matches!(
            format(&Value::Bool(true), PgType::Int4, ByteaOutput::Hex),
            Err(Error::TypeMismatch { value: "bool", ty: "int4" }),
        ));
    }
}
