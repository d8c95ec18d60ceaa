//! Codec boundary consumed by the driver layer.
//!
//! Two call shapes cross it: [`parse_value`][TextCodec::parse_value] decodes
//! an inbound column from its text plus a type oid, and
//! [`format_value`][TextCodec::format_value] renders an outbound bind
//! parameter. Everything in between, transport, statements, sessions, stays
//! on the driver's side of the line.
use crate::{
    array::ArrayCodec,
    common::{span, verbose},
    error::{Error, Result},
    pg_type::{Oid, PgType, TypeMap},
    scalar::{self, ByteaOutput},
    value::Value,
};

/// Text-format codec with its caller configuration.
///
/// The codec itself is stateless and pure, the struct only carries the
/// choices that belong to the caller: which `bytea` encoding to produce,
/// whether unknown oids fall back to text, and extra oid mappings. Cheap to
/// clone, safe to share across threads.
///
/// # Examples
///
/// ```
/// use pgtext::{ByteaOutput, TextCodec, Value};
///
/// # fn main() -> pgtext::Result<()> {
/// let codec = TextCodec::new().bytea_output(ByteaOutput::Escape);
///
/// let text = codec.format_value(&Value::Bytes(b"\x00\x11".as_slice().into()), None)?;
/// assert_eq!(text.as_deref(), Some(r"\000\021"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextCodec {
    bytea_output: ByteaOutput,
    strict_types: bool,
    types: TypeMap,
}

impl TextCodec {
    /// Codec with the default configuration: hex `bytea` output, unknown
    /// oids decoded as text.
    pub fn new() -> TextCodec {
        TextCodec::default()
    }

    /// Set the `bytea` encoding produced on format, mirroring the server's
    /// `bytea_output` setting. Both encodings always parse.
    pub fn bytea_output(mut self, output: ByteaOutput) -> Self {
        self.bytea_output = output;
        self
    }

    /// Fail with [`Error::UnsupportedType`] on oids the type table does not
    /// know, instead of decoding them as text.
    pub fn strict_types(mut self, value: bool) -> Self {
        self.strict_types = value;
        self
    }

    /// The oid table, for driver layers that register additional mappings.
    pub fn type_map(&mut self) -> &mut TypeMap {
        &mut self.types
    }

    /// Register an oid mapping, builder style.
    pub fn with_type(mut self, oid: Oid, ty: PgType) -> Self {
        self.types.insert(oid, ty);
        self
    }

    /// Decode an inbound column value.
    ///
    /// `oid` is the column type reported by the server. A parse failure
    /// surfaces as a structured error for the driver to attribute to its
    /// column; nothing is ever silently substituted.
    pub fn parse_value(&self, text: &str, oid: Oid) -> Result<Value> {
        span!("parse_value");
        let ty = match self.types.resolve(oid) {
            Some(ty) => ty,
            None if self.strict_types => return Err(Error::UnsupportedType(oid)),
            None => {
                verbose!("unknown oid {oid}, decoding as text");
                PgType::Text
            }
        };
        self.parse_typed(text, ty)
    }

    /// Decode a value of an already resolved type.
    pub fn parse_typed(&self, text: &str, ty: PgType) -> Result<Value> {
        match ty.elem() {
            Some(elem) => ArrayCodec::new(elem)
                .bytea_output(self.bytea_output)
                .parse(text)
                .map(Value::Array),
            None => scalar::parse(ty, text),
        }
    }

    /// Format an outbound bind parameter.
    ///
    /// With no declared type the codec infers one from the value variant.
    /// `Ok(None)` means SQL `NULL`: it has no text form and travels
    /// out-of-band. A declared type the value cannot satisfy is a binding
    /// error, raised here, before anything reaches a wire.
    pub fn format_value(&self, value: &Value, ty: Option<PgType>) -> Result<Option<String>> {
        span!("format_value");
        let ty = match ty.or_else(|| value.infer_type()) {
            Some(ty) => ty,
            None => return Ok(None),
        };
        if value.is_null() {
            return Ok(None);
        }

        match (value, ty.elem()) {
            (Value::Array(values), Some(elem)) => ArrayCodec::new(elem)
                .bytea_output(self.bytea_output)
                .format(values)
                .map(Some),
            (Value::Array(_), None) => {
                Err(Error::TypeMismatch { value: "array", ty: ty.name() })
            }
            (scalar, Some(_)) => {
                Err(Error::TypeMismatch { value: scalar.type_name(), ty: ty.name() })
            }
            (scalar, None) => {
                scalar::format(scalar, ty, self.bytea_output).map(Some)
            }
        }
    }
}

/// Parse a postgres text value with the default codec configuration.
pub fn parse_value(text: &str, ty: PgType) -> Result<Value> {
    TextCodec::new().parse_typed(text, ty)
}

/// Format a value with the default codec configuration, inferring the type
/// from the value variant.
pub fn format_value(value: &Value) -> Result<Option<String>> {
    TextCodec::new().format_value(value, None)
}
