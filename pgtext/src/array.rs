//! Array literal grammar.
//!
//! Postgres arrays travel as brace-delimited text, `{e1,e2,...}`, nested
//! dimensions as `{{...},{...}}`, the unquoted case-sensitive token `NULL`
//! as the null sentinel, and `"`/`\` escaping inside quoted elements. The
//! grammar is independent of the element type; an [`ArrayCodec`] binds it to
//! one scalar cast rule and recurses through arbitrary nesting depth.
use crate::{
    common::span,
    error::{Error, Result},
    pg_type::PgType,
    scalar::{self, ByteaOutput},
    value::Value,
};

/// Typed array codec bound to one element type.
///
/// Stateless, every call is an independent pure transform.
///
/// # Examples
///
/// ```
/// use pgtext::{ArrayCodec, PgType};
///
/// # fn main() -> pgtext::Result<()> {
/// let codec = ArrayCodec::new(PgType::Text);
///
/// let values = codec.parse(r#"{{"a","b"},{"c","d"}}"#)?;
/// assert_eq!(codec.format(&values)?, r#"{{"a","b"},{"c","d"}}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArrayCodec {
    elem: PgType,
    bytea_output: ByteaOutput,
}

impl ArrayCodec {
    /// Create a codec for arrays of the given element type.
    ///
    /// An array type stands for its element, `ArrayCodec::new(PgType::Int8Array)`
    /// and `ArrayCodec::new(PgType::Int8)` are the same codec. Nesting is a
    /// property of the literal, not of the type.
    pub const fn new(elem: PgType) -> ArrayCodec {
        let elem = match elem.elem() {
            Some(scalar) => scalar,
            None => elem,
        };
        ArrayCodec { elem, bytea_output: ByteaOutput::Hex }
    }

    /// Set the `bytea` output encoding used for `bytea` leaves.
    pub const fn bytea_output(mut self, output: ByteaOutput) -> Self {
        self.bytea_output = output;
        self
    }

    /// The element type this codec is bound to.
    pub const fn elem(&self) -> PgType {
        self.elem
    }

    /// Parse one array literal into its element values.
    ///
    /// Nested sub-arrays come back as [`Value::Array`] elements. Sibling
    /// lengths are passed through as found, rectangularity is the server's
    /// promise, not checked here.
    pub fn parse(&self, text: &str) -> Result<Vec<Value>> {
        span!("parse_array");
        let mut read = Reader { input: text, pos: 0 };
        let values = self.parse_dim(&mut read)?;
        match read.peek() {
            None => Ok(values),
            Some(_) => Err(Error::UnbalancedBraces),
        }
    }

    fn parse_dim(&self, read: &mut Reader<'_>) -> Result<Vec<Value>> {
        if !read.eat('{') {
            return Err(Error::UnbalancedBraces);
        }
        if read.eat('}') {
            return Ok(Vec::new());
        }

        let mut values = Vec::new();
        loop {
            let value = match read.peek() {
                Some('{') => Value::Array(self.parse_dim(read)?),
                Some('"') => scalar::parse(self.elem, &read.quoted()?)?,
                Some(_) => match read.bare()? {
                    "NULL" => Value::Null,
                    "" => return Err(Error::UnbalancedBraces),
                    token => scalar::parse(self.elem, token)?,
                },
                None => return Err(Error::UnbalancedBraces),
            };
            values.push(value);

            match read.next() {
                Some(',') => continue,
                Some('}') => return Ok(values),
                _ => return Err(Error::UnbalancedBraces),
            }
        }
    }

    /// Format element values as one array literal.
    ///
    /// Every non-null scalar leaf is quoted, whether or not its content
    /// needs escaping, so a literal `NULL` text value never collides with
    /// the null sentinel. Nested arrays are never quoted.
    pub fn format(&self, values: &[Value]) -> Result<String> {
        span!("format_array");
        let mut out = String::new();
        self.format_into(&mut out, values)?;
        Ok(out)
    }

    /// Format element values into an existing buffer.
    pub fn format_into(&self, out: &mut String, values: &[Value]) -> Result<()> {
        out.push('{');
        let mut scratch = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match value {
                Value::Null => out.push_str("NULL"),
                Value::Array(inner) => self.format_into(out, inner)?,
                scalar => {
                    scratch.clear();
                    scalar::format_into(&mut scratch, scalar, self.elem, self.bytea_output)?;
                    out.reserve(scratch.len() + 2);
                    out.push('"');
                    for c in scratch.chars() {
                        if matches!(c, '"' | '\\') {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    out.push('"');
                }
            }
        }
        out.push('}');
        Ok(())
    }
}

/// Single left-to-right scan over the literal, one char of lookahead.
struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume a quoted element, unescaping `\x` to the literal `x`.
    fn quoted(&mut self) -> Result<String> {
        self.eat('"');
        let mut text = String::new();
        loop {
            match self.next() {
                Some('"') => return Ok(text),
                Some('\\') => match self.next() {
                    Some(c) => text.push(c),
                    None => return Err(Error::UnterminatedQuote),
                },
                Some(c) => text.push(c),
                None => return Err(Error::UnterminatedQuote),
            }
        }
    }

    /// Consume a bare element up to the next `,` or `}`.
    ///
    /// A quote or brace inside a bare span is outside the grammar.
    fn bare(&mut self) -> Result<&'a str> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(',' | '}') | None => return Ok(&self.input[start..self.pos]),
                Some('{' | '"') => return Err(Error::UnbalancedBraces),
                Some(c) => self.pos += c.len_utf8(),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use super::*;

    fn text_array(text: &str) -> Result<Vec<Value>> {
        ArrayCodec::new(PgType::Text).parse(text)
    }

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|s| Value::Text((*s).into())).collect()
    }

    #[test]
    fn empty_array() {
        assert_eq!(text_array("{}").unwrap(), vec![]);
        assert_eq!(ArrayCodec::new(PgType::Text).format(&[]).unwrap(), "{}");
    }

    #[test]
    fn unquoted_strings() {
        assert_eq!(text_array("{a,b,c}").unwrap(), texts(&["a", "b", "c"]));
    }

    #[test]
    fn quoted_strings() {
        assert_eq!(
            text_array(r#"{"a b","c d","e f"}"#).unwrap(),
            texts(&["a b", "c d", "e f"]),
        );
    }

    #[test]
    fn escaped_quotes_and_backslashes() {
        assert_eq!(
            text_array(r#"{"a \"b\"","\"c\" d"}"#).unwrap(),
            texts(&[r#"a "b""#, r#""c" d"#]),
        );
        assert_eq!(
            text_array(r#"{"a \\b","\\c d"}"#).unwrap(),
            texts(&[r"a \b", r"\c d"]),
        );
    }

    #[test]
    fn null_sentinel() {
        assert_eq!(
            text_array(r#"{NULL,NULL,"c"}"#).unwrap(),
            vec![Value::Null, Value::Null, Value::Text("c".into())],
        );
        // the sentinel is case-sensitive, anything else is an element
        assert_eq!(text_array("{null}").unwrap(), texts(&["null"]));
        // and a quoted NULL is the four-character string
        assert_eq!(text_array(r#"{"NULL"}"#).unwrap(), texts(&["NULL"]));
    }

    #[test]
    fn multidimensional() {
        assert_eq!(
            text_array("{{a,b},{c,d}}").unwrap(),
            vec![
                Value::Array(texts(&["a", "b"])),
                Value::Array(texts(&["c", "d"])),
            ],
        );
        assert_eq!(
            text_array(r#"{{"a,b","c,d"},{"e,f","g,h"}}"#).unwrap(),
            vec![
                Value::Array(texts(&["a,b", "c,d"])),
                Value::Array(texts(&["e,f", "g,h"])),
            ],
        );
        assert_eq!(
            text_array(r#"{{"a \"b\"","c \"d\""},{"e","f"}}"#).unwrap(),
            vec![
                Value::Array(texts(&[r#"a "b""#, r#"c "d""#])),
                Value::Array(texts(&["e", "f"])),
            ],
        );
    }

    #[test]
    fn format_always_quotes_scalars() {
        let codec = ArrayCodec::new(PgType::Text);
        assert_eq!(codec.format(&texts(&["a", "b", "c"])).unwrap(), r#"{"a","b","c"}"#);
        assert_eq!(
            codec.format(&[Value::Null, Value::Text("x".into())]).unwrap(),
            r#"{NULL,"x"}"#,
        );
        // a text element spelling NULL survives the round trip quoted
        let nullish = codec.format(&texts(&["NULL"])).unwrap();
        assert_eq!(nullish, r#"{"NULL"}"#);
        assert_eq!(codec.parse(&nullish).unwrap(), texts(&["NULL"]));
    }

    #[test]
    fn format_escapes() {
        let codec = ArrayCodec::new(PgType::Text);
        assert_eq!(
            codec.format(&texts(&["a", "b and \"c\""])).unwrap(),
            r#"{"a","b and \"c\""}"#,
        );
        assert_eq!(
            codec.format(&texts(&["a", r"b and \c"])).unwrap(),
            r#"{"a","b and \\c"}"#,
        );
    }

    #[test]
    fn format_multidimensional() {
        let codec = ArrayCodec::new(PgType::Text);
        let values = vec![
            Value::Array(texts(&["a", "b"])),
            Value::Array(texts(&["c", "d"])),
        ];
        assert_eq!(codec.format(&values).unwrap(), r#"{{"a","b"},{"c","d"}}"#);
    }

    #[test]
    fn escaping_round_trip_is_exact() {
        let codec = ArrayCodec::new(PgType::Text);
        let original = texts(&[r#"b and "c" with \ inside"#, r"\\", r#"""#]);
        let formatted = codec.format(&original).unwrap();
        assert_eq!(codec.parse(&formatted).unwrap(), original);
    }

    #[test]
    fn nested_round_trip_with_nulls_and_empties() {
        let codec = ArrayCodec::new(PgType::Int8);
        let original = vec![
            Value::Array(vec![Value::Int(1), Value::Null]),
            Value::Array(vec![]),
            Value::Array(vec![Value::Int(3), Value::Int(4)]),
        ];
        let formatted = codec.format(&original).unwrap();
        assert_eq!(formatted, r#"{{"1",NULL},{},{"3","4"}}"#);
        assert_eq!(codec.parse(&formatted).unwrap(), original);
    }

    #[test]
    fn integer_elements() {
        let codec = ArrayCodec::new(PgType::Int4Array);
        assert_eq!(codec.elem(), PgType::Int4);
        assert_eq!(
            codec.parse("{1,2,3}").unwrap(),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        );
        assert!(matches!(
            codec.parse("{1,x}"),
            Err(Error::MalformedLiteral { ty: "int8", .. }),
        ));
    }

    #[test]
    fn numeric_elements_with_nan() {
        let codec = ArrayCodec::new(PgType::Numeric);
        let values = codec.parse("{NaN,7.2}").unwrap();
        assert_eq!(values.len(), 2);
        assert!(values[0].is_nan());
        assert_ne!(values[0], values[0].clone());
        assert_eq!(values[1], Value::Numeric("7.2".parse().unwrap()));
    }

    #[test]
    fn float_elements() {
        let codec = ArrayCodec::new(PgType::Float8);
        let values = codec.parse("{NaN,Infinity,-1.5}").unwrap();
        assert!(values[0].is_nan());
        assert_eq!(values[1], Value::Float(f64::INFINITY));
        assert_eq!(values[2], Value::Float(-1.5));
        assert_eq!(codec.format(&values).unwrap(), r#"{"NaN","Infinity","-1.5"}"#);
    }

    #[test]
    fn bytea_elements() {
        let codec = ArrayCodec::new(PgType::Bytea);
        let values = codec.parse(r#"{"\\x0011","\\x2233"}"#).unwrap();
        assert_eq!(values[0], Value::Bytes(b"\x00\x11".as_slice().into()));
        assert_eq!(values[1], Value::Bytes(b"\x22\x33".as_slice().into()));

        assert_eq!(
            codec.format(&values).unwrap(),
            r#"{"\\x0011","\\x2233"}"#,
        );
        assert_eq!(
            codec
                .bytea_output(ByteaOutput::Escape)
                .format(&[Value::Bytes(b"\x00\x11".as_slice().into()), Value::Null])
                .unwrap(),
            r#"{"\\000\\021",NULL}"#,
        );
    }

    #[test]
    fn date_elements() {
        let codec = ArrayCodec::new(PgType::Date);
        assert_eq!(
            codec.parse(r#"{"2012-09-22","1983-05-03"}"#).unwrap(),
            vec![Value::Date(date!(2012-09-22)), Value::Date(date!(1983-05-03))],
        );
        assert_eq!(
            codec.format(&[Value::Null, Value::Date(date!(1983-05-03))]).unwrap(),
            r#"{NULL,"1983-05-03"}"#,
        );
    }

    #[test]
    fn timestamptz_elements() {
        let codec = ArrayCodec::new(PgType::Timestamptz);
        let values = codec
            .parse(r#"{"2012-09-22 05:34:01 -07:00","1983-05-03 13:59:09 +10:00"}"#)
            .unwrap();
        assert_eq!(
            values,
            vec![
                Value::TimestampTz(time::macros::datetime!(2012-09-22 05:34:01 -07:00)),
                Value::TimestampTz(time::macros::datetime!(1983-05-03 13:59:09 +10:00)),
            ],
        );
    }

    #[test]
    fn unterminated_quote() {
        assert!(matches!(text_array(r#"{"unterminated"#), Err(Error::UnterminatedQuote)));
        assert!(matches!(text_array(r#"{"a\"#), Err(Error::UnterminatedQuote)));
    }

    #[test]
    fn unbalanced_braces() {
        for text in ["", "{", "{a,b", "{{a},{b}", "a,b}", "{a}}", "{a},", "{a,}", "{,a}", r#"{"a"b}"#] {
            assert!(
                matches!(text_array(text), Err(Error::UnbalancedBraces)),
                "{text:?} should not parse",
            );
        }
    }

    #[test]
    fn format_rejects_mismatched_leaves() {
        let codec = ArrayCodec::new(PgType::Int8);
        assert!(matches!(
            codec.format(&[Value::Bool(true)]),
            Err(Error::TypeMismatch { .. }),
        ));
    }
}
