use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use pgtext::{ArrayCodec, ByteaOutput, PgType, Result, TextCodec, Value};

fn main() -> Result<()> {
    tracing_subscriber::Registry::default()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    columns()?;
    params()?;
    arrays()?;

    Ok(())
}

/// Decoding inbound column values by oid, as a driver would after a
/// `RowDescription`.
fn columns() -> Result<()> {
    let codec = TextCodec::new();

    let id = codec.parse_value("420", 23)?;
    let name = codec.parse_value("Foo", 25)?;
    let balance = codec.parse_value("NaN", 1700)?;
    let since = codec.parse_value("432-09-22 BC", 1082)?;

    println!("id      = {id:?}");
    println!("name    = {name:?}");
    println!("balance = {balance:?} (nan: {})", balance.is_nan());
    println!("since   = {since:?}");

    assert_eq!(id, Value::Int(420));
    assert_eq!(since, Value::Date(time::macros::date!(-0431-09-22)));
    Ok(())
}

/// Formatting outbound bind parameters, with and without a declared type.
fn params() -> Result<()> {
    let codec = TextCodec::new().bytea_output(ByteaOutput::Escape);

    let texts = [
        codec.format_value(&Value::Float(f64::NEG_INFINITY), Some(PgType::Float8))?,
        codec.format_value(&Value::Bytes(b"\x00\x11".as_slice().into()), None)?,
        codec.format_value(&Value::Null, None)?,
    ];
    println!("params  = {texts:?}");

    assert_eq!(texts[0].as_deref(), Some("-Infinity"));
    assert_eq!(texts[2], None);
    Ok(())
}

/// The array literal grammar, nested and escaped.
fn arrays() -> Result<()> {
    let codec = ArrayCodec::new(PgType::Text);

    let values = codec.parse(r#"{{"a,b",NULL},{"say \"hi\"","c"}}"#)?;
    let back = codec.format(&values)?;
    println!("array   = {values:?}");
    println!("literal = {back}");

    assert_eq!(codec.parse(&back)?, values);
    Ok(())
}
