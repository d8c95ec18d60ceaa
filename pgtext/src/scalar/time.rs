//! Calendar type cast rules.
//!
//! Dates carry the proleptic-Gregorian era suffix (` BC`/` AD`) the server
//! emits for years before 1 AD. BC years map to astronomical numbering on
//! parse, `432-09-22 BC` is year `-431`, and the flip is reversed on format.
//!
//! Naive timestamps carry no offset; whatever session offset applies to them
//! is the driver's business. `timestamptz` keeps the offset exactly as
//! given, offset normalization is also the driver's business.
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::error::{Error, Result};

/// Parse a postgres `date` literal.
pub fn parse_date(text: &str) -> Result<Date> {
    let (body, bc) = strip_era(text);
    parse_ymd(body, bc, text, "date")
}

/// Format a `date` as postgres text.
pub fn format_date(date: Date) -> String {
    let mut out = String::new();
    format_date_into(&mut out, date);
    out
}

/// Parse a postgres `timestamp` literal (no offset).
pub fn parse_timestamp(text: &str) -> Result<PrimitiveDateTime> {
    let (body, bc) = strip_era(text);
    let Some((date, time)) = body.split_once(' ') else {
        return Err(Error::malformed(text, "timestamp"));
    };
    Ok(PrimitiveDateTime::new(
        parse_ymd(date, bc, text, "timestamp")?,
        parse_hms(time, text, "timestamp")?,
    ))
}

/// Format a `timestamp` as postgres text.
///
/// Fractional seconds are emitted only when non-zero, without trailing
/// zeros, the same trimming the server applies.
pub fn format_timestamp(ts: PrimitiveDateTime) -> String {
    let mut out = String::new();
    format_timestamp_into(&mut out, ts);
    out
}

/// Parse a postgres `timestamptz` literal.
///
/// The offset suffix is `±HH[:MM[:SS]]` or the literal `Z`, optionally
/// separated from the seconds by a space.
pub fn parse_timestamptz(text: &str) -> Result<OffsetDateTime> {
    let (body, bc) = strip_era(text);
    let (naive, offset) = split_offset(body, text)?;
    let Some((date, time)) = naive.split_once(' ') else {
        return Err(Error::malformed(text, "timestamptz"));
    };
    let date = parse_ymd(date, bc, text, "timestamptz")?;
    let time = parse_hms(time, text, "timestamptz")?;
    Ok(PrimitiveDateTime::new(date, time).assume_offset(offset))
}

/// Format a `timestamptz` as postgres text with an explicit offset suffix.
pub fn format_timestamptz(ts: OffsetDateTime) -> String {
    let mut out = String::new();
    format_timestamptz_into(&mut out, ts);
    out
}

fn strip_era(s: &str) -> (&str, bool) {
    if let Some(rest) = s.strip_suffix(" BC") {
        (rest, true)
    } else if let Some(rest) = s.strip_suffix(" AD") {
        (rest, false)
    } else {
        (s, false)
    }
}

fn parse_ymd(s: &str, bc: bool, orig: &str, ty: &'static str) -> Result<Date> {
    let mut parts = s.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::malformed(orig, ty));
    };
    let (Ok(y), Ok(m), Ok(d)) = (y.parse::<i32>(), m.parse::<u8>(), d.parse::<u8>()) else {
        return Err(Error::malformed(orig, ty));
    };

    let year = if bc { 1 - y } else { y };
    let Ok(month) = Month::try_from(m) else {
        return Err(Error::malformed(orig, ty));
    };
    Date::from_calendar_date(year, month, d).map_err(|_| Error::malformed(orig, ty))
}

fn parse_hms(s: &str, orig: &str, ty: &'static str) -> Result<Time> {
    let mut parts = s.splitn(3, ':');
    let (Some(h), Some(m), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::malformed(orig, ty));
    };
    let (sec, nano) = match rest.split_once('.') {
        Some((sec, frac)) => (sec, parse_frac(frac, orig, ty)?),
        None => (rest, 0),
    };
    let (Ok(h), Ok(m), Ok(sec)) = (h.parse::<u8>(), m.parse::<u8>(), sec.parse::<u8>()) else {
        return Err(Error::malformed(orig, ty));
    };
    Time::from_hms_nano(h, m, sec, nano).map_err(|_| Error::malformed(orig, ty))
}

/// Fractional digits to nanoseconds, preserved at the precision supplied.
fn parse_frac(frac: &str, orig: &str, ty: &'static str) -> Result<u32> {
    if frac.is_empty() || frac.len() > 9 {
        return Err(Error::malformed(orig, ty));
    }
    let Ok(value) = frac.parse::<u32>() else {
        return Err(Error::malformed(orig, ty));
    };
    Ok(value * 10u32.pow(9 - frac.len() as u32))
}

fn split_offset<'a>(body: &'a str, orig: &str) -> Result<(&'a str, UtcOffset)> {
    if let Some(rest) = body.strip_suffix('Z') {
        return Ok((rest.trim_end(), UtcOffset::UTC));
    }
    // the offset sign can only come after the date, skip past its dashes
    let Some(sp) = body.find(' ') else {
        return Err(Error::malformed(orig, "timestamptz"));
    };
    let Some(at) = body[sp..].find(['+', '-']) else {
        return Err(Error::malformed(orig, "timestamptz"));
    };
    let offset = parse_offset(&body[sp + at..], orig)?;
    Ok((body[..sp + at].trim_end(), offset))
}

fn parse_offset(s: &str, orig: &str) -> Result<UtcOffset> {
    let neg = s.starts_with('-');
    let mut parts = s[1..].splitn(3, ':');
    let mut next = |or: &'static str| parts.next().unwrap_or(or).parse::<i8>();
    let (Ok(h), Ok(m), Ok(sec)) = (next("0"), next("0"), next("0")) else {
        return Err(Error::malformed(orig, "timestamptz"));
    };
    let (h, m, sec) = if neg { (-h, -m, -sec) } else { (h, m, sec) };
    UtcOffset::from_hms(h, m, sec).map_err(|_| Error::malformed(orig, "timestamptz"))
}

pub(crate) fn format_date_into(out: &mut String, date: Date) {
    let bc = push_ymd(out, date);
    if bc {
        out.push_str(" BC");
    }
}

pub(crate) fn format_timestamp_into(out: &mut String, ts: PrimitiveDateTime) {
    let bc = push_ymd(out, ts.date());
    out.push(' ');
    push_hms(out, ts.time());
    if bc {
        out.push_str(" BC");
    }
}

pub(crate) fn format_timestamptz_into(out: &mut String, ts: OffsetDateTime) {
    let bc = push_ymd(out, ts.date());
    out.push(' ');
    push_hms(out, ts.time());
    push_offset(out, ts.offset());
    if bc {
        out.push_str(" BC");
    }
}

/// Write `YYYY-MM-DD` with the era sign flip reversed, returning whether the
/// caller owes a ` BC` suffix.
fn push_ymd(out: &mut String, date: Date) -> bool {
    let year = date.year();
    let (year, bc) = if year > 0 {
        (year as u32, false)
    } else {
        ((1 - year) as u32, true)
    };
    push_pad(out, year, 4);
    out.push('-');
    push_pad(out, u8::from(date.month()).into(), 2);
    out.push('-');
    push_pad(out, date.day().into(), 2);
    bc
}

fn push_hms(out: &mut String, time: Time) {
    push_pad(out, time.hour().into(), 2);
    out.push(':');
    push_pad(out, time.minute().into(), 2);
    out.push(':');
    push_pad(out, time.second().into(), 2);

    let nano = time.nanosecond();
    if nano != 0 {
        out.push('.');
        let mut buf = itoa::Buffer::new();
        let digits = buf.format(nano);
        let mut frac = String::with_capacity(9);
        for _ in digits.len()..9 {
            frac.push('0');
        }
        frac.push_str(digits);
        out.push_str(frac.trim_end_matches('0'));
    }
}

fn push_offset(out: &mut String, offset: UtcOffset) {
    let (h, m, s) = offset.as_hms();
    out.push(if offset.is_negative() { '-' } else { '+' });
    push_pad(out, h.unsigned_abs().into(), 2);
    if m != 0 || s != 0 {
        out.push(':');
        push_pad(out, m.unsigned_abs().into(), 2);
    }
    if s != 0 {
        out.push(':');
        push_pad(out, s.unsigned_abs().into(), 2);
    }
}

fn push_pad(out: &mut String, value: u32, width: usize) {
    let mut buf = itoa::Buffer::new();
    let digits = buf.format(value);
    for _ in digits.len()..width {
        out.push('0');
    }
    out.push_str(digits);
}
