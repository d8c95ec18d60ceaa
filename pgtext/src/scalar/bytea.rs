//! `bytea` text encodings.
//!
//! The server emits one of two encodings depending on its `bytea_output`
//! setting: the hex form `\x0011` (9.0 and later) or the legacy escape form
//! (`\\` for a backslash, `\ooo` octal for non-printable bytes). Both decode
//! to identical byte sequences; which one is produced on format is caller
//! configuration, not something the codec decides.
use bytes::Bytes;

use crate::error::{Error, Result};

/// Output encoding for `bytea`, mirroring the server's `bytea_output`
/// setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteaOutput {
    /// `\x`-prefixed hex pairs.
    #[default]
    Hex,
    /// The legacy octal escape form.
    Escape,
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Parse either `bytea` text encoding into raw bytes.
pub fn parse_bytea(text: &str) -> Result<Bytes> {
    match text.strip_prefix("\\x") {
        Some(hex) => parse_hex(hex, text),
        None => parse_escape(text),
    }
}

fn parse_hex(hex: &str, orig: &str) -> Result<Bytes> {
    if hex.len() % 2 != 0 {
        return Err(Error::malformed(orig, "bytea"));
    }

    let mut buf = Vec::with_capacity(hex.len() / 2);
    let mut digits = hex.chars().map(|c| c.to_digit(16));

    while let Some(hi) = digits.next() {
        let (Some(hi), Some(Some(lo))) = (hi, digits.next()) else {
            return Err(Error::malformed(orig, "bytea"));
        };
        buf.push((hi << 4 | lo) as u8);
    }

    Ok(buf.into())
}

fn parse_escape(text: &str) -> Result<Bytes> {
    let mut buf = Vec::with_capacity(text.len());
    let mut bytes = text.bytes();

    while let Some(b) = bytes.next() {
        if b != b'\\' {
            buf.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'\\') => buf.push(b'\\'),
            Some(d1 @ b'0'..=b'3') => {
                let (Some(d2 @ b'0'..=b'7'), Some(d3 @ b'0'..=b'7')) =
                    (bytes.next(), bytes.next())
                else {
                    return Err(Error::malformed(text, "bytea"));
                };
                buf.push((d1 - b'0') << 6 | (d2 - b'0') << 3 | (d3 - b'0'));
            }
            _ => return Err(Error::malformed(text, "bytea")),
        }
    }

    Ok(buf.into())
}

/// Format raw bytes in the requested `bytea` encoding.
pub fn format_bytea(bytes: &[u8], output: ByteaOutput) -> String {
    let mut out = String::new();
    format_bytea_into(&mut out, bytes, output);
    out
}

pub(crate) fn format_bytea_into(out: &mut String, bytes: &[u8], output: ByteaOutput) {
    match output {
        ByteaOutput::Hex => {
            out.reserve(2 + bytes.len() * 2);
            out.push_str("\\x");
            for &b in bytes {
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0xf) as usize] as char);
            }
        }
        ByteaOutput::Escape => {
            for &b in bytes {
                match b {
                    b'\\' => out.push_str("\\\\"),
                    0x20..=0x7e => out.push(b as char),
                    _ => {
                        out.push('\\');
                        out.push((b'0' + (b >> 6)) as char);
                        out.push((b'0' + (b >> 3 & 7)) as char);
                        out.push((b'0' + (b & 7)) as char);
                    }
                }
            }
        }
    }
}
