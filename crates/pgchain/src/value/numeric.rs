//! NUMERIC binary wire format, carried as exact decimal text.
//!
//! Layout: `ndigits: i16, weight: i16, sign: u16, dscale: u16`, followed by
//! `ndigits` base-10000 digits (`i16`). Digit `i` has exponent `weight - i`.

use bytes::{BufMut, BytesMut};
use std::error::Error;
use tokio_postgres::types::IsNull;

type BoxError = Box<dyn Error + Sync + Send>;

const SIGN_POS: u16 = 0x0000;
const SIGN_NEG: u16 = 0x4000;
const SIGN_NAN: u16 = 0xC000;
const SIGN_PINF: u16 = 0xD000;
const SIGN_NINF: u16 = 0xF000;

fn read_u16(raw: &[u8], at: usize) -> Result<u16, BoxError> {
    raw.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| "truncated numeric value".into())
}

/// Decode a binary NUMERIC into its decimal text form.
pub(crate) fn decode(raw: &[u8]) -> Result<String, BoxError> {
    let ndigits = usize::from(read_u16(raw, 0)?);
    let weight = i32::from(read_u16(raw, 2)? as i16);
    let sign = read_u16(raw, 4)?;
    let dscale = usize::from(read_u16(raw, 6)?);

    match sign {
        SIGN_NAN => return Ok("NaN".to_string()),
        SIGN_PINF => return Ok("Infinity".to_string()),
        SIGN_NINF => return Ok("-Infinity".to_string()),
        SIGN_POS | SIGN_NEG => {}
        other => return Err(format!("invalid numeric sign 0x{other:04x}").into()),
    }

    let mut digits = Vec::with_capacity(ndigits);
    for i in 0..ndigits {
        digits.push(read_u16(raw, 8 + i * 2)?);
    }
    let digit_at = |idx: i32| -> u16 {
        usize::try_from(idx)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == SIGN_NEG {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        for idx in 0..=weight {
            let d = digit_at(idx);
            if idx == 0 {
                out.push_str(&d.to_string());
            } else {
                out.push_str(&format!("{d:04}"));
            }
        }
    }

    if dscale > 0 {
        let groups = dscale.div_ceil(4);
        let mut frac = String::with_capacity(groups * 4);
        for k in 1..=groups {
            frac.push_str(&format!("{:04}", digit_at(weight + k as i32)));
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }

    Ok(out)
}

/// Encode decimal text (`-123.4500`) as a binary NUMERIC.
pub(crate) fn encode(text: &str, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    let text = text.trim();
    match text {
        "NaN" => return Ok(write_special(SIGN_NAN, out)),
        "Infinity" => return Ok(write_special(SIGN_PINF, out)),
        "-Infinity" => return Ok(write_special(SIGN_NINF, out)),
        _ => {}
    }

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if (int_part.is_empty() && frac_part.is_empty())
        || !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit())
    {
        return Err(format!("invalid numeric literal '{text}'").into());
    }
    let dscale = u16::try_from(frac_part.len())?;

    let int_part = int_part.trim_start_matches('0');
    let int_pad = (4 - int_part.len() % 4) % 4;
    let frac_pad = (4 - frac_part.len() % 4) % 4;
    let padded: String = "0".repeat(int_pad) + int_part + frac_part + &"0".repeat(frac_pad);

    let mut groups: Vec<u16> = padded
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
        })
        .collect();
    let mut weight = i32::try_from((int_part.len() + int_pad) / 4)? - 1;

    while groups.first() == Some(&0) {
        groups.remove(0);
        weight -= 1;
    }
    while groups.last() == Some(&0) {
        groups.pop();
    }

    if groups.is_empty() {
        weight = 0;
    }

    out.put_u16(u16::try_from(groups.len())?);
    out.put_i16(i16::try_from(weight)?);
    out.put_u16(if negative && !groups.is_empty() {
        SIGN_NEG
    } else {
        SIGN_POS
    });
    out.put_u16(dscale);
    for g in groups {
        out.put_u16(g);
    }
    Ok(IsNull::No)
}

fn write_special(sign: u16, out: &mut BytesMut) -> IsNull {
    out.put_u16(0);
    out.put_i16(0);
    out.put_u16(sign);
    out.put_u16(0);
    IsNull::No
}
