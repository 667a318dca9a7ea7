//! Binary decoders for column types without a `FromSql` impl in
//! tokio-postgres. Each one renders the value the way the server's text
//! output does.

use std::error::Error;
use std::fmt::Write;
use std::net::{Ipv4Addr, Ipv6Addr};

type BoxError = Box<dyn Error + Sync + Send>;

const USECS_PER_SEC: i64 = 1_000_000;
const USECS_PER_MINUTE: i64 = 60 * USECS_PER_SEC;
const USECS_PER_HOUR: i64 = 60 * USECS_PER_MINUTE;

const PGSQL_AF_INET: u8 = 2;
const PGSQL_AF_INET6: u8 = 3;

fn read<const N: usize>(raw: &[u8], at: usize, what: &str) -> Result<[u8; N], BoxError> {
    raw.get(at..at + N)
        .and_then(|b| <[u8; N]>::try_from(b).ok())
        .ok_or_else(|| format!("truncated {what} value").into())
}

fn expect_len(raw: &[u8], len: usize, what: &str) -> Result<(), BoxError> {
    if raw.len() != len {
        return Err(format!("invalid {what} length {}, expected {len}", raw.len()).into());
    }
    Ok(())
}

/// `HH:MM:SS[.ffffff]` with trailing fraction zeros trimmed. Hours are not
/// wrapped at 24.
fn clock(micros: i64) -> String {
    let micros = micros.unsigned_abs();
    let hours = micros / USECS_PER_HOUR as u64;
    let minutes = micros % USECS_PER_HOUR as u64 / USECS_PER_MINUTE as u64;
    let seconds = micros % USECS_PER_MINUTE as u64 / USECS_PER_SEC as u64;
    let fraction = micros % USECS_PER_SEC as u64;

    let mut out = format!("{hours:02}:{minutes:02}:{seconds:02}");
    if fraction != 0 {
        let digits = format!("{fraction:06}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// INTERVAL: `microseconds: i64, days: i32, months: i32`.
///
/// Rendered in the default `postgres` interval style, e.g.
/// `1 year 2 mons -3 days +04:05:06.5`.
pub(crate) fn decode_interval(raw: &[u8]) -> Result<String, BoxError> {
    expect_len(raw, 16, "interval")?;
    let micros = i64::from_be_bytes(read(raw, 0, "interval")?);
    let days = i32::from_be_bytes(read(raw, 8, "interval")?);
    let months = i32::from_be_bytes(read(raw, 12, "interval")?);

    let mut parts: Vec<String> = Vec::new();
    let mut negative_before = false;
    for (value, unit) in [
        (i64::from(months / 12), "year"),
        (i64::from(months % 12), "mon"),
        (i64::from(days), "day"),
    ] {
        if value == 0 {
            continue;
        }
        let sign = if negative_before && value > 0 { "+" } else { "" };
        let plural = if value == 1 { "" } else { "s" };
        parts.push(format!("{sign}{value} {unit}{plural}"));
        negative_before = value < 0;
    }

    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 {
            "-"
        } else if negative_before {
            "+"
        } else {
            ""
        };
        parts.push(format!("{sign}{}", clock(micros)));
    }
    Ok(parts.join(" "))
}

/// TIMETZ: `microseconds since midnight: i64, zone: i32` where the zone is
/// in seconds west of UTC. Rendered as `12:00:00+00` / `09:30:00-05:30`.
pub(crate) fn decode_timetz(raw: &[u8]) -> Result<String, BoxError> {
    expect_len(raw, 12, "timetz")?;
    let micros = i64::from_be_bytes(read(raw, 0, "timetz")?);
    let zone_west = i32::from_be_bytes(read(raw, 8, "timetz")?);

    let offset = -i64::from(zone_west);
    let abs = offset.unsigned_abs();
    let mut out = clock(micros);
    out.push(if offset < 0 { '-' } else { '+' });
    let _ = write!(out, "{:02}", abs / 3600);
    if abs % 3600 != 0 {
        let _ = write!(out, ":{:02}", abs % 3600 / 60);
        if abs % 60 != 0 {
            let _ = write!(out, ":{:02}", abs % 60);
        }
    }
    Ok(out)
}

/// INET / CIDR: `family: u8, bits: u8, is_cidr: u8, nb: u8, addr: [u8; nb]`.
///
/// The `/bits` suffix is kept for CIDR and for INET values narrower than a
/// full host address.
pub(crate) fn decode_inet(raw: &[u8]) -> Result<String, BoxError> {
    let [family, bits, is_cidr, nb] = read::<4>(raw, 0, "inet")?;
    let addr = &raw[4..];
    if addr.len() != usize::from(nb) {
        return Err(format!("invalid inet address length {}", addr.len()).into());
    }

    let (text, full) = match (family, addr.len()) {
        (PGSQL_AF_INET, 4) => {
            let octets: [u8; 4] = read(addr, 0, "inet")?;
            (Ipv4Addr::from(octets).to_string(), 32)
        }
        (PGSQL_AF_INET6, 16) => {
            let octets: [u8; 16] = read(addr, 0, "inet")?;
            (Ipv6Addr::from(octets).to_string(), 128)
        }
        _ => return Err(format!("invalid inet family {family} with {nb} address bytes").into()),
    };

    if is_cidr != 0 || bits != full {
        Ok(format!("{text}/{bits}"))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(micros: i64, days: i32, months: i32) -> Vec<u8> {
        let mut raw = micros.to_be_bytes().to_vec();
        raw.extend_from_slice(&days.to_be_bytes());
        raw.extend_from_slice(&months.to_be_bytes());
        raw
    }

    #[test]
    fn interval_matches_server_text() {
        assert_eq!(decode_interval(&interval(0, 1, 0)).unwrap(), "1 day");
        assert_eq!(decode_interval(&interval(0, 0, 0)).unwrap(), "00:00:00");
        assert_eq!(
            decode_interval(&interval(4 * USECS_PER_HOUR + 5 * USECS_PER_MINUTE + 6_500_000, 3, 14))
                .unwrap(),
            "1 year 2 mons 3 days 04:05:06.5"
        );
        assert_eq!(decode_interval(&interval(-USECS_PER_HOUR, 0, 0)).unwrap(), "-01:00:00");
        assert_eq!(
            decode_interval(&interval(2 * USECS_PER_HOUR, -1, 0)).unwrap(),
            "-1 days +02:00:00"
        );
        assert_eq!(decode_interval(&interval(100 * USECS_PER_HOUR, 0, 0)).unwrap(), "100:00:00");
    }

    #[test]
    fn interval_rejects_wrong_length() {
        assert!(decode_interval(&[0; 8]).is_err());
    }

    #[test]
    fn timetz_renders_offset_east_positive() {
        let mut raw = (12 * USECS_PER_HOUR).to_be_bytes().to_vec();
        raw.extend_from_slice(&0i32.to_be_bytes());
        assert_eq!(decode_timetz(&raw).unwrap(), "12:00:00+00");

        // -05:30 is 19800 seconds west.
        let mut raw = (9 * USECS_PER_HOUR + 30 * USECS_PER_MINUTE).to_be_bytes().to_vec();
        raw.extend_from_slice(&19_800i32.to_be_bytes());
        assert_eq!(decode_timetz(&raw).unwrap(), "09:30:00-05:30");
    }

    #[test]
    fn inet_and_cidr() {
        assert_eq!(decode_inet(&[2, 32, 0, 4, 10, 0, 0, 1]).unwrap(), "10.0.0.1");
        assert_eq!(decode_inet(&[2, 8, 1, 4, 10, 0, 0, 0]).unwrap(), "10.0.0.0/8");
        assert_eq!(decode_inet(&[2, 24, 0, 4, 192, 168, 1, 7]).unwrap(), "192.168.1.7/24");

        let mut v6 = vec![3, 128, 0, 16];
        v6.extend_from_slice(&Ipv6Addr::LOCALHOST.octets());
        assert_eq!(decode_inet(&v6).unwrap(), "::1");

        assert!(decode_inet(&[2, 32, 0, 4, 10, 0]).is_err());
        assert!(decode_inet(&[9, 32, 0, 4, 10, 0, 0, 1]).is_err());
    }
}
