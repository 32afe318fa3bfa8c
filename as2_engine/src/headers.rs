//! AS2 wire header helpers.
//!
//! Formats a `SystemTime` as an RFC 2822 `Date:` header, plus the Message-ID angle-bracket
//! convention and AS2 name escaping (`as2_profile::escape`) the outbound builder and MDN engine
//! both need.

use as2_core::prelude::*;

use chrono::{TimeZone, Utc};

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// `Date:` header value in RFC 2822 format. AS2 does not mandate a particular timezone;
/// this always renders in UTC with an explicit `+0000` offset rather than a `GMT` literal, since
/// several interoperating stacks parse the numeric-offset form more reliably.
pub fn rfc2822_date(now: SystemTime) -> Outcome<String> {
    let since_epoch = match now.duration_since(UNIX_EPOCH) {
        Ok(d) => d,
        Err(_) => Duration::from_secs(0),
    };
    let datetime = match Utc.timestamp_opt(since_epoch.as_secs() as i64, since_epoch.subsec_nanos()).single() {
        Some(dt) => dt,
        None => return Err(err!(errmsg!(
            "The duration '{:?}' since the UNIX epoch did not produce a valid date/time.",
            since_epoch,
        ), Invalid, Input)),
    };
    Ok(datetime.format("%a, %d %b %Y %H:%M:%S %z").to_string())
}

/// Wrap a bare Message-ID in angle brackets for the wire.
pub fn wrap_message_id(id: &str) -> String {
    if id.starts_with('<') && id.ends_with('>') {
        id.to_string()
    } else {
        format!("<{}>", id)
    }
}

/// Strip angle brackets from a wire Message-ID; "the stored form strips them".
pub fn unwrap_message_id(wire: &str) -> String {
    let trimmed = wire.trim();
    trimmed.strip_prefix('<').and_then(|s| s.strip_suffix('>')).unwrap_or(trimmed).to_string()
}

/// A fresh Message-ID for a generated artifact (an MDN). Uniqueness comes
/// from pairing the current wall-clock time with a caller-supplied seed (the original Message-ID
/// it responds to is always available and already distinguishes concurrent conversations), not
/// from a random-number generator this crate would otherwise have no use for.
pub fn generate_message_id(seed: &str, now: SystemTime, host: &str) -> String {
    let nanos = now.duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    format!("{}.{}@{}", nanos, seed, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_and_unwrap_message_id_round_trip() {
        assert_eq!(wrap_message_id("abc123@host"), "<abc123@host>");
        assert_eq!(unwrap_message_id("<abc123@host>"), "abc123@host");
        assert_eq!(unwrap_message_id("abc123@host"), "abc123@host");
        assert_eq!(wrap_message_id("<already@wrapped>"), "<already@wrapped>");
    }

    #[test]
    fn rfc2822_date_renders_expected_shape() -> Outcome<()> {
        let t = UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        let s = res!(rfc2822_date(t));
        assert!(s.ends_with("+0000"), "{}", s);
        assert_eq!(s.len(), "Sun, 09 Sep 2001 01:46:40 +0000".len());
        Ok(())
    }

    #[test]
    fn generated_message_ids_differ_by_seed() {
        let now = SystemTime::now();
        let a = generate_message_id("msg1", now, "host");
        let b = generate_message_id("msg2", now, "host");
        assert_ne!(a, b);
    }
}
