//! Expiry policy for saved notes.
//!
//! Pure functions over `(saved_at, ttl_hours, now)`, all in epoch
//! milliseconds. A record is expired exactly when no positive time remains,
//! so `is_expired` and `remaining` always agree at the boundary instant.

pub const MS_PER_MINUTE: i64 = 60 * 1000;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Label rendered once no time remains.
pub const EXPIRED_LABEL: &str = "Expired";

/// Instant (epoch ms) at which a record saved at `saved_at` expires.
pub fn expires_at(saved_at: i64, ttl_hours: u32) -> i64 {
    saved_at.saturating_add(i64::from(ttl_hours).saturating_mul(MS_PER_HOUR))
}

/// Signed milliseconds left before expiry. Zero or negative means expired.
pub fn remaining_ms(saved_at: i64, ttl_hours: u32, now: i64) -> i64 {
    expires_at(saved_at, ttl_hours).saturating_sub(now)
}

/// Returns whether a record saved at `saved_at` has outlived its TTL.
pub fn is_expired(saved_at: i64, ttl_hours: u32, now: i64) -> bool {
    remaining_ms(saved_at, ttl_hours, now) <= 0
}

/// Human-readable remaining time: `"{H}h {M}m"`, `"{M}m"` or `"Expired"`.
///
/// Sub-minute positive remainders render as `"0m"`.
pub fn remaining(saved_at: i64, ttl_hours: u32, now: i64) -> String {
    format_remaining_ms(remaining_ms(saved_at, ttl_hours, now))
}

/// Formats a signed millisecond duration with the `remaining` rules.
pub fn format_remaining_ms(ms: i64) -> String {
    if ms <= 0 {
        return EXPIRED_LABEL.to_string();
    }
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_remaining_ms, is_expired, remaining, MS_PER_HOUR, MS_PER_MINUTE};

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn fresh_save_reports_full_ttl() {
        assert_eq!(remaining(NOW, 6, NOW), "6h 0m");
        assert!(!is_expired(NOW, 6, NOW));
    }

    #[test]
    fn one_minute_left_renders_minutes_only() {
        let saved_at = NOW - (5 * MS_PER_HOUR + 59 * MS_PER_MINUTE);
        assert_eq!(remaining(saved_at, 6, NOW), "1m");
        assert!(!is_expired(saved_at, 6, NOW));
    }

    #[test]
    fn past_ttl_is_expired() {
        let saved_at = NOW - (6 * MS_PER_HOUR + MS_PER_MINUTE);
        assert_eq!(remaining(saved_at, 6, NOW), "Expired");
        assert!(is_expired(saved_at, 6, NOW));
    }

    #[test]
    fn boundary_instant_is_consistent() {
        let saved_at = NOW - 6 * MS_PER_HOUR;
        assert!(is_expired(saved_at, 6, NOW));
        assert_eq!(remaining(saved_at, 6, NOW), "Expired");
        assert!(!is_expired(saved_at, 6, NOW - 1));
        assert_eq!(remaining(saved_at, 6, NOW - 1), "0m");
    }

    #[test]
    fn sub_minute_remainder_is_zero_minutes() {
        assert_eq!(format_remaining_ms(1), "0m");
        assert_eq!(format_remaining_ms(59_999), "0m");
        assert_eq!(format_remaining_ms(0), "Expired");
        assert_eq!(format_remaining_ms(-5), "Expired");
        assert_eq!(format_remaining_ms(MS_PER_HOUR + 30 * MS_PER_MINUTE), "1h 30m");
    }

    #[test]
    fn remaining_never_increases_over_time() {
        let saved_at = NOW;
        let mut previous = i64::MAX;
        let mut now = NOW - MS_PER_HOUR;
        while now < NOW + 7 * MS_PER_HOUR {
            let current = super::remaining_ms(saved_at, 6, now);
            assert!(current <= previous);
            previous = current;
            now += 7 * MS_PER_MINUTE + 13;
        }
    }
}
