//! `YYYYMMDD` source dates.

use chrono::NaiveDate;

use super::defaults::{SENTINEL_DATE, sentinel_date};

/// Convert a compact `YYYYMMDD` date. Anything else degrades to the
/// sentinel `1970-01-01` instead of failing the transformation.
pub fn compact_date(raw: &str) -> NaiveDate {
    let raw = raw.trim();
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let field = |range: std::ops::Range<usize>| raw[range].parse::<u32>().ok();
        if let (Some(y), Some(m), Some(d)) = (field(0..4), field(4..6), field(6..8)) {
            if let Some(date) = NaiveDate::from_ymd_opt(y as i32, m, d) {
                return date;
            }
        }
    }
    tracing::debug!(raw, fallback = SENTINEL_DATE, "unparseable source date");
    sentinel_date()
}

/// Mandatory date: absence degrades to the sentinel as well.
pub fn required_date(raw: Option<&str>) -> NaiveDate {
    compact_date(raw.unwrap_or_default())
}

/// Optional date: absent or blank stays `None`, a malformed value still
/// degrades to the sentinel.
pub fn optional_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(compact_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn compact_dates() {
        assert_eq!(compact_date("20240115"), ymd(2024, 1, 15));
        assert_eq!(compact_date(" 20241231 "), ymd(2024, 12, 31));
    }

    #[test]
    fn malformed_dates_use_sentinel() {
        assert_eq!(compact_date("2024-01-15"), sentinel_date());
        assert_eq!(compact_date("240115"), sentinel_date());
        assert_eq!(compact_date("20241345"), sentinel_date());
        assert_eq!(compact_date(""), sentinel_date());
    }

    #[test]
    fn optional_and_required() {
        assert_eq!(optional_date(None), None);
        assert_eq!(optional_date(Some("  ")), None);
        assert_eq!(optional_date(Some("bad")), Some(sentinel_date()));
        assert_eq!(required_date(None), sentinel_date());
    }
}
