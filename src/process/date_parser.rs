use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Lenient calendar-date parse; any time part is discarded.
/// Returns `None` for anything that is not a real date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // contiguous YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s[0..4].parse().ok()?;
        let month: u32 = s[4..6].parse().ok()?;
        let day: u32 = s[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Days since 1970-01-01, the Arrow Date32 representation.
pub fn date_to_days(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_accepted_forms() {
        assert_eq!(parse_date("1990-01-01"), Some(ymd(1990, 1, 1)));
        assert_eq!(parse_date("1990/01/31"), Some(ymd(1990, 1, 31)));
        assert_eq!(parse_date("19900131"), Some(ymd(1990, 1, 31)));
        assert_eq!(parse_date("12/25/1984"), Some(ymd(1984, 12, 25)));
        assert_eq!(parse_date("25.12.1984"), Some(ymd(1984, 12, 25)));
        assert_eq!(parse_date("2001-07-04 13:45:00"), Some(ymd(2001, 7, 4)));
        assert_eq!(parse_date("2001-07-04T13:45:00"), Some(ymd(2001, 7, 4)));
        assert_eq!(parse_date("  2001-07-04 "), Some(ymd(2001, 7, 4)));
    }

    #[test]
    fn test_rejected_forms() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("0000-00-00"), None);
        assert_eq!(parse_date("1990-02-30"), None);
        assert_eq!(parse_date("19901301"), None);
    }

    #[test]
    fn test_date_to_days() {
        assert_eq!(date_to_days(ymd(1970, 1, 1)), 0);
        assert_eq!(date_to_days(ymd(1970, 1, 2)), 1);
        assert_eq!(date_to_days(ymd(1969, 12, 31)), -1);
        assert_eq!(date_to_days(ymd(1990, 1, 1)), 7305);
    }
}
