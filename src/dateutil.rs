//! Day-token helpers.
//!
//! Booking pages tag their day cells with ISO dates (`data-date="2025-10-14"`);
//! plans and the selection code pass those strings around as-is and only drop
//! down to [`chrono`] when arithmetic or validation is needed.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// Wire format of a day token.
pub const DAY_TOKEN_FORMAT: &str = "%Y-%m-%d";

/// Format a date as a day token.
pub fn day_token(date: NaiveDate) -> String {
    date.format(DAY_TOKEN_FORMAT).to_string()
}

/// Parse a day token back into a date. `None` for anything malformed,
/// including real-looking strings with impossible days.
pub fn parse_day_token(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, DAY_TOKEN_FORMAT).ok()
}

/// The (year, month) a day token falls in.
pub fn token_month(token: &str) -> Option<(i32, u32)> {
    parse_day_token(token).map(|d| (d.year(), d.month()))
}

/// The `YYYY-MM` prefix shared by all tokens in the same month.
pub fn month_prefix(token: &str) -> Option<String> {
    parse_day_token(token).map(|d| format!("{:04}-{:02}", d.year(), d.month()))
}

/// Today's local date shifted by `days`. Handy for plans that book relative
/// stays ("two weeks out, three nights").
pub fn days_from_today(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
        assert_eq!(day_token(date), "2025-10-14");
        assert_eq!(parse_day_token("2025-10-14"), Some(date));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert_eq!(parse_day_token("2025-13-01"), None);
        assert_eq!(parse_day_token("2025-02-30"), None);
        assert_eq!(parse_day_token("14/10/2025"), None);
        assert_eq!(parse_day_token("tomorrow"), None);
    }

    #[test]
    fn month_derivation() {
        assert_eq!(token_month("2025-10-14"), Some((2025, 10)));
        assert_eq!(month_prefix("2025-10-14").as_deref(), Some("2025-10"));
        assert_eq!(month_prefix("garbage"), None);
    }

    #[test]
    fn relative_days_move_forward() {
        assert_eq!(days_from_today(7) - days_from_today(0), Duration::days(7));
    }
}
