//! Inclusive calendar date ranges for analytics queries.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Window used when the request names none.
pub const DEFAULT_RANGE_DAYS: u32 = 30;

/// Largest `Nd` preset accepted.
pub const MAX_PRESET_DAYS: u32 = 365;

/// Largest explicit `start..=end` span accepted, in days.
pub const MAX_SPAN_DAYS: i64 = 366;

/// Latest calendar year an explicit date may name.
pub const MAX_YEAR: i32 = 9999;

/// Inclusive range of UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, requiring `start <= end` and a span of at most 366 days.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::invalid_format(
                "start",
                "start must not be after end",
            ));
        }
        let span = (end - start).num_days() + 1;
        if span > MAX_SPAN_DAYS {
            return Err(ValidationError::out_of_range("range", 1, MAX_SPAN_DAYS, span));
        }
        // the exclusive upper bound needs a following day
        if end.succ_opt().is_none() {
            return Err(ValidationError::invalid_format("end", "date is out of range"));
        }
        Ok(Self { start, end })
    }

    /// The `days` most recent days, ending with `today`.
    pub fn last_days(days: u32, today: NaiveDate) -> Result<Self, ValidationError> {
        if days == 0 || days > MAX_PRESET_DAYS {
            return Err(ValidationError::out_of_range(
                "range",
                1,
                MAX_PRESET_DAYS as i64,
                days as i64,
            ));
        }
        let start = today - Duration::days(days as i64 - 1);
        Ok(Self { start, end: today })
    }

    /// Parses a preset such as `7d`, `30d` or `90d`.
    pub fn parse_preset(preset: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let days = preset
            .trim()
            .strip_suffix('d')
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(|| ValidationError::invalid_format("range", "expected a value like 30d"))?;
        Self::last_days(days, today)
    }

    /// Resolves the `range`, `start` and `end` query parameters.
    ///
    /// Explicit `start`/`end` take precedence and must be given together.
    /// Without any parameter the last 30 days are used.
    pub fn from_query(
        range: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(parse_date("start", start)?, parse_date("end", end)?),
            (Some(_), None) => Err(ValidationError::empty_field("end")),
            (None, Some(_)) => Err(ValidationError::empty_field("start")),
            (None, None) => match range {
                Some(preset) => Self::parse_preset(preset, today),
                None => Self::last_days(DEFAULT_RANGE_DAYS, today),
            },
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, at least 1.
    pub fn num_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.num_days())
    }

    /// Midnight UTC at the start of the first day.
    pub fn start_timestamp(&self) -> Timestamp {
        Timestamp::from_datetime(self.start.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Midnight UTC after the last day (exclusive upper bound).
    pub fn end_timestamp_exclusive(&self) -> Timestamp {
        let next = self.end.succ_opt().unwrap_or(self.end);
        Timestamp::from_datetime(next.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))?;
    if !(1..=MAX_YEAR).contains(&date.year()) {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_YEAR as i64,
            date.year() as i64,
        ));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_is_last_thirty_days() {
        let today = date(2024, 3, 31);
        let range = DateRange::from_query(None, None, None, today).unwrap();
        assert_eq!(range.start(), date(2024, 3, 2));
        assert_eq!(range.end(), today);
        assert_eq!(range.num_days(), 30);
    }

    #[test]
    fn presets_end_today() {
        let today = date(2024, 1, 10);
        let range = DateRange::parse_preset("7d", today).unwrap();
        assert_eq!(range.start(), date(2024, 1, 4));
        assert_eq!(range.days().count(), 7);

        let year = DateRange::parse_preset("365d", today).unwrap();
        assert_eq!(year.num_days(), 365);
    }

    #[test]
    fn bad_presets_are_rejected() {
        let today = date(2024, 1, 10);
        for preset in ["0d", "366d", "7", "d", "abc", "-3d", "7w"] {
            assert!(
                DateRange::parse_preset(preset, today).is_err(),
                "{preset} should be rejected"
            );
        }
    }

    #[test]
    fn explicit_dates_win_over_preset() {
        let range = DateRange::from_query(
            Some("7d"),
            Some("2024-02-01"),
            Some("2024-02-29"),
            date(2024, 6, 1),
        )
        .unwrap();
        assert_eq!(range.start(), date(2024, 2, 1));
        assert_eq!(range.num_days(), 29);
    }

    #[test]
    fn explicit_dates_must_come_in_pairs() {
        let today = date(2024, 6, 1);
        let err = DateRange::from_query(None, Some("2024-02-01"), None, today).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("end"));
    }

    #[test]
    fn inverted_or_oversized_ranges_are_rejected() {
        assert!(DateRange::new(date(2024, 2, 2), date(2024, 2, 1)).is_err());
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).is_ok());
        assert!(DateRange::new(date(2023, 1, 1), date(2024, 1, 1)).is_ok());
        assert!(DateRange::new(date(2023, 1, 1), date(2024, 1, 2)).is_err());
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let err = DateRange::from_query(None, Some("02/01/2024"), Some("2024-02-03"), date(2024, 6, 1))
            .unwrap_err();
        assert_eq!(err.field(), "start");
    }

    #[test]
    fn signed_years_are_rejected() {
        let today = date(2024, 6, 1);
        let err = DateRange::from_query(None, Some("+262142-12-01"), Some("+262142-12-31"), today)
            .unwrap_err();
        assert_eq!(err.field(), "start");

        let err = DateRange::from_query(None, Some("2024-12-01"), Some("10000-01-01"), today)
            .unwrap_err();
        assert_eq!(err.field(), "end");
    }

    #[test]
    fn last_representable_day_is_rejected() {
        let err = DateRange::new(NaiveDate::MAX, NaiveDate::MAX).unwrap_err();
        assert_eq!(err.field(), "end");
    }

    #[test]
    fn end_of_year_9999_has_an_exclusive_bound() {
        let range = DateRange::from_query(None, Some("9999-12-01"), Some("9999-12-31"), date(2024, 6, 1))
            .unwrap();
        assert!(range.end_timestamp_exclusive() > range.start_timestamp());
    }

    #[test]
    fn single_day_range() {
        let day = date(2024, 5, 5);
        let range = DateRange::new(day, day).unwrap();
        assert_eq!(range.days().collect::<Vec<_>>(), vec![day]);
        assert!(range.contains(day));
        assert!(!range.contains(date(2024, 5, 6)));
    }

    #[test]
    fn timestamps_bound_the_range() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 1, 16)).unwrap();
        assert_eq!(range.start_timestamp().as_unix_secs(), 1705276800);
        assert_eq!(range.end_timestamp_exclusive().as_unix_secs(), 1705276800 + 2 * 86_400);
    }
}
