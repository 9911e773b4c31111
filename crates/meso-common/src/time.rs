//! Time handling for radar product selection and discussion validity.

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Fixed offset applied to discussion `DDHHMMZ` times to get display time.
///
/// This is Eastern Daylight Time and is applied year-round, so for dates
/// outside daylight saving the displayed times are one hour late. Kept as a
/// fixed, configurable value until the desired behaviour is confirmed.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -4;

/// Radar composites are produced on 5-minute boundaries.
pub const PRODUCT_INTERVAL_MINUTES: u32 = 5;

/// Label used when the validity window cannot be read from the source.
pub const VALIDITY_NOT_ACCESSIBLE: &str = "VALID TIME NOT ACCESSIBLE - Please use direct link";

/// Display format for validity timestamps, e.g. "03:30 PM January 05".
const DISPLAY_FORMAT: &str = "%I:%M %p %B %d";

/// Latest instant at or before `now` whose minute is a multiple of five,
/// truncated to the whole minute.
///
/// Minute 0 resolves to the top of the same hour.
pub fn resolve_product_time(now: DateTime<Utc>) -> DateTime<Utc> {
    let offset = Duration::minutes(i64::from(now.minute() % PRODUCT_INTERVAL_MINUTES))
        + Duration::seconds(i64::from(now.second()))
        + Duration::nanoseconds(i64::from(now.nanosecond()));
    now - offset
}

/// The effective period stated in a discussion, in local display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ValidityWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of the window. Negative if the source listed end before start.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Human-readable label for the map, e.g.
    /// "Valid from 11:30 AM January 05 to 02:30 PM January 05".
    pub fn label(&self) -> String {
        format!(
            "Valid from {} to {}",
            self.start.format(DISPLAY_FORMAT),
            self.end.format(DISPLAY_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_resolve_every_minute_of_an_hour() {
        for minute in 0..60 {
            for second in [0, 1, 30, 59] {
                let now = Utc.with_ymd_and_hms(2024, 1, 5, 15, minute, second).unwrap();
                let product = resolve_product_time(now);

                assert_eq!(product.minute() % 5, 0, "minute {}", minute);
                assert_eq!(product.second(), 0);
                assert!(product <= now);
                assert!(now - product < Duration::minutes(5));
            }
        }
    }

    #[test]
    fn test_resolve_on_the_hour_stays_in_hour() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 16, 0, 0).unwrap();
        assert_eq!(resolve_product_time(now), now);
    }

    #[test]
    fn test_resolve_subtracts_remainder() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 16, 4, 12).unwrap();
        assert_eq!(
            resolve_product_time(now),
            Utc.with_ymd_and_hms(2024, 1, 5, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_resolve_across_midnight_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 2, 0).unwrap();
        assert_eq!(
            resolve_product_time(now),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_validity_label() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let window = ValidityWindow::new(
            day.and_hms_opt(11, 30, 0).unwrap(),
            day.and_hms_opt(14, 30, 0).unwrap(),
        );
        assert_eq!(
            window.label(),
            "Valid from 11:30 AM January 05 to 02:30 PM January 05"
        );
        assert_eq!(window.duration(), Duration::hours(3));
    }
}
