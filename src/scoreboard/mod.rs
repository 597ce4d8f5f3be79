use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::db::DataAccessError;

pub mod countdown;
pub mod events;
pub mod listing;
pub mod results;
pub mod service;
pub mod standings;
pub mod teams;
pub mod validation;

/// The fixed offset admins enter match times in, and display strings are
/// rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(FixedOffset);

impl DisplayZone {
    pub fn new(offset: FixedOffset) -> Self {
        Self(offset)
    }

    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    /// Parse `Z`, `UTC`, `+HH:MM`, `-HH:MM` or `+HHMM`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }

        let invalid = || format!("'{}' is not a valid UTC offset, expected e.g. +05:30", raw);
        let (sign, rest) = match raw.chars().next() {
            Some('+') => (1, &raw[1..]),
            Some('-') => (-1, &raw[1..]),
            _ => return Err(invalid()),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.0)
    }

    pub fn date_label(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%Y-%m-%d").to_string()
    }

    pub fn time_label(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%H:%M").to_string()
    }

    /// Combine a `YYYY-MM-DD` date and an `HH:MM` (24h) time entered in this
    /// zone into one instant.
    pub fn combine(&self, date: &str, time: &str) -> Result<DateTime<Utc>, DataAccessError> {
        let invalid = || {
            DataAccessError::InvalidArgument(format!(
                "Invalid date/time format: '{}' '{}' (expected YYYY-MM-DD and HH:MM)",
                date, time
            ))
        };

        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
        let (hour, minute) = time.trim().split_once(':').ok_or_else(invalid)?;
        let hour_ok = (1..=2).contains(&hour.len()) && hour.chars().all(|c| c.is_ascii_digit());
        let minute_ok = minute.len() == 2 && minute.chars().all(|c| c.is_ascii_digit());
        if !hour_ok || !minute_ok {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        let clock = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;

        self.0
            .from_local_datetime(&day.and_time(clock))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets() {
        assert_eq!(DisplayZone::parse("UTC").unwrap(), DisplayZone::utc());
        assert_eq!(
            DisplayZone::parse("+05:30").unwrap().offset().local_minus_utc(),
            5 * 3600 + 30 * 60
        );
        assert_eq!(DisplayZone::parse("-0800").unwrap().offset().local_minus_utc(), -8 * 3600);
        assert!(DisplayZone::parse("05:30").is_err());
        assert!(DisplayZone::parse("+25:00").is_err());
    }

    #[test]
    fn combines_local_date_and_time() {
        let zone = DisplayZone::parse("+05:30").unwrap();
        let instant = zone.combine("2025-01-10", "10:00").unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 10, 4, 30, 0).unwrap());
        assert_eq!(zone.date_label(instant), "2025-01-10");
        assert_eq!(zone.time_label(instant), "10:00");

        let early = DisplayZone::utc().combine("2025-01-10", "9:05").unwrap();
        assert_eq!(early, Utc.with_ymd_and_hms(2025, 1, 10, 9, 5, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_date_or_time() {
        let zone = DisplayZone::utc();
        for (date, time) in [
            ("2025-13-01", "10:00"),
            ("10/01/2025", "10:00"),
            ("2025-01-10", "24:00"),
            ("2025-01-10", "10:60"),
            ("2025-01-10", "10"),
            ("2025-01-10", "10:5"),
            ("", ""),
        ] {
            assert!(
                matches!(zone.combine(date, time), Err(DataAccessError::InvalidArgument(_))),
                "{} {} should be rejected",
                date,
                time
            );
        }
    }
}
