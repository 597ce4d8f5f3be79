use chrono::{DateTime, Datelike, Months, NaiveDateTime, Utc};
use serde::Serialize;

use crate::scoreboard::DisplayZone;

pub const IN_PROGRESS_LABEL: &str = "Match in Progress!";

const URGENT_SECONDS: i64 = 5 * 60;
const SOON_SECONDS: i64 = 60 * 60;

/// Calendar breakdown of the time left until kickoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CountdownBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownBreakdown {
    /// Whole calendar months are taken first (clamping to the end of shorter
    /// months), the remainder is split into days, hours, minutes and seconds.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if end <= start {
            return Self::default();
        }

        let mut months =
            ((end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32).max(0) as u32;
        let anchor = loop {
            match start.checked_add_months(Months::new(months)) {
                Some(anchor) if anchor <= end => break anchor,
                _ if months == 0 => break start,
                _ => months -= 1,
            }
        };

        let rest = (end - anchor).num_seconds();
        Self {
            years: months / 12,
            months: months % 12,
            days: rest / 86_400,
            hours: rest % 86_400 / 3_600,
            minutes: rest % 3_600 / 60,
            seconds: rest % 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Soon,
    Normal,
}

impl Urgency {
    pub fn for_seconds_left(seconds: i64) -> Self {
        if seconds < URGENT_SECONDS {
            Urgency::Urgent
        } else if seconds < SOON_SECONDS {
            Urgency::Soon
        } else {
            Urgency::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownUnit {
    pub label: &'static str,
    pub value: String,
}

impl CountdownUnit {
    fn new(label: &'static str, value: i64) -> Self {
        Self {
            label,
            value: format!("{:02}", value),
        }
    }
}

/// What a countdown shows at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownView {
    pub in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub seconds_left: i64,
    pub urgency: Urgency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CountdownBreakdown>,
    pub units: Vec<CountdownUnit>,
}

impl CountdownView {
    pub fn at(now: DateTime<Utc>, target: DateTime<Utc>, zone: DisplayZone) -> Self {
        let seconds_left = (target - now).num_seconds();
        if seconds_left <= 0 {
            return Self {
                in_progress: true,
                label: Some(IN_PROGRESS_LABEL.to_string()),
                seconds_left: 0,
                urgency: Urgency::Urgent,
                breakdown: None,
                units: Vec::new(),
            };
        }

        let breakdown = CountdownBreakdown::between(
            zone.local(now).naive_local(),
            zone.local(target).naive_local(),
        );

        Self {
            in_progress: false,
            label: None,
            seconds_left,
            urgency: Urgency::for_seconds_left(seconds_left),
            units: visible_units(&breakdown),
            breakdown: Some(breakdown),
        }
    }
}

/// Years and months only when non-zero. Days only when non-zero, hours when
/// days or hours are. Minutes and seconds always.
fn visible_units(b: &CountdownBreakdown) -> Vec<CountdownUnit> {
    let mut units = Vec::with_capacity(6);
    if b.years > 0 {
        units.push(CountdownUnit::new("Years", b.years.into()));
    }
    if b.years > 0 || b.months > 0 {
        units.push(CountdownUnit::new("Months", b.months.into()));
    }
    if b.days > 0 {
        units.push(CountdownUnit::new("Days", b.days));
    }
    if b.days > 0 || b.hours > 0 {
        units.push(CountdownUnit::new("Hours", b.hours));
    }
    units.push(CountdownUnit::new("Mins", b.minutes));
    units.push(CountdownUnit::new("Secs", b.seconds));
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn labels(view: &CountdownView) -> Vec<(&str, &str)> {
        view.units
            .iter()
            .map(|u| (u.label, u.value.as_str()))
            .collect()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn one_hour_five_minutes_shows_hours_minutes_seconds() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap();
        let view = CountdownView::at(now, now + Duration::minutes(65), DisplayZone::utc());

        assert!(!view.in_progress);
        assert_eq!(labels(&view), vec![("Hours", "01"), ("Mins", "05"), ("Secs", "00")]);
        assert_eq!(view.urgency, Urgency::Normal);
    }

    #[test]
    fn switches_to_in_progress_at_kickoff() {
        let target = Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap();
        for now in [target, target + Duration::seconds(1), target + Duration::days(3)] {
            let view = CountdownView::at(now, target, DisplayZone::utc());
            assert!(view.in_progress);
            assert_eq!(view.label.as_deref(), Some(IN_PROGRESS_LABEL));
            assert!(view.units.is_empty());
        }

        let just_before = CountdownView::at(target - Duration::seconds(1), target, DisplayZone::utc());
        assert!(!just_before.in_progress);
        assert_eq!(labels(&just_before), vec![("Mins", "00"), ("Secs", "01")]);
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(Urgency::for_seconds_left(299), Urgency::Urgent);
        assert_eq!(Urgency::for_seconds_left(300), Urgency::Soon);
        assert_eq!(Urgency::for_seconds_left(3_599), Urgency::Soon);
        assert_eq!(Urgency::for_seconds_left(3_600), Urgency::Normal);
    }

    #[test]
    fn days_show_hours_even_when_zero() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap();
        let view = CountdownView::at(now, now + Duration::days(2) + Duration::seconds(7), DisplayZone::utc());
        assert_eq!(
            labels(&view),
            vec![("Days", "02"), ("Hours", "00"), ("Mins", "00"), ("Secs", "07")]
        );
    }

    #[test]
    fn months_are_calendar_months_with_clamping() {
        let b = CountdownBreakdown::between(naive(2025, 1, 31, 0), naive(2025, 3, 1, 0));
        assert_eq!((b.months, b.days), (1, 1));

        let b = CountdownBreakdown::between(naive(2025, 1, 15, 12), naive(2025, 1, 15, 11));
        assert_eq!(b, CountdownBreakdown::default());

        let b = CountdownBreakdown::between(naive(2024, 3, 10, 8), naive(2025, 5, 12, 9));
        assert_eq!((b.years, b.months, b.days, b.hours), (1, 2, 2, 1));
    }
}
