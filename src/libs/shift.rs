//! Recurring shift pattern data model.
//!
//! A shift pattern assigns a schedule window (a `[start, end)` time-of-day
//! range owned by the schedule catalog) to a set of weekdays and a set of
//! ordinal weeks of the month. Day and week sets are small bitmasks so they
//! intersect cheaply and store as a single integer column.

use crate::libs::error::{AttendanceError, Result};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Set of weekdays, bit 0 is Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);
    pub const ALL: DaySet = DaySet(0b111_1111);

    pub fn from_bits(bits: u8) -> Self {
        DaySet(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn intersection(self, other: DaySet) -> DaySet {
        DaySet(self.0 & other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEKDAYS.into_iter().filter(move |day| self.contains(*day))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = DaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let days: Vec<String> = self.iter().map(|day| day.to_string()).collect();
        write!(f, "{}", days.join(","))
    }
}

impl FromStr for DaySet {
    type Err = String;

    /// Parses a comma separated list such as `mon,wed,fri`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<Weekday>().map_err(|_| format!("invalid weekday '{}'", part)))
            .collect()
    }
}

/// Set of ordinal weeks of the month (1st..5th), bit 0 is the first week.
///
/// An empty set means "no constraint" and is normalized to all five weeks
/// before any comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WeekSet(u8);

impl WeekSet {
    pub const EMPTY: WeekSet = WeekSet(0);
    pub const ALL: WeekSet = WeekSet(0b1_1111);

    pub fn from_bits(bits: u8) -> Self {
        WeekSet(bits & Self::ALL.0)
    }

    pub fn from_weeks<I: IntoIterator<Item = u8>>(weeks: I) -> Result<Self> {
        let mut set = WeekSet::EMPTY;
        for week in weeks {
            if !(1..=5).contains(&week) {
                return Err(AttendanceError::InvalidWeekOfMonth(week));
            }
            set.0 |= 1 << (week - 1);
        }
        Ok(set)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, week: u8) -> bool {
        (1..=5).contains(&week) && self.0 & (1 << (week - 1)) != 0
    }

    pub fn normalized(self) -> WeekSet {
        if self.0 == 0 {
            WeekSet::ALL
        } else {
            self
        }
    }

    pub fn intersection(self, other: WeekSet) -> WeekSet {
        WeekSet(self.normalized().0 & other.normalized().0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=5).filter(move |week| self.contains(*week))
    }
}

impl fmt::Display for WeekSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let weeks: Vec<String> = self.normalized().iter().map(|week| week.to_string()).collect();
        write!(f, "{}", weeks.join(","))
    }
}

impl FromStr for WeekSet {
    type Err = String;

    /// Parses a comma separated list such as `1,3`; an empty string means all weeks.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let weeks = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>().map_err(|_| format!("invalid week '{}'", part)))
            .collect::<std::result::Result<Vec<u8>, String>>()?;
        WeekSet::from_weeks(weeks).map_err(|e| e.to_string())
    }
}

/// Ordinal week of the month a date falls in: days 1-7 are week 1, 29-31 week 5.
pub fn week_of_month(date: NaiveDate) -> u8 {
    (date.day0() / 7 + 1) as u8
}

/// Half-open time-of-day window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ScheduleWindow {
    /// Windows never wrap midnight, so `start` must precede `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(AttendanceError::InvalidWindow { start, end });
        }
        Ok(ScheduleWindow { start, end })
    }

    /// Touching windows (`[09:00,13:00)` and `[13:00,17:00)`) do not overlap.
    pub fn overlaps(&self, other: &ScheduleWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for ScheduleWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Soft-delete lifecycle of a pattern. Inactive patterns are kept for audit
/// and possible reactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStatus {
    Active,
    Inactive,
}

impl PatternStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternStatus::Active => "active",
            PatternStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for PatternStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatternStatus {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(PatternStatus::Active),
            "inactive" => Ok(PatternStatus::Inactive),
            other => Err(AttendanceError::UnknownValue(other.to_string())),
        }
    }
}

/// A persisted recurring shift assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPattern {
    pub id: i64,
    pub employee_id: String,
    pub schedule_id: i64,
    pub days: DaySet,
    pub weeks: WeekSet,
    pub status: PatternStatus,
}

impl ShiftPattern {
    pub fn is_active(&self) -> bool {
        self.status == PatternStatus::Active
    }

    /// Whether the pattern recurs on the given date.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.days.contains(date.weekday()) && self.weeks.normalized().contains(week_of_month(date))
    }
}

/// A pattern paired with the window of the schedule it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPattern {
    pub pattern: ShiftPattern,
    pub window: ScheduleWindow,
}

/// Pattern parameters proposed for creation, edit or reactivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCandidate {
    pub employee_id: String,
    pub schedule_id: i64,
    pub days: DaySet,
    pub weeks: WeekSet,
    pub window: ScheduleWindow,
}

impl PatternCandidate {
    pub fn from_resolved(resolved: &ResolvedPattern) -> Self {
        PatternCandidate {
            employee_id: resolved.pattern.employee_id.clone(),
            schedule_id: resolved.pattern.schedule_id,
            days: resolved.pattern.days,
            weeks: resolved.pattern.weeks,
            window: resolved.window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_set_parse_and_display() {
        let days: DaySet = "mon, wed,Fri".parse().unwrap();
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Wed));
        assert!(days.contains(Weekday::Fri));
        assert!(!days.contains(Weekday::Tue));
        assert_eq!(days.to_string(), "Mon,Wed,Fri");
        assert!("mon,funday".parse::<DaySet>().is_err());
    }

    #[test]
    fn test_empty_week_set_means_all_weeks() {
        let first: WeekSet = "1".parse().unwrap();
        assert_eq!(WeekSet::EMPTY.normalized(), WeekSet::ALL);
        assert_eq!(WeekSet::EMPTY.intersection(first), first);
        assert_eq!("".parse::<WeekSet>().unwrap().to_string(), "1,2,3,4,5");
    }

    #[test]
    fn test_week_set_rejects_out_of_range() {
        assert!(matches!(WeekSet::from_weeks([0]), Err(AttendanceError::InvalidWeekOfMonth(0))));
        assert!(matches!(WeekSet::from_weeks([6]), Err(AttendanceError::InvalidWeekOfMonth(6))));
    }

    #[test]
    fn test_week_of_month() {
        let date = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        assert_eq!(week_of_month(date(1)), 1);
        assert_eq!(week_of_month(date(7)), 1);
        assert_eq!(week_of_month(date(8)), 2);
        assert_eq!(week_of_month(date(28)), 4);
        assert_eq!(week_of_month(date(31)), 5);
    }

    #[test]
    fn test_window_overlap_is_half_open() {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let morning = ScheduleWindow::new(t(9), t(13)).unwrap();
        let afternoon = ScheduleWindow::new(t(13), t(17)).unwrap();
        let midday = ScheduleWindow::new(t(10), t(14)).unwrap();

        assert!(!morning.overlaps(&afternoon));
        assert!(!afternoon.overlaps(&morning));
        assert!(morning.overlaps(&midday));
        assert!(midday.overlaps(&afternoon));
        assert!(ScheduleWindow::new(t(17), t(9)).is_err());
    }

    #[test]
    fn test_pattern_applies_on_date() {
        let pattern = ShiftPattern {
            id: 1,
            employee_id: "E1".to_string(),
            schedule_id: 1,
            days: "mon".parse().unwrap(),
            weeks: "1,3".parse().unwrap(),
            status: PatternStatus::Active,
        };
        // 2025-03-03 is the first Monday, 2025-03-10 the second.
        assert!(pattern.applies_on(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()));
        assert!(!pattern.applies_on(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
        assert!(pattern.applies_on(NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()));
        assert!(!pattern.applies_on(NaiveDate::from_ymd_opt(2025, 3, 18).unwrap()));
    }
}
