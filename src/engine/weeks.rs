//! Reporting weeks within a calendar month.

use crate::engine::balance::LedgerWindow;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Splits a month into contiguous reporting weeks.
///
/// Contract: week 1 starts on the 1st, every week ends on the same weekday,
/// the final week runs into the next month until that weekday, and the weeks
/// cover each day of the month exactly once.
pub trait WeekCalendar: Send + Sync + std::fmt::Debug {
    /// Weeks of `month` (1-12) in `year`, keyed from 1. Empty for invalid input.
    fn weeks_of(&self, year: i32, month: u32) -> BTreeMap<u32, Vec<NaiveDate>>;

    /// Bounds of the reporting week that contains `date`, looked up in the
    /// date's own month.
    fn week_containing(&self, date: NaiveDate) -> Option<LedgerWindow> {
        self.weeks_of(date.year(), date.month())
            .into_values()
            .find(|days| days.contains(&date))
            .and_then(|days| Some(LedgerWindow::new(*days.first()?, *days.last()?)))
    }
}

/// Weeks that all close on one fixed weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWeekdayCalendar {
    week_end: Weekday,
}

impl FixedWeekdayCalendar {
    pub fn new(week_end: Weekday) -> Self {
        Self { week_end }
    }

    pub fn week_end(&self) -> Weekday {
        self.week_end
    }
}

impl Default for FixedWeekdayCalendar {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

impl WeekCalendar for FixedWeekdayCalendar {
    fn weeks_of(&self, year: i32, month: u32) -> BTreeMap<u32, Vec<NaiveDate>> {
        let mut weeks = BTreeMap::new();
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return weeks;
        };

        let mut current = Vec::new();
        for day in first.iter_days() {
            let in_month = day.month() == month;
            if !in_month && current.is_empty() {
                break;
            }
            current.push(day);
            if day.weekday() == self.week_end {
                let index = weeks.len() as u32 + 1;
                weeks.insert(index, std::mem::take(&mut current));
                if !in_month {
                    break;
                }
            }
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weeks_end_on_fixed_weekday_and_spill_into_next_month() {
        // May 2024 starts on a Wednesday and ends on a Friday.
        let weeks = FixedWeekdayCalendar::new(Weekday::Sun).weeks_of(2024, 5);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[&1].first(), Some(&date(2024, 5, 1)));
        assert_eq!(weeks[&1].last(), Some(&date(2024, 5, 5)));
        assert_eq!(weeks[&5].first(), Some(&date(2024, 5, 27)));
        assert_eq!(weeks[&5].last(), Some(&date(2024, 6, 2)));
        for days in weeks.values() {
            assert_eq!(days.last().unwrap().weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn test_weeks_cover_month_exactly_once() {
        let weeks = FixedWeekdayCalendar::new(Weekday::Thu).weeks_of(2024, 2);
        let in_month: Vec<NaiveDate> = weeks
            .values()
            .flatten()
            .copied()
            .filter(|d| d.month() == 2)
            .collect();
        assert_eq!(in_month.len(), 29);
        let mut sorted = in_month.clone();
        sorted.dedup();
        assert_eq!(sorted, in_month);
        let keys: Vec<u32> = weeks.keys().copied().collect();
        assert_eq!(keys, (1..=weeks.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_month_ending_on_week_end_does_not_spill() {
        // March 2024 ends on a Sunday.
        let weeks = FixedWeekdayCalendar::new(Weekday::Sun).weeks_of(2024, 3);
        let last = weeks.values().last().unwrap();
        assert_eq!(last.last(), Some(&date(2024, 3, 31)));
    }

    #[test]
    fn test_december_spills_into_next_year() {
        // Dec 2024 ends on a Tuesday.
        let weeks = FixedWeekdayCalendar::new(Weekday::Sun).weeks_of(2024, 12);
        let last = weeks.values().last().unwrap();
        assert_eq!(last.last(), Some(&date(2025, 1, 5)));
    }

    #[test]
    fn test_invalid_month_is_empty() {
        assert!(FixedWeekdayCalendar::default().weeks_of(2024, 13).is_empty());
    }

    #[test]
    fn test_week_containing() {
        let cal = FixedWeekdayCalendar::new(Weekday::Sun);
        let window = cal.week_containing(date(2024, 5, 15)).unwrap();
        assert_eq!(window, LedgerWindow::new(date(2024, 5, 13), date(2024, 5, 19)));

        let first = cal.week_containing(date(2024, 5, 2)).unwrap();
        assert_eq!(first, LedgerWindow::new(date(2024, 5, 1), date(2024, 5, 5)));
    }
}
