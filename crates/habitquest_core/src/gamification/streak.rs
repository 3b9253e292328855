//! Consecutive-day streak calculation.
//!
//! One implementation backs both the habit performance view and the
//! `PERFECT_WEEK` achievement rule.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::collections::BTreeSet;

/// Maps an instant to the local calendar day it falls on.
pub fn local_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Streak evaluator anchored to one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakCalculator {
    today: NaiveDate,
}

impl StreakCalculator {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Counts consecutive days ending today or yesterday.
    ///
    /// Duplicate days collapse to one. Returns 0 when the most recent day is
    /// neither today nor yesterday.
    pub fn current_streak<I>(&self, days: I) -> u32
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let distinct: BTreeSet<NaiveDate> = days.into_iter().collect();
        let mut descending = distinct.iter().rev().copied();
        let Some(latest) = descending.next() else {
            return 0;
        };

        if latest != self.today && Some(latest) != self.today.pred_opt() {
            return 0;
        }

        let mut streak = 1;
        let mut current = latest;
        for day in descending {
            if current.pred_opt() != Some(day) {
                break;
            }
            streak += 1;
            current = day;
        }
        streak
    }
}

#[cfg(test)]
mod tests {
    use super::{local_day, StreakCalculator};
    use chrono::{Duration, Local, NaiveDate, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn ago(days: i64) -> NaiveDate {
        today() - Duration::days(days)
    }

    #[test]
    fn empty_input_has_no_streak() {
        let calc = StreakCalculator::new(today());
        assert_eq!(calc.current_streak(Vec::new()), 0);
    }

    #[test]
    fn chain_ending_today_or_yesterday_counts() {
        let calc = StreakCalculator::new(today());
        assert_eq!(calc.current_streak([ago(0)]), 1);
        assert_eq!(calc.current_streak([ago(1)]), 1);
        assert_eq!(calc.current_streak([ago(2), ago(0), ago(1)]), 3);
        assert_eq!(calc.current_streak([ago(1), ago(2), ago(3)]), 3);
    }

    #[test]
    fn gap_stops_the_walk() {
        let calc = StreakCalculator::new(today());
        assert_eq!(calc.current_streak([ago(0), ago(2)]), 1);
        assert_eq!(calc.current_streak([ago(0), ago(1), ago(3), ago(4)]), 2);
    }

    #[test]
    fn broken_streak_resets_to_zero() {
        let calc = StreakCalculator::new(today());
        assert_eq!(calc.current_streak([ago(2)]), 0);
        assert_eq!(calc.current_streak([ago(2), ago(3), ago(4), ago(5)]), 0);
    }

    #[test]
    fn duplicate_days_collapse() {
        let calc = StreakCalculator::new(today());
        assert_eq!(calc.current_streak([ago(0), ago(0), ago(1), ago(1)]), 2);
    }

    #[test]
    fn streak_crosses_month_and_year_boundaries() {
        let calc = StreakCalculator::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let days = [
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
        ];
        assert_eq!(calc.current_streak(days), 3);
    }

    #[test]
    fn instants_on_the_same_local_day_map_to_one_day() {
        let morning = Local.with_ymd_and_hms(2026, 10, 14, 0, 5, 0).earliest().unwrap();
        let night = Local.with_ymd_and_hms(2026, 10, 14, 23, 55, 0).earliest().unwrap();
        assert_eq!(local_day(&morning), local_day(&night));
        assert_eq!(local_day(&night), today());
    }
}
