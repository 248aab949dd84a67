//! Recurrence rules for scheduled transactions
//!
//! A rule describes how a scheduled transaction repeats: frequency, interval,
//! optional day constraints, and an end condition. All date math here is
//! date-only (no times, no timezones) and pure: the rule plus an anchor date
//! fully determine the occurrence sequence.
//!
//! Semantics:
//!
//! - The anchor is the schedule's start date. It is itself the first
//!   occurrence when it satisfies the rule's day constraints; otherwise the
//!   first occurrence is the first constrained day on/after the anchor.
//! - Weeks start on Monday. Weekly candidate weeks are the anchor's week,
//!   anchor week + interval, and so on; every weekday in `by_weekday`
//!   (sorted Mon..Sun) yields an occurrence within a candidate week.
//! - Monthly occurrences are stepped from the anchor month, never from a
//!   previously clamped date, so a day-31 rule yields Jan 31, Feb 28, Mar 31
//!   with no drift. Short months clamp to their last day.
//! - `Until` is inclusive. `Count(n)` limits total consumed occurrences
//!   (advances plus skips).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on internal stepping so a malformed rule cannot loop forever
const MAX_STEPS: u32 = 512;

/// How often a rule repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" | "annually" => Ok(Self::Yearly),
            _ => Err(format!(
                "Invalid frequency: '{}'. Valid frequencies: daily, weekly, monthly, yearly",
                s
            )),
        }
    }
}

/// When a rule stops producing occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum RecurrenceEnd {
    /// Repeats forever
    #[default]
    Never,
    /// Last occurrence on or before this date (inclusive)
    Until(NaiveDate),
    /// Total number of occurrences the rule will ever produce
    Count(u32),
}

/// A recurrence rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Base frequency
    pub frequency: Frequency,

    /// Every N days/weeks/months/years; must be >= 1
    pub interval: u32,

    /// Weekly only: which weekdays occur. Empty means the anchor's weekday.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_weekday: Vec<Weekday>,

    /// Monthly only: day of month 1-31. None means the anchor's day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_monthday: Option<u32>,

    /// End condition
    #[serde(default)]
    pub end: RecurrenceEnd,
}

impl RecurrenceRule {
    /// Create a rule that repeats every `interval` units with no day
    /// constraints and no end
    pub fn new(frequency: Frequency, interval: u32) -> Self {
        Self {
            frequency,
            interval,
            by_weekday: Vec::new(),
            by_monthday: None,
            end: RecurrenceEnd::Never,
        }
    }

    /// Validate the rule against its anchor date
    pub fn validate(&self, anchor: NaiveDate) -> Result<(), RecurrenceError> {
        if self.interval == 0 {
            return Err(RecurrenceError::ZeroInterval);
        }

        if !self.by_weekday.is_empty() && self.frequency != Frequency::Weekly {
            return Err(RecurrenceError::WeekdayOnNonWeekly);
        }

        if let Some(day) = self.by_monthday {
            if self.frequency != Frequency::Monthly {
                return Err(RecurrenceError::MonthdayOnNonMonthly);
            }
            if !(1..=31).contains(&day) {
                return Err(RecurrenceError::InvalidMonthday(day));
            }
        }

        match self.end {
            RecurrenceEnd::Count(0) => return Err(RecurrenceError::ZeroCount),
            RecurrenceEnd::Until(until) if until < anchor => {
                return Err(RecurrenceError::UntilBeforeAnchor { until, anchor });
            }
            _ => {}
        }

        Ok(())
    }

    /// First date on/after the anchor that satisfies the rule, or `None` when
    /// the end condition rules it out
    pub fn first_occurrence(&self, anchor: NaiveDate) -> Result<Option<NaiveDate>, RecurrenceError> {
        if let RecurrenceEnd::Count(0) = self.end {
            return Ok(None);
        }

        let first = self.next_raw(anchor, prev_day(anchor))?;

        if let RecurrenceEnd::Until(until) = self.end {
            if first > until {
                return Ok(None);
            }
        }

        Ok(Some(first))
    }

    /// The next occurrence strictly after `after`, or `None` when the rule
    /// has ended (past `Until`, or `occurrences_done` has reached the count)
    pub fn occurrence_after(
        &self,
        anchor: NaiveDate,
        after: NaiveDate,
        occurrences_done: u32,
    ) -> Result<Option<NaiveDate>, RecurrenceError> {
        if let RecurrenceEnd::Count(n) = self.end {
            if occurrences_done >= n {
                return Ok(None);
            }
        }

        let next = self.next_raw(anchor, after.max(prev_day(anchor)))?;

        if let RecurrenceEnd::Until(until) = self.end {
            if next > until {
                return Ok(None);
            }
        }

        Ok(Some(next))
    }

    /// All occurrences inside the inclusive window `[range_start, range_end]`
    /// in ascending order, honoring end conditions and capped at `limit`.
    ///
    /// `occurrences_done` is counted against `Count` rules starting from the
    /// first occurrence inside the window; callers expanding a live schedule
    /// pass the schedule's pending occurrence (or later) as `range_start`.
    pub fn occurrences_between(
        &self,
        anchor: NaiveDate,
        range_start: NaiveDate,
        range_end: NaiveDate,
        occurrences_done: u32,
        limit: usize,
    ) -> Result<Vec<NaiveDate>, RecurrenceError> {
        let mut out = Vec::new();

        if range_end < range_start || limit == 0 {
            return Ok(out);
        }

        let remaining = match self.end {
            RecurrenceEnd::Count(n) => n.saturating_sub(occurrences_done) as usize,
            _ => usize::MAX,
        };
        let cap = limit.min(remaining);
        if cap == 0 {
            return Ok(out);
        }

        // Smallest occurrence >= both the anchor and the window start
        let mut current = self.next_raw(anchor, prev_day(range_start.max(anchor)))?;

        for _ in 0..MAX_STEPS {
            if current > range_end {
                break;
            }
            if let RecurrenceEnd::Until(until) = self.end {
                if current > until {
                    break;
                }
            }

            out.push(current);
            if out.len() >= cap {
                break;
            }

            current = self.next_raw(anchor, current)?;
        }

        Ok(out)
    }

    /// Smallest raw occurrence (end conditions ignored) that is strictly
    /// after `after` and on/after the anchor
    fn next_raw(&self, anchor: NaiveDate, after: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        match self.frequency {
            Frequency::Daily => self.next_daily(anchor, after),
            Frequency::Weekly => self.next_weekly(anchor, after),
            Frequency::Monthly => self.next_monthly(anchor, after),
            Frequency::Yearly => self.next_yearly(anchor, after),
        }
    }

    fn next_daily(&self, anchor: NaiveDate, after: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        if after < anchor {
            return Ok(anchor);
        }

        let interval = self.interval as i64;
        let elapsed = (after - anchor).num_days();
        let steps = elapsed / interval + 1;

        anchor
            .checked_add_signed(Duration::days(steps * interval))
            .ok_or(RecurrenceError::DateOverflow)
    }

    fn next_weekly(&self, anchor: NaiveDate, after: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        // Occurrence weekdays, sorted Mon..Sun; empty constraint means the
        // anchor's own weekday
        let mut offsets: Vec<i64> = if self.by_weekday.is_empty() {
            vec![anchor.weekday().num_days_from_monday() as i64]
        } else {
            self.by_weekday
                .iter()
                .map(|wd| wd.num_days_from_monday() as i64)
                .collect()
        };
        offsets.sort_unstable();
        offsets.dedup();

        let anchor_week = week_start(anchor);
        let step_days = self.interval as i64 * 7;

        // Fast-forward to the candidate week containing (or preceding) `after`
        let mut week_index = if after <= anchor_week {
            0
        } else {
            (after - anchor_week).num_days() / step_days
        };

        for _ in 0..MAX_STEPS {
            let week = anchor_week
                .checked_add_signed(Duration::days(week_index * step_days))
                .ok_or(RecurrenceError::DateOverflow)?;

            for &offset in &offsets {
                let candidate = week + Duration::days(offset);
                if candidate > after && candidate >= anchor {
                    return Ok(candidate);
                }
            }

            week_index += 1;
        }

        Err(RecurrenceError::IterationGuard)
    }

    fn next_monthly(&self, anchor: NaiveDate, after: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        let target_day = self.by_monthday.unwrap_or(anchor.day());
        let interval = self.interval as i64;
        let anchor_month = month_index(anchor.year(), anchor.month());

        // Fast-forward to the candidate month at or just before `after`
        let after_month = month_index(after.year(), after.month());
        let mut step = if after_month <= anchor_month {
            0
        } else {
            (after_month - anchor_month) / interval
        };

        for _ in 0..MAX_STEPS {
            let (year, month) = month_from_index(anchor_month + step * interval);
            let candidate =
                clamped_date(year, month, target_day).ok_or(RecurrenceError::DateOverflow)?;

            if candidate > after && candidate >= anchor {
                return Ok(candidate);
            }

            step += 1;
        }

        Err(RecurrenceError::IterationGuard)
    }

    fn next_yearly(&self, anchor: NaiveDate, after: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        let interval = self.interval as i64;

        let mut step = if after.year() <= anchor.year() {
            0
        } else {
            (after.year() - anchor.year()) as i64 / interval
        };

        for _ in 0..MAX_STEPS {
            let year = anchor.year() as i64 + step * interval;
            let year = i32::try_from(year).map_err(|_| RecurrenceError::DateOverflow)?;
            // Feb 29 anchors clamp to Feb 28 on non-leap years
            let candidate = clamped_date(year, anchor.month(), anchor.day())
                .ok_or(RecurrenceError::DateOverflow)?;

            if candidate > after && candidate >= anchor {
                return Ok(candidate);
            }

            step += 1;
        }

        Err(RecurrenceError::IterationGuard)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval == 1 {
            write!(f, "{}", self.frequency)?;
        } else {
            let unit = match self.frequency {
                Frequency::Daily => "days",
                Frequency::Weekly => "weeks",
                Frequency::Monthly => "months",
                Frequency::Yearly => "years",
            };
            write!(f, "every {} {}", self.interval, unit)?;
        }

        if !self.by_weekday.is_empty() {
            let days: Vec<String> = self.by_weekday.iter().map(|d| d.to_string()).collect();
            write!(f, " on {}", days.join(","))?;
        }
        if let Some(day) = self.by_monthday {
            write!(f, " on day {}", day)?;
        }

        match self.end {
            RecurrenceEnd::Never => Ok(()),
            RecurrenceEnd::Until(date) => write!(f, " until {}", date),
            RecurrenceEnd::Count(n) => write!(f, " ({} times)", n),
        }
    }
}

/// Monday of the week containing `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The day before `date`, saturating at the calendar minimum
fn prev_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

fn month_index(year: i32, month: u32) -> i64 {
    year as i64 * 12 + (month as i64 - 1)
}

fn month_from_index(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, (index.rem_euclid(12) + 1) as u32)
}

/// Build a date, clamping the day to the last day of short months
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1).map(|d| d - Duration::days(1))
    })
}

/// Errors from rule validation or occurrence computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    ZeroInterval,
    InvalidMonthday(u32),
    WeekdayOnNonWeekly,
    MonthdayOnNonMonthly,
    ZeroCount,
    UntilBeforeAnchor { until: NaiveDate, anchor: NaiveDate },
    IterationGuard,
    DateOverflow,
}

impl fmt::Display for RecurrenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval => write!(f, "Interval must be at least 1"),
            Self::InvalidMonthday(day) => write!(f, "Day of month must be 1-31 (got {})", day),
            Self::WeekdayOnNonWeekly => {
                write!(f, "Weekday constraints only apply to weekly rules")
            }
            Self::MonthdayOnNonMonthly => {
                write!(f, "Day-of-month constraints only apply to monthly rules")
            }
            Self::ZeroCount => write!(f, "Occurrence count must be at least 1"),
            Self::UntilBeforeAnchor { until, anchor } => {
                write!(f, "End date {} is before the start date {}", until, anchor)
            }
            Self::IterationGuard => {
                write!(f, "Rule exceeded {} steps without producing a date", MAX_STEPS)
            }
            Self::DateOverflow => write!(f, "Date arithmetic out of range"),
        }
    }
}

impl std::error::Error for RecurrenceError {}

impl From<RecurrenceError> for crate::error::HearthError {
    fn from(err: RecurrenceError) -> Self {
        Self::Recurrence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(frequency: Frequency, interval: u32) -> RecurrenceRule {
        RecurrenceRule::new(frequency, interval)
    }

    // ---------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------

    #[test]
    fn test_validate_rejects_zero_interval() {
        let r = rule(Frequency::Daily, 0);
        assert_eq!(r.validate(date(2026, 1, 1)), Err(RecurrenceError::ZeroInterval));
    }

    #[test]
    fn test_validate_rejects_misplaced_constraints() {
        let mut r = rule(Frequency::Daily, 1);
        r.by_weekday = vec![Weekday::Mon];
        assert_eq!(
            r.validate(date(2026, 1, 1)),
            Err(RecurrenceError::WeekdayOnNonWeekly)
        );

        let mut r = rule(Frequency::Weekly, 1);
        r.by_monthday = Some(15);
        assert_eq!(
            r.validate(date(2026, 1, 1)),
            Err(RecurrenceError::MonthdayOnNonMonthly)
        );

        let mut r = rule(Frequency::Monthly, 1);
        r.by_monthday = Some(32);
        assert_eq!(
            r.validate(date(2026, 1, 1)),
            Err(RecurrenceError::InvalidMonthday(32))
        );
    }

    #[test]
    fn test_validate_rejects_bad_end() {
        let mut r = rule(Frequency::Daily, 1);
        r.end = RecurrenceEnd::Count(0);
        assert_eq!(r.validate(date(2026, 1, 1)), Err(RecurrenceError::ZeroCount));

        r.end = RecurrenceEnd::Until(date(2025, 12, 31));
        assert!(matches!(
            r.validate(date(2026, 1, 1)),
            Err(RecurrenceError::UntilBeforeAnchor { .. })
        ));
    }

    // ---------------------------------------------------------------
    // Daily
    // ---------------------------------------------------------------

    #[test]
    fn test_daily_anchor_is_first() {
        let r = rule(Frequency::Daily, 1);
        let anchor = date(2026, 1, 15);
        assert_eq!(r.first_occurrence(anchor).unwrap(), Some(anchor));
    }

    #[test]
    fn test_daily_interval() {
        let r = rule(Frequency::Daily, 3);
        let anchor = date(2026, 1, 1);
        assert_eq!(
            r.occurrence_after(anchor, anchor, 1).unwrap(),
            Some(date(2026, 1, 4))
        );
        // strictly after a non-occurrence date
        assert_eq!(
            r.occurrence_after(anchor, date(2026, 1, 5), 2).unwrap(),
            Some(date(2026, 1, 7))
        );
    }

    #[test]
    fn test_daily_far_future_window() {
        // Fast-forward arithmetic, not stepping: a window years after the
        // anchor must not trip the iteration guard
        let r = rule(Frequency::Daily, 1);
        let anchor = date(2020, 1, 1);
        let occurrences = r
            .occurrences_between(anchor, date(2026, 6, 1), date(2026, 6, 3), 0, 100)
            .unwrap();
        assert_eq!(
            occurrences,
            vec![date(2026, 6, 1), date(2026, 6, 2), date(2026, 6, 3)]
        );
    }

    // ---------------------------------------------------------------
    // Weekly
    // ---------------------------------------------------------------

    #[test]
    fn test_weekly_empty_constraint_uses_anchor_weekday() {
        let r = rule(Frequency::Weekly, 1);
        let anchor = date(2026, 1, 7); // a Wednesday
        assert_eq!(r.first_occurrence(anchor).unwrap(), Some(anchor));
        assert_eq!(
            r.occurrence_after(anchor, anchor, 1).unwrap(),
            Some(date(2026, 1, 14))
        );
    }

    #[test]
    fn test_weekly_multiple_weekdays_mid_week_anchor() {
        // Anchor Wednesday 2026-01-07; Mon+Fri rule: first occurrence is the
        // Friday of the anchor week
        let mut r = rule(Frequency::Weekly, 1);
        r.by_weekday = vec![Weekday::Fri, Weekday::Mon]; // unsorted on purpose
        let anchor = date(2026, 1, 7);

        assert_eq!(r.first_occurrence(anchor).unwrap(), Some(date(2026, 1, 9)));
        assert_eq!(
            r.occurrence_after(anchor, date(2026, 1, 9), 1).unwrap(),
            Some(date(2026, 1, 12)) // Monday of the following week
        );
    }

    #[test]
    fn test_weekly_biweekly_skips_off_weeks() {
        let mut r = rule(Frequency::Weekly, 2);
        r.by_weekday = vec![Weekday::Mon];
        let anchor = date(2026, 1, 5); // a Monday

        assert_eq!(r.first_occurrence(anchor).unwrap(), Some(anchor));
        assert_eq!(
            r.occurrence_after(anchor, anchor, 1).unwrap(),
            Some(date(2026, 1, 19))
        );
        // A date inside the off week still lands on the next candidate week
        assert_eq!(
            r.occurrence_after(anchor, date(2026, 1, 13), 1).unwrap(),
            Some(date(2026, 1, 19))
        );
    }

    // ---------------------------------------------------------------
    // Monthly (clamping)
    // ---------------------------------------------------------------

    #[test]
    fn test_monthly_day_31_clamps_without_drift() {
        let r = rule(Frequency::Monthly, 1);
        let anchor = date(2026, 1, 31);

        assert_eq!(r.first_occurrence(anchor).unwrap(), Some(anchor));
        let feb = r.occurrence_after(anchor, anchor, 1).unwrap().unwrap();
        assert_eq!(feb, date(2026, 2, 28));
        // Back to the 31st in March: stepping is from the anchor, not the
        // clamped February date
        let mar = r.occurrence_after(anchor, feb, 2).unwrap().unwrap();
        assert_eq!(mar, date(2026, 3, 31));
    }

    #[test]
    fn test_monthly_clamp_leap_february() {
        let r = rule(Frequency::Monthly, 1);
        let anchor = date(2028, 1, 31);
        let feb = r.occurrence_after(anchor, anchor, 1).unwrap().unwrap();
        assert_eq!(feb, date(2028, 2, 29));
    }

    #[test]
    fn test_monthly_by_monthday_before_anchor_day() {
        let mut r = rule(Frequency::Monthly, 1);
        r.by_monthday = Some(10);
        let anchor = date(2026, 1, 15);
        // Jan 10 is before the anchor, so the series starts Feb 10
        assert_eq!(r.first_occurrence(anchor).unwrap(), Some(date(2026, 2, 10)));
    }

    #[test]
    fn test_monthly_interval_steps_anchor_months() {
        let r = rule(Frequency::Monthly, 3);
        let anchor = date(2026, 1, 15);
        assert_eq!(
            r.occurrence_after(anchor, anchor, 1).unwrap(),
            Some(date(2026, 4, 15))
        );
        assert_eq!(
            r.occurrence_after(anchor, date(2026, 5, 1), 2).unwrap(),
            Some(date(2026, 7, 15))
        );
    }

    // ---------------------------------------------------------------
    // Yearly
    // ---------------------------------------------------------------

    #[test]
    fn test_yearly_feb_29_clamps_on_non_leap() {
        let r = rule(Frequency::Yearly, 1);
        let anchor = date(2028, 2, 29);
        assert_eq!(
            r.occurrence_after(anchor, anchor, 1).unwrap(),
            Some(date(2029, 2, 28))
        );
        // And lands back on the 29th in the next leap year
        assert_eq!(
            r.occurrence_after(anchor, date(2031, 3, 1), 3).unwrap(),
            Some(date(2032, 2, 29))
        );
    }

    // ---------------------------------------------------------------
    // End conditions
    // ---------------------------------------------------------------

    #[test]
    fn test_until_is_inclusive() {
        let mut r = rule(Frequency::Daily, 7);
        let anchor = date(2026, 1, 1);
        r.end = RecurrenceEnd::Until(date(2026, 1, 15));

        // Jan 15 is an occurrence and equals the until date: still produced
        assert_eq!(
            r.occurrence_after(anchor, date(2026, 1, 8), 1).unwrap(),
            Some(date(2026, 1, 15))
        );
        // The one after is past the end
        assert_eq!(r.occurrence_after(anchor, date(2026, 1, 15), 2).unwrap(), None);
    }

    #[test]
    fn test_until_before_first_occurrence_yields_nothing() {
        let mut r = rule(Frequency::Monthly, 1);
        r.by_monthday = Some(10);
        r.end = RecurrenceEnd::Until(date(2026, 2, 5));
        // First match would be Feb 10, past the until date
        assert_eq!(r.first_occurrence(date(2026, 1, 15)).unwrap(), None);
    }

    #[test]
    fn test_count_limits_occurrences() {
        let mut r = rule(Frequency::Daily, 1);
        r.end = RecurrenceEnd::Count(2);
        let anchor = date(2026, 1, 1);

        assert_eq!(r.first_occurrence(anchor).unwrap(), Some(anchor));
        assert_eq!(
            r.occurrence_after(anchor, anchor, 1).unwrap(),
            Some(date(2026, 1, 2))
        );
        // Two consumed: the rule has ended
        assert_eq!(r.occurrence_after(anchor, date(2026, 1, 2), 2).unwrap(), None);
    }

    // ---------------------------------------------------------------
    // Window expansion
    // ---------------------------------------------------------------

    #[test]
    fn test_occurrences_between_basic() {
        let r = rule(Frequency::Weekly, 1);
        let anchor = date(2026, 1, 5); // Monday
        let occurrences = r
            .occurrences_between(anchor, date(2026, 1, 1), date(2026, 1, 31), 0, 100)
            .unwrap();
        assert_eq!(
            occurrences,
            vec![
                date(2026, 1, 5),
                date(2026, 1, 12),
                date(2026, 1, 19),
                date(2026, 1, 26),
            ]
        );
    }

    #[test]
    fn test_occurrences_between_empty_window() {
        let r = rule(Frequency::Monthly, 1);
        let anchor = date(2026, 6, 1);

        // Window entirely before the first occurrence
        let before = r
            .occurrences_between(anchor, date(2026, 1, 1), date(2026, 5, 31), 0, 100)
            .unwrap();
        assert!(before.is_empty());

        // Window entirely past an Until end
        let mut ended = rule(Frequency::Monthly, 1);
        ended.end = RecurrenceEnd::Until(date(2026, 7, 1));
        let after = ended
            .occurrences_between(anchor, date(2026, 8, 1), date(2026, 12, 31), 0, 100)
            .unwrap();
        assert!(after.is_empty());
    }

    #[test]
    fn test_occurrences_between_respects_remaining_count() {
        let mut r = rule(Frequency::Daily, 1);
        r.end = RecurrenceEnd::Count(5);
        let anchor = date(2026, 1, 1);

        // 3 already consumed: only 2 remain
        let occurrences = r
            .occurrences_between(anchor, date(2026, 1, 4), date(2026, 1, 31), 3, 100)
            .unwrap();
        assert_eq!(occurrences, vec![date(2026, 1, 4), date(2026, 1, 5)]);
    }

    #[test]
    fn test_occurrences_between_respects_limit() {
        let r = rule(Frequency::Daily, 1);
        let anchor = date(2026, 1, 1);
        let occurrences = r
            .occurrences_between(anchor, anchor, date(2026, 12, 31), 0, 10)
            .unwrap();
        assert_eq!(occurrences.len(), 10);
    }

    // ---------------------------------------------------------------
    // Serde
    // ---------------------------------------------------------------

    #[test]
    fn test_rule_round_trips_through_json() {
        let mut r = rule(Frequency::Weekly, 2);
        r.by_weekday = vec![Weekday::Mon, Weekday::Fri];
        r.end = RecurrenceEnd::Count(10);

        let json = serde_json::to_string(&r).unwrap();
        let back: RecurrenceRule = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }

    #[test]
    fn test_display() {
        let mut r = rule(Frequency::Monthly, 1);
        r.by_monthday = Some(31);
        r.end = RecurrenceEnd::Until(date(2026, 12, 31));
        assert_eq!(r.to_string(), "monthly on day 31 until 2026-12-31");

        let every_two = rule(Frequency::Weekly, 2);
        assert_eq!(every_two.to_string(), "every 2 weeks");
    }
}
