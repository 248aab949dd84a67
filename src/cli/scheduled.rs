//! Scheduled transaction CLI commands
//!
//! Schedules cover both recurring bills ("rent, monthly on the 1st") and
//! one-shot reminders ("car tax, due 2026-03-15"). A rule is built from the
//! `--frequency`, `--every`, `--weekday`, `--monthday`, `--until`, and
//! `--count` flags; without `--frequency` the schedule is a one-shot.

use std::str::FromStr;

use chrono::{Datelike, Weekday};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_calendar, format_scheduled_details, format_scheduled_list, format_upcoming};
use crate::error::{HearthError, HearthResult};
use crate::models::{Frequency, RecurrenceEnd, RecurrenceRule, User};
use crate::services::{AccountService, CategoryService, ScheduledPatch, ScheduledService};
use crate::storage::Storage;

use super::parse_date;
use super::transaction::parse_amount;

/// Scheduled transaction subcommands
#[derive(Subcommand)]
pub enum ScheduledCommands {
    /// Add a scheduled transaction
    Add {
        /// Schedule name, e.g. "Rent"
        name: String,
        /// Account name or ID
        account: String,
        /// Amount per occurrence (negative = spending)
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Payee name
        #[arg(short, long, default_value = "")]
        payee: String,
        /// Memo
        #[arg(short, long, default_value = "")]
        memo: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// First occurrence date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start: Option<String>,
        /// Repeat frequency (daily, weekly, monthly, yearly); omit for a one-shot
        #[arg(short, long)]
        frequency: Option<String>,
        /// Repeat every N units of the frequency
        #[arg(long, default_value = "1")]
        every: u32,
        /// Weekly only: repeat on these weekdays (e.g. --weekday mon --weekday fri)
        #[arg(long = "weekday")]
        weekdays: Vec<String>,
        /// Monthly only: repeat on this day of the month (1-31, clamped)
        #[arg(long)]
        monthday: Option<u32>,
        /// Stop after this date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "count")]
        until: Option<String>,
        /// Stop after this many occurrences
        #[arg(long)]
        count: Option<u32>,
    },
    /// List schedules
    List,
    /// Show one schedule
    Show {
        /// Schedule name or ID
        schedule: String,
    },
    /// Edit a schedule
    Edit {
        /// Schedule name or ID
        schedule: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Move to another account
        #[arg(long)]
        account: Option<String>,
        /// Change the category
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        clear_category: bool,
        /// Change the amount
        #[arg(long)]
        amount: Option<String>,
        /// Change the payee
        #[arg(long)]
        payee: Option<String>,
        /// Change the memo
        #[arg(long)]
        memo: Option<String>,
        /// Rebase: new anchor date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Replace the recurrence rule (daily, weekly, monthly, yearly)
        #[arg(long, conflicts_with = "one_shot")]
        frequency: Option<String>,
        /// New rule: repeat every N units
        #[arg(long, requires = "frequency")]
        every: Option<u32>,
        /// New rule: weekdays
        #[arg(long = "weekday", requires = "frequency")]
        weekdays: Vec<String>,
        /// New rule: day of month
        #[arg(long, requires = "frequency")]
        monthday: Option<u32>,
        /// New rule: stop after this date
        #[arg(long, requires = "frequency", conflicts_with = "count")]
        until: Option<String>,
        /// New rule: stop after this many occurrences
        #[arg(long, requires = "frequency")]
        count: Option<u32>,
        /// Drop the recurrence rule, making the schedule a one-shot
        #[arg(long)]
        one_shot: bool,
    },
    /// Post the pending occurrence as a real transaction
    Advance {
        /// Schedule name or ID
        schedule: String,
    },
    /// Skip the pending occurrence without posting it
    Skip {
        /// Schedule name or ID
        schedule: String,
    },
    /// Pause a schedule
    Pause {
        /// Schedule name or ID
        schedule: String,
    },
    /// Resume a paused schedule
    Resume {
        /// Schedule name or ID
        schedule: String,
    },
    /// Delete a schedule (posted transactions are kept)
    Delete {
        /// Schedule name or ID
        schedule: String,
    },
    /// List schedules due on or before today
    Due,
    /// Show occurrences over the coming days
    Upcoming {
        /// Window in days (default from settings)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Show occurrences for a calendar month
    Calendar {
        /// Month as YYYY-MM (default current month)
        month: Option<String>,
    },
}

/// Handle a scheduled transaction command
pub fn handle_scheduled_command(
    storage: &Storage,
    user: &User,
    settings: &Settings,
    cmd: ScheduledCommands,
) -> HearthResult<()> {
    let service = ScheduledService::new(storage, user);
    let accounts = AccountService::new(storage, user);
    let categories = CategoryService::new(storage, user);
    let today = chrono::Local::now().date_naive();

    match cmd {
        ScheduledCommands::Add {
            name,
            account,
            amount,
            payee,
            memo,
            category,
            start,
            frequency,
            every,
            weekdays,
            monthday,
            until,
            count,
        } => {
            let account = accounts.find(&account)?;
            let category_id = match category {
                Some(c) => Some(categories.find(&c)?.id),
                None => None,
            };
            let start_date = match start {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            let amount = parse_amount(&amount)?;
            let recurrence =
                build_rule(frequency.as_deref(), every, &weekdays, monthday, until, count)?;

            let sched = service.create(
                &name,
                account.id,
                category_id,
                amount,
                &payee,
                &memo,
                start_date,
                recurrence,
            )?;

            match (&sched.recurrence, sched.next_date) {
                (Some(rule), Some(next)) => {
                    println!("Scheduled '{}': {} {}", sched.name, sched.amount, rule);
                    println!("  Next occurrence: {}", next);
                }
                (None, Some(next)) => {
                    println!("Scheduled '{}': {} once on {}", sched.name, sched.amount, next);
                }
                _ => println!("Scheduled '{}'", sched.name),
            }
            println!("  ID: {}", sched.id);
        }

        ScheduledCommands::List => {
            let schedules = service.list()?;
            print!("{}", format_scheduled_list(&schedules));
        }

        ScheduledCommands::Show { schedule } => {
            let sched = service.find(&schedule)?;
            let account_name = accounts
                .get(sched.account_id)
                .map(|a| a.name)
                .unwrap_or_else(|_| "?".to_string());
            print!("{}", format_scheduled_details(&sched, &account_name));
        }

        ScheduledCommands::Edit {
            schedule,
            name,
            account,
            category,
            clear_category,
            amount,
            payee,
            memo,
            start,
            frequency,
            every,
            weekdays,
            monthday,
            until,
            count,
            one_shot,
        } => {
            let found = service.find(&schedule)?;

            let category_id = if clear_category {
                Some(None)
            } else {
                match category {
                    Some(c) => Some(Some(categories.find(&c)?.id)),
                    None => None,
                }
            };

            let recurrence = if one_shot {
                Some(None)
            } else if frequency.is_some() {
                Some(build_rule(
                    frequency.as_deref(),
                    every.unwrap_or(1),
                    &weekdays,
                    monthday,
                    until,
                    count,
                )?)
            } else {
                None
            };

            let patch = ScheduledPatch {
                name,
                account_id: account.map(|a| accounts.find(&a).map(|a| a.id)).transpose()?,
                category_id,
                amount: amount.map(|a| parse_amount(&a)).transpose()?,
                payee,
                memo,
                start_date: start.map(|d| parse_date(&d)).transpose()?,
                recurrence,
            };

            let sched = service.edit(found.id, patch)?;
            println!("Updated schedule '{}'", sched.name);
            if let Some(next) = sched.next_date {
                println!("  Next occurrence: {}", next);
            }
        }

        ScheduledCommands::Advance { schedule } => {
            let found = service.find(&schedule)?;
            let outcome = service.advance(found.id)?;
            println!(
                "Posted: {} {} on {}",
                outcome.transaction.amount, outcome.transaction.payee, outcome.transaction.date
            );
            match outcome.schedule.next_date {
                Some(next) => println!("  Next occurrence: {}", next),
                None => println!("  Schedule '{}' is finished.", outcome.schedule.name),
            }
        }

        ScheduledCommands::Skip { schedule } => {
            let found = service.find(&schedule)?;
            let sched = service.skip(found.id)?;
            match sched.next_date {
                Some(next) => println!("Skipped. Next occurrence: {}", next),
                None => println!("Skipped. Schedule '{}' is finished.", sched.name),
            }
        }

        ScheduledCommands::Pause { schedule } => {
            let found = service.find(&schedule)?;
            let sched = service.pause(found.id)?;
            println!("Paused schedule '{}'", sched.name);
        }

        ScheduledCommands::Resume { schedule } => {
            let found = service.find(&schedule)?;
            let sched = service.resume(found.id, today)?;
            println!("Resumed schedule '{}'", sched.name);
            if let Some(next) = sched.next_date {
                println!("  Next occurrence: {}", next);
            }
        }

        ScheduledCommands::Delete { schedule } => {
            let found = service.find(&schedule)?;
            service.delete(found.id)?;
            println!("Deleted schedule '{}'", found.name);
        }

        ScheduledCommands::Due => {
            let due = service.due(today)?;
            if due.is_empty() {
                println!("Nothing due.");
            } else {
                println!("Due now:");
                for sched in &due {
                    let date = sched.next_date.map(|d| d.to_string()).unwrap_or_default();
                    println!("  {} {} ({})", sched.name, sched.amount, date);
                }
                println!();
                println!("Post with: hearth scheduled advance <name>");
            }
        }

        ScheduledCommands::Upcoming { days } => {
            let days = days.unwrap_or(settings.upcoming_window_days);
            let occurrences = service.upcoming(today, days)?;
            let account_names: std::collections::HashMap<_, _> = storage
                .accounts
                .get_by_family(user.family_id)?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect();
            println!("Upcoming over the next {} days:", days);
            print!("{}", format_upcoming(&occurrences, &account_names, today));
        }

        ScheduledCommands::Calendar { month } => {
            let (year, month) = match month {
                Some(s) => parse_month(&s)?,
                None => (today.year(), today.month()),
            };
            let occurrences = service.calendar(year, month)?;
            print!("{}", format_calendar(year, month, &occurrences));
        }
    }

    Ok(())
}

/// Build a recurrence rule from command-line flags; `None` when no frequency
/// was given
fn build_rule(
    frequency: Option<&str>,
    every: u32,
    weekdays: &[String],
    monthday: Option<u32>,
    until: Option<String>,
    count: Option<u32>,
) -> HearthResult<Option<RecurrenceRule>> {
    let frequency = match frequency {
        Some(f) => f
            .parse::<Frequency>()
            .map_err(HearthError::Validation)?,
        None => {
            if !weekdays.is_empty() || monthday.is_some() || until.is_some() || count.is_some() {
                return Err(HearthError::Validation(
                    "Recurrence flags require --frequency".into(),
                ));
            }
            return Ok(None);
        }
    };

    let mut rule = RecurrenceRule::new(frequency, every);

    for day in weekdays {
        let weekday = Weekday::from_str(day).map_err(|_| {
            HearthError::Validation(format!("Invalid weekday: '{}'", day))
        })?;
        if !rule.by_weekday.contains(&weekday) {
            rule.by_weekday.push(weekday);
        }
    }
    rule.by_monthday = monthday;

    rule.end = match (until, count) {
        (Some(date), None) => RecurrenceEnd::Until(parse_date(&date)?),
        (None, Some(n)) => RecurrenceEnd::Count(n),
        (None, None) => RecurrenceEnd::Never,
        (Some(_), Some(_)) => {
            return Err(HearthError::Validation(
                "Pass at most one of --until and --count".into(),
            ))
        }
    };

    Ok(Some(rule))
}

/// Parse "YYYY-MM" into a (year, month) pair
fn parse_month(s: &str) -> HearthResult<(i32, u32)> {
    let parts: Vec<&str> = s.splitn(2, '-').collect();
    let parsed = match parts.as_slice() {
        [y, m] => match (y.parse::<i32>(), m.parse::<u32>()) {
            (Ok(year), Ok(month)) if (1..=12).contains(&month) => Some((year, month)),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| {
        HearthError::Validation(format!("Invalid month '{}'. Expected YYYY-MM", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-03").unwrap(), (2026, 3));
        assert_eq!(parse_month("2026-12").unwrap(), (2026, 12));
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("2026").is_err());
        assert!(parse_month("march").is_err());
    }

    #[test]
    fn test_build_rule_weekly() {
        let rule = build_rule(
            Some("weekly"),
            2,
            &["mon".to_string(), "fri".to_string()],
            None,
            None,
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.by_weekday, vec![Weekday::Mon, Weekday::Fri]);
        assert_eq!(rule.end, RecurrenceEnd::Never);
    }

    #[test]
    fn test_build_rule_one_shot() {
        assert!(build_rule(None, 1, &[], None, None, None).unwrap().is_none());
    }

    #[test]
    fn test_build_rule_flags_without_frequency() {
        assert!(build_rule(None, 1, &[], Some(15), None, None).is_err());
    }

    #[test]
    fn test_build_rule_count_end() {
        let rule = build_rule(Some("monthly"), 1, &[], Some(1), None, Some(12))
            .unwrap()
            .unwrap();
        assert_eq!(rule.by_monthday, Some(1));
        assert_eq!(rule.end, RecurrenceEnd::Count(12));
    }

    #[test]
    fn test_build_rule_invalid_weekday() {
        assert!(build_rule(Some("weekly"), 1, &["someday".to_string()], None, None, None).is_err());
    }
}
