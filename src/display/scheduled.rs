//! Scheduled transaction display formatting
//!
//! Tables for schedule lists and upcoming occurrences, plus detail and
//! calendar views.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{AccountId, Money, ScheduledTransaction};
use crate::services::UpcomingOccurrence;

use super::transaction::truncate;

#[derive(Tabled)]
struct ScheduledRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Recurrence")]
    recurrence: String,
    #[tabled(rename = "Next")]
    next: String,
    #[tabled(rename = "Posted")]
    posted: u32,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format a list of schedules as a table
pub fn format_scheduled_list(schedules: &[ScheduledTransaction]) -> String {
    if schedules.is_empty() {
        return "No scheduled transactions found.".to_string();
    }

    let rows: Vec<ScheduledRow> = schedules
        .iter()
        .map(|sched| ScheduledRow {
            name: truncate(&sched.name, 24),
            amount: sched.amount.to_string(),
            recurrence: match &sched.recurrence {
                Some(rule) => rule.to_string(),
                None => "one-shot".to_string(),
            },
            next: sched
                .next_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            posted: sched.occurrences_posted,
            status: sched.status.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a single schedule's details
pub fn format_scheduled_details(sched: &ScheduledTransaction, account_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Schedule: {}\n", sched.name));
    output.push_str(&format!("  ID:         {}\n", sched.id));
    output.push_str(&format!("  Account:    {}\n", account_name));
    output.push_str(&format!("  Amount:     {}\n", sched.amount));
    if !sched.payee.is_empty() {
        output.push_str(&format!("  Payee:      {}\n", sched.payee));
    }
    if !sched.memo.is_empty() {
        output.push_str(&format!("  Memo:       {}\n", sched.memo));
    }
    output.push_str(&format!("  Start:      {}\n", sched.start_date));
    match &sched.recurrence {
        Some(rule) => output.push_str(&format!("  Recurrence: {}\n", rule)),
        None => output.push_str("  Recurrence: one-shot\n"),
    }
    match sched.next_date {
        Some(date) => output.push_str(&format!("  Next:       {}\n", date)),
        None => output.push_str("  Next:       (finished)\n"),
    }
    output.push_str(&format!("  Posted:     {}\n", sched.occurrences_posted));
    output.push_str(&format!("  Status:     {}\n", sched.status));

    output
}

#[derive(Tabled)]
struct UpcomingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format upcoming occurrences as a table; dates before `today` are flagged
/// as overdue
pub fn format_upcoming(
    occurrences: &[UpcomingOccurrence],
    account_names: &HashMap<AccountId, String>,
    today: NaiveDate,
) -> String {
    if occurrences.is_empty() {
        return "Nothing scheduled in this window.".to_string();
    }

    let rows: Vec<UpcomingRow> = occurrences
        .iter()
        .map(|occ| UpcomingRow {
            date: if occ.date < today {
                format!("{} (overdue)", occ.date)
            } else {
                occ.date.to_string()
            },
            name: truncate(&occ.name, 24),
            account: account_names
                .get(&occ.account_id)
                .cloned()
                .unwrap_or_else(|| "?".to_string()),
            amount: occ.amount.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a month of occurrences as a day-by-day calendar listing
pub fn format_calendar(year: i32, month: u32, occurrences: &[UpcomingOccurrence]) -> String {
    let mut output = format!("Scheduled for {:04}-{:02}\n\n", year, month);

    if occurrences.is_empty() {
        output.push_str("  (nothing scheduled)\n");
        return output;
    }

    let mut last_day: Option<u32> = None;
    for occ in occurrences {
        let day = occ.date.day();
        if last_day != Some(day) {
            output.push_str(&format!("{}\n", occ.date.format("%a %b %e")));
            last_day = Some(day);
        }
        output.push_str(&format!("    {}  {}\n", occ.amount, occ.name));
    }

    let net: Money = occurrences.iter().map(|occ| occ.amount).sum();
    output.push_str(&format!("\nMonth net: {}\n", net));

    output
}
