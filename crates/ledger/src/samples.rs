//! Demo records for a fresh ledger.

use chrono::NaiveDate;

use crate::{Draft, Kind, Ledger, Money, ResultLedger};

fn january(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap_or_default()
}

/// Five drafts covering both kinds and several categories.
pub fn sample_drafts() -> Vec<Draft> {
    vec![
        Draft::new(
            Kind::Income,
            "Salary",
            Money::new(5000_00),
            "Monthly Salary",
            january(1),
        ),
        Draft::new(
            Kind::Expense,
            "Food",
            Money::new(250_00),
            "Groceries",
            january(5),
        ),
        Draft::new(
            Kind::Expense,
            "Transport",
            Money::new(50_00),
            "Gas",
            january(8),
        ),
        Draft::new(
            Kind::Expense,
            "Entertainment",
            Money::new(120_00),
            "Concert Tickets",
            january(10),
        ),
        Draft::new(
            Kind::Income,
            "Freelance",
            Money::new(800_00),
            "Website Project",
            january(15),
        ),
    ]
}

/// Adds every sample draft to `ledger`, returning how many were admitted.
pub fn load_samples(ledger: &Ledger) -> ResultLedger<usize> {
    let drafts = sample_drafts();
    let count = drafts.len();
    for draft in drafts {
        ledger.add(draft)?;
    }
    tracing::info!(count, "sample data loaded");
    Ok(count)
}
