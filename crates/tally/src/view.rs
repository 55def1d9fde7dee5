//! Text rendering of the ledger view and its summary.

use std::io::{self, Write};

use chrono::NaiveDate;
use ledger::{Kind, Money, Record, Summary, ViewParams, build_pipeline, categories};

/// `Jan 5, 2025`
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Amount with a leading `-` when negative, e.g. `-$30.00`.
pub(crate) fn format_signed(amount: Money, symbol: &str) -> String {
    let sign = if amount.cents() < 0 { "-" } else { "" };
    format!("{sign}{}", amount.with_symbol(symbol))
}

fn format_entry_amount(record: &Record, symbol: &str) -> String {
    let sign = match record.kind() {
        Kind::Income => "+",
        Kind::Expense => "-",
    };
    format!("{sign}{}", record.amount().with_symbol(symbol))
}

/// Writes the filtered, sorted list followed by the summary of every record.
pub(crate) fn render<W: Write>(
    out: &mut W,
    records: &[Record],
    params: &ViewParams,
    symbol: &str,
) -> io::Result<()> {
    let view = build_pipeline(params).apply(records);

    writeln!(
        out,
        "Transactions ({})  [kind: {} | category: {} | sort: {}]",
        view.len(),
        params.kind,
        params.category,
        params.sort
    )?;
    if view.is_empty() {
        writeln!(out, "  No transactions to show.")?;
    }
    for record in &view {
        writeln!(
            out,
            "  #{:<4} {:<13} {:<14} {:<30} {:>12}",
            record.id(),
            format_date(record.occurred_on()),
            record.category(),
            record.description(),
            format_entry_amount(record, symbol)
        )?;
    }

    render_summary(out, &Summary::of(records), symbol)
}

pub(crate) fn render_summary<W: Write>(
    out: &mut W,
    summary: &Summary,
    symbol: &str,
) -> io::Result<()> {
    writeln!(
        out,
        "Balance {}  Income {}  Expenses {}",
        format_signed(summary.balance, symbol),
        summary.income.with_symbol(symbol),
        summary.expenses.with_symbol(symbol)
    )?;
    writeln!(
        out,
        "Total {}  Average {}  Highest expense {}  Top category {}",
        summary.count,
        summary.average.with_symbol(symbol),
        summary.highest_expense.with_symbol(symbol),
        summary.most_used_category.as_deref().unwrap_or("-")
    )
}

pub(crate) fn render_categories<W: Write>(out: &mut W) -> io::Result<()> {
    for kind in Kind::ALL {
        writeln!(
            out,
            "{kind} (default {}): {}",
            categories::default_category(kind),
            categories::suggested(kind).join(", ")
        )?;
    }
    Ok(())
}
