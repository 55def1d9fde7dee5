//! Aggregates derived from a record collection.
//!
//! Every function takes a plain slice so it can be computed over a ledger
//! snapshot or any other collection. Views show these over the full snapshot,
//! not the filtered one.

use std::collections::HashMap;

use serde::Serialize;

use crate::{Kind, Money, Record};

/// Sum of every amount of `kind`, or of every amount when `kind` is `None`.
/// Saturates at the largest representable amount.
pub fn total(records: &[Record], kind: Option<Kind>) -> Money {
    records
        .iter()
        .filter(|r| kind.is_none_or(|kind| r.kind() == kind))
        .map(Record::amount)
        .sum()
}

/// Sum of the amounts of `kind`. Zero for an empty collection.
pub fn total_by_kind(records: &[Record], kind: Kind) -> Money {
    total(records, Some(kind))
}

/// Income minus expenses. May be negative.
pub fn balance(records: &[Record]) -> Money {
    total_by_kind(records, Kind::Income).saturating_sub(total_by_kind(records, Kind::Expense))
}

/// Mean amount, rounded to the nearest cent. Zero for an empty collection.
pub fn average(records: &[Record]) -> Money {
    Money::mean(total(records, None), records.len())
}

/// Largest amount of `kind`. Zero when there is none.
pub fn highest_of(records: &[Record], kind: Kind) -> Money {
    records
        .iter()
        .filter(|r| r.kind() == kind)
        .map(Record::amount)
        .max()
        .unwrap_or(Money::ZERO)
}

/// Category used by the most records; ties go to the category seen first.
/// `None` for an empty collection.
pub fn most_frequent_category(records: &[Record]) -> Option<&str> {
    // category -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, record) in records.iter().enumerate() {
        counts
            .entry(record.category())
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(category, _)| category)
}

/// Every statistic a summary panel shows, computed in one call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub income: Money,
    pub expenses: Money,
    pub balance: Money,
    pub average: Money,
    pub highest_expense: Money,
    pub most_used_category: Option<String>,
}

impl Summary {
    pub fn of(records: &[Record]) -> Self {
        let income = total_by_kind(records, Kind::Income);
        let expenses = total_by_kind(records, Kind::Expense);
        Self {
            count: records.len(),
            income,
            expenses,
            balance: income.saturating_sub(expenses),
            average: average(records),
            highest_expense: highest_of(records, Kind::Expense),
            most_used_category: most_frequent_category(records).map(str::to_string),
        }
    }
}
