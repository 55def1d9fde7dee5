//! Suggested category labels per kind.
//!
//! Categories are an open set: these lists only drive suggestions and the
//! category picker. Admission never checks them.

use crate::Kind;

pub const INCOME_CATEGORIES: [&str; 4] = ["Salary", "Freelance", "Investment", "Other Income"];

pub const EXPENSE_CATEGORIES: [&str; 8] = [
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Health",
    "Education",
    "Other",
];

/// Suggested categories for `kind`.
pub fn suggested(kind: Kind) -> &'static [&'static str] {
    match kind {
        Kind::Income => &INCOME_CATEGORIES,
        Kind::Expense => &EXPENSE_CATEGORIES,
    }
}

/// Category preselected when switching to `kind`.
pub fn default_category(kind: Kind) -> &'static str {
    suggested(kind)[0]
}

/// Case-insensitive membership in the suggestions for `kind`.
pub fn is_suggested(kind: Kind, name: &str) -> bool {
    let name = name.trim();
    suggested(kind)
        .iter()
        .any(|category| category.eq_ignore_ascii_case(name))
}
