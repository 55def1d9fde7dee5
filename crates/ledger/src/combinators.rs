//! Reusable building blocks for record views.
//!
//! Predicates and comparators are produced by curried factories: the first
//! call fixes the field, the second fixes the value or direction.
//!
//! ```rust
//! use ledger::combinators::{Direction, comparator_for, field_equals};
//! use ledger::{Field, Kind, Record};
//!
//! let is_expense = field_equals::<Record>(Field::Kind)(Kind::Expense.into());
//! let newest_first = comparator_for::<Record>(Field::Date)(Direction::Desc);
//! # let _ = (is_expense, newest_first);
//! ```
//!
//! [`pipe`] and [`compose`] fold same-shaped transforms into one.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Field, Fields, LedgerError, Value};

pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;
pub type Transform<T> = Box<dyn Fn(T) -> T>;

/// Sort direction of a comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(LedgerError::InvalidDirection(value.to_string())),
        }
    }
}

/// Returns a factory of predicates that hold when `field` equals the given
/// value.
///
/// # Panics
///
/// The returned factory panics when handed a value the field can never hold
/// (for instance text for [`Field::Amount`]).
pub fn field_equals<T: Fields + 'static>(field: Field) -> impl Fn(Value) -> Predicate<T> {
    move |value: Value| -> Predicate<T> {
        assert!(
            field.admits(&value),
            "field `{field}` cannot hold value {value:?}"
        );
        Box::new(move |item: &T| item.field(field) == value.as_field_value())
    }
}

/// Returns a factory of three-way comparators on `field`.
///
/// Equal keys compare as [`Ordering::Equal`] in both directions.
pub fn comparator_for<T: Fields + 'static>(field: Field) -> impl Fn(Direction) -> Comparator<T> {
    move |direction: Direction| -> Comparator<T> {
        Box::new(move |a: &T, b: &T| {
            let ordering = a.field(field).cmp(&b.field(field));
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        })
    }
}

/// Boxes a closure as a [`Transform`].
pub fn stage<T, F>(transform: F) -> Transform<T>
where
    F: Fn(T) -> T + 'static,
{
    Box::new(transform)
}

/// Chains transforms left to right. No transforms yields the identity.
pub fn pipe<T: 'static>(transforms: Vec<Transform<T>>) -> Transform<T> {
    Box::new(move |input: T| transforms.iter().fold(input, |acc, transform| transform(acc)))
}

/// Chains transforms right to left: `compose([f, g])(x) == f(g(x))`.
pub fn compose<T: 'static>(transforms: Vec<Transform<T>>) -> Transform<T> {
    Box::new(move |input: T| {
        transforms
            .iter()
            .rev()
            .fold(input, |acc, transform| transform(acc))
    })
}

/// Variadic form of [`pipe`]: `pipe!(f, g, h)`.
#[macro_export]
macro_rules! pipe {
    ($($transform:expr),* $(,)?) => {
        $crate::combinators::pipe(vec![$($crate::combinators::stage($transform)),*])
    };
}

/// Variadic form of [`compose`]: `compose!(f, g, h)`.
#[macro_export]
macro_rules! compose {
    ($($transform:expr),* $(,)?) => {
        $crate::combinators::compose(vec![$($crate::combinators::stage($transform)),*])
    };
}
