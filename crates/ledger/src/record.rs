//! Record primitives.
//!
//! A [`Record`] is one admitted transaction. Records are only created by
//! [`Ledger::add`](crate::Ledger::add) from a caller-supplied [`Draft`] and are
//! immutable afterwards.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Income, Kind::Expense];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Kinds order by their label, like any other text field.
impl Ord for Kind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Kind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(LedgerError::InvalidKind(value.to_string())),
        }
    }
}

/// Addressable record fields, used by the predicate and comparator factories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Kind,
    Category,
    Amount,
    Description,
    #[serde(alias = "occurred_on")]
    Date,
    CreatedAt,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Kind => "kind",
            Self::Category => "category",
            Self::Amount => "amount",
            Self::Description => "description",
            Self::Date => "date",
            Self::CreatedAt => "created_at",
        }
    }

    /// Whether `value` has the type this field holds.
    pub fn admits(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Id, Value::Id(_))
                | (Self::Kind, Value::Kind(_))
                | (Self::Category | Self::Description, Value::Text(_))
                | (Self::Amount, Value::Money(_))
                | (Self::Date, Value::Date(_))
                | (Self::CreatedAt, Value::Timestamp(_))
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "kind" | "type" => Ok(Self::Kind),
            "category" => Ok(Self::Category),
            "amount" => Ok(Self::Amount),
            "description" => Ok(Self::Description),
            "date" | "occurred_on" => Ok(Self::Date),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(LedgerError::InvalidField(value.to_string())),
        }
    }
}

/// Borrowed value of a record field.
///
/// Values of the same field always share a variant, so the derived order is
/// the natural order of the field: numeric for ids and amounts, lexical for
/// text and kinds, chronological for dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue<'a> {
    Id(u64),
    Kind(Kind),
    Text(&'a str),
    Money(Money),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

/// Owned counterpart of [`FieldValue`], captured by predicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Id(u64),
    Kind(Kind),
    Text(String),
    Money(Money),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Self::Id(id) => FieldValue::Id(*id),
            Self::Kind(kind) => FieldValue::Kind(*kind),
            Self::Text(text) => FieldValue::Text(text),
            Self::Money(money) => FieldValue::Money(*money),
            Self::Date(date) => FieldValue::Date(*date),
            Self::Timestamp(ts) => FieldValue::Timestamp(*ts),
        }
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Id(value)
    }
}

impl From<Kind> for Value {
    fn from(value: Kind) -> Self {
        Self::Kind(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Money> for Value {
    fn from(value: Money) -> Self {
        Self::Money(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Types whose fields can be read by name.
pub trait Fields {
    fn field(&self, field: Field) -> FieldValue<'_>;
}

/// Caller-supplied data for a new record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub kind: Kind,
    pub category: String,
    pub amount: Money,
    pub description: String,
    pub occurred_on: NaiveDate,
}

impl Draft {
    pub fn new(
        kind: Kind,
        category: impl Into<String>,
        amount: Money,
        description: impl Into<String>,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            description: description.into(),
            occurred_on,
        }
    }
}

/// An admitted transaction. Equality and hashing use the `id` only.
#[derive(Clone, Debug, Serialize)]
pub struct Record {
    id: u64,
    kind: Kind,
    category: String,
    amount: Money,
    description: String,
    occurred_on: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Record {
    /// Builds a record from an already validated draft.
    pub(crate) fn admit(id: u64, draft: Draft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: draft.kind,
            category: draft.category,
            amount: draft.amount,
            description: draft.description,
            occurred_on: draft.occurred_on,
            created_at,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn occurred_on(&self) -> NaiveDate {
        self.occurred_on
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Fields for Record {
    fn field(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Id => FieldValue::Id(self.id),
            Field::Kind => FieldValue::Kind(self.kind),
            Field::Category => FieldValue::Text(&self.category),
            Field::Amount => FieldValue::Money(self.amount),
            Field::Description => FieldValue::Text(&self.description),
            Field::Date => FieldValue::Date(self.occurred_on),
            Field::CreatedAt => FieldValue::Timestamp(self.created_at),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} {} {}",
            self.id, self.occurred_on, self.kind, self.amount, self.category, self.description
        )
    }
}

/// Parses an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| LedgerError::InvalidDate(format!("\"{}\": {err}", value.trim())))
}
