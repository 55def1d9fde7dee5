//! View pipeline: optional filters followed by a mandatory sort.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Field, Kind, LedgerError, Record,
    combinators::{self, Direction, Transform, comparator_for, field_equals},
};

/// Either every value (`All`, parsed from `"all"`) or a single value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Filter<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for Filter<Kind> {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl FromStr for Filter<String> {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Ok(Self::Only(value.to_string()))
    }
}

/// Sort key and direction. Defaults to newest date first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Field,
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(field: Field, direction: Direction) -> Self {
        Self { field, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(Field::Date, Direction::Desc)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field, self.direction)
    }
}

impl FromStr for SortSpec {
    type Err = LedgerError;

    /// Parses `"<field>-<direction>"`, e.g. `"amount-asc"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let (field, direction) = value
            .rsplit_once('-')
            .ok_or_else(|| LedgerError::InvalidDirection(value.to_string()))?;
        Ok(Self::new(field.parse()?, direction.parse()?))
    }
}

/// Parameters the presentation layer holds for the current view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    pub kind: Filter<Kind>,
    pub category: Filter<String>,
    pub sort: SortSpec,
}

/// A composed `records -> records` transform.
pub struct Pipeline {
    stages: usize,
    transform: Transform<Vec<Record>>,
}

impl Pipeline {
    /// Runs the pipeline over a copy of `records`; the input is left untouched.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        (self.transform)(records.to_vec())
    }

    /// Number of stages, sort included.
    pub fn stages(&self) -> usize {
        self.stages
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

fn filter_stage(field: Field, value: crate::Value) -> Transform<Vec<Record>> {
    let keep = field_equals::<Record>(field)(value);
    Box::new(move |records: Vec<Record>| records.into_iter().filter(|r| keep(r)).collect())
}

fn sort_stage(sort: SortSpec) -> Transform<Vec<Record>> {
    let compare = comparator_for::<Record>(sort.field)(sort.direction);
    Box::new(move |mut records: Vec<Record>| {
        // `sort_by` is stable: equal keys keep their filtered order.
        records.sort_by(|a, b| compare(a, b));
        records
    })
}

/// Builds the view pipeline for `params`: a kind filter and a category filter
/// when set, then the sort.
pub fn build_pipeline(params: &ViewParams) -> Pipeline {
    let mut stages: Vec<Transform<Vec<Record>>> = Vec::with_capacity(3);

    if let Some(kind) = params.kind.value() {
        stages.push(filter_stage(Field::Kind, (*kind).into()));
    }
    if let Some(category) = params.category.value() {
        stages.push(filter_stage(Field::Category, category.as_str().into()));
    }
    stages.push(sort_stage(params.sort));

    tracing::trace!(
        kind = %params.kind,
        category = %params.category,
        sort = %params.sort,
        stages = stages.len(),
        "pipeline built"
    );

    Pipeline {
        stages: stages.len(),
        transform: combinators::pipe(stages),
    }
}
