//! In-memory transaction ledger with change notifications and composable
//! record views.
//!
//! - [`Ledger`] owns the records and notifies subscribers on every change.
//! - [`combinators`] builds predicates, comparators and transform chains.
//! - [`pipeline`] turns the current view parameters into one transform.
//! - [`statistics`] derives totals, balance and friends from a snapshot.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ledger::{Draft, Kind, Ledger, Money, pipeline, statistics};
//!
//! let ledger = Ledger::new();
//! let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
//! ledger.add(Draft::new(Kind::Income, "Salary", Money::new(100_00), "Pay", date))?;
//! ledger.add(Draft::new(Kind::Expense, "Food", Money::new(40_00), "Groceries", date))?;
//!
//! let records = ledger.get_all();
//! let view = pipeline::build_pipeline(&pipeline::ViewParams::default()).apply(&records);
//! assert_eq!(view.len(), 2);
//! assert_eq!(statistics::balance(&records), Money::new(60_00));
//! # Ok::<(), ledger::LedgerError>(())
//! ```

pub use combinators::Direction;
pub use error::LedgerError;
pub use ledger::{Ledger, LedgerBuilder, SubscriberResult, SubscriptionId};
pub use money::Money;
pub use pipeline::{Filter, Pipeline, SortSpec, ViewParams, build_pipeline};
pub use record::{Draft, Field, FieldValue, Fields, Kind, Record, Value, parse_date};
pub use samples::{load_samples, sample_drafts};
pub use statistics::Summary;

pub mod categories;
pub mod combinators;
mod error;
mod ledger;
mod money;
pub mod pipeline;
mod record;
mod samples;
pub mod statistics;

pub type ResultLedger<T> = Result<T, LedgerError>;
