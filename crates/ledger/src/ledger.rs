//! The in-memory record container.
//!
//! [`Ledger`] owns the record sequence and the identity counter; neither is
//! reachable from outside. Every read hands out an independent copy and every
//! successful mutation is broadcast to the registered subscribers.
//!
//! # Re-entrancy
//!
//! No internal borrow is held while subscribers run, so a subscriber may call
//! back into the ledger (add, remove, subscribe). A subscriber that
//! unconditionally mutates the ledger on every notification recurses without
//! bound; that is a bug in the subscriber. Subscribers that need the ledger
//! should capture a [`std::rc::Weak`] handle, since a strong one forms a cycle
//! through the subscriber list.

use std::{
    any::Any,
    cell::{Cell, RefCell},
    fmt,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use chrono::{DateTime, Utc};

use crate::{Draft, LedgerError, Record, ResultLedger};

/// Outcome of a change subscriber. Errors are logged, never propagated.
pub type SubscriberResult = Result<(), Box<dyn std::error::Error>>;

type Subscriber = Rc<dyn Fn(&[Record]) -> SubscriberResult>;
type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Handle returned by [`Ledger::on_change`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct State {
    records: Vec<Record>,
    next_id: u64,
    last_created_at: Option<DateTime<Utc>>,
}

pub struct Ledger {
    state: RefCell<State>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    /// Bumped by every notification; a round stops once a newer one started.
    generation: Cell<u64>,
    clock: Clock,
}

impl Ledger {
    /// Empty ledger using the system clock.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Admits a draft as a new record and notifies subscribers.
    ///
    /// Rejects drafts whose amount is not strictly positive and drafts whose
    /// description is blank.
    pub fn add(&self, draft: Draft) -> ResultLedger<Record> {
        validate_draft(&draft)?;

        let record = {
            let mut state = self.state.borrow_mut();
            let now = (self.clock)();
            let created_at = match state.last_created_at {
                Some(last) if last > now => last,
                _ => now,
            };
            state.next_id += 1;
            let record = Record::admit(state.next_id, draft, created_at);
            state.last_created_at = Some(created_at);
            state.records.push(record.clone());
            record
        };

        tracing::debug!(
            id = record.id(),
            kind = %record.kind(),
            amount = %record.amount(),
            "record added"
        );
        self.notify();
        Ok(record)
    }

    /// Removes the record with `id`, returning it.
    ///
    /// Removing an unknown id is a no-op and notifies nobody.
    pub fn remove(&self, id: u64) -> Option<Record> {
        let removed = {
            let mut state = self.state.borrow_mut();
            let index = state.records.iter().position(|record| record.id() == id);
            index.map(|index| state.records.remove(index))
        };

        match &removed {
            Some(_) => {
                tracing::debug!(id, "record removed");
                self.notify();
            }
            None => tracing::trace!(id, "nothing to remove"),
        }
        removed
    }

    /// Copy of every record, in insertion order.
    pub fn get_all(&self) -> Vec<Record> {
        self.state.borrow().records.clone()
    }

    /// Copy of the record with `id`, if it is still held.
    pub fn get(&self, id: u64) -> Option<Record> {
        self.state
            .borrow()
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().records.is_empty()
    }

    /// Registers `subscriber`, called with the full snapshot after every
    /// successful add or remove. Subscribers run in registration order.
    pub fn on_change<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&[Record]) -> SubscriberResult + 'static,
    {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(subscriber)));
        id
    }

    /// Drops a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Sends the current snapshot to every subscriber.
    ///
    /// When a subscriber mutates the ledger, the nested notification has
    /// already delivered the newer snapshot to everyone, so the outer round
    /// stops instead of handing the remaining subscribers stale records.
    fn notify(&self) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let snapshot = self.get_all();
        let subscribers: Vec<(SubscriptionId, Subscriber)> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(id, subscriber)| (*id, Rc::clone(subscriber)))
            .collect();

        for (index, (id, subscriber)) in subscribers.iter().enumerate() {
            if self.generation.get() != generation {
                tracing::trace!(index, "notification superseded");
                break;
            }
            let reason = match panic::catch_unwind(AssertUnwindSafe(|| subscriber(&snapshot))) {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err.to_string(),
                Err(payload) => panic_message(payload.as_ref()),
            };
            let err = LedgerError::Subscriber { index, reason };
            tracing::warn!(subscription = id.0, "{err}");
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Ledger")
            .field("records", &state.records)
            .field("next_id", &(state.next_id + 1))
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

#[derive(Default)]
pub struct LedgerBuilder {
    clock: Option<Clock>,
}

impl LedgerBuilder {
    /// Override the clock used for `created_at` timestamps.
    pub fn clock<F>(mut self, clock: F) -> LedgerBuilder
    where
        F: Fn() -> DateTime<Utc> + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        Ledger {
            state: RefCell::new(State::default()),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            generation: Cell::new(0),
            clock: self.clock.unwrap_or_else(|| Box::new(Utc::now)),
        }
    }
}

fn validate_draft(draft: &Draft) -> ResultLedger<()> {
    if !draft.amount.is_positive() {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be > 0, got {}",
            draft.amount
        )));
    }
    if draft.description.trim().is_empty() {
        return Err(LedgerError::InvalidDescription(
            "description must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "subscriber panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Weak;

    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{Kind, Money};

    fn draft(kind: Kind, cents: i64, description: &str) -> Draft {
        Draft::new(
            kind,
            "Food",
            Money::new(cents),
            description,
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        )
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let ledger = Ledger::new();
        let first = ledger.add(draft(Kind::Expense, 100, "a")).unwrap();
        let second = ledger.add(draft(Kind::Expense, 100, "b")).unwrap();
        ledger.remove(second.id());
        let third = ledger.add(draft(Kind::Expense, 100, "c")).unwrap();

        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
        assert_eq!(third.id(), 3);
    }

    #[test]
    fn rejects_zero_negative_and_blank() {
        let ledger = Ledger::new();

        assert!(matches!(
            ledger.add(draft(Kind::Expense, 0, "zero")),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.add(draft(Kind::Expense, -5, "negative")),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.add(draft(Kind::Expense, 5, "   ")),
            Err(LedgerError::InvalidDescription(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn rejected_draft_does_not_consume_an_id() {
        let ledger = Ledger::new();
        let _ = ledger.add(draft(Kind::Expense, 0, "zero"));
        assert_eq!(ledger.add(draft(Kind::Expense, 1, "ok")).unwrap().id(), 1);
    }

    #[test]
    fn created_at_never_goes_backwards() {
        let times = RefCell::new(vec![
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
        ]);
        let ledger = Ledger::builder()
            .clock(move || times.borrow_mut().remove(0))
            .build();

        let first = ledger.add(draft(Kind::Income, 1, "a")).unwrap();
        let second = ledger.add(draft(Kind::Income, 1, "b")).unwrap();
        assert_eq!(second.created_at(), first.created_at());
    }

    #[test]
    fn no_op_remove_does_not_notify() {
        let ledger = Ledger::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        ledger.on_change(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        let record = ledger.add(draft(Kind::Expense, 10, "a")).unwrap();
        assert_eq!(ledger.remove(99), None);
        assert_eq!(calls.get(), 1);
        assert_eq!(ledger.remove(record.id()), Some(record));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let ledger = Ledger::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = ledger.on_change(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        ledger.add(draft(Kind::Expense, 10, "a")).unwrap();
        assert!(ledger.unsubscribe(id));
        assert!(!ledger.unsubscribe(id));
        ledger.add(draft(Kind::Expense, 10, "b")).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn subscriber_can_mutate_the_ledger() {
        let ledger = Rc::new(Ledger::new());
        let handle: Weak<Ledger> = Rc::downgrade(&ledger);
        ledger.on_change(move |records| {
            let Some(ledger) = handle.upgrade() else {
                return Ok(());
            };
            // Drop every expense above 100 as soon as it lands.
            if let Some(big) = records
                .iter()
                .find(|r| r.kind() == Kind::Expense && r.amount() > Money::new(100))
            {
                ledger.remove(big.id());
            }
            Ok(())
        });

        ledger.add(draft(Kind::Expense, 50, "small")).unwrap();
        ledger.add(draft(Kind::Expense, 500, "big")).unwrap();

        let left: Vec<_> = ledger.get_all().iter().map(|r| r.id()).collect();
        assert_eq!(left, vec![1]);
    }

    #[test]
    fn later_subscribers_never_see_a_stale_snapshot() {
        let ledger = Rc::new(Ledger::new());
        let handle: Weak<Ledger> = Rc::downgrade(&ledger);
        ledger.on_change(move |records| {
            let Some(ledger) = handle.upgrade() else {
                return Ok(());
            };
            if let Some(big) = records.iter().find(|r| r.amount() > Money::new(100)) {
                ledger.remove(big.id());
            }
            Ok(())
        });

        let seen = Rc::new(RefCell::new(Vec::new()));
        let calls = Rc::new(Cell::new(0));
        let (sink, counter) = (Rc::clone(&seen), Rc::clone(&calls));
        ledger.on_change(move |records| {
            *sink.borrow_mut() = records.iter().map(Record::id).collect::<Vec<_>>();
            counter.set(counter.get() + 1);
            Ok(())
        });

        ledger.add(draft(Kind::Expense, 50, "small")).unwrap();
        ledger.add(draft(Kind::Expense, 500, "big")).unwrap();

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn get_returns_a_copy_of_live_records_only() {
        let ledger = Ledger::new();
        let record = ledger.add(draft(Kind::Income, 10, "a")).unwrap();

        assert_eq!(ledger.get(record.id()), Some(record.clone()));
        ledger.remove(record.id());
        assert_eq!(ledger.get(record.id()), None);
        assert_eq!(ledger.len(), 0);
    }
}
