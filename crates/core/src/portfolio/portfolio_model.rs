use std::collections::HashMap;

use chrono::NaiveDate;
use log::{debug, error};
use uuid::Uuid;

use crate::cash::CashLedger;
use crate::errors::{LedgerError, Result, TransactionError};
use crate::ledger::OrderedLedger;
use crate::portfolio::cgt::CgtEvent;
use crate::portfolio::holding::Holding;
use crate::portfolio::transactions::{HandlerRegistry, Transaction};
use crate::temporal::HasLifetime;

/// A portfolio: one cash account, the holdings per instrument, the durable
/// transaction ledger and the realized CGT events.
///
/// The transaction ledger is the only source of truth. Holdings, cash and
/// CGT events are derived: appending a transaction applies it directly,
/// while a backdated insert, update or removal clears the derived state and
/// replays the whole ledger. Temporal edits are not generally invertible in
/// place, so the engine trades O(n) per-edit work for guaranteed
/// consistency.
pub struct Portfolio {
    transactions: OrderedLedger<Transaction>,
    holdings: HashMap<String, Holding>,
    cash: CashLedger,
    cgt_events: OrderedLedger<CgtEvent>,
    handlers: HandlerRegistry,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new()
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::with_handlers(HandlerRegistry::with_default_handlers())
    }

    /// A portfolio with a caller-supplied handler registry, for extending
    /// the dispatcher with new transaction kinds.
    pub fn with_handlers(handlers: HandlerRegistry) -> Self {
        Portfolio {
            transactions: OrderedLedger::new(),
            holdings: HashMap::new(),
            cash: CashLedger::new(),
            cgt_events: OrderedLedger::new(),
            handlers,
        }
    }

    pub fn transactions(&self) -> &OrderedLedger<Transaction> {
        &self.transactions
    }

    pub fn cgt_events(&self) -> &OrderedLedger<CgtEvent> {
        &self.cgt_events
    }

    pub fn cash(&self) -> &CashLedger {
        &self.cash
    }

    pub fn holding(&self, instrument_id: &str) -> Option<&Holding> {
        self.holdings.get(instrument_id)
    }

    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.values()
    }

    /// Holdings effective at `date`, ordered by instrument id.
    pub fn holdings_at(&self, date: NaiveDate) -> Vec<&Holding> {
        let mut effective: Vec<&Holding> = self
            .holdings
            .values()
            .filter(|h| h.is_effective_at(date))
            .collect();
        effective.sort_by_key(|h| h.instrument_id());
        effective
    }

    /// Adds a transaction to the ledger and brings the derived state up to
    /// date: an append (date at or after the latest entry) applies just the
    /// new transaction, anything earlier replays the full ledger. A
    /// transaction whose handler rejects it is removed again so the ledger
    /// never holds an entry it cannot replay.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<()> {
        let id = transaction.id;
        let appending = !self
            .transactions
            .latest_date()
            .is_some_and(|latest| transaction.date < latest);

        let outcome = if appending {
            let pending = transaction.clone();
            self.transactions.add(transaction)?;
            self.apply(&pending)
        } else {
            self.transactions.add(transaction)?;
            self.rebuild()
        };

        if let Err(err) = outcome {
            if let Err(remove_err) = self.transactions.remove(id) {
                error!("failed to back out rejected transaction {id}: {remove_err}");
            }
            self.restore();
            return Err(err);
        }
        Ok(())
    }

    /// Replaces an existing transaction and replays the ledger. A rejected
    /// edit is rolled back to the original entry.
    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<()> {
        let id = transaction.id;
        let original = self
            .transactions
            .get_by_id(id)
            .cloned()
            .ok_or(LedgerError::IdNotFound(id))?;

        self.transactions.update(transaction)?;
        if let Err(err) = self.rebuild() {
            if let Err(update_err) = self.transactions.update(original) {
                error!("failed to roll back rejected edit of {id}: {update_err}");
            }
            self.restore();
            return Err(err);
        }
        Ok(())
    }

    /// Removes a transaction and replays the ledger. A removal leaving the
    /// remaining history unreplayable is rolled back.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        let removed = self.transactions.remove(id)?;
        if let Err(err) = self.rebuild() {
            if let Err(add_err) = self.transactions.add(removed.clone()) {
                error!("failed to restore removed transaction {id}: {add_err}");
            }
            self.restore();
            return Err(err);
        }
        Ok(removed)
    }

    /// Clears all derived state and replays the transaction ledger in date
    /// order. Handler errors are not caught: a ledger that cannot fully
    /// replay is invalid, not partially valid.
    pub fn rebuild(&mut self) -> Result<()> {
        debug!(
            "rebuilding portfolio state from {} transactions",
            self.transactions.len()
        );
        self.holdings.clear();
        self.cash.clear();
        self.cgt_events.clear();

        let transactions: Vec<Transaction> = self.transactions.iter().cloned().collect();
        for transaction in &transactions {
            self.apply(transaction)?;
        }
        Ok(())
    }

    /// Replays after a rolled-back mutation; the prior ledger replayed
    /// before, so this is not expected to fail.
    fn restore(&mut self) {
        if let Err(err) = self.rebuild() {
            error!("replay of restored ledger failed: {err}");
        }
    }

    fn apply(&mut self, transaction: &Transaction) -> Result<()> {
        let kind = transaction.kind();
        let handler = self
            .handlers
            .get(kind)
            .ok_or_else(|| TransactionError::UnhandledKind(kind.name().to_string()))?;

        let events = if kind.requires_instrument() {
            let instrument_id = transaction.instrument_id.as_deref().ok_or_else(|| {
                TransactionError::InvalidTransaction(format!(
                    "{kind} transaction {} has no instrument",
                    transaction.id
                ))
            })?;

            if !self.holdings.contains_key(instrument_id) {
                if !handler.can_create_holding() {
                    return Err(TransactionError::NoSharesOwned {
                        instrument_id: instrument_id.to_string(),
                        date: transaction.date,
                    }
                    .into());
                }
                self.holdings
                    .insert(instrument_id.to_string(), Holding::new(instrument_id));
            }
            handler.apply(
                transaction,
                self.holdings.get_mut(instrument_id),
                &mut self.cash,
            )?
        } else {
            handler.apply(transaction, None, &mut self.cash)?
        };

        for event in events {
            self.cgt_events.add(event)?;
        }
        Ok(())
    }
}
