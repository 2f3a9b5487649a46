use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cash::{CashTransaction, CashTransactionType};
use crate::errors::Result;
use crate::ledger::{OrderedLedger, TieBreak};
use crate::temporal::EffectivePeriod;

/// An [`OrderedLedger`] of cash movements tracking a running balance.
///
/// Inserting earlier than the latest entry patches every later entry's stored
/// balance by the inserted amount - the one O(n) path, accepted because
/// backdating is rare.
#[derive(Debug, Clone, Default)]
pub struct CashLedger {
    ledger: OrderedLedger<CashTransaction>,
}

impl CashLedger {
    pub fn new() -> Self {
        CashLedger {
            ledger: OrderedLedger::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CashTransaction> {
        self.ledger.iter()
    }

    pub fn entries(&self) -> &[CashTransaction] {
        self.ledger.entries()
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<&CashTransaction> {
        self.ledger.get_by_id(id)
    }

    pub fn in_date_range(&self, period: &EffectivePeriod) -> &[CashTransaction] {
        self.ledger.in_date_range(period)
    }

    pub fn clear(&mut self) {
        self.ledger.clear();
    }

    /// Posts a movement. Withdrawal/Fee amounts are normalized to a negated
    /// magnitude; an empty description falls back to the type's default.
    /// Returns the new entry's id.
    pub fn add_transaction(
        &mut self,
        date: NaiveDate,
        amount: Decimal,
        description: &str,
        transaction_type: CashTransactionType,
    ) -> Result<Uuid> {
        let signed = if transaction_type.is_outflow() {
            -amount.abs()
        } else {
            amount
        };
        let description = if description.is_empty() {
            transaction_type.default_description().to_string()
        } else {
            description.to_string()
        };

        let entry = CashTransaction {
            id: Uuid::new_v4(),
            date,
            transaction_type,
            description,
            amount: signed,
            balance: self.balance(date) + signed,
        };
        let id = entry.id;

        let backdated = self
            .ledger
            .latest_date()
            .is_some_and(|latest| date < latest);
        self.ledger.add(entry)?;

        if backdated {
            debug!("backdated cash entry on {date}; patching later balances");
            let start = self.ledger.entries().partition_point(|e| e.date <= date);
            for entry in &mut self.ledger.entries_mut()[start..] {
                entry.balance += signed;
            }
        }
        Ok(id)
    }

    /// Balance after the last entry dated at or before `date`; zero when
    /// there is none.
    pub fn balance(&self, date: NaiveDate) -> Decimal {
        let index = match self.ledger.index_of(date, TieBreak::Last) {
            Ok(hit) => hit,
            Err(0) => return Decimal::ZERO,
            Err(insertion) => insertion - 1,
        };
        self.ledger.entries()[index].balance
    }

    /// Balance after the latest entry.
    pub fn closing_balance(&self) -> Decimal {
        self.ledger
            .last()
            .map(|e| e.balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Lazy sequence of `(sub-period, balance)` segments partitioning
    /// `period` at each balance change. Re-invoking restarts the sequence.
    pub fn effective_balances(&self, period: &EffectivePeriod) -> EffectiveBalances<'_> {
        let start = self
            .ledger
            .entries()
            .partition_point(|e| e.date <= period.from_date);
        let end = self
            .ledger
            .entries()
            .partition_point(|e| e.date <= period.to_date);
        EffectiveBalances {
            changes: &self.ledger.entries()[start..end],
            next_from: period.from_date,
            to_date: period.to_date,
            balance: self.balance(period.from_date),
            exhausted: period.from_date > period.to_date,
        }
    }
}

/// Iterator over the piecewise-constant balance segments of a date range.
#[derive(Debug, Clone)]
pub struct EffectiveBalances<'a> {
    changes: &'a [CashTransaction],
    next_from: NaiveDate,
    to_date: NaiveDate,
    balance: Decimal,
    exhausted: bool,
}

impl Iterator for EffectiveBalances<'_> {
    type Item = (EffectivePeriod, Decimal);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let Some(change) = self.changes.first() else {
            self.exhausted = true;
            return Some((
                EffectivePeriod::new(self.next_from, self.to_date),
                self.balance,
            ));
        };

        let change_date = change.date;
        let segment_end = change_date.pred_opt().unwrap_or(change_date);
        let segment = (
            EffectivePeriod::new(self.next_from, segment_end),
            self.balance,
        );

        let run_len = self.changes.partition_point(|e| e.date <= change_date);
        self.balance = self.changes[run_len - 1].balance;
        self.changes = &self.changes[run_len..];
        self.next_from = change_date;
        Some(segment)
    }
}
