use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::LedgerEntry;
use crate::temporal::EffectivePeriod;

/// Which entry of a same-date run a positional lookup should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    First,
    Last,
}

/// A strictly date-sorted collection with stable same-day ordering (ties
/// broken by insertion order), O(1) id lookup and O(log n) positional lookup.
///
/// Appending at or after the latest date is O(1); inserting earlier shifts
/// the tail, which backdating callers accept as the rare path.
#[derive(Debug, Clone)]
pub struct OrderedLedger<T: LedgerEntry> {
    entries: Vec<T>,
    positions: HashMap<Uuid, usize>,
}

impl<T: LedgerEntry> Default for OrderedLedger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LedgerEntry> OrderedLedger<T> {
    pub fn new() -> Self {
        OrderedLedger {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<&T> {
        self.positions.get(&id).map(|&pos| &self.entries[pos])
    }

    pub fn contains_id(&self, id: Uuid) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Date of the latest entry.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Inserts `entry` in date order, after any existing entries on the same
    /// date. Rejects duplicate ids.
    pub fn add(&mut self, entry: T) -> Result<(), LedgerError> {
        let id = entry.id();
        if self.positions.contains_key(&id) {
            return Err(LedgerError::DuplicateId(id));
        }

        let date = entry.date();
        let pos = match self.entries.last() {
            Some(last) if date < last.date() => {
                self.entries.partition_point(|e| e.date() <= date)
            }
            _ => self.entries.len(),
        };

        self.entries.insert(pos, entry);
        self.positions.insert(id, pos);
        self.shift_positions(pos + 1, 1);
        Ok(())
    }

    /// Replaces the entry with the same id. An unchanged date replaces in
    /// place, preserving the entry's slot in its same-date run; a changed
    /// date removes and re-inserts.
    pub fn update(&mut self, entry: T) -> Result<(), LedgerError> {
        let id = entry.id();
        let pos = *self
            .positions
            .get(&id)
            .ok_or(LedgerError::IdNotFound(id))?;

        if self.entries[pos].date() == entry.date() {
            self.entries[pos] = entry;
            return Ok(());
        }

        self.remove_at(pos)?;
        self.add(entry)
    }

    /// Removes and returns the entry with `id`.
    pub fn remove(&mut self, id: Uuid) -> Result<T, LedgerError> {
        let pos = *self
            .positions
            .get(&id)
            .ok_or(LedgerError::IdNotFound(id))?;
        self.remove_at(pos)
    }

    /// Removes and returns the entry at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, LedgerError> {
        if index >= self.entries.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let entry = self.entries.remove(index);
        self.positions.remove(&entry.id());
        self.shift_positions(index, -1);
        Ok(entry)
    }

    /// Binary search for `date`. `Ok` carries the first or last matching
    /// index per `tie_break`; `Err` carries the insertion point that would
    /// keep the ledger sorted. Range slicing and update logic rely on
    /// distinguishing the two outcomes without a second pass.
    pub fn index_of(&self, date: NaiveDate, tie_break: TieBreak) -> Result<usize, usize> {
        let first = self.entries.partition_point(|e| e.date() < date);
        if first < self.entries.len() && self.entries[first].date() == date {
            match tie_break {
                TieBreak::First => Ok(first),
                TieBreak::Last => Ok(self.entries.partition_point(|e| e.date() <= date) - 1),
            }
        } else {
            Err(first)
        }
    }

    /// Entries dated at or after `date`.
    pub fn from_date(&self, date: NaiveDate) -> &[T] {
        let start = self.entries.partition_point(|e| e.date() < date);
        &self.entries[start..]
    }

    /// Entries dated at or before `date`.
    pub fn to_date(&self, date: NaiveDate) -> &[T] {
        let end = self.entries.partition_point(|e| e.date() <= date);
        &self.entries[..end]
    }

    /// The contiguous run of entries on exactly `date`, in insertion order.
    pub fn for_date(&self, date: NaiveDate) -> &[T] {
        let start = self.entries.partition_point(|e| e.date() < date);
        let end = self.entries.partition_point(|e| e.date() <= date);
        &self.entries[start..end]
    }

    /// Entries within the inclusive `period`.
    pub fn in_date_range(&self, period: &EffectivePeriod) -> &[T] {
        let start = self
            .entries
            .partition_point(|e| e.date() < period.from_date);
        let end = self
            .entries
            .partition_point(|e| e.date() <= period.to_date);
        &self.entries[start..end]
    }

    /// Mutable view for specializations that maintain per-entry derived
    /// state (the cash ledger's running balances). Callers must leave ids
    /// and dates untouched.
    pub(crate) fn entries_mut(&mut self) -> &mut [T] {
        &mut self.entries
    }

    fn shift_positions(&mut self, from: usize, delta: isize) {
        for entry in &self.entries[from..] {
            if let Some(pos) = self.positions.get_mut(&entry.id()) {
                *pos = pos.wrapping_add_signed(delta);
            }
        }
    }
}

impl<'a, T: LedgerEntry> IntoIterator for &'a OrderedLedger<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
