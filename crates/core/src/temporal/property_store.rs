use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::EffectiveDateError;
use crate::temporal::EffectivePeriod;

/// One versioned value of an attribute, effective over an inclusive period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalRecord<T> {
    pub period: EffectivePeriod,
    pub value: T,
}

/// An ordered, non-overlapping sequence of versioned values for a single
/// attribute. At most one record is effective on any date; within one
/// lifetime the records partition time without gaps. A store whose latest
/// record has been closed may be re-opened at a later date (an entity
/// reopening), leaving a gap between the two lifetimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalStore<T> {
    records: Vec<TemporalRecord<T>>,
}

impl<T> Default for TemporalStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TemporalStore<T> {
    pub fn new() -> Self {
        TemporalStore {
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[TemporalRecord<T>] {
        &self.records
    }

    /// The value of the currently open record, if any.
    pub fn current(&self) -> Option<&T> {
        self.records
            .last()
            .filter(|r| r.period.is_open())
            .map(|r| &r.value)
    }

    /// Sets `value` effective from `date`. Closes the open record at the day
    /// before and opens a new one; setting on the latest record's own start
    /// date replaces its value in place. Values must be set in non-decreasing
    /// date order.
    pub fn change(&mut self, date: NaiveDate, value: T) -> Result<(), EffectiveDateError> {
        let Some(last) = self.records.last_mut() else {
            self.records.push(TemporalRecord {
                period: EffectivePeriod::open(date),
                value,
            });
            return Ok(());
        };

        if date < last.period.from_date {
            return Err(EffectiveDateError::ChangeBeforeLatest {
                date,
                latest: last.period.from_date,
            });
        }

        if date == last.period.from_date {
            last.value = value;
            return Ok(());
        }

        if last.period.is_open() {
            let closed_at = date
                .pred_opt()
                .ok_or(EffectiveDateError::OutOfRange { date })?;
            last.period.to_date = closed_at;
        } else if date <= last.period.to_date {
            // A change inside an already-closed record would rewrite history.
            return Err(EffectiveDateError::AlreadyEnded);
        }

        self.records.push(TemporalRecord {
            period: EffectivePeriod::open(date),
            value,
        });
        Ok(())
    }

    /// Closes the currently open record at `date` (inclusive).
    pub fn end(&mut self, date: NaiveDate) -> Result<(), EffectiveDateError> {
        let last = self
            .records
            .last_mut()
            .ok_or(EffectiveDateError::NotStarted)?;
        if !last.period.is_open() {
            return Err(EffectiveDateError::AlreadyEnded);
        }
        if date < last.period.from_date {
            return Err(EffectiveDateError::EndBeforeStart {
                start: last.period.from_date,
                end: date,
            });
        }
        last.period.to_date = date;
        Ok(())
    }

    /// Point query. Fails outside the covered range.
    pub fn value(&self, date: NaiveDate) -> Result<&T, EffectiveDateError> {
        self.record_at(date)
            .map(|r| &r.value)
            .ok_or(EffectiveDateError::OutOfRange { date })
    }

    /// Point query clamped to the nearest boundary record; only `None` for an
    /// empty store.
    pub fn closest_to(&self, date: NaiveDate) -> Option<&T> {
        if let Some(record) = self.record_at(date) {
            return Some(&record.value);
        }
        let first = self.records.first()?;
        if date < first.period.from_date {
            return Some(&first.value);
        }
        // Past the end, or inside a reopen gap: take the latest record
        // starting at or before `date`.
        let idx = self
            .records
            .partition_point(|r| r.period.from_date <= date);
        Some(&self.records[idx - 1].value)
    }

    fn record_at(&self, date: NaiveDate) -> Option<&TemporalRecord<T>> {
        let idx = self
            .records
            .partition_point(|r| r.period.from_date <= date);
        if idx == 0 {
            return None;
        }
        let candidate = &self.records[idx - 1];
        candidate.period.contains(date).then_some(candidate)
    }

    /// Does any record satisfy `predicate`?
    pub fn matches<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.records.iter().any(|r| predicate(&r.value))
    }

    /// Does the record covering `date` satisfy `predicate`?
    pub fn matches_at<P>(&self, predicate: P, date: NaiveDate) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.record_at(date).is_some_and(|r| predicate(&r.value))
    }

    /// Does any record overlapping `period` satisfy `predicate`?
    pub fn matches_during<P>(&self, predicate: P, period: &EffectivePeriod) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .iter()
            .filter(|r| r.period.overlaps(period))
            .any(|r| predicate(&r.value))
    }
}
