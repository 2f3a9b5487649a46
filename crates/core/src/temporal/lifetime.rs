use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::EffectiveDateError;
use crate::temporal::EffectivePeriod;

/// Start/end dates for an entity, with point-in-time and range effectiveness
/// queries. An ended lifetime can be re-opened with a later `start`, so the
/// history is a list of periods (a holding sold out and re-acquired).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveLifetime {
    periods: Vec<EffectivePeriod>,
}

impl EffectiveLifetime {
    pub fn new() -> Self {
        EffectiveLifetime {
            periods: Vec::new(),
        }
    }

    /// A lifetime already started at `date`.
    pub fn starting(date: NaiveDate) -> Self {
        EffectiveLifetime {
            periods: vec![EffectivePeriod::open(date)],
        }
    }

    pub fn periods(&self) -> &[EffectivePeriod] {
        &self.periods
    }

    /// First start date, if ever started.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.periods.first().map(|p| p.from_date)
    }

    /// End date of the latest period, if it has been closed.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.periods
            .last()
            .filter(|p| !p.is_open())
            .map(|p| p.to_date)
    }

    /// Is the latest period still open?
    pub fn is_effective(&self) -> bool {
        self.periods.last().is_some_and(|p| p.is_open())
    }

    /// Opens a new period at `date`. Fails while a period is still open.
    pub fn start(&mut self, date: NaiveDate) -> Result<(), EffectiveDateError> {
        if self.is_effective() {
            return Err(EffectiveDateError::AlreadyStarted);
        }
        self.periods.push(EffectivePeriod::open(date));
        Ok(())
    }

    /// Closes the open period at `date` (inclusive).
    pub fn end(&mut self, date: NaiveDate) -> Result<(), EffectiveDateError> {
        let last = self
            .periods
            .last_mut()
            .ok_or(EffectiveDateError::NotStarted)?;
        if !last.is_open() {
            return Err(EffectiveDateError::AlreadyEnded);
        }
        if date < last.from_date {
            return Err(EffectiveDateError::EndBeforeStart {
                start: last.from_date,
                end: date,
            });
        }
        last.to_date = date;
        Ok(())
    }

    pub fn is_effective_at(&self, date: NaiveDate) -> bool {
        self.periods.iter().any(|p| p.contains(date))
    }

    pub fn is_effective_during(&self, period: &EffectivePeriod) -> bool {
        self.periods.iter().any(|p| p.overlaps(period))
    }
}

/// Exposes an entity's lifetime so collections can be filtered to
/// "as of"/"active during" views generically.
pub trait HasLifetime {
    fn lifetime(&self) -> &EffectiveLifetime;

    fn is_effective_at(&self, date: NaiveDate) -> bool {
        self.lifetime().is_effective_at(date)
    }

    fn is_effective_during(&self, period: &EffectivePeriod) -> bool {
        self.lifetime().is_effective_during(period)
    }
}
