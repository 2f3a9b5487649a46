use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive date range. An open-ended period carries `NaiveDate::MAX` as
/// its `to_date` until it is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePeriod {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl EffectivePeriod {
    /// Sentinel `to_date` of a period that has not been closed.
    pub const OPEN_END: NaiveDate = NaiveDate::MAX;

    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        EffectivePeriod { from_date, to_date }
    }

    /// A period starting at `from_date` with no end.
    pub fn open(from_date: NaiveDate) -> Self {
        EffectivePeriod {
            from_date,
            to_date: Self::OPEN_END,
        }
    }

    pub fn is_open(&self) -> bool {
        self.to_date == Self::OPEN_END
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from_date <= date && date <= self.to_date
    }

    pub fn overlaps(&self, other: &EffectivePeriod) -> bool {
        self.from_date <= other.to_date && other.from_date <= self.to_date
    }
}

impl std::fmt::Display for EffectivePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_open() {
            write!(f, "[{}, open)", self.from_date)
        } else {
            write!(f, "[{}, {}]", self.from_date, self.to_date)
        }
    }
}
