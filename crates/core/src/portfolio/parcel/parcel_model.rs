use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EffectiveDateError, Error, Result, TransactionError};
use crate::temporal::{EffectiveLifetime, HasLifetime, TemporalStore};

/// Versioned state of a parcel: whole units held, original consideration and
/// the tax cost base. All three are non-negative at every point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelProperties {
    pub units: i64,
    pub amount: Decimal,
    pub cost_base: Decimal,
}

impl ParcelProperties {
    pub fn unit_cost_base(&self) -> Decimal {
        if self.units == 0 {
            Decimal::ZERO
        } else {
            self.cost_base / Decimal::from(self.units)
        }
    }
}

/// One line of a parcel's append-only audit trail: the deltas applied on a
/// date and the transaction that caused them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelAuditRecord {
    pub date: NaiveDate,
    pub units_change: i64,
    pub amount_change: Decimal,
    pub cost_base_change: Decimal,
    pub transaction_id: Uuid,
}

/// A lot of units acquired on a single date. The acquisition date is the CGT
/// clock and never moves; the properties are versioned so the parcel can be
/// queried as of any date in its life. A parcel closes exactly when its unit
/// count reaches zero and rejects changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    id: Uuid,
    acquisition_date: NaiveDate,
    lifetime: EffectiveLifetime,
    properties: TemporalStore<ParcelProperties>,
    audit: Vec<ParcelAuditRecord>,
}

impl Parcel {
    /// Opens a new parcel effective from `from_date`. The acquisition date
    /// may precede it (an opening balance carrying an older CGT clock).
    ///
    /// The causing transaction's id doubles as the parcel id - each opening
    /// transaction creates exactly one parcel, and replaying an unchanged
    /// ledger must reproduce the same parcel identities.
    pub fn new(
        acquisition_date: NaiveDate,
        from_date: NaiveDate,
        units: i64,
        amount: Decimal,
        cost_base: Decimal,
        transaction_id: Uuid,
    ) -> Result<Self> {
        if units <= 0 {
            return Err(TransactionError::InvalidTransaction(format!(
                "parcel must open with positive units, got {units}"
            ))
            .into());
        }
        if amount < Decimal::ZERO || cost_base < Decimal::ZERO {
            return Err(TransactionError::InvalidTransaction(
                "parcel amounts must not be negative".to_string(),
            )
            .into());
        }

        let mut properties = TemporalStore::new();
        properties.change(
            from_date,
            ParcelProperties {
                units,
                amount,
                cost_base,
            },
        )?;

        Ok(Parcel {
            id: transaction_id,
            acquisition_date,
            lifetime: EffectiveLifetime::starting(from_date),
            properties,
            audit: vec![ParcelAuditRecord {
                date: from_date,
                units_change: units,
                amount_change: amount,
                cost_base_change: cost_base,
                transaction_id,
            }],
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn acquisition_date(&self) -> NaiveDate {
        self.acquisition_date
    }

    pub fn properties(&self) -> &TemporalStore<ParcelProperties> {
        &self.properties
    }

    pub fn audit(&self) -> &[ParcelAuditRecord] {
        &self.audit
    }

    pub fn is_closed(&self) -> bool {
        !self.lifetime.is_effective()
    }

    /// The open record's properties; `None` once the parcel has closed.
    pub fn current_properties(&self) -> Option<&ParcelProperties> {
        self.properties.current()
    }

    /// Point-in-time properties.
    pub fn properties_at(&self, date: NaiveDate) -> Result<&ParcelProperties> {
        self.properties.value(date).map_err(Error::from)
    }

    /// Applies signed deltas effective from `date`, recording the change in
    /// the audit trail. No field may go negative; reaching zero units closes
    /// the parcel on `date`.
    pub fn change(
        &mut self,
        date: NaiveDate,
        units_change: i64,
        amount_change: Decimal,
        cost_base_change: Decimal,
        transaction_id: Uuid,
    ) -> Result<()> {
        let current = *self
            .properties
            .current()
            .ok_or(EffectiveDateError::AlreadyEnded)?;

        let units = current.units + units_change;
        let amount = current.amount + amount_change;
        let cost_base = current.cost_base + cost_base_change;
        if units < 0 {
            return Err(TransactionError::NotEnoughShares {
                requested: -units_change,
                available: current.units,
            }
            .into());
        }
        if amount < Decimal::ZERO || cost_base < Decimal::ZERO {
            return Err(TransactionError::InvalidTransaction(format!(
                "parcel {} change on {date} would leave a negative balance",
                self.id
            ))
            .into());
        }

        self.properties.change(
            date,
            ParcelProperties {
                units,
                amount,
                cost_base,
            },
        )?;
        self.audit.push(ParcelAuditRecord {
            date,
            units_change,
            amount_change,
            cost_base_change,
            transaction_id,
        });

        if units == 0 {
            debug!("parcel {} fully consumed on {date}; closing", self.id);
            self.properties.end(date)?;
            self.lifetime.end(date)?;
        }
        Ok(())
    }
}

impl HasLifetime for Parcel {
    fn lifetime(&self) -> &EffectiveLifetime {
        &self.lifetime
    }
}
