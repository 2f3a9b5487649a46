use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cash::CashLedger;
use crate::errors::{Error, LedgerError, Result, TransactionError};
use crate::portfolio::cgt::OpenParcel;
use crate::portfolio::parcel::Parcel;
use crate::temporal::{EffectiveLifetime, HasLifetime, TemporalStore};
use crate::utils::decimal_utils::round_cents;

/// Versioned aggregate over a holding's open parcels.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingProperties {
    pub units: i64,
    pub amount: Decimal,
    pub cost_base: Decimal,
}

/// Which parcel attribute weights a pro-rata apportionment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApportionBasis {
    Units,
    CostBase,
}

/// One parcel's share of a cost-base reduction. `excess` is the part that
/// could not be absorbed before the parcel's cost base hit zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CostBaseReduction {
    pub parcel_id: Uuid,
    pub acquisition_date: NaiveDate,
    pub applied: Decimal,
    pub excess: Decimal,
}

/// The position in one instrument: parcels keyed by id, a derived temporal
/// aggregate, and a dividend-reinvestment cash sub-account. A holding opens
/// on its first acquisition, closes when its unit count reaches zero, and
/// reopens as a new effective period on re-acquisition.
#[derive(Debug, Clone, Default)]
pub struct Holding {
    instrument_id: String,
    lifetime: EffectiveLifetime,
    parcels: HashMap<Uuid, Parcel>,
    properties: TemporalStore<HoldingProperties>,
    drp_account: CashLedger,
    drp_participation: bool,
}

impl Holding {
    pub fn new(instrument_id: &str) -> Self {
        Holding {
            instrument_id: instrument_id.to_string(),
            ..Default::default()
        }
    }

    pub fn instrument_id(&self) -> &str {
        &self.instrument_id
    }

    pub fn properties(&self) -> &TemporalStore<HoldingProperties> {
        &self.properties
    }

    pub fn properties_at(&self, date: NaiveDate) -> Result<&HoldingProperties> {
        self.properties.value(date).map_err(Error::from)
    }

    pub fn drp_account(&self) -> &CashLedger {
        &self.drp_account
    }

    pub(crate) fn drp_account_mut(&mut self) -> &mut CashLedger {
        &mut self.drp_account
    }

    pub fn is_drp_participant(&self) -> bool {
        self.drp_participation
    }

    pub fn set_drp_participation(&mut self, participating: bool) {
        self.drp_participation = participating;
    }

    pub fn parcels(&self) -> impl Iterator<Item = &Parcel> {
        self.parcels.values()
    }

    pub fn parcel(&self, id: Uuid) -> Option<&Parcel> {
        self.parcels.get(&id)
    }

    /// Snapshots of the parcels holding units at `date`, ordered by
    /// acquisition date then id so apportionment remainders land
    /// deterministically; disposal ordering beyond that is the comparator's
    /// job.
    pub fn open_parcels(&self, date: NaiveDate) -> Result<Vec<OpenParcel>> {
        let mut open = Vec::new();
        for parcel in self.parcels.values() {
            if !parcel.is_effective_at(date) {
                continue;
            }
            let view = OpenParcel::from_parcel(parcel, date)?;
            if view.properties.units > 0 {
                open.push(view);
            }
        }
        open.sort_by_key(|p| (p.acquisition_date, p.id));
        Ok(open)
    }

    /// Opens a parcel and extends the aggregate; starts (or reopens) the
    /// holding's lifetime when it is not currently effective.
    pub fn acquire(
        &mut self,
        date: NaiveDate,
        acquisition_date: NaiveDate,
        units: i64,
        amount: Decimal,
        cost_base: Decimal,
        transaction_id: Uuid,
    ) -> Result<Uuid> {
        let parcel = Parcel::new(
            acquisition_date,
            date,
            units,
            amount,
            cost_base,
            transaction_id,
        )?;
        let parcel_id = parcel.id();

        if !self.lifetime.is_effective() {
            debug!(
                "opening holding {} effective {date}",
                self.instrument_id
            );
            self.lifetime.start(date)?;
        }
        self.parcels.insert(parcel_id, parcel);
        self.refresh_aggregate(date)?;
        Ok(parcel_id)
    }

    /// Applies signed deltas to one parcel and refreshes the aggregate,
    /// closing the holding when the last units go.
    pub fn change_parcel(
        &mut self,
        parcel_id: Uuid,
        date: NaiveDate,
        units_change: i64,
        amount_change: Decimal,
        cost_base_change: Decimal,
        transaction_id: Uuid,
    ) -> Result<()> {
        let parcel = self
            .parcels
            .get_mut(&parcel_id)
            .ok_or(LedgerError::IdNotFound(parcel_id))?;
        parcel.change(
            date,
            units_change,
            amount_change,
            cost_base_change,
            transaction_id,
        )?;
        self.refresh_aggregate(date)
    }

    /// Reduces cost base across open parcels pro-rata by `basis`, flooring
    /// each parcel at zero. Returns each parcel's applied share and any
    /// unabsorbed excess; the shares re-sum to `amount` to the cent.
    pub fn reduce_cost_base(
        &mut self,
        date: NaiveDate,
        amount: Decimal,
        basis: ApportionBasis,
        transaction_id: Uuid,
    ) -> Result<Vec<CostBaseReduction>> {
        if amount < Decimal::ZERO {
            return Err(TransactionError::InvalidTransaction(
                "cost base reduction must not be negative".to_string(),
            )
            .into());
        }

        let open = self.open_parcels(date)?;
        if open.is_empty() {
            return Err(TransactionError::NoSharesOwned {
                instrument_id: self.instrument_id.clone(),
                date,
            }
            .into());
        }

        let weight = |p: &OpenParcel| -> Decimal {
            match basis {
                ApportionBasis::Units => Decimal::from(p.properties.units),
                ApportionBasis::CostBase => p.properties.cost_base,
            }
        };
        let mut total_weight: Decimal = open.iter().map(weight).sum();
        let by_units_fallback = total_weight.is_zero();
        if by_units_fallback {
            // Cost bases already exhausted; spread by units instead.
            total_weight = open
                .iter()
                .map(|p| Decimal::from(p.properties.units))
                .sum();
        }

        let mut reductions = Vec::with_capacity(open.len());
        let mut remaining = amount;
        for (i, parcel) in open.iter().enumerate() {
            let share = if i + 1 == open.len() {
                remaining
            } else {
                let w = if by_units_fallback {
                    Decimal::from(parcel.properties.units)
                } else {
                    weight(parcel)
                };
                round_cents(amount * w / total_weight)
            };
            remaining -= share;

            let applied = share.min(parcel.properties.cost_base);
            if applied > Decimal::ZERO {
                self.change_parcel(parcel.id, date, 0, Decimal::ZERO, -applied, transaction_id)?;
            }
            reductions.push(CostBaseReduction {
                parcel_id: parcel.id,
                acquisition_date: parcel.acquisition_date,
                applied,
                excess: share - applied,
            });
        }
        Ok(reductions)
    }

    /// Rescales every open parcel's unit count by `new_units /
    /// original_units`, rounding half away from zero to whole units. Cost
    /// basis is unchanged.
    pub fn rescale_units(
        &mut self,
        date: NaiveDate,
        original_units: i64,
        new_units: i64,
        transaction_id: Uuid,
    ) -> Result<()> {
        if original_units <= 0 || new_units <= 0 {
            return Err(TransactionError::InvalidTransaction(format!(
                "unit rescale ratio must be positive, got {new_units}-for-{original_units}"
            ))
            .into());
        }

        let open = self.open_parcels(date)?;
        if open.is_empty() {
            return Err(TransactionError::NoSharesOwned {
                instrument_id: self.instrument_id.clone(),
                date,
            }
            .into());
        }

        let ratio = Decimal::from(new_units) / Decimal::from(original_units);
        for parcel in open {
            let rescaled = (Decimal::from(parcel.properties.units) * ratio)
                .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
            let rescaled = rescaled.to_i64().ok_or_else(|| {
                TransactionError::InvalidTransaction(format!(
                    "rescaled unit count {rescaled} out of range"
                ))
            })?;
            let delta = rescaled - parcel.properties.units;
            if delta != 0 {
                self.change_parcel(
                    parcel.id,
                    date,
                    delta,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    transaction_id,
                )?;
            }
        }
        Ok(())
    }

    /// Recomputes the aggregate from parcels' open records, recording it as
    /// a property change on `date` and closing the holding at zero units.
    fn refresh_aggregate(&mut self, date: NaiveDate) -> Result<()> {
        let mut total = HoldingProperties::default();
        for parcel in self.parcels.values() {
            if let Some(props) = parcel.current_properties() {
                total.units += props.units;
                total.amount += props.amount;
                total.cost_base += props.cost_base;
            }
        }

        self.properties.change(date, total)?;
        if total.units == 0 && self.lifetime.is_effective() {
            debug!(
                "holding {} reduced to zero units on {date}; closing",
                self.instrument_id
            );
            self.properties.end(date)?;
            self.lifetime.end(date)?;
        }
        Ok(())
    }
}

impl HasLifetime for Holding {
    fn lifetime(&self) -> &EffectiveLifetime {
        &self.lifetime
    }
}
