use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::instruments::{Instrument, InstrumentPrice};
use crate::temporal::EffectivePeriod;

/// Lookup-by-id collaborator providing instrument identity, decoupling the
/// ledger core from instrument lifecycle and market-data concerns.
pub trait InstrumentResolverTrait {
    fn get_by_id(&self, instrument_id: &str) -> Result<Instrument>;
}

/// Point-in-time and ranged prices for external valuation callers. The
/// ledger itself never consults prices.
pub trait PriceRetrieverTrait {
    fn price(&self, instrument_id: &str, date: NaiveDate) -> Result<Decimal>;

    fn prices(
        &self,
        instrument_id: &str,
        period: &EffectivePeriod,
    ) -> Result<Vec<InstrumentPrice>>;
}
