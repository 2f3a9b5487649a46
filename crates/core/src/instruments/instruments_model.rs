use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of a tradeable instrument, resolved by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub symbol: String,
    pub name: Option<String>,
    /// Whether the issuer offers a dividend reinvestment plan.
    #[serde(default)]
    pub drp_available: bool,
}

/// A dated closing price, as supplied by an external price retriever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentPrice {
    pub instrument_id: String,
    pub date: NaiveDate,
    pub price: Decimal,
}
