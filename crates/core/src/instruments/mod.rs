//! Instrument identity and price collaborator seams.

mod instruments_model;
mod instruments_traits;

pub use instruments_model::{Instrument, InstrumentPrice};
pub use instruments_traits::{InstrumentResolverTrait, PriceRetrieverTrait};
