//! Holdings - the aggregate position in one instrument, composed of
//! parcels.

mod holding_model;


pub use holding_model::{ApportionBasis, CostBaseReduction, Holding, HoldingProperties};
