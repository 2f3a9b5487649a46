//! Taxfolio Core - portfolio ledger, holdings and capital gains tax engine.
//!
//! This crate turns a chronological log of buy/sell/dividend/corporate-action
//! transactions into a point-in-time-queryable view of holdings, cash and
//! realized capital gains. It is synchronous and purely in-memory: the HTTP
//! surface, persistence and market-data retrieval are external collaborators
//! behind the traits in [`instruments`].

pub mod cash;
pub mod constants;
pub mod errors;
pub mod instruments;
pub mod ledger;
pub mod portfolio;
pub mod temporal;
pub mod utils;

// Re-export common types from the portfolio module
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
