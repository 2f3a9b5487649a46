//! Portfolio transactions - the durable command log and its handlers.

mod transaction_handlers;
mod transactions_model;


pub use transaction_handlers::{
    AcquisitionHandler, CashTransactionHandler, CostBaseAdjustmentHandler, DisposalHandler,
    HandlerRegistry, IncomeReceivedHandler, OpeningBalanceHandler, ReturnOfCapitalHandler,
    TransactionHandler, UnitCountAdjustmentHandler,
};
pub use transactions_model::{Transaction, TransactionDetails, TransactionKind};
