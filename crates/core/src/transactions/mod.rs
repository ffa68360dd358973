//! Transactions module - trade models, repository contract and service.

mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use transactions_model::{
    normalize_symbol, CostBasisSource, NewTransaction, RealizedPnlReport, RecordedTransaction,
    RemovedTransaction, SymbolPnl, Transaction, TransactionSide,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
