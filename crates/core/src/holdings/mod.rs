//! Holdings module - position models, the recompute rule, ledger replay,
//! and the read-side service.

mod holding_writes;
mod holdings_model;
mod holdings_service;
mod holdings_traits;
pub mod ledger;
pub mod position_rule;




pub use holding_writes::{plan_record, plan_remove, HoldingWrite, UndoPlan};
pub use holdings_model::{AssetType, Holding, Position, ValuedHolding};
pub use holdings_service::HoldingsService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
pub use position_rule::{apply_trade, undo_trade, PositionTransition, Trade, UndoOutcome};
