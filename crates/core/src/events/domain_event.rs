//! Domain event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::Holding;
use crate::portfolios::Portfolio;
use crate::transactions::{CostBasisSource, Transaction, TransactionSide};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. The runtime
/// adapter turns them into activity-log rows and notifications; neither
/// may affect the mutation that produced the event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A trade was recorded and its holding updated.
    TransactionRecorded {
        actor_id: String,
        portfolio_id: String,
        transaction_id: String,
        symbol: String,
        side: TransactionSide,
        quantity: Decimal,
        price: Decimal,
        /// Quantity held after the trade; `None` when the holding was closed.
        holding_quantity: Option<Decimal>,
    },

    /// A trade was deleted and its holding rolled back.
    TransactionRemoved {
        actor_id: String,
        portfolio_id: String,
        transaction_id: String,
        symbol: String,
        side: TransactionSide,
        cost_basis_source: CostBasisSource,
    },

    PortfolioCreated {
        actor_id: String,
        portfolio_id: String,
        name: String,
        is_public: bool,
    },

    PortfolioDeleted {
        actor_id: String,
        portfolio_id: String,
    },

    /// Someone started following a public portfolio.
    PortfolioFollowed {
        actor_id: String,
        portfolio_id: String,
        owner_id: String,
    },
}

impl DomainEvent {
    /// Creates a TransactionRecorded event.
    pub fn transaction_recorded(
        actor_id: &str,
        transaction: &Transaction,
        holding: Option<&Holding>,
    ) -> Self {
        Self::TransactionRecorded {
            actor_id: actor_id.to_string(),
            portfolio_id: transaction.portfolio_id.clone(),
            transaction_id: transaction.id.clone(),
            symbol: transaction.symbol.clone(),
            side: transaction.side,
            quantity: transaction.quantity,
            price: transaction.price,
            holding_quantity: holding.map(|h| h.quantity),
        }
    }

    /// Creates a TransactionRemoved event.
    pub fn transaction_removed(
        actor_id: &str,
        transaction: &Transaction,
        cost_basis_source: CostBasisSource,
    ) -> Self {
        Self::TransactionRemoved {
            actor_id: actor_id.to_string(),
            portfolio_id: transaction.portfolio_id.clone(),
            transaction_id: transaction.id.clone(),
            symbol: transaction.symbol.clone(),
            side: transaction.side,
            cost_basis_source,
        }
    }

    pub fn portfolio_created(actor_id: &str, portfolio: &Portfolio) -> Self {
        Self::PortfolioCreated {
            actor_id: actor_id.to_string(),
            portfolio_id: portfolio.id.clone(),
            name: portfolio.name.clone(),
            is_public: portfolio.is_public,
        }
    }

    pub fn portfolio_deleted(actor_id: &str, portfolio_id: &str) -> Self {
        Self::PortfolioDeleted {
            actor_id: actor_id.to_string(),
            portfolio_id: portfolio_id.to_string(),
        }
    }

    pub fn portfolio_followed(actor_id: &str, portfolio: &Portfolio) -> Self {
        Self::PortfolioFollowed {
            actor_id: actor_id.to_string(),
            portfolio_id: portfolio.id.clone(),
            owner_id: portfolio.owner_id.clone(),
        }
    }

    /// Stable identifier of the variant, used as the activity-log kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::TransactionRecorded { .. } => "transaction_recorded",
            DomainEvent::TransactionRemoved { .. } => "transaction_removed",
            DomainEvent::PortfolioCreated { .. } => "portfolio_created",
            DomainEvent::PortfolioDeleted { .. } => "portfolio_deleted",
            DomainEvent::PortfolioFollowed { .. } => "portfolio_followed",
        }
    }

    pub fn actor_id(&self) -> &str {
        match self {
            DomainEvent::TransactionRecorded { actor_id, .. }
            | DomainEvent::TransactionRemoved { actor_id, .. }
            | DomainEvent::PortfolioCreated { actor_id, .. }
            | DomainEvent::PortfolioDeleted { actor_id, .. }
            | DomainEvent::PortfolioFollowed { actor_id, .. } => actor_id,
        }
    }

    pub fn portfolio_id(&self) -> &str {
        match self {
            DomainEvent::TransactionRecorded { portfolio_id, .. }
            | DomainEvent::TransactionRemoved { portfolio_id, .. }
            | DomainEvent::PortfolioCreated { portfolio_id, .. }
            | DomainEvent::PortfolioDeleted { portfolio_id, .. }
            | DomainEvent::PortfolioFollowed { portfolio_id, .. } => portfolio_id,
        }
    }

    /// One-line, human readable description for chat notifications.
    pub fn describe(&self) -> String {
        match self {
            DomainEvent::TransactionRecorded {
                symbol,
                side,
                quantity,
                price,
                holding_quantity,
                ..
            } => match holding_quantity {
                Some(held) => format!(
                    "{} {} {} @ {} (now holding {})",
                    side,
                    quantity.normalize(),
                    symbol,
                    price.normalize(),
                    held.normalize()
                ),
                None => format!(
                    "{} {} {} @ {} (position closed)",
                    side,
                    quantity.normalize(),
                    symbol,
                    price.normalize()
                ),
            },
            DomainEvent::TransactionRemoved { symbol, side, .. } => {
                format!("Deleted a {} transaction of {}", side, symbol)
            }
            DomainEvent::PortfolioCreated { name, is_public, .. } => format!(
                "Created {} portfolio '{}'",
                if *is_public { "public" } else { "private" },
                name
            ),
            DomainEvent::PortfolioDeleted { portfolio_id, .. } => {
                format!("Deleted portfolio {}", portfolio_id)
            }
            DomainEvent::PortfolioFollowed { portfolio_id, .. } => {
                format!("Started following portfolio {}", portfolio_id)
            }
        }
    }
}
