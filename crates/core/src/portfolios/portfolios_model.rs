//! Portfolio domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PORTFOLIO_CURRENCY, MAX_PORTFOLIO_NAME_LEN};
use crate::errors::ValidationError;
use crate::Result;

/// Domain model representing a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::invalid("Portfolio name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_PORTFOLIO_NAME_LEN {
        return Err(ValidationError::invalid(format!(
            "Portfolio name cannot exceed {} characters",
            MAX_PORTFOLIO_NAME_LEN
        )));
    }
    Ok(())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Input model for creating a new portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub currency: Option<String>,
}

impl NewPortfolio {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if let Some(currency) = &self.currency {
            if currency.trim().len() != 3 {
                return Err(ValidationError::invalid(
                    "Currency must be a 3-letter ISO code",
                ));
            }
        }
        Ok(())
    }

    /// Validates and builds the portfolio owned by `owner_id`.
    pub fn into_portfolio(self, owner_id: &str, now: NaiveDateTime) -> Result<Portfolio> {
        self.validate()?;
        Ok(Portfolio {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: self.name.trim().to_string(),
            description: clean_description(self.description),
            is_public: self.is_public,
            currency: self
                .currency
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_else(|| DEFAULT_PORTFOLIO_CURRENCY.to_string()),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Input model for updating an existing portfolio. The owner and currency
/// never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_public: bool,
}

impl PortfolioUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }

    pub fn apply_to(self, existing: Portfolio, now: NaiveDateTime) -> Result<Portfolio> {
        self.validate()?;
        Ok(Portfolio {
            name: self.name.trim().to_string(),
            description: clean_description(self.description),
            is_public: self.is_public,
            updated_at: now,
            ..existing
        })
    }
}

/// A portfolio with the counts shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub holdings_count: i64,
    pub transactions_count: i64,
    pub followers_count: i64,
}
