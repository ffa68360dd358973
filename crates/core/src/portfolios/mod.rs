//! Portfolios module - models, repository contract and service.

mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;

#[cfg(test)]
mod portfolios_service_tests;

pub use portfolios_model::{NewPortfolio, Portfolio, PortfolioSummary, PortfolioUpdate};
pub use portfolios_service::{require_portfolio, PortfolioService};
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
