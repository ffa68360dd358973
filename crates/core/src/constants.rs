/// Default currency for new portfolios
pub const DEFAULT_PORTFOLIO_CURRENCY: &str = "TRY";

/// Maximum length of a portfolio name
pub const MAX_PORTFOLIO_NAME_LEN: usize = 100;

/// Maximum length of a transaction note
pub const MAX_NOTE_LEN: usize = 500;

/// Default page size for explore listings
pub const DEFAULT_EXPLORE_LIMIT: i64 = 20;

/// Upper bound for explore page size
pub const MAX_EXPLORE_LIMIT: i64 = 100;
