//! Caller identity and ownership checks.
//!
//! Every service operation that touches a portfolio receives the verified
//! [`Actor`] and checks it here before any read of private data or any
//! mutation.

use serde::{Deserialize, Serialize};

use crate::portfolios::Portfolio;
use crate::{Error, Result};

/// The verified caller of a service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: true,
        }
    }

    pub fn owns(&self, portfolio: &Portfolio) -> bool {
        portfolio.owner_id == self.user_id
    }

    /// Mutations are reserved to the owner. Admins do not bypass this.
    pub fn ensure_owner(&self, portfolio: &Portfolio) -> Result<()> {
        if self.owns(portfolio) {
            Ok(())
        } else {
            Err(Error::Unauthorized(format!(
                "portfolio {} is not owned by the caller",
                portfolio.id
            )))
        }
    }

    /// Reads are allowed to the owner, to anyone on public portfolios, and to admins.
    pub fn ensure_can_view(&self, portfolio: &Portfolio) -> Result<()> {
        if portfolio.is_public || self.is_admin || self.owns(portfolio) {
            Ok(())
        } else {
            Err(Error::Unauthorized(format!(
                "portfolio {} is private",
                portfolio.id
            )))
        }
    }

    pub fn ensure_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::Unauthorized("admin role required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn portfolio(owner: &str, is_public: bool) -> Portfolio {
        let now = Utc::now().naive_utc();
        Portfolio {
            id: "p1".to_string(),
            owner_id: owner.to_string(),
            name: "Main".to_string(),
            description: None,
            is_public,
            currency: "TRY".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_can_mutate() {
        assert!(Actor::user("alice")
            .ensure_owner(&portfolio("alice", false))
            .is_ok());
    }

    #[test]
    fn test_non_owner_cannot_mutate_even_if_public_or_admin() {
        let p = portfolio("alice", true);
        assert!(matches!(
            Actor::user("bob").ensure_owner(&p),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            Actor::admin("root").ensure_owner(&p),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn test_view_rules() {
        let private = portfolio("alice", false);
        let public = portfolio("alice", true);
        assert!(Actor::user("bob").ensure_can_view(&private).is_err());
        assert!(Actor::user("bob").ensure_can_view(&public).is_ok());
        assert!(Actor::admin("root").ensure_can_view(&private).is_ok());
        assert!(Actor::user("alice").ensure_can_view(&private).is_ok());
    }

    #[test]
    fn test_admin_check() {
        assert!(Actor::admin("root").ensure_admin().is_ok());
        assert!(Actor::user("bob").ensure_admin().is_err());
    }
}
