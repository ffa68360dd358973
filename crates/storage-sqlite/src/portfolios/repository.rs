use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use xportfoy_core::portfolios::{Portfolio, PortfolioRepositoryTrait};
use xportfoy_core::{Error, Result};

use super::model::PortfolioDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::portfolios;
use crate::schema::portfolios::dsl::*;
use crate::utils::chunk_for_sqlite;

pub struct PortfolioRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    async fn create(&self, portfolio: Portfolio) -> Result<Portfolio> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                let row = diesel::insert_into(portfolios::table)
                    .values(PortfolioDB::from(portfolio))
                    .returning(PortfolioDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                let row = PortfolioDB::from(portfolio);
                let updated = diesel::update(portfolios.find(&row.id))
                    .set((
                        name.eq(&row.name),
                        description.eq(&row.description),
                        is_public.eq(row.is_public),
                        updated_at.eq(row.updated_at),
                    ))
                    .returning(PortfolioDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::NotFound(format!("portfolio {} not found", row.id)))?;
                Ok(updated.into())
            })
            .await
    }

    /// Holdings, transactions and follows go with the portfolio through
    /// `ON DELETE CASCADE`.
    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let target = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(portfolios.find(target))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Option<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolios
            .find(portfolio_id)
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Portfolio::from))
    }

    fn get_by_ids(&self, portfolio_ids: &[String]) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let mut result = Vec::with_capacity(portfolio_ids.len());
        for chunk in chunk_for_sqlite(portfolio_ids) {
            let rows = portfolios
                .filter(id.eq_any(chunk))
                .select(PortfolioDB::as_select())
                .load::<PortfolioDB>(&mut conn)
                .map_err(StorageError::from)?;
            result.extend(rows.into_iter().map(Portfolio::from));
        }
        Ok(result)
    }

    fn list_by_owner(&self, owner: &str) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolios
            .filter(owner_id.eq(owner))
            .order((created_at.desc(), id.asc()))
            .select(PortfolioDB::as_select())
            .load::<PortfolioDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Portfolio::from).collect())
    }

    fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolios
            .filter(is_public.eq(true))
            .order((created_at.desc(), id.asc()))
            .limit(limit)
            .offset(offset)
            .select(PortfolioDB::as_select())
            .load::<PortfolioDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Portfolio::from).collect())
    }

    fn list_all(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolios
            .order((created_at.desc(), id.asc()))
            .select(PortfolioDB::as_select())
            .load::<PortfolioDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Portfolio::from).collect())
    }
}
