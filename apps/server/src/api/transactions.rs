use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use xportfoy_core::{
    transactions::{
        NewTransaction, RealizedPnlReport, RecordedTransaction, RemovedTransaction, Transaction,
    },
    Actor,
};

use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    main_lib::AppState,
};

#[derive(Debug, Default, Deserialize)]
struct TransactionsQuery {
    symbol: Option<String>,
}

async fn list_transactions(
    ApiPath(portfolio_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<TransactionsQuery>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.transaction_service.list_transactions(
        &actor,
        &portfolio_id,
        query.symbol.as_deref(),
    )?;
    Ok(Json(transactions))
}

async fn create_transaction(
    ApiPath(portfolio_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiJson(payload): ApiJson<NewTransaction>,
) -> ApiResult<(StatusCode, Json<RecordedTransaction>)> {
    let recorded = state
        .transaction_service
        .create_transaction(&actor, &portfolio_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

async fn delete_transaction(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<RemovedTransaction>> {
    let removed = state
        .transaction_service
        .delete_transaction(&actor, &id)
        .await?;
    Ok(Json(removed))
}

async fn realized_pnl(
    ApiPath(portfolio_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<RealizedPnlReport>> {
    let report = state
        .transaction_service
        .realized_pnl(&actor, &portfolio_id)?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/portfolios/{id}/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/portfolios/{id}/pnl", get(realized_pnl))
        .route("/transactions/{id}", delete(delete_transaction))
}
