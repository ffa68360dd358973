use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use xportfoy_core::{
    holdings::{Holding, ValuedHolding},
    Actor,
};

use crate::{error::ApiResult, extract::ApiPath, main_lib::AppState};

async fn list_holdings(
    ApiPath(portfolio_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Holding>>> {
    let holdings = state
        .holdings_service
        .list_holdings(&actor, &portfolio_id)?;
    Ok(Json(holdings))
}

async fn valued_holdings(
    ApiPath(portfolio_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<ValuedHolding>>> {
    let holdings = state
        .holdings_service
        .valued_holdings(&actor, &portfolio_id)
        .await?;
    Ok(Json(holdings))
}

async fn get_holding(
    ApiPath((portfolio_id, symbol)): ApiPath<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Holding>> {
    let holding = state
        .holdings_service
        .get_holding(&actor, &portfolio_id, &symbol)?;
    Ok(Json(holding))
}

pub fn router() -> Router<Arc<AppState>> {
    // The static `valued` segment takes precedence over `{symbol}`.
    Router::new()
        .route("/portfolios/{id}/holdings", get(list_holdings))
        .route("/portfolios/{id}/holdings/valued", get(valued_holdings))
        .route("/portfolios/{id}/holdings/{symbol}", get(get_holding))
}
