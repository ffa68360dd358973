use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use xportfoy_core::{
    portfolios::{NewPortfolio, Portfolio, PortfolioUpdate},
    Actor,
};

use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    main_lib::AppState,
};

async fn list_my_portfolios(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Portfolio>>> {
    let portfolios = state.portfolio_service.list_my_portfolios(&actor)?;
    Ok(Json(portfolios))
}

async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiJson(payload): ApiJson<NewPortfolio>,
) -> ApiResult<(StatusCode, Json<Portfolio>)> {
    let created = state
        .portfolio_service
        .create_portfolio(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_portfolio(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Portfolio>> {
    let portfolio = state.portfolio_service.get_portfolio(&actor, &id)?;
    Ok(Json(portfolio))
}

async fn update_portfolio(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiJson(payload): ApiJson<PortfolioUpdate>,
) -> ApiResult<Json<Portfolio>> {
    let updated = state
        .portfolio_service
        .update_portfolio(&actor, &id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_portfolio(
    ApiPath(id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<StatusCode> {
    state.portfolio_service.delete_portfolio(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios", get(list_my_portfolios).post(create_portfolio))
        .route(
            "/portfolios/{id}",
            get(get_portfolio)
                .put(update_portfolio)
                .delete(delete_portfolio),
        )
}
