use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use xportfoy_core::{
    events::ActivityLogEntry, portfolios::PortfolioSummary, social::Page, Actor,
};

use crate::{
    error::ApiResult,
    extract::{ApiPath, ApiQuery},
    main_lib::AppState,
};

#[derive(Debug, Default, Deserialize)]
struct FeedQuery {
    limit: Option<i64>,
}

async fn follow(
    ApiPath(portfolio_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<StatusCode> {
    state.social_service.follow(&actor, &portfolio_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unfollow(
    ApiPath(portfolio_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<StatusCode> {
    state.social_service.unfollow(&actor, &portfolio_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn explore(
    ApiQuery(page): ApiQuery<Page>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PortfolioSummary>>> {
    Ok(Json(state.social_service.explore(page)?))
}

async fn following(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<PortfolioSummary>>> {
    Ok(Json(state.social_service.following(&actor)?))
}

async fn feed(
    ApiQuery(query): ApiQuery<FeedQuery>,
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<ActivityLogEntry>>> {
    Ok(Json(state.social_service.feed(&actor, query.limit)?))
}

async fn admin_overview(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<PortfolioSummary>>> {
    Ok(Json(state.social_service.admin_overview(&actor)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios/{id}/follow", post(follow).delete(unfollow))
        .route("/explore", get(explore))
        .route("/following", get(following))
        .route("/feed", get(feed))
        .route("/admin/portfolios", get(admin_overview))
}
