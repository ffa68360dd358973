use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use xportfoy_core::{holdings::AssetType, quotes::Quote, Actor};

use crate::{error::ApiResult, extract::ApiPath, main_lib::AppState};

async fn get_quote(
    ApiPath((asset_type, symbol)): ApiPath<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Quote>> {
    let asset_type: AssetType = asset_type.parse()?;
    let quote = state.quote_service.get_quote(&symbol, asset_type).await?;
    Ok(Json(quote))
}

async fn clear_cache(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<StatusCode> {
    state.quote_service.clear_cache(&actor)?;
    tracing::info!("Price cache cleared by {}", actor.user_id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes/{asset_type}/{symbol}", get(get_quote))
        .route("/quotes/cache", delete(clear_cache))
}
