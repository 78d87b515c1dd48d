use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, error, info};

use crate::state::AppState;
use crate::top::aggregate;

/// Monthly tops, served from the cache slot while it is fresh.
pub async fn get_top(State(state): State<Arc<AppState>>) -> Response {
	if let Some(cached) = state.top_cache.get().await {
		debug!("serving tops from cache");
		return Json(cached.as_ref()).into_response();
	}

	match aggregate(Arc::clone(&state)).await {
		Ok(data) => {
			let data = state.top_cache.set(data).await;
			info!("tops aggregated and cached");
			Json(data.as_ref()).into_response()
		}
		Err(e) => {
			error!(error = %e, "failed to aggregate tops");
			(
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(json!({ "error": "Failed to fetch top data" })),
			)
				.into_response()
		}
	}
}
