use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::AppError;
use crate::state::AppState;
use crate::wizebot::{RankingKind, fetch_ranking_raw};

/// Monthly top-5 level ranking, relayed unmodified.
pub async fn get_level(State(state): State<Arc<AppState>>) -> Response {
	let Some(api_key) = state.config.wizebot_api_key.as_deref() else {
		return AppError::MissingConfig("WIZEBOT_API_KEY").into_response();
	};

	match fetch_ranking_raw(
		&state.client,
		&state.config.endpoints.wizebot,
		api_key,
		RankingKind::Level,
		5,
	)
	.await
	{
		Ok(ranking) => Json(ranking).into_response(),
		Err(e) => {
			error!(error = %e, "WizeBot level ranking failed");
			e.into_response()
		}
	}
}
