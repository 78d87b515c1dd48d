use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Unified error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("invalid header value: {0}")]
	Header(#[from] reqwest::header::InvalidHeaderValue),

	#[error("missing configuration: {0}")]
	MissingConfig(&'static str),

	#[error("no valid Twitch access token available")]
	NoAccessToken,

	#[error("token refresh unavailable: {0} is not configured")]
	RefreshUnavailable(&'static str),

	#[error("token request failed: {0}")]
	TokenRequest(String),

	#[error("upstream API error (status {status}): {message}")]
	Upstream { status: u16, message: String },

	#[error("aggregation task failed: {0}")]
	Aggregation(#[from] tokio::task::JoinError),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			AppError::MissingConfig(_) | AppError::Aggregation(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
			AppError::RefreshUnavailable(_) | AppError::TokenRequest(_) => StatusCode::BAD_REQUEST,
			AppError::NoAccessToken => StatusCode::UNAUTHORIZED,
			AppError::Upstream { status, .. } => {
				StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
			}
			AppError::Http(_) | AppError::Json(_) | AppError::Header(_) => StatusCode::BAD_GATEWAY,
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		(
			self.status(),
			Json(serde_json::json!({ "error": self.to_string() })),
		)
			.into_response()
	}
}
