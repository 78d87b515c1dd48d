use axum::body::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::twitch::api::{helix_headers, is_permission_error};

/// A fully-read Helix response.
#[derive(Debug, Clone)]
pub struct HelixResponse {
	pub status: StatusCode,
	pub body: Bytes,
}

impl HelixResponse {
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
		Ok(serde_json::from_slice(&self.body)?)
	}

	/// Turn a non-2xx response into an error, keeping the body as message.
	pub fn error_for_status(self) -> Result<Self, AppError> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(AppError::Upstream {
				status: self.status.as_u16(),
				message: self.text(),
			})
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Authorized,
	Refreshing,
}

/// GET a Helix endpoint with the broadcaster's token.
///
/// An expired token (401 without a permission marker) is cleared, refreshed
/// once and the request reissued once. A permission 401, a failed refresh,
/// or a second 401 are returned to the caller as-is.
pub async fn twitch_get(
	state: &AppState,
	endpoint: &str,
	query: &[(&str, &str)],
) -> Result<HelixResponse, AppError> {
	let client_id = state
		.config
		.twitch
		.client_id
		.as_deref()
		.ok_or(AppError::MissingConfig("TWITCH_CLIENT_ID"))?;
	let url = format!("{}/{endpoint}", state.config.endpoints.twitch_api);

	let mut token = state
		.tokens
		.get_valid_access_token()
		.await
		.ok_or(AppError::NoAccessToken)?;
	let mut phase = Phase::Authorized;

	loop {
		debug!(endpoint, ?phase, "Helix request");
		let resp = state
			.client
			.get(&url)
			.headers(helix_headers(client_id, &token)?)
			.query(query)
			.send()
			.await?;
		let resp = HelixResponse {
			status: resp.status(),
			body: resp.bytes().await?,
		};

		if resp.status != StatusCode::UNAUTHORIZED {
			return Ok(resp);
		}

		let body = resp.text();
		if is_permission_error(&body) {
			error!(endpoint, body = %body, "scope or permission problem, re-authorize the broadcaster");
			return Ok(resp);
		}

		if phase == Phase::Refreshing {
			warn!(endpoint, "still unauthorized after token refresh");
			return Ok(resp);
		}

		info!(endpoint, "access token rejected, refreshing");
		state.tokens.clear().await;
		match state.tokens.refresh().await {
			Ok(fresh) => {
				token = fresh;
				phase = Phase::Refreshing;
			}
			Err(e) => {
				error!(error = %e, "token refresh failed, request will fail");
				return Ok(resp);
			}
		}
	}
}
