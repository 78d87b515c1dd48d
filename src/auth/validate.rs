use tracing::{info, warn};

use super::oauth::SCOPES;
use crate::state::AppState;
use crate::twitch::api::validate_headers;
use crate::twitch::types::ValidateResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenValidation {
	pub valid: bool,
	pub scopes: Vec<String>,
	pub user_id: Option<String>,
}

/// Introspect a token. Any failure reads as an invalid token.
pub async fn validate(state: &AppState, token: &str) -> TokenValidation {
	let url = format!("{}/validate", state.config.endpoints.twitch_id);
	let headers = match validate_headers(token) {
		Ok(h) => h,
		Err(e) => {
			warn!(error = %e, "token cannot be sent for validation");
			return TokenValidation::default();
		}
	};

	let resp = match state.client.get(url).headers(headers).send().await {
		Ok(r) => r,
		Err(e) => {
			warn!(error = %e, "token validation request failed");
			return TokenValidation::default();
		}
	};

	if !resp.status().is_success() {
		let status = resp.status();
		let body = resp.text().await.unwrap_or_default();
		warn!(%status, body = %body, "token validation failed");
		return TokenValidation::default();
	}

	match resp.json::<ValidateResponse>().await {
		Ok(data) => {
			info!(
				user_id = ?data.user_id,
				login = ?data.login,
				scopes = ?data.scopes,
				"token validated"
			);
			TokenValidation {
				valid: true,
				scopes: data.scopes,
				user_id: data.user_id,
			}
		}
		Err(e) => {
			warn!(error = %e, "unreadable token validation response");
			TokenValidation::default()
		}
	}
}

/// Cross-check the current token against the configured broadcaster. Only
/// logs; never blocks the caller.
pub async fn check_broadcaster_token(state: &AppState) {
	let Some(token) = state.tokens.get_valid_access_token().await else {
		return;
	};
	let validation = validate(state, &token).await;
	let expected = state.config.twitch.broadcaster_id.as_deref();

	if !validation.valid {
		return;
	}
	if validation.user_id.as_deref() != expected {
		warn!(
			token_user_id = ?validation.user_id,
			broadcaster_id = ?expected,
			"token does not belong to the configured broadcaster"
		);
	}
	let missing = missing_scopes(&validation.scopes);
	if !missing.is_empty() {
		warn!(?missing, "token lacks scopes, re-authorize via /api/twitch/authorize");
	}
}

pub fn missing_scopes(granted: &[String]) -> Vec<&'static str> {
	SCOPES
		.iter()
		.copied()
		.filter(|s| !granted.iter().any(|g| g.as_str() == *s))
		.collect()
}
