use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::AppError;

/// Body fragments Twitch returns on a 401 that a token refresh cannot fix.
pub const PERMISSION_MARKERS: &[&str] = &["Missing scope", "must match"];

pub fn helix_headers(client_id: &str, access_token: &str) -> Result<HeaderMap, AppError> {
	let mut headers = HeaderMap::new();
	headers.insert(
		AUTHORIZATION,
		HeaderValue::from_str(&format!("Bearer {access_token}"))?,
	);
	headers.insert("client-id", HeaderValue::from_str(client_id)?);
	headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
	Ok(headers)
}

/// Headers for the introspection endpoint, which wants the `OAuth` scheme.
pub fn validate_headers(access_token: &str) -> Result<HeaderMap, AppError> {
	let mut headers = HeaderMap::new();
	headers.insert(
		AUTHORIZATION,
		HeaderValue::from_str(&format!("OAuth {access_token}"))?,
	);
	Ok(headers)
}

pub fn is_permission_error(body: &str) -> bool {
	PERMISSION_MARKERS.iter().any(|m| body.contains(m))
}
