use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::auth::fetch::twitch_get;
use crate::auth::oauth::{authorize_url, exchange_code};
use crate::error::AppError;
use crate::state::AppState;
use crate::twitch::types::{HelixPage, TokenGrant};

/// Force a refresh-token grant and keep the result in memory.
pub async fn post_refresh(State(state): State<Arc<AppState>>) -> Response {
	match state.tokens.refresh().await {
		Ok(_) => Json(json!({
			"message": "Token refreshed successfully",
			"success": true,
		}))
		.into_response(),
		Err(e) => {
			warn!(error = %e, "manual token refresh failed");
			(
				StatusCode::BAD_REQUEST,
				Json(json!({ "error": e.to_string(), "success": false })),
			)
				.into_response()
		}
	}
}

pub async fn get_authorize(State(state): State<Arc<AppState>>) -> Response {
	match authorize_url(&state) {
		Ok(url) => Redirect::temporary(url.as_str()).into_response(),
		Err(e) => e.into_response(),
	}
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
	code: Option<String>,
	error: Option<String>,
	error_description: Option<String>,
}

/// OAuth redirect target. Shows the operator the new token pair so it can be
/// persisted as environment configuration.
pub async fn get_callback(
	State(state): State<Arc<AppState>>,
	Query(params): Query<CallbackParams>,
) -> Response {
	if let Some(err) = params.error {
		warn!(error = %err, description = ?params.error_description, "authorization denied");
		let detail = params.error_description.unwrap_or(err);
		return (
			StatusCode::BAD_REQUEST,
			Json(json!({ "error": format!("Twitch OAuth error: {detail}") })),
		)
			.into_response();
	}

	let Some(code) = params.code.filter(|c| !c.is_empty()) else {
		return (
			StatusCode::BAD_REQUEST,
			Json(json!({ "error": "Missing authorization code" })),
		)
			.into_response();
	};

	match exchange_code(&state, &code).await {
		Ok(grant) => Html(token_page(&grant)).into_response(),
		Err(e @ AppError::MissingConfig(_)) => {
			error!(error = %e, "cannot exchange authorization code");
			e.into_response()
		}
		Err(e) => {
			warn!(error = %e, "authorization code exchange failed");
			(
				StatusCode::BAD_REQUEST,
				Json(json!({ "error": e.to_string() })),
			)
				.into_response()
		}
	}
}

fn token_page(grant: &TokenGrant) -> String {
	let refresh = grant.refresh_token.as_deref().unwrap_or("(none returned)");
	let expires = grant
		.expires_in
		.map(|s| format!("{s} seconds"))
		.unwrap_or_else(|| "unknown".into());

	format!(
		r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Twitch authorization complete</title></head>
<body>
<h1>Twitch authorization complete</h1>
<p>Store these values in the service environment, then restart it.</p>
<h2>TWITCH_ACCESS_TOKEN</h2>
<pre>{access}</pre>
<h2>TWITCH_REFRESH_TOKEN</h2>
<pre>{refresh}</pre>
<p>Access token expires in {expires}.</p>
</body>
</html>
"#,
		access = escape_html(&grant.access_token),
		refresh = escape_html(refresh),
		expires = expires,
	)
}

fn escape_html(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}

/// Diagnostic listing of the channel's custom rewards, as Helix returns them.
pub async fn get_redemptions(State(state): State<Arc<AppState>>) -> Response {
	let Some(broadcaster_id) = state.config.twitch.broadcaster_id.as_deref() else {
		return AppError::MissingConfig("TWITCH_BROADCASTER_ID").into_response();
	};
	let twitch = &state.config.twitch;
	if twitch.access_token.is_none() && twitch.refresh_token.is_none() {
		error!("no Twitch access or refresh token configured");
		return AppError::MissingConfig("TWITCH_ACCESS_TOKEN or TWITCH_REFRESH_TOKEN")
			.into_response();
	}

	let resp = match twitch_get(
		&state,
		"channel_points/custom_rewards",
		&[("broadcaster_id", broadcaster_id)],
	)
	.await
	{
		Ok(resp) => resp,
		Err(e) => {
			error!(error = %e, "custom rewards request failed");
			return e.into_response();
		}
	};

	if !resp.is_success() {
		let body: Value = resp.json().unwrap_or_else(|_| json!({}));
		let kind = body
			.get("error")
			.and_then(Value::as_str)
			.unwrap_or("Twitch API error");
		let message = body
			.get("message")
			.and_then(Value::as_str)
			.map(str::to_owned)
			.unwrap_or_else(|| resp.text());
		warn!(status = %resp.status, message = %message, "Helix rejected custom rewards request");
		return (
			resp.status,
			Json(json!({ "error": kind, "message": message })),
		)
			.into_response();
	}

	match resp.json::<HelixPage<Value>>() {
		Ok(page) => {
			info!(count = page.data.len(), "custom rewards listed");
			Json(json!({ "redemptions": page.data })).into_response()
		}
		Err(e) => e.into_response(),
	}
}
