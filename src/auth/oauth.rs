use reqwest::Url;
use tracing::{error, info};

use crate::error::AppError;
use crate::state::AppState;
use crate::twitch::types::{TokenErrorBody, TokenGrant};

/// Scopes the broadcaster must grant for every gatherer to work.
pub const SCOPES: &[&str] = &[
	"channel:read:redemptions",
	"channel:manage:redemptions",
	"bits:read",
	"channel:read:subscriptions",
];

/// POST a form to the token endpoint and parse the grant.
pub async fn request_token(
	client: &reqwest::Client,
	token_url: &str,
	params: &[(&str, &str)],
) -> Result<TokenGrant, AppError> {
	let resp = client.post(token_url).form(params).send().await?;
	let status = resp.status();
	let body = resp.text().await?;

	if !status.is_success() {
		let message = serde_json::from_str::<TokenErrorBody>(&body)
			.ok()
			.and_then(TokenErrorBody::into_message)
			.unwrap_or_else(|| format!("{status}: {body}"));
		error!(%status, message = %message, "token endpoint rejected the request");
		return Err(AppError::TokenRequest(message));
	}

	serde_json::from_str(&body)
		.map_err(|e| AppError::TokenRequest(format!("failed to parse token response: {e}")))
}

/// Operator-facing authorization URL for the broadcaster account.
pub fn authorize_url(state: &AppState) -> Result<Url, AppError> {
	let twitch = &state.config.twitch;
	let client_id = twitch
		.client_id
		.as_deref()
		.ok_or(AppError::MissingConfig("TWITCH_CLIENT_ID"))?;
	let redirect_uri = twitch
		.redirect_uri
		.as_deref()
		.ok_or(AppError::MissingConfig("TWITCH_REDIRECT_URI"))?;
	let scope = SCOPES.join(" ");

	Url::parse_with_params(
		&format!("{}/authorize", state.config.endpoints.twitch_id),
		[
			("client_id", client_id),
			("redirect_uri", redirect_uri),
			("response_type", "code"),
			("scope", scope.as_str()),
		],
	)
	.map_err(|e| AppError::TokenRequest(format!("invalid authorize URL: {e}")))
}

/// Exchange an authorization code for an access/refresh token pair. The
/// result is handed back to the operator; the token store is not touched.
pub async fn exchange_code(state: &AppState, code: &str) -> Result<TokenGrant, AppError> {
	let twitch = &state.config.twitch;
	let client_id = twitch
		.client_id
		.as_deref()
		.ok_or(AppError::MissingConfig("TWITCH_CLIENT_ID"))?;
	let client_secret = twitch
		.client_secret
		.as_deref()
		.ok_or(AppError::MissingConfig("TWITCH_CLIENT_SECRET"))?;
	let redirect_uri = twitch
		.redirect_uri
		.as_deref()
		.ok_or(AppError::MissingConfig("TWITCH_REDIRECT_URI"))?;

	let params = [
		("client_id", client_id),
		("client_secret", client_secret),
		("code", code),
		("grant_type", "authorization_code"),
		("redirect_uri", redirect_uri),
	];
	let token_url = format!("{}/token", state.config.endpoints.twitch_id);
	let grant = request_token(&state.client, &token_url, &params).await?;

	info!(
		expires_in = grant.expires_in,
		has_refresh_token = grant.refresh_token.is_some(),
		"authorization code exchanged"
	);
	Ok(grant)
}
