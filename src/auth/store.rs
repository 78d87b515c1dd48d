use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::oauth::request_token;
use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
	Memory,
	Environment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
	pub token: String,
	pub source: TokenSource,
}

/// Holder of the single access token for the broadcaster account.
///
/// The memory slot is filled by a successful refresh and emptied when a
/// request proves the token expired. When it is empty, the environment seed
/// is used, and failing that a refresh is attempted. Concurrent callers
/// may refresh in parallel; the grant is idempotent so the last write wins.
pub struct TokenStore {
	client: reqwest::Client,
	token_url: String,
	client_id: Option<String>,
	client_secret: Option<String>,
	seed: Option<String>,
	refresh_token: RwLock<Option<String>>,
	cached: RwLock<Option<String>>,
}

impl TokenStore {
	pub fn new(client: reqwest::Client, config: &Config) -> Self {
		Self {
			client,
			token_url: format!("{}/token", config.endpoints.twitch_id),
			client_id: config.twitch.client_id.clone(),
			client_secret: config.twitch.client_secret.clone(),
			seed: config.twitch.access_token.clone(),
			refresh_token: RwLock::new(config.twitch.refresh_token.clone()),
			cached: RwLock::new(None),
		}
	}

	/// The token that would be used right now, without refreshing.
	pub async fn current(&self) -> Option<AccessToken> {
		if let Some(token) = self.cached.read().await.as_ref() {
			return Some(AccessToken {
				token: token.clone(),
				source: TokenSource::Memory,
			});
		}
		self.seed.as_ref().map(|token| AccessToken {
			token: token.clone(),
			source: TokenSource::Environment,
		})
	}

	/// Memory token, then the environment seed, then a refresh.
	pub async fn get_valid_access_token(&self) -> Option<String> {
		if let Some(current) = self.current().await {
			debug!(source = ?current.source, "using access token");
			return Some(current.token);
		}

		debug!("no access token in memory or environment, refreshing");
		match self.refresh().await {
			Ok(token) => Some(token),
			Err(e) => {
				warn!(error = %e, "could not obtain an access token");
				None
			}
		}
	}

	/// Refresh-token grant. On failure the previous memory token (if any) is
	/// left untouched.
	pub async fn refresh(&self) -> Result<String, AppError> {
		let client_id = self
			.client_id
			.as_deref()
			.ok_or(AppError::RefreshUnavailable("TWITCH_CLIENT_ID"))?;
		let client_secret = self
			.client_secret
			.as_deref()
			.ok_or(AppError::RefreshUnavailable("TWITCH_CLIENT_SECRET"))?;
		let refresh_token = self
			.refresh_token
			.read()
			.await
			.clone()
			.ok_or(AppError::RefreshUnavailable("TWITCH_REFRESH_TOKEN"))?;

		info!("refreshing Twitch access token");

		let params = [
			("grant_type", "refresh_token"),
			("refresh_token", refresh_token.as_str()),
			("client_id", client_id),
			("client_secret", client_secret),
		];
		let grant = request_token(&self.client, &self.token_url, &params).await?;

		info!(
			token_len = grant.access_token.len(),
			expires_in = grant.expires_in,
			"Twitch access token refreshed and cached in memory"
		);

		if let Some(rotated) = grant.refresh_token.filter(|r| *r != refresh_token) {
			debug!("refresh token rotated");
			*self.refresh_token.write().await = Some(rotated);
		}

		*self.cached.write().await = Some(grant.access_token.clone());
		Ok(grant.access_token)
	}

	pub async fn clear(&self) {
		if self.cached.write().await.take().is_some() {
			debug!("cleared in-memory access token");
		}
	}
}
