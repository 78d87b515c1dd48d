//! WizeBot community rankings.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingKind {
	Uptime,
	Message,
	Level,
}

impl RankingKind {
	pub fn as_str(self) -> &'static str {
		match self {
			RankingKind::Uptime => "uptime",
			RankingKind::Message => "message",
			RankingKind::Level => "level",
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ranking {
	#[serde(default)]
	pub list: Vec<RankEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankEntry {
	pub user_name: String,
	/// Seconds for uptime rankings, a count for message rankings.
	#[serde(default)]
	pub value: f64,
}

pub fn ranking_url(base_url: &str, api_key: &str, kind: RankingKind, limit: u32) -> String {
	format!(
		"{base_url}/ranking/{api_key}/top/{}/month/{limit}",
		kind.as_str()
	)
}

/// Monthly top-`limit` ranking.
pub async fn fetch_ranking(
	client: &reqwest::Client,
	base_url: &str,
	api_key: &str,
	kind: RankingKind,
	limit: u32,
) -> Result<Ranking, AppError> {
	get_json(client, &ranking_url(base_url, api_key, kind, limit)).await
}

/// Same as [`fetch_ranking`] but without imposing a schema, for pass-through.
pub async fn fetch_ranking_raw(
	client: &reqwest::Client,
	base_url: &str,
	api_key: &str,
	kind: RankingKind,
	limit: u32,
) -> Result<serde_json::Value, AppError> {
	get_json(client, &ranking_url(base_url, api_key, kind, limit)).await
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, AppError> {
	let resp = client
		.get(url)
		.header(ACCEPT, "application/json")
		.send()
		.await?;

	let status = resp.status();
	if !status.is_success() {
		return Err(AppError::Upstream {
			status: status.as_u16(),
			message: "WizeBot API error".to_string(),
		});
	}
	Ok(resp.json().await?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn url_layout() {
		assert_eq!(
			ranking_url("https://wapi.wizebot.tv/api", "k", RankingKind::Uptime, 100),
			"https://wapi.wizebot.tv/api/ranking/k/top/uptime/month/100"
		);
		assert_eq!(
			ranking_url("http://x", "k", RankingKind::Level, 5),
			"http://x/ranking/k/top/level/month/5"
		);
	}

	#[test]
	fn missing_list_is_empty() {
		let r: Ranking = serde_json::from_str(r#"{"success":true}"#).unwrap();
		assert!(r.list.is_empty());
	}
}
