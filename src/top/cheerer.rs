use std::sync::Arc;

use tracing::{info, warn};

use super::TopCheerer;
use super::month::MonthStart;
use crate::state::AppState;
use crate::twitch::client::fetch_bits_leaderboard;

pub async fn top_cheerer(state: Arc<AppState>, month: MonthStart) -> Option<TopCheerer> {
	let twitch = &state.config.twitch;
	if twitch.client_id.is_none() || twitch.broadcaster_id.is_none() {
		return None;
	}

	let started_at = month.helix_timestamp();
	let entries = match fetch_bits_leaderboard(&state, &started_at).await {
		Ok(entries) => entries,
		Err(e) => {
			warn!(error = %e, started_at = %started_at, "bits leaderboard failed");
			return None;
		}
	};

	let top = entries.into_iter().next()?;
	info!(name = %top.user_name, bits = top.score, rank = top.rank, "top cheerer");
	Some(TopCheerer {
		name: top.user_name,
		bits: top.score,
	})
}

#[cfg(test)]
mod tests {
	use chrono::{DateTime, Utc};
	use serde_json::json;
	use wiremock::matchers::{method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	use super::*;
	use crate::state::testing;

	fn october() -> MonthStart {
		let now: DateTime<Utc> = "2026-10-18T12:00:00Z".parse().unwrap();
		MonthStart::at(now, chrono_tz::Europe::Paris)
	}

	#[tokio::test]
	async fn queries_month_leaderboard_from_local_boundary() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/helix/bits/leaderboard"))
			.and(query_param("count", "1"))
			.and(query_param("period", "month"))
			.and(query_param("started_at", "2026-09-30T22:00:00Z"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": [{
					"user_id": "5", "user_login": "bitsy", "user_name": "Bitsy",
					"rank": 1, "score": 12500
				}],
				"date_range": {"started_at": "2026-09-30T22:00:00Z", "ended_at": "2026-10-31T23:00:00Z"},
				"total": 1
			})))
			.expect(1)
			.mount(&server)
			.await;
		let state = testing::state(&server.uri());

		assert_eq!(
			top_cheerer(state, october()).await,
			Some(TopCheerer {
				name: "Bitsy".into(),
				bits: 12500
			})
		);
	}

	#[tokio::test]
	async fn empty_leaderboard_is_none() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/helix/bits/leaderboard"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
			.mount(&server)
			.await;
		let state = testing::state(&server.uri());

		assert_eq!(top_cheerer(state, october()).await, None);
	}

	#[tokio::test]
	async fn upstream_error_is_none() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/helix/bits/leaderboard"))
			.respond_with(ResponseTemplate::new(503))
			.mount(&server)
			.await;
		let state = testing::state(&server.uri());

		assert_eq!(top_cheerer(state, october()).await, None);
	}
}
