use crate::auth::store::TokenStore;
use crate::config::Config;
use crate::top::cache::ResponseCache;

pub struct AppState {
	pub config: Config,
	pub client: reqwest::Client,
	pub tokens: TokenStore,
	pub top_cache: ResponseCache,
}

impl AppState {
	pub fn new(config: Config) -> Self {
		let client = reqwest::Client::new();
		Self {
			tokens: TokenStore::new(client.clone(), &config),
			top_cache: ResponseCache::new(config.top_cache_ttl),
			client,
			config,
		}
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::sync::Arc;

	use serde_json::json;
	use wiremock::matchers::{method, path, path_regex};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	use super::AppState;
	use crate::config::{Config, Endpoints};

	/// Configuration with every upstream pointed at `base` (a mock server)
	/// and all credentials filled in.
	pub fn config(base: &str) -> Config {
		let mut config = Config::from_lookup(|_| None).expect("default config");
		config.twitch.client_id = Some("client-id".into());
		config.twitch.client_secret = Some("client-secret".into());
		config.twitch.refresh_token = Some("refresh-token".into());
		config.twitch.access_token = Some("seed-token".into());
		config.twitch.broadcaster_id = Some("1234".into());
		config.twitch.reward_name = Some("Hydrate".into());
		config.twitch.redirect_uri = Some("http://localhost:3001/api/twitch/callback".into());
		config.streamlabs_api_key = Some("streamlabs-key".into());
		config.wizebot_api_key = Some("wizebot-key".into());
		config.endpoints = Endpoints {
			twitch_api: format!("{base}/helix"),
			twitch_id: format!("{base}/oauth2"),
			streamlabs: format!("{base}/streamlabs"),
			wizebot: format!("{base}/wizebot"),
		};
		config
	}

	pub fn state(base: &str) -> Arc<AppState> {
		Arc::new(AppState::new(config(base)))
	}

	/// Every upstream answers successfully.
	pub async fn mount_happy_upstreams(server: &MockServer) {
		Mock::given(method("GET"))
			.and(path("/oauth2/validate"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"login": "streamer", "user_id": "1234", "scopes": []
			})))
			.mount(server)
			.await;
		Mock::given(method("GET"))
			.and(path("/helix/subscriptions"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": [
					{"is_gift": true, "gifter_id": "1", "gifter_name": "Giver"},
					{"is_gift": true, "gifter_id": "1", "gifter_name": "Giver"}
				],
				"pagination": {}
			})))
			.mount(server)
			.await;
		Mock::given(method("GET"))
			.and(path("/helix/bits/leaderboard"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": [{"user_name": "Bitsy", "rank": 1, "score": 300}]
			})))
			.mount(server)
			.await;
		Mock::given(method("GET"))
			.and(path("/streamlabs/donations"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": [{"name": "Donny", "amount": "12.5"}]
			})))
			.mount(server)
			.await;
		Mock::given(method("GET"))
			.and(path_regex("^/wizebot/ranking/wizebot-key/top/(uptime|message)/month/100$"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"list": [{"user_name": "Viewer", "value": 7260}]
			})))
			.mount(server)
			.await;
		Mock::given(method("GET"))
			.and(path("/helix/channel_points/custom_rewards"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": [{"id": "r1", "title": "Hydrate"}]
			})))
			.mount(server)
			.await;
		Mock::given(method("GET"))
			.and(path("/helix/channel_points/custom_rewards/redemptions"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": [{"user_name": "Thirsty"}]
			})))
			.mount(server)
			.await;
	}
}
