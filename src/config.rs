use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;
const DEFAULT_TOP_CACHE_TTL_SECS: u64 = 120;
const DEFAULT_CURRENCY: &str = "EUR";

pub const TWITCH_API_BASE_URL: &str = "https://api.twitch.tv/helix";
pub const TWITCH_ID_BASE_URL: &str = "https://id.twitch.tv/oauth2";
pub const STREAMLABS_API_BASE_URL: &str = "https://streamlabs.com/api/v2.0";
pub const WIZEBOT_API_BASE_URL: &str = "https://wapi.wizebot.tv/api";

#[derive(Debug, Clone, Default)]
pub struct TwitchConfig {
	pub client_id: Option<String>,
	pub client_secret: Option<String>,
	pub refresh_token: Option<String>,
	pub access_token: Option<String>,
	pub broadcaster_id: Option<String>,
	pub reward_name: Option<String>,
	pub redirect_uri: Option<String>,
}

/// Upstream base URLs, overridable so the service can be pointed at mocks.
#[derive(Debug, Clone)]
pub struct Endpoints {
	pub twitch_api: String,
	pub twitch_id: String,
	pub streamlabs: String,
	pub wizebot: String,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			twitch_api: TWITCH_API_BASE_URL.to_string(),
			twitch_id: TWITCH_ID_BASE_URL.to_string(),
			streamlabs: STREAMLABS_API_BASE_URL.to_string(),
			wizebot: WIZEBOT_API_BASE_URL.to_string(),
		}
	}
}

#[derive(Debug, Clone)]
pub struct Config {
	pub port: u16,
	pub twitch: TwitchConfig,
	pub streamlabs_api_key: Option<String>,
	pub streamlabs_currency: String,
	pub wizebot_api_key: Option<String>,
	pub cors_allowed_origins: Vec<String>,
	pub timezone: Tz,
	pub top_cache_ttl: Duration,
	pub endpoints: Endpoints,
}

impl Config {
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Build the configuration from an arbitrary variable source. Blank values
	/// are treated as unset.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let var = |name: &str| {
			lookup(name)
				.map(|v| v.trim().to_string())
				.filter(|v| !v.is_empty())
		};

		let port = match var("PORT") {
			Some(p) => p.parse::<u16>().context("invalid PORT")?,
			None => DEFAULT_PORT,
		};

		let timezone = match var("DASHBOARD_TIMEZONE") {
			Some(tz) => tz
				.parse::<Tz>()
				.map_err(|e| anyhow::anyhow!("{e}"))
				.context("invalid DASHBOARD_TIMEZONE")?,
			None => DEFAULT_TIMEZONE,
		};

		let top_cache_ttl = match var("TOP_CACHE_TTL_SECS") {
			Some(s) => Duration::from_secs(s.parse().context("invalid TOP_CACHE_TTL_SECS")?),
			None => Duration::from_secs(DEFAULT_TOP_CACHE_TTL_SECS),
		};

		let redirect_uri = var("TWITCH_REDIRECT_URI").or_else(|| {
			var("PUBLIC_BASE_URL")
				.map(|base| format!("{}/api/twitch/callback", base.trim_end_matches('/')))
		});

		let defaults = Endpoints::default();
		let endpoints = Endpoints {
			twitch_api: base_url(var("TWITCH_API_URL"), defaults.twitch_api),
			twitch_id: base_url(var("TWITCH_ID_URL"), defaults.twitch_id),
			streamlabs: base_url(var("STREAMLABS_API_URL"), defaults.streamlabs),
			wizebot: base_url(var("WIZEBOT_API_URL"), defaults.wizebot),
		};

		Ok(Self {
			port,
			twitch: TwitchConfig {
				client_id: var("TWITCH_CLIENT_ID"),
				client_secret: var("TWITCH_CLIENT_SECRET"),
				refresh_token: var("TWITCH_REFRESH_TOKEN"),
				access_token: var("TWITCH_ACCESS_TOKEN"),
				broadcaster_id: var("TWITCH_BROADCASTER_ID"),
				reward_name: var("TWITCH_REWARD_NAME"),
				redirect_uri,
			},
			streamlabs_api_key: var("STREAMLABS_API_KEY"),
			streamlabs_currency: var("STREAMLABS_CURRENCY")
				.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
			wizebot_api_key: var("WIZEBOT_API_KEY"),
			cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
				.map(|s| parse_origins(&s))
				.unwrap_or_default(),
			timezone,
			top_cache_ttl,
			endpoints,
		})
	}
}

fn base_url(value: Option<String>, default: String) -> String {
	value
		.map(|v| v.trim_end_matches('/').to_string())
		.unwrap_or(default)
}

fn parse_origins(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(|o| o.trim().trim_end_matches('/'))
		.filter(|o| !o.is_empty())
		.map(str::to_string)
		.collect()
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		Config::from_lookup(|name| vars.get(name).cloned())
	}

	#[test]
	fn defaults_when_nothing_is_set() {
		let c = config(&[]).unwrap();
		assert_eq!(c.port, 3001);
		assert_eq!(c.timezone, chrono_tz::Europe::Paris);
		assert_eq!(c.top_cache_ttl, Duration::from_secs(120));
		assert_eq!(c.streamlabs_currency, "EUR");
		assert!(c.twitch.client_id.is_none());
		assert!(c.cors_allowed_origins.is_empty());
		assert_eq!(c.endpoints.twitch_api, TWITCH_API_BASE_URL);
	}

	#[test]
	fn blank_values_count_as_unset() {
		let c = config(&[("TWITCH_CLIENT_ID", "  "), ("WIZEBOT_API_KEY", "")]).unwrap();
		assert!(c.twitch.client_id.is_none());
		assert!(c.wizebot_api_key.is_none());
	}

	#[test]
	fn cors_origins_are_split_and_trimmed() {
		let c = config(&[(
			"CORS_ALLOWED_ORIGINS",
			"http://localhost:3000, https://dash.example.com/ ,,",
		)])
		.unwrap();
		assert_eq!(
			c.cors_allowed_origins,
			vec!["http://localhost:3000", "https://dash.example.com"]
		);
	}

	#[test]
	fn redirect_uri_derived_from_public_base_url() {
		let c = config(&[("PUBLIC_BASE_URL", "https://api.example.com/")]).unwrap();
		assert_eq!(
			c.twitch.redirect_uri.as_deref(),
			Some("https://api.example.com/api/twitch/callback")
		);

		let c = config(&[
			("PUBLIC_BASE_URL", "https://api.example.com"),
			("TWITCH_REDIRECT_URI", "http://localhost:3001/cb"),
		])
		.unwrap();
		assert_eq!(
			c.twitch.redirect_uri.as_deref(),
			Some("http://localhost:3001/cb")
		);
	}

	#[test]
	fn endpoint_overrides_drop_trailing_slash() {
		let c = config(&[("TWITCH_API_URL", "http://127.0.0.1:9999/helix/")]).unwrap();
		assert_eq!(c.endpoints.twitch_api, "http://127.0.0.1:9999/helix");
	}

	#[test]
	fn invalid_values_fail() {
		assert!(config(&[("PORT", "http")]).is_err());
		assert!(config(&[("DASHBOARD_TIMEZONE", "Mars/Olympus")]).is_err());
		assert!(config(&[("TOP_CACHE_TTL_SECS", "-1")]).is_err());
	}

	#[test]
	fn timezone_override() {
		let c = config(&[("DASHBOARD_TIMEZONE", "America/New_York")]).unwrap();
		assert_eq!(c.timezone, chrono_tz::America::New_York);
	}
}
