use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

pub mod health;
pub mod top;
pub mod twitch;
pub mod wizebot;

/// Every route is served at the root and again under `/api`.
pub fn router(state: Arc<AppState>) -> Router {
	let api = Router::new()
		.route("/", get(health::health))
		.route("/top", get(top::get_top))
		.route("/twitch/refresh", post(twitch::post_refresh))
		.route("/twitch/callback", get(twitch::get_callback))
		.route("/twitch/authorize", get(twitch::get_authorize))
		.route("/twitch/redemptions", get(twitch::get_redemptions))
		.route("/wizebot/level", get(wizebot::get_level));

	Router::new()
		.merge(api.clone())
		.nest("/api", api)
		.layer(cors_layer(&state.config.cors_allowed_origins))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// With an allow-list, matching origins are echoed back and credentials are
/// allowed. Without one any origin is accepted, without credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
	let layer = CorsLayer::new()
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([
			CONTENT_TYPE,
			AUTHORIZATION,
			HeaderName::from_static("x-requested-with"),
		])
		.max_age(Duration::from_secs(86400));

	let allowed: Vec<HeaderValue> = origins
		.iter()
		.filter_map(|o| match HeaderValue::from_str(o) {
			Ok(v) => Some(v),
			Err(_) => {
				warn!(origin = %o, "ignoring unusable CORS origin");
				None
			}
		})
		.collect();

	if allowed.is_empty() {
		layer.allow_origin(AllowOrigin::any())
	} else {
		layer
			.allow_origin(AllowOrigin::list(allowed))
			.allow_credentials(true)
	}
}
