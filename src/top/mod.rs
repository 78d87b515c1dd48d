//! The consolidated "tops" of the month, built from five independent
//! gatherers and served from a single time-boxed cache slot.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::auth::validate::check_broadcaster_token;
use crate::error::AppError;
use crate::state::AppState;

pub mod cache;
pub mod cheerer;
pub mod donator;
pub mod gifter;
pub mod month;
pub mod redeemer;
pub mod viewer;

use month::MonthStart;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSubgifter {
	pub name: String,
	pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCheerer {
	pub name: String,
	pub bits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopDonator {
	pub name: String,
	pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopViewer {
	pub name: String,
	pub uptime: String,
	pub messages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardRedeemer {
	pub name: String,
	pub reward: String,
}

/// Every field is independent; `None` serializes as `null` so the shape is
/// always complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopData {
	pub top_subgifter: Option<TopSubgifter>,
	pub top_cheerer: Option<TopCheerer>,
	pub top_donator: Option<TopDonator>,
	pub top_viewer_level: Option<TopViewer>,
	pub reward_redeemer: Option<RewardRedeemer>,
}

/// Run all gatherers concurrently and merge their outcomes.
///
/// Gatherers swallow their own failures, so this only fails when a task
/// panics or is cancelled.
pub async fn aggregate(state: Arc<AppState>) -> Result<TopData, AppError> {
	check_broadcaster_token(&state).await;

	let month = MonthStart::now(state.config.timezone);
	info!(started_at = %month.helix_timestamp(), "aggregating tops");

	let subgifter = tokio::spawn(gifter::top_subgifter(Arc::clone(&state)));
	let cheerer = tokio::spawn(cheerer::top_cheerer(Arc::clone(&state), month));
	let donator = tokio::spawn(donator::top_donator(Arc::clone(&state), month));
	let viewer = tokio::spawn(viewer::top_viewer(Arc::clone(&state)));
	let redeemer = tokio::spawn(redeemer::reward_redeemer(state));

	let (subgifter, cheerer, donator, viewer, redeemer) =
		tokio::join!(subgifter, cheerer, donator, viewer, redeemer);

	Ok(TopData {
		top_subgifter: subgifter?,
		top_cheerer: cheerer?,
		top_donator: donator?,
		top_viewer_level: viewer?,
		reward_redeemer: redeemer?,
	})
}
