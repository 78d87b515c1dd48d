use std::sync::Arc;

use tracing::{info, warn};

use super::RewardRedeemer;
use crate::state::AppState;
use crate::twitch::client::{RedemptionLookup, fetch_custom_rewards, fetch_latest_redemption};
use crate::twitch::types::CustomReward;

pub const UNAVAILABLE: &str = "Unavailable";
pub const NO_REDEMPTION: &str = "None";

pub fn find_reward<'a>(rewards: &'a [CustomReward], name: &str) -> Option<&'a CustomReward> {
	let wanted = name.to_lowercase();
	rewards.iter().find(|r| r.title.to_lowercase() == wanted)
}

pub async fn reward_redeemer(state: Arc<AppState>) -> Option<RewardRedeemer> {
	let twitch = &state.config.twitch;
	let broadcaster_id = twitch.broadcaster_id.as_deref()?;
	let reward_name = twitch.reward_name.as_deref()?;
	if twitch.client_id.is_none() {
		return None;
	}

	let rewards = match fetch_custom_rewards(&state, broadcaster_id).await {
		Ok(rewards) => rewards,
		Err(e) => {
			warn!(error = %e, "custom rewards listing failed");
			return None;
		}
	};

	let Some(reward) = find_reward(&rewards, reward_name) else {
		let available: Vec<&str> = rewards.iter().map(|r| r.title.as_str()).collect();
		warn!(reward_name, ?available, "reward not found");
		return None;
	};
	info!(title = %reward.title, id = %reward.id, "reward found");

	let name = match fetch_latest_redemption(&state, broadcaster_id, &reward.id).await {
		Ok(RedemptionLookup::Found(redemption)) => {
			info!(user = %redemption.user_name, redeemed_at = ?redemption.redeemed_at, "latest redemption");
			redemption.user_name
		}
		Ok(RedemptionLookup::Empty) => NO_REDEMPTION.to_string(),
		Ok(RedemptionLookup::Forbidden) => {
			warn!("redemptions are forbidden for this token");
			UNAVAILABLE.to_string()
		}
		Err(e) => {
			warn!(error = %e, "redemptions lookup failed");
			return None;
		}
	};

	Some(RewardRedeemer {
		name,
		reward: reward.title.clone(),
	})
}
