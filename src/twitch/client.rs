use reqwest::StatusCode;

use super::types::{BitsLeaderboardEntry, CustomReward, HelixPage, Redemption, Subscription};
use crate::auth::fetch::twitch_get;
use crate::error::AppError;
use crate::state::AppState;

pub const SUBSCRIPTIONS_PAGE_SIZE: &str = "100";

pub async fn fetch_subscriptions_page(
    state: &AppState,
    broadcaster_id: &str,
    after: Option<&str>,
) -> Result<HelixPage<Subscription>, AppError> {
    let mut query = vec![
        ("broadcaster_id", broadcaster_id),
        ("first", SUBSCRIPTIONS_PAGE_SIZE),
    ];
    if let Some(cursor) = after {
        query.push(("after", cursor));
    }
    twitch_get(state, "subscriptions", &query)
        .await?
        .error_for_status()?
        .json()
}

/// Top of the monthly bits leaderboard starting at `started_at`.
pub async fn fetch_bits_leaderboard(
    state: &AppState,
    started_at: &str,
) -> Result<Vec<BitsLeaderboardEntry>, AppError> {
    let query = [("count", "1"), ("period", "month"), ("started_at", started_at)];
    let page: HelixPage<BitsLeaderboardEntry> = twitch_get(state, "bits/leaderboard", &query)
        .await?
        .error_for_status()?
        .json()?;
    Ok(page.data)
}

pub async fn fetch_custom_rewards(
    state: &AppState,
    broadcaster_id: &str,
) -> Result<Vec<CustomReward>, AppError> {
    let page: HelixPage<CustomReward> = twitch_get(
        state,
        "channel_points/custom_rewards",
        &[("broadcaster_id", broadcaster_id)],
    )
    .await?
    .error_for_status()?
    .json()?;
    Ok(page.data)
}

#[derive(Debug, Clone)]
pub enum RedemptionLookup {
    Found(Redemption),
    Empty,
    Forbidden,
}

/// Most recent fulfilled redemption of a reward.
pub async fn fetch_latest_redemption(
    state: &AppState,
    broadcaster_id: &str,
    reward_id: &str,
) -> Result<RedemptionLookup, AppError> {
    let query = [
        ("broadcaster_id", broadcaster_id),
        ("reward_id", reward_id),
        ("status", "FULFILLED"),
        ("sort", "NEWEST"),
        ("first", "1"),
    ];
    let resp = twitch_get(state, "channel_points/custom_rewards/redemptions", &query).await?;
    if resp.status == StatusCode::FORBIDDEN {
        return Ok(RedemptionLookup::Forbidden);
    }

    let page: HelixPage<Redemption> = resp.error_for_status()?.json()?;
    Ok(page
        .data
        .into_iter()
        .next()
        .map_or(RedemptionLookup::Empty, RedemptionLookup::Found))
}
