use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::TopDonator;
use super::month::MonthStart;
use crate::error::AppError;
use crate::state::AppState;
use crate::streamlabs::{Donation, fetch_donations};

pub const NOT_CONFIGURED: &str = "Not configured";
pub const API_ERROR: &str = "API error";
pub const FETCH_ERROR: &str = "Error";
const ANONYMOUS: &str = "Anonymous";

fn sentinel(name: &str) -> TopDonator {
	TopDonator {
		name: name.to_string(),
		amount: 0.0,
	}
}

/// Sum donations per display name and return the largest total, rounded to
/// cents after summation. The earliest-seen donor wins a tie.
pub fn top_donation_total(donations: &[Donation]) -> Option<TopDonator> {
	let mut index: HashMap<&str, usize> = HashMap::new();
	let mut totals: Vec<(&str, f64)> = Vec::new();

	for d in donations {
		let name = d.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(ANONYMOUS);
		let idx = *index.entry(name).or_insert_with(|| {
			totals.push((name, 0.0));
			totals.len() - 1
		});
		totals[idx].1 += d.amount;
	}

	totals
		.into_iter()
		.reduce(|best, t| if t.1 > best.1 { t } else { best })
		.map(|(name, amount)| TopDonator {
			name: name.to_string(),
			amount: (amount * 100.0).round() / 100.0,
		})
}

pub async fn top_donator(state: Arc<AppState>, month: MonthStart) -> Option<TopDonator> {
	let Some(api_key) = state.config.streamlabs_api_key.as_deref() else {
		return Some(sentinel(NOT_CONFIGURED));
	};

	let donations = fetch_donations(
		&state.client,
		&state.config.endpoints.streamlabs,
		api_key,
		&state.config.streamlabs_currency,
		month.unix_seconds(),
	)
	.await;

	match donations {
		Ok(donations) => {
			let top = top_donation_total(&donations);
			if let Some(t) = &top {
				info!(name = %t.name, amount = t.amount, count = donations.len(), "top donator");
			}
			top
		}
		Err(AppError::Upstream { status, message }) => {
			warn!(status, body = %message, "Streamlabs rejected the donations request");
			Some(sentinel(API_ERROR))
		}
		Err(e) => {
			error!(error = %e, "Streamlabs donations request failed");
			Some(sentinel(FETCH_ERROR))
		}
	}
}
