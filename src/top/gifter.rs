use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::TopSubgifter;
use crate::state::AppState;
use crate::twitch::client::fetch_subscriptions_page;
use crate::twitch::types::Subscription;

/// Gift counts per gifter id, in first-seen order.
#[derive(Debug, Default)]
pub struct GifterTally {
	index: HashMap<String, usize>,
	entries: Vec<TopSubgifter>,
}

impl GifterTally {
	pub fn add_page(&mut self, subs: &[Subscription]) {
		for sub in subs.iter().filter(|s| s.is_gift && !s.gifter_id.is_empty()) {
			let idx = *self.index.entry(sub.gifter_id.clone()).or_insert_with(|| {
				self.entries.push(TopSubgifter {
					name: sub.gifter_name.clone(),
					count: 0,
				});
				self.entries.len() - 1
			});
			self.entries[idx].count += 1;
		}
	}

	/// Highest count; the earliest-seen gifter wins a tie.
	pub fn top(self) -> Option<TopSubgifter> {
		self.entries
			.into_iter()
			.reduce(|best, e| if e.count > best.count { e } else { best })
	}
}

pub async fn top_subgifter(state: Arc<AppState>) -> Option<TopSubgifter> {
	let broadcaster_id = state.config.twitch.broadcaster_id.as_deref()?;
	if state.config.twitch.client_id.is_none() {
		return None;
	}

	let mut tally = GifterTally::default();
	let mut cursor: Option<String> = None;

	loop {
		let page = match fetch_subscriptions_page(&state, broadcaster_id, cursor.as_deref()).await {
			Ok(page) => page,
			Err(e) => {
				warn!(error = %e, "subscriptions listing failed, using partial tally");
				break;
			}
		};
		debug!(total = ?page.total, page_len = page.data.len(), "subscriptions page");

		tally.add_page(&page.data);
		match page.cursor() {
			Some(next) if !page.data.is_empty() => cursor = Some(next.to_string()),
			_ => break,
		}
	}

	let top = tally.top();
	if let Some(t) = &top {
		info!(name = %t.name, count = t.count, "top subgifter");
	}
	top
}
