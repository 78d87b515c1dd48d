use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join;
use tracing::{debug, info, warn};

use super::TopViewer;
use crate::state::AppState;
use crate::wizebot::{RankEntry, RankingKind, fetch_ranking};

const RANKING_LIMIT: u32 = 100;

#[derive(Debug)]
struct Standing {
	name: String,
	score: usize,
	uptime_secs: f64,
	messages: f64,
	in_uptime: bool,
	in_messages: bool,
}

/// Merge the watch-time and message rankings.
///
/// Each appearance scores its 1-based rank; only names present in both
/// lists are eligible and the lowest combined score wins. Ties keep the
/// order in which names first appeared upstream.
pub fn pick_top_viewer(uptime: &[RankEntry], messages: &[RankEntry]) -> Option<TopViewer> {
	let mut index: HashMap<String, usize> = HashMap::new();
	let mut standings: Vec<Standing> = Vec::new();

	let mut slot = |name: &str| -> usize {
		*index.entry(name.to_lowercase()).or_insert_with(|| {
			standings.push(Standing {
				name: name.to_string(),
				score: 0,
				uptime_secs: 0.0,
				messages: 0.0,
				in_uptime: false,
				in_messages: false,
			});
			standings.len() - 1
		})
	};

	let uptime_slots: Vec<usize> = uptime.iter().map(|e| slot(&e.user_name)).collect();
	let message_slots: Vec<usize> = messages.iter().map(|e| slot(&e.user_name)).collect();

	for (rank, (entry, idx)) in uptime.iter().zip(uptime_slots).enumerate() {
		let s = &mut standings[idx];
		s.score += rank + 1;
		s.uptime_secs = entry.value;
		s.in_uptime = true;
	}
	for (rank, (entry, idx)) in messages.iter().zip(message_slots).enumerate() {
		let s = &mut standings[idx];
		s.score += rank + 1;
		s.messages = entry.value;
		s.in_messages = true;
	}

	debug!(
		users = standings.len(),
		eligible = standings.iter().filter(|s| s.in_uptime && s.in_messages).count(),
		"viewer rankings merged"
	);

	standings
		.into_iter()
		.filter(|s| s.in_uptime && s.in_messages)
		.reduce(|best, s| if s.score < best.score { s } else { best })
		.map(|s| TopViewer {
			name: s.name,
			uptime: format_uptime(s.uptime_secs),
			messages: message_count(s.messages),
		})
}

/// WizeBot reports counts as JSON numbers; a fractional value is rounded to
/// the nearest whole message and a negative one reads as zero.
pub fn message_count(value: f64) -> u64 {
	if value.is_finite() && value > 0.0 {
		value.round() as u64
	} else {
		0
	}
}

/// Whole hours and leftover minutes, e.g. `"12h 5m"`.
pub fn format_uptime(seconds: f64) -> String {
	let total_minutes = (seconds.max(0.0) / 60.0).floor() as u64;
	format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

pub async fn top_viewer(state: Arc<AppState>) -> Option<TopViewer> {
	let api_key = state.config.wizebot_api_key.as_deref()?;
	let base = &state.config.endpoints.wizebot;

	let (uptime, messages) = join(
		fetch_ranking(&state.client, base, api_key, RankingKind::Uptime, RANKING_LIMIT),
		fetch_ranking(&state.client, base, api_key, RankingKind::Message, RANKING_LIMIT),
	)
	.await;

	let (uptime, messages) = match (uptime, messages) {
		(Ok(u), Ok(m)) => (u, m),
		(u, m) => {
			warn!(
				uptime_error = ?u.err().map(|e| e.to_string()),
				messages_error = ?m.err().map(|e| e.to_string()),
				"WizeBot rankings unavailable"
			);
			return None;
		}
	};

	let top = pick_top_viewer(&uptime.list, &messages.list);
	if let Some(t) = &top {
		info!(name = %t.name, uptime = %t.uptime, messages = t.messages, "top viewer");
	}
	top
}
