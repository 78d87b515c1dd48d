use serde::Deserialize;

// --- OAuth ---

#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
	pub access_token: String,
	#[serde(default)]
	pub refresh_token: Option<String>,
	#[serde(default)]
	pub expires_in: Option<u64>,
}

/// Error body of the token endpoint. Twitch answers `{status, message}`;
/// generic OAuth servers answer `{error, error_description}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorBody {
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default)]
	pub error_description: Option<String>,
}

impl TokenErrorBody {
	pub fn into_message(self) -> Option<String> {
		match (self.message, self.error, self.error_description) {
			(Some(message), _, _) => Some(message),
			(None, Some(error), Some(description)) => Some(format!("{error}: {description}")),
			(None, Some(error), None) => Some(error),
			(None, None, description) => description,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
	#[serde(default)]
	pub login: Option<String>,
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(default)]
	pub scopes: Vec<String>,
}

// --- Helix envelopes ---

#[derive(Debug, Clone, Deserialize)]
pub struct HelixPage<T> {
	pub data: Vec<T>,
	#[serde(default)]
	pub pagination: Option<Pagination>,
	#[serde(default)]
	pub total: Option<u64>,
}

impl<T> HelixPage<T> {
	pub fn cursor(&self) -> Option<&str> {
		self.pagination
			.as_ref()
			.and_then(|p| p.cursor.as_deref())
			.filter(|c| !c.is_empty())
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
	#[serde(default)]
	pub cursor: Option<String>,
}

// --- Subscriptions ---

#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
	#[serde(default)]
	pub is_gift: bool,
	#[serde(default)]
	pub gifter_id: String,
	#[serde(default)]
	pub gifter_name: String,
}

// --- Bits ---

#[derive(Debug, Clone, Deserialize)]
pub struct BitsLeaderboardEntry {
	pub user_name: String,
	pub rank: u32,
	pub score: u64,
}

// --- Channel points ---

#[derive(Debug, Clone, Deserialize)]
pub struct CustomReward {
	pub id: String,
	pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Redemption {
	pub user_name: String,
	#[serde(default)]
	pub redeemed_at: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn twitch_error_message_wins() {
		let body: TokenErrorBody =
			serde_json::from_str(r#"{"status":400,"message":"Invalid refresh token"}"#).unwrap();
		assert_eq!(body.into_message().as_deref(), Some("Invalid refresh token"));
	}

	#[test]
	fn oauth_error_pair_is_joined() {
		let body: TokenErrorBody = serde_json::from_str(
			r#"{"error":"invalid_grant","error_description":"code expired"}"#,
		)
		.unwrap();
		assert_eq!(
			body.into_message().as_deref(),
			Some("invalid_grant: code expired")
		);
	}

	#[test]
	fn empty_cursor_means_last_page() {
		let page: HelixPage<Subscription> =
			serde_json::from_str(r#"{"data":[],"pagination":{"cursor":""}}"#).unwrap();
		assert_eq!(page.cursor(), None);

		let page: HelixPage<Subscription> =
			serde_json::from_str(r#"{"data":[],"pagination":{}}"#).unwrap();
		assert_eq!(page.cursor(), None);
	}

	#[test]
	fn gift_fields_default_when_absent() {
		let sub: Subscription =
			serde_json::from_str(r#"{"user_id":"1","user_name":"a","tier":"1000"}"#).unwrap();
		assert!(!sub.is_gift);
		assert!(sub.gifter_id.is_empty());
	}
}
