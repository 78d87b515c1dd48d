//! Streamlabs donation ledger.

use reqwest::header::ACCEPT;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct DonationsResponse {
	#[serde(default)]
	pub data: Vec<Donation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Donation {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default, deserialize_with = "lenient_amount")]
	pub amount: f64,
}

/// Amounts arrive as decimal strings (sometimes as numbers); anything
/// unparsable counts as zero.
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Amount {
		Number(f64),
		Text(String),
		Other(serde_json::Value),
	}

	Ok(match Amount::deserialize(deserializer)? {
		Amount::Number(n) => n,
		Amount::Text(s) => s.trim().parse().unwrap_or(0.0),
		Amount::Other(_) => 0.0,
	})
}

/// Donations received after `after` (unix seconds).
pub async fn fetch_donations(
	client: &reqwest::Client,
	base_url: &str,
	api_key: &str,
	currency: &str,
	after: i64,
) -> Result<Vec<Donation>, AppError> {
	let after = after.to_string();
	let resp = client
		.get(format!("{base_url}/donations"))
		.bearer_auth(api_key)
		.header(ACCEPT, "application/json")
		.query(&[("currency", currency), ("after", after.as_str())])
		.send()
		.await?;

	let status = resp.status();
	if !status.is_success() {
		return Err(AppError::Upstream {
			status: status.as_u16(),
			message: resp.text().await.unwrap_or_default(),
		});
	}

	let donations: DonationsResponse = resp.json().await?;
	debug!(count = donations.data.len(), "Streamlabs donations fetched");
	Ok(donations.data)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn amounts_parse_leniently() {
		let resp: DonationsResponse = serde_json::from_str(
			r#"{"data":[
				{"name":"A","amount":"5.005"},
				{"name":"B","amount":3},
				{"name":"C","amount":"lots"},
				{"name":"D","amount":null},
				{"amount":"1.5"}
			]}"#,
		)
		.unwrap();
		let amounts: Vec<f64> = resp.data.iter().map(|d| d.amount).collect();
		assert_eq!(amounts, vec![5.005, 3.0, 0.0, 0.0, 1.5]);
		assert_eq!(resp.data[4].name, None);
	}
}
