use chrono::{DateTime, Datelike, Days, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// First instant of the current month in the dashboard's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthStart(DateTime<Utc>);

impl MonthStart {
	pub fn now(tz: Tz) -> Self {
		Self::at(Utc::now(), tz)
	}

	pub fn at(now: DateTime<Utc>, tz: Tz) -> Self {
		let local = now.with_timezone(&tz);
		let first_day = local.date_naive() - Days::new(u64::from(local.day0()));
		let midnight = first_day.and_time(NaiveTime::default());

		// When midnight on the 1st falls in a DST gap, the month starts at the
		// first local minute that exists.
		let start = (0..24 * 60)
			.map(|minute| midnight + TimeDelta::minutes(minute))
			.find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
			.map(|dt| dt.with_timezone(&Utc))
			.unwrap_or_else(|| Utc.from_utc_datetime(&midnight));
		Self(start)
	}

	/// `YYYY-MM-DDTHH:MM:SSZ`, the format Helix expects for `started_at`.
	pub fn helix_timestamp(&self) -> String {
		self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
	}

	pub fn unix_seconds(&self) -> i64 {
		self.0.timestamp()
	}
}
