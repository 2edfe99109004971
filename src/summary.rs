//! The compact seat summary published on MQTT.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::survey::{SurveyRecord, SurveysResponse};

/// The two locations the relay reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
	Pool,
	Marshgate,
}

impl Location {
	pub const ALL: [Location; 2] = [Location::Pool, Location::Marshgate];

	/// Key used in the published payload.
	pub fn key(self) -> &'static str {
		match self {
			| Location::Pool => "pool",
			| Location::Marshgate => "marshgate",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			| Location::Pool => "One Pool Street",
			| Location::Marshgate => "Marshgate",
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

/// Survey ids selected for each location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyTargets {
	pub pool: u64,
	pub marshgate: u64,
}

impl SurveyTargets {
	pub fn survey_id(&self, location: Location) -> u64 {
		match location {
			| Location::Pool => self.pool,
			| Location::Marshgate => self.marshgate,
		}
	}
}

impl Default for SurveyTargets {
	fn default() -> Self {
		Self {
			pool: 111,
			marshgate: 115,
		}
	}
}

/// Free and occupied sensor counts for one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCount {
	pub free: u32,
	pub occupied: u32,
}

impl SeatCount {
	pub fn total(&self) -> u32 {
		self.free.saturating_add(self.occupied)
	}

	/// Share of free seats, `None` when the location has no sensors.
	pub fn free_ratio(&self) -> Option<f64> {
		match self.total() {
			| 0 => None,
			| total => Some(f64::from(self.free) / f64::from(total)),
		}
	}
}

impl TryFrom<&SurveyRecord> for SeatCount {
	type Error = RelayError;

	fn try_from(record: &SurveyRecord) -> Result<Self, Self::Error> {
		let missing = |field| RelayError::MissingCount {
			survey_id: record.id,
			field,
		};
		Ok(Self {
			free: record
				.sensors_absent
				.ok_or_else(|| missing("sensors_absent"))?,
			occupied: record
				.sensors_occupied
				.ok_or_else(|| missing("sensors_occupied"))?,
		})
	}
}

/// Payload published every cycle.
///
/// Field order is the wire order: `pool` first, then `marshgate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSummary {
	pub pool: SeatCount,
	pub marshgate: SeatCount,
}

impl SeatSummary {
	/// Select both target surveys and reshape them.
	///
	/// Fails on the first location whose survey is absent; a summary is
	/// never built from one location alone.
	pub fn from_surveys(
		response: &SurveysResponse,
		targets: &SurveyTargets,
	) -> Result<Self, RelayError> {
		let count = |location: Location| -> Result<SeatCount, RelayError> {
			let survey_id = targets.survey_id(location);
			let record = response
				.find(survey_id)
				.ok_or(RelayError::SurveyNotFound { location, survey_id })?;
			SeatCount::try_from(record)
		};
		Ok(Self {
			pool: count(Location::Pool)?,
			marshgate: count(Location::Marshgate)?,
		})
	}

	pub fn get(&self, location: Location) -> SeatCount {
		match location {
			| Location::Pool => self.pool,
			| Location::Marshgate => self.marshgate,
		}
	}
}
