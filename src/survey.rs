//! Upstream sensor-summary records as returned by the workspaces API.

use serde::Deserialize;

/// Body of `GET /workspaces/sensors/summary`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SurveysResponse {
	pub surveys: Vec<SurveyRecord>,
}

/// One survey, i.e. the sensors of one physical location.
///
/// Counts are optional here because only the selected records have to
/// carry them; see [`SeatCount::try_from`](crate::SeatCount).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SurveyRecord {
	pub id: u64,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub sensors_absent: Option<u32>,
	#[serde(default)]
	pub sensors_occupied: Option<u32>,
}

impl SurveysResponse {
	/// First record whose id equals `survey_id`.
	pub fn find(&self, survey_id: u64) -> Option<&SurveyRecord> {
		self.surveys.iter().find(|s| s.id == survey_id)
	}
}
