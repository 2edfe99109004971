//! Per-cycle fault types.

use crate::client::MqttClientError;
use crate::summary::Location;

/// Coarse classification of a failed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
	/// HTTP or MQTT could not deliver
	Transport,
	/// Upstream answered with something other than the expected document
	Parse,
	/// A target survey was not in the response
	Lookup,
}

impl FaultKind {
	pub fn as_str(self) -> &'static str {
		match self {
			| FaultKind::Transport => "transport",
			| FaultKind::Parse => "parse",
			| FaultKind::Lookup => "lookup",
		}
	}
}

/// Everything that can end a poll-transform-publish cycle early.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
	#[error("request to sensors API failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("sensors API answered with status {status}")]
	UpstreamStatus { status: reqwest::StatusCode },

	#[error("malformed sensors response: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("survey {survey_id} is missing field '{field}'")]
	MissingCount {
		survey_id: u64,
		field: &'static str,
	},

	#[error("no survey with id {survey_id} for location '{location}'")]
	SurveyNotFound { location: Location, survey_id: u64 },

	#[error("publish failed: {0}")]
	Publish(#[from] MqttClientError),
}

impl RelayError {
	pub fn kind(&self) -> FaultKind {
		match self {
			| RelayError::Http(_)
			| RelayError::UpstreamStatus { .. }
			| RelayError::Publish(_) => FaultKind::Transport,
			| RelayError::Parse(_) | RelayError::MissingCount { .. } => {
				FaultKind::Parse
			}
			| RelayError::SurveyNotFound { .. } => FaultKind::Lookup,
		}
	}
}
