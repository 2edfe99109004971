//! Runtime configuration.
//!
//! Every value has a compiled-in default except the API token. Overrides
//! come from the process environment, after loading a `.env` file if one
//! exists in the working directory.
//!
//! | variable | default |
//! |---|---|
//! | `SEATS_API_URL` | [`DEFAULT_API_URL`] |
//! | `UCLAPI_TOKEN` | required |
//! | `SEATS_HTTP_TIMEOUT_SECS` | no timeout |
//! | `MQTT_BROKER` | [`DEFAULT_BROKER_URL`] |
//! | `MQTT_CLIENT_ID` | `seat_relay_<random>` |
//! | `MQTT_KEEP_ALIVE_SECS` | 60 |
//! | `MQTT_TOPIC` | [`DEFAULT_TOPIC`] |
//! | `SEATS_POOL_SURVEY_ID` | 111 |
//! | `SEATS_MARSHGATE_SURVEY_ID` | 115 |
//! | `SEATS_POLL_INTERVAL_SECS` | 30 |
//!
//! `MQTT_BROKER` may carry `client_id` and `keep_alive_secs` query
//! parameters itself; setting the matching variable as well is an error.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use uuid::Uuid;

use crate::client::{MqttClientConfig, MqttClientError, validate_mqtt_topic};
use crate::message_serializer::JsonSerializer;
use crate::relay::DEFAULT_POLL_INTERVAL;
use crate::summary::SurveyTargets;

pub const DEFAULT_API_URL: &str =
	"https://uclapi.com/workspaces/sensors/summary?survey_filter=student";
pub const DEFAULT_BROKER_URL: &str = "mqtt://mqtt.cetools.org:1883";
pub const DEFAULT_TOPIC: &str = "student/TripleBang/seats";
pub const CLIENT_ID_PREFIX: &str = "seat_relay";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),

	#[error("{key} has an invalid value '{value}'")]
	InvalidValue { key: &'static str, value: String },

	#[error("{key} conflicts with '{param}' already given in MQTT_BROKER")]
	BrokerUrlConflict {
		key: &'static str,
		param: &'static str,
	},

	#[error("MQTT configuration: {0}")]
	Mqtt(#[from] MqttClientError),
}

/// Where and how to poll the sensors API.
#[derive(Debug, Clone)]
pub struct ApiSettings {
	pub url: Url,
	pub token: String,
	pub request_timeout: Option<Duration>,
}

/// Everything the binary needs to start relaying.
#[derive(Debug, Clone)]
pub struct RelayConfig {
	pub api: ApiSettings,
	pub mqtt: MqttClientConfig<JsonSerializer>,
	pub topic: String,
	pub targets: SurveyTargets,
	pub poll_interval: Duration,
}

impl RelayConfig {
	/// Load `.env` (if present) and read the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenv::dotenv().ok();
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Build the configuration from an arbitrary key lookup.
	///
	/// Blank values count as unset.
	pub fn from_lookup(
		lookup: impl Fn(&str) -> Option<String>,
	) -> Result<Self, ConfigError> {
		let get = |key: &str| {
			lookup(key)
				.map(|v| v.trim().to_string())
				.filter(|v| !v.is_empty())
		};

		let url_text = get("SEATS_API_URL")
			.unwrap_or_else(|| DEFAULT_API_URL.to_string());
		let url = Url::parse(&url_text).map_err(|_| {
			ConfigError::InvalidValue {
				key: "SEATS_API_URL",
				value: url_text.clone(),
			}
		})?;
		let token =
			get("UCLAPI_TOKEN").ok_or(ConfigError::Missing("UCLAPI_TOKEN"))?;
		let request_timeout =
			parse_opt::<u64>(&get, "SEATS_HTTP_TIMEOUT_SECS")?
				.map(|secs| positive_secs("SEATS_HTTP_TIMEOUT_SECS", secs))
				.transpose()?;

		let broker = get("MQTT_BROKER")
			.unwrap_or_else(|| DEFAULT_BROKER_URL.to_string());
		let mut broker_url = broker.clone();
		match get("MQTT_CLIENT_ID") {
			| Some(_) if broker.contains("client_id=") => {
				return Err(ConfigError::BrokerUrlConflict {
					key: "MQTT_CLIENT_ID",
					param: "client_id",
				});
			}
			| Some(client_id) => {
				append_query(&mut broker_url, "client_id", &client_id)
			}
			| None if broker.contains("client_id=") => {}
			| None => append_query(
				&mut broker_url,
				"client_id",
				&generate_client_id(CLIENT_ID_PREFIX),
			),
		}
		if let Some(secs) = parse_opt::<u64>(&get, "MQTT_KEEP_ALIVE_SECS")? {
			if broker.contains("keep_alive_secs=") {
				return Err(ConfigError::BrokerUrlConflict {
					key: "MQTT_KEEP_ALIVE_SECS",
					param: "keep_alive_secs",
				});
			}
			append_query(&mut broker_url, "keep_alive_secs", &secs.to_string());
		}
		let mqtt = MqttClientConfig::from_url(&broker_url)
			.map_err(MqttClientError::from)?;

		let topic =
			get("MQTT_TOPIC").unwrap_or_else(|| DEFAULT_TOPIC.to_string());
		validate_mqtt_topic(&topic)?;

		let defaults = SurveyTargets::default();
		let targets = SurveyTargets {
			pool: parse_opt(&get, "SEATS_POOL_SURVEY_ID")?
				.unwrap_or(defaults.pool),
			marshgate: parse_opt(&get, "SEATS_MARSHGATE_SURVEY_ID")?
				.unwrap_or(defaults.marshgate),
		};

		let poll_interval =
			match parse_opt::<u64>(&get, "SEATS_POLL_INTERVAL_SECS")? {
				| Some(secs) => {
					positive_secs("SEATS_POLL_INTERVAL_SECS", secs)?
				}
				| None => DEFAULT_POLL_INTERVAL,
			};

		Ok(Self {
			api: ApiSettings {
				url,
				token,
				request_timeout,
			},
			mqtt,
			topic,
			targets,
			poll_interval,
		})
	}
}

fn parse_opt<T: FromStr>(
	get: &impl Fn(&str) -> Option<String>,
	key: &'static str,
) -> Result<Option<T>, ConfigError> {
	get(key)
		.map(|value| {
			value
				.parse()
				.map_err(|_| ConfigError::InvalidValue { key, value })
		})
		.transpose()
}

fn positive_secs(
	key: &'static str,
	secs: u64,
) -> Result<Duration, ConfigError> {
	if secs == 0 {
		return Err(ConfigError::InvalidValue {
			key,
			value: secs.to_string(),
		});
	}
	Ok(Duration::from_secs(secs))
}

/// `prefix` plus the first 8 characters of a random UUID.
pub fn generate_client_id(prefix: &str) -> String {
	let uuid = Uuid::new_v4().to_string();
	format!("{prefix}_{}", &uuid[.. 8])
}

fn append_query(url: &mut String, key: &str, value: &str) {
	let separator = if url.contains('?') { '&' } else { '?' };
	url.push(separator);
	url.push_str(key);
	url.push('=');
	url.push_str(value);
}
