//! Configuration for MQTT client initialization

use std::marker::PhantomData;
use std::time::Duration;

use rumqttc::{MqttOptions, OptionError};

/// Keep-alive used unless the broker URL names its own.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Client-level behavior settings
#[derive(Debug, Clone)]
pub struct ClientSettings {
	/// Capacity of the request channel between client and event loop
	pub event_loop_capacity: usize,
	/// How long to wait for the broker's ConnAck
	pub connection_timeout_millis: u64,
	/// Pause after the first event loop error before re-dialling
	pub retry_initial_delay_millis: u64,
	/// Upper bound of the doubling re-dial pause
	pub retry_max_delay_millis: u64,
}

impl Default for ClientSettings {
	fn default() -> Self {
		Self {
			event_loop_capacity: 10,
			connection_timeout_millis: 5_000,
			retry_initial_delay_millis: 100,
			retry_max_delay_millis: 30_000,
		}
	}
}

/// Configuration for MQTT client creation
#[derive(Debug, Clone)]
pub struct MqttClientConfig<S> {
	/// Underlying MQTT connection options (from rumqttc)
	pub connection: MqttOptions,
	/// Client-level behavior settings
	pub settings: ClientSettings,
	_serializer: PhantomData<S>,
}

impl<S> MqttClientConfig<S> {
	/// Create config with default settings and a 60 s keep-alive
	pub fn new(client_id: &str, host: &str, port: u16) -> Self {
		let mut connection = MqttOptions::new(client_id, host, port);
		connection.set_keep_alive(DEFAULT_KEEP_ALIVE);
		Self::with_options(connection)
	}

	/// Parse configuration from MQTT URL
	///
	/// Supports: tcp://, mqtt://, ssl://, mqtts://. The URL must carry a
	/// `client_id` query parameter. A `keep_alive_secs` parameter wins over
	/// [`DEFAULT_KEEP_ALIVE`].
	pub fn from_url(url: &str) -> Result<Self, OptionError> {
		let mut connection = MqttOptions::parse_url(url)?;
		if !url.contains("keep_alive_secs=") {
			connection.set_keep_alive(DEFAULT_KEEP_ALIVE);
		}
		Ok(Self::with_options(connection))
	}

	fn with_options(connection: MqttOptions) -> Self {
		Self {
			connection,
			settings: ClientSettings::default(),
			_serializer: PhantomData,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::JsonSerializer;

	#[test]
	fn url_carries_host_port_and_client_id() {
		let config = MqttClientConfig::<JsonSerializer>::from_url(
			"mqtt://mqtt.cetools.org:1883?client_id=seat_relay_test",
		)
		.unwrap();
		assert_eq!(
			config.connection.broker_address(),
			("mqtt.cetools.org".to_string(), 1883)
		);
		assert_eq!(config.connection.client_id(), "seat_relay_test");
		assert_eq!(config.connection.keep_alive(), DEFAULT_KEEP_ALIVE);
	}

	#[test]
	fn keep_alive_from_url_is_kept() {
		let config = MqttClientConfig::<JsonSerializer>::from_url(
			"mqtt://localhost:1883?client_id=a&keep_alive_secs=15",
		)
		.unwrap();
		assert_eq!(config.connection.keep_alive(), Duration::from_secs(15));
	}

	#[test]
	fn new_uses_default_keep_alive() {
		let config =
			MqttClientConfig::<JsonSerializer>::new("a", "localhost", 1883);
		assert_eq!(config.connection.keep_alive(), DEFAULT_KEEP_ALIVE);
		assert_eq!(config.settings.event_loop_capacity, 10);
	}

	#[test]
	fn url_without_client_id_is_rejected() {
		let res = MqttClientConfig::<JsonSerializer>::from_url(
			"mqtt://mqtt.cetools.org:1883",
		);
		assert!(res.is_err());
	}
}
