use rumqttc::{ClientError, OptionError};

/// Failures while waiting for the broker to accept the connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionEstablishmentError {
	#[error("Network connection failed: {0}")]
	Network(#[from] rumqttc::ConnectionError),

	#[error("Broker rejected connection: {code:?}")]
	BrokerRejected { code: rumqttc::ConnectReturnCode },

	#[error("Connection establishment timed out after {timeout_millis}ms")]
	Timeout { timeout_millis: u64 },
}

/// Errors that can occur in MQTT client operations
#[derive(Debug, thiserror::Error)]
pub enum MqttClientError {
	/// Request could not be handed to the rumqttc event loop
	#[error("Client operation failed: {0}")]
	ClientOperation(#[from] ClientError),

	/// Configuration errors when parsing MQTT options
	#[error("Configuration error: {0}")]
	Configuration(#[from] OptionError),

	/// Invalid configuration parameter values
	#[error("Invalid configuration value: {0}")]
	ConfigurationValue(String),

	/// Serialization errors when converting data to bytes
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Topic cannot be published to
	#[error("Invalid topic '{topic}': {reason}")]
	InvalidTopic { topic: String, reason: &'static str },

	/// Connection establishment failed
	#[error("Failed to establish connection: {0}")]
	ConnectionEstablishment(#[from] ConnectionEstablishmentError),
}

impl MqttClientError {
	pub(crate) fn invalid_topic(
		topic: impl Into<String>,
		reason: &'static str,
	) -> Self {
		MqttClientError::InvalidTopic {
			topic: topic.into(),
			reason,
		}
	}
}
