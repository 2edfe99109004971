//! MQTT client module
//!
//! Typed publishers over a single rumqttc connection.

/// Asynchronous MQTT client implementation
pub mod async_client;
pub mod config;
/// Client error types
pub mod error;
/// Typed MQTT publishers
pub mod publisher;

pub use async_client::{MqttClient, validate_mqtt_topic};
pub use config::{ClientSettings, MqttClientConfig};
pub use error::{ConnectionEstablishmentError, MqttClientError};
pub use publisher::MqttPublisher;
