//! Message serialization traits and implementations.

use std::fmt::Debug;

use serde::Serialize;

/// Trait for encoding MQTT message payloads.
///
/// Implement this trait to publish with a different wire format.
pub trait MessageSerializer<T>:
	Default + Clone + Send + Sync + 'static
{
	/// Error type for serialization failures
	type SerializeError: Debug + Send + Sync + 'static;

	/// Convert data to bytes for MQTT transmission
	fn serialize(&self, data: &T) -> Result<Vec<u8>, Self::SerializeError>;
}

/// Compact JSON serializer, the format dashboards consume.
#[derive(Clone, Default, Debug)]
pub struct JsonSerializer;

impl<T> MessageSerializer<T> for JsonSerializer
where T: Serialize + 'static
{
	type SerializeError = serde_json::Error;

	fn serialize(&self, data: &T) -> Result<Vec<u8>, Self::SerializeError> {
		serde_json::to_vec(data)
	}
}
