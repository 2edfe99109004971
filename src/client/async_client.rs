use std::time::Duration;

use arcstr::ArcStr;
use rumqttc::Packet::{self, Disconnect};
use rumqttc::{AsyncClient, ConnAck, ConnectReturnCode, EventLoop};
use rumqttc::{Event::Incoming, Event::Outgoing};
use tokio::time;
use tracing::{debug, error, info, warn};

use super::config::{ClientSettings, MqttClientConfig};
use super::error::{ConnectionEstablishmentError, MqttClientError};
use super::publisher::MqttPublisher;
use crate::connection::MqttConnection;
use crate::message_serializer::MessageSerializer;

/// Publish-side MQTT client with typed publishers.
///
/// Connection lifecycle is managed separately via `MqttConnection`.
#[derive(Clone, Debug)]
pub struct MqttClient<F> {
	client: AsyncClient,
	serializer: F,
}

impl<F> MqttClient<F>
where F: Default + Clone + Send + Sync + 'static
{
	/// Connect, wait for the broker's ConnAck and start the event loop task.
	///
	/// Returns both client and connection handle. Keep the connection alive
	/// for the session duration, call `connection.shutdown()` when done.
	pub async fn connect_with_config(
		config: MqttClientConfig<F>,
	) -> Result<(Self, MqttConnection), MqttClientError> {
		if config.settings.event_loop_capacity == 0 {
			return Err(MqttClientError::ConfigurationValue(
				"event_loop_capacity must be greater than 0".to_string(),
			));
		}
		let (client, new_event_loop) = AsyncClient::new(
			config.connection,
			config.settings.event_loop_capacity,
		);

		let timeout_millis = config.settings.connection_timeout_millis;
		let connection_timeout = Duration::from_millis(timeout_millis);
		let connected_event_loop = time::timeout(
			connection_timeout,
			Self::establish_connection(new_event_loop),
		)
		.await
		.map_err(|_| ConnectionEstablishmentError::Timeout {
			timeout_millis,
		})??;

		// The event loop terminates only when it sees a Disconnect packet
		let settings = config.settings;
		let event_loop_handle = tokio::spawn(async move {
			Self::run(connected_event_loop, settings).await;
		});
		let fresh_client = Self {
			client: client.clone(),
			serializer: F::default(),
		};
		let connection = MqttConnection::new(client, event_loop_handle);
		Ok((fresh_client, connection))
	}

	async fn establish_connection(
		mut event_loop: EventLoop,
	) -> Result<EventLoop, ConnectionEstablishmentError> {
		loop {
			match event_loop.poll().await {
				| Ok(Incoming(Packet::ConnAck(ConnAck { code, .. }))) => {
					if code == ConnectReturnCode::Success {
						debug!("MQTT connection established successfully");
						return Ok(event_loop);
					} else {
						debug!(
							code = ?code,
							"MQTT connection rejected by broker"
						);
						return Err(
							ConnectionEstablishmentError::BrokerRejected {
								code,
							},
						);
					}
				}
				| Ok(notification) => {
					debug!(
						notification = ?notification,
						"Bootstrap phase notification"
					);
				}
				| Err(connection_err) => {
					debug!(
						error = %connection_err,
						"MQTT connection error during bootstrap phase"
					);
					return Err(ConnectionEstablishmentError::Network(
						connection_err,
					));
				}
			}
		}
	}

	/// Drives outgoing publishes until a Disconnect packet is seen in either
	/// direction.
	///
	/// Poll errors never end the loop: every poll after an error makes
	/// rumqttc dial the broker again, so the next poll is only delayed by
	/// an exponential backoff capped at `retry_max_delay_millis`.
	async fn run(mut event_loop: EventLoop, settings: ClientSettings) {
		let initial_delay =
			Duration::from_millis(settings.retry_initial_delay_millis);
		let max_delay = Duration::from_millis(settings.retry_max_delay_millis);
		let mut error_count: u32 = 0;

		loop {
			match event_loop.poll().await {
				| Ok(Incoming(Packet::ConnAck(ConnAck {
					code: ConnectReturnCode::Success,
					..
				}))) => {
					if error_count > 0 {
						info!(error_count, "MQTT connection re-established");
					}
					error_count = 0;
				}
				| Ok(Incoming(Disconnect)) => {
					info!("Received MQTT Disconnect packet from server");
					break;
				}
				| Ok(Outgoing(rumqttc::Outgoing::Disconnect)) => {
					info!("Sent MQTT Disconnect packet to server");
					break;
				}
				| Ok(Outgoing(rumqttc::Outgoing::Publish(pkid))) => {
					debug!(pkid, "Publish written to socket");
				}
				| Ok(notification) => {
					debug!(notification = ?notification, "MQTT notification");
				}
				| Err(err) => {
					error_count = error_count.saturating_add(1);
					error!(error_count, error = %err, "MQTT event loop error");

					let delay = initial_delay
						.saturating_mul(2_u32.pow((error_count - 1).min(10)))
						.min(max_delay);

					warn!(
						delay = ?delay,
						error_count,
						"Reconnecting to MQTT broker"
					);
					time::sleep(delay).await;
				}
			}
		}
		info!("MQTT event loop terminated");
	}

	/// Create typed publisher for specific topic.
	///
	/// Topic must not contain wildcard characters (`+`, `#`).
	pub fn get_publisher<T>(
		&self,
		topic: impl Into<ArcStr>,
	) -> Result<MqttPublisher<T, F>, MqttClientError>
	where
		F: MessageSerializer<T>,
	{
		let topic = topic.into();
		validate_mqtt_topic(topic.as_str())?;
		Ok(MqttPublisher::new(
			self.client.clone(),
			self.serializer.clone(),
			topic,
		))
	}

	/// Wrap an already constructed rumqttc client.
	///
	/// Nothing is connected or spawned; whoever owns the matching
	/// `EventLoop` is responsible for polling it.
	pub fn from_async_client(client: AsyncClient) -> Self {
		Self {
			client,
			serializer: F::default(),
		}
	}
}

/// Checks that `topic_str` names a single concrete topic.
pub fn validate_mqtt_topic(topic_str: &str) -> Result<(), MqttClientError> {
	if topic_str.is_empty() || topic_str.len() > 65535 {
		return Err(MqttClientError::invalid_topic(
			topic_str,
			"Topic is empty or too long",
		));
	}
	if topic_str.chars().any(|c| matches!(c, '\0' | '#' | '+')) {
		return Err(MqttClientError::invalid_topic(
			topic_str,
			"Topic contains illegal characters ('#', '+', or null byte)",
		));
	}
	Ok(())
}
