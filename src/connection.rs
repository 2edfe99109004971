//! MQTT connection management module
//!
//! Lifecycle of the single broker connection, kept apart from the publish
//! API so the relay only ever sees publishers.

use std::time::Duration;

use rumqttc::AsyncClient;
use tokio::time;
use tracing::{error, warn};

/// How long `shutdown` waits for the event loop to flush the Disconnect.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// MQTT connection handle for lifecycle management
///
/// Must stay alive for the duration of the session; call
/// [`shutdown`](Self::shutdown) on the way out.
pub struct MqttConnection {
	client: AsyncClient,
	event_loop_handle: Option<tokio::task::JoinHandle<()>>,
}

impl MqttConnection {
	pub(crate) fn new(
		client: AsyncClient,
		event_loop_handle: tokio::task::JoinHandle<()>,
	) -> Self {
		Self {
			client,
			event_loop_handle: Some(event_loop_handle),
		}
	}

	/// Gracefully shutdown the MQTT connection by:
	/// 1. Sending MQTT Disconnect packet (triggers event loop termination)
	/// 2. Waiting up to [`SHUTDOWN_TIMEOUT`] for the event loop to finish
	///
	/// While the broker is unreachable the Disconnect can never be written,
	/// so the event loop task is aborted once the timeout passes.
	pub async fn shutdown(mut self) -> Result<(), crate::MqttClientError> {
		if let Err(e) = self.client.disconnect().await {
			// Event loop already gone, nothing left to flush
			warn!(error = %e, "Failed to disconnect MQTT client");
		}

		if let Some(mut handle) = self.event_loop_handle.take() {
			match time::timeout(SHUTDOWN_TIMEOUT, &mut handle).await {
				| Ok(Ok(())) => {}
				| Ok(Err(e)) => warn!(error = %e, "Event loop task failed"),
				| Err(_) => {
					warn!(
						timeout = ?SHUTDOWN_TIMEOUT,
						"Event loop did not stop after Disconnect, aborting"
					);
					handle.abort();
				}
			}
		}

		Ok(())
	}
}

impl Drop for MqttConnection {
	fn drop(&mut self) {
		if self.event_loop_handle.is_some() {
			error!(
				"MqttConnection dropped without calling shutdown(). Please \
				 call shutdown() and await its completion before dropping."
			);
		}
	}
}
