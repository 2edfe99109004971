//! The poll-transform-publish loop.

use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use crate::api::SurveySource;
use crate::client::MqttPublisher;
use crate::error::RelayError;
use crate::message_serializer::MessageSerializer;
use crate::summary::{Location, SeatSummary, SurveyTargets};

/// Pause between the end of one cycle and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Destination of each cycle's summary.
pub trait SummarySink {
	/// Publish `summary`, returning the payload that was sent.
	fn publish_summary(
		&self,
		summary: &SeatSummary,
	) -> impl Future<Output = Result<Bytes, RelayError>> + Send;
}

impl<F> SummarySink for MqttPublisher<SeatSummary, F>
where F: MessageSerializer<SeatSummary>
{
	async fn publish_summary(
		&self,
		summary: &SeatSummary,
	) -> Result<Bytes, RelayError> {
		Ok(self.publish(summary).await?)
	}
}

/// Outcome of a successful cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
	pub summary: SeatSummary,
	pub payload: Bytes,
}

impl Published {
	pub fn payload_str(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.payload)
	}
}

/// Fetches surveys from `S`, reshapes them and hands them to `P`, forever.
pub struct SeatRelay<S, P> {
	source: S,
	sink: P,
	targets: SurveyTargets,
	interval: Duration,
}

impl<S, P> SeatRelay<S, P>
where
	S: SurveySource,
	P: SummarySink,
{
	pub fn new(source: S, sink: P, targets: SurveyTargets) -> Self {
		Self {
			source,
			sink,
			targets,
			interval: DEFAULT_POLL_INTERVAL,
		}
	}

	pub fn with_interval(mut self, interval: Duration) -> Self {
		self.interval = interval;
		self
	}

	pub fn sink(&self) -> &P {
		&self.sink
	}

	/// One fetch, transform and publish. Nothing is published unless both
	/// locations were found.
	pub async fn run_cycle(&self) -> Result<Published, RelayError> {
		let response = self.source.fetch().await?;
		let summary = SeatSummary::from_surveys(&response, &self.targets)?;

		for location in Location::ALL {
			let seats = summary.get(location);
			debug!(
				location = location.label(),
				survey_id = self.targets.survey_id(location),
				free = seats.free,
				occupied = seats.occupied,
				free_ratio = ?seats.free_ratio(),
				"Seats counted"
			);
		}

		let payload = self.sink.publish_summary(&summary).await?;
		Ok(Published { summary, payload })
	}

	/// Run cycles until `shutdown` resolves and return how many completed.
	///
	/// A failed cycle is reported and followed by the same pause as a
	/// successful one.
	pub async fn run(&self, shutdown: impl Future<Output = ()>) -> u64 {
		tokio::pin!(shutdown);
		let mut completed = 0_u64;
		info!(interval = ?self.interval, "Starting seat relay");

		loop {
			tokio::select! {
				biased;
				() = &mut shutdown => {
					info!(
						cycles = completed,
						"Shutdown requested, leaving poll loop"
					);
					return completed;
				}
				() = self.tick(completed + 1) => {
					completed += 1;
				}
			}
		}
	}

	async fn tick(&self, cycle: u64) {
		let started = Instant::now();
		match self.run_cycle().await {
			| Ok(published) => {
				println!("Published: {}", published.payload_str());
				info!(
					cycle,
					elapsed = ?started.elapsed(),
					"Seat summary published"
				);
			}
			| Err(err) => {
				println!("Error: {err}");
				warn!(
					cycle,
					kind = err.kind().as_str(),
					error = %err,
					"Cycle failed"
				);
			}
		}
		time::sleep(self.interval).await;
	}
}

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			error!(error = %err, "Cannot listen for Ctrl-C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};
		match signal(SignalKind::terminate()) {
			| Ok(mut sigterm) => {
				sigterm.recv().await;
			}
			| Err(err) => {
				error!(error = %err, "Cannot listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => info!("Ctrl-C received"),
		() = terminate => info!("SIGTERM received"),
	}
}
