//! Poll-transform-publish behaviour with in-memory sources and sinks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use seat_relay::{
	FaultKind, RelayError, SeatCount, SeatRelay, SeatSummary, SummarySink,
	SurveySource, SurveyTargets, SurveysResponse,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Serves queued bodies in order, repeating the last one.
struct ScriptedSource {
	bodies: Mutex<VecDeque<&'static str>>,
	work: Duration,
	started: Arc<Mutex<Vec<Instant>>>,
	calls: mpsc::UnboundedSender<()>,
}

impl ScriptedSource {
	fn new(
		bodies: &[&'static str],
	) -> (Self, mpsc::UnboundedReceiver<()>) {
		let (calls, rx) = mpsc::unbounded_channel();
		let source = Self {
			bodies: Mutex::new(bodies.iter().copied().collect()),
			work: Duration::ZERO,
			started: Arc::default(),
			calls,
		};
		(source, rx)
	}

	fn with_work(mut self, work: Duration) -> Self {
		self.work = work;
		self
	}

	fn next_body(&self) -> &'static str {
		let mut bodies = self.bodies.lock().unwrap();
		if bodies.len() > 1 {
			bodies.pop_front().unwrap()
		} else {
			bodies[0]
		}
	}
}

impl SurveySource for ScriptedSource {
	async fn fetch(&self) -> Result<SurveysResponse, RelayError> {
		self.started.lock().unwrap().push(Instant::now());
		let body = self.next_body();
		tokio::time::sleep(self.work).await;
		let _ = self.calls.send(());
		Ok(serde_json::from_str(body)?)
	}
}

#[derive(Default)]
struct RecordingSink {
	published: Mutex<Vec<(SeatSummary, Bytes)>>,
}

impl RecordingSink {
	fn summaries(&self) -> Vec<SeatSummary> {
		self.published.lock().unwrap().iter().map(|(s, _)| *s).collect()
	}
}

impl SummarySink for RecordingSink {
	async fn publish_summary(
		&self,
		summary: &SeatSummary,
	) -> Result<Bytes, RelayError> {
		let payload = Bytes::from(serde_json::to_vec(summary)?);
		self.published
			.lock()
			.unwrap()
			.push((*summary, payload.clone()));
		Ok(payload)
	}
}

const BOTH: &str = r#"{"surveys":[{"id":111,"sensors_absent":5,"sensors_occupied":3},{"id":115,"sensors_absent":2,"sensors_occupied":8}]}"#;
const BOTH_CHANGED: &str = r#"{"surveys":[{"id":115,"sensors_absent":20,"sensors_occupied":1},{"id":111,"sensors_absent":0,"sensors_occupied":9}]}"#;
const POOL_ONLY: &str =
	r#"{"surveys":[{"id":111,"sensors_absent":5,"sensors_occupied":3}]}"#;

fn relay(
	source: ScriptedSource,
) -> SeatRelay<ScriptedSource, RecordingSink> {
	SeatRelay::new(source, RecordingSink::default(), SurveyTargets::default())
}

async fn calls(rx: &mut mpsc::UnboundedReceiver<()>, n: usize) {
	for _ in 0 .. n {
		rx.recv().await;
	}
}

#[tokio::test]
async fn publishes_compact_payload_for_both_locations() {
	let (source, _rx) = ScriptedSource::new(&[BOTH]);
	let relay = relay(source);

	let published = relay.run_cycle().await.unwrap();

	assert_eq!(
		published.payload_str(),
		r#"{"pool":{"free":5,"occupied":3},"marshgate":{"free":2,"occupied":8}}"#
	);
	assert_eq!(published.summary.pool, SeatCount { free: 5, occupied: 3 });
	assert_eq!(relay.sink().summaries(), vec![published.summary]);
}

#[tokio::test]
async fn missing_survey_fails_without_publishing() {
	let (source, _rx) = ScriptedSource::new(&[POOL_ONLY]);
	let relay = relay(source);

	let err = relay.run_cycle().await.unwrap_err();

	assert_eq!(err.kind(), FaultKind::Lookup);
	assert!(relay.sink().summaries().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_parse_fault() {
	let (source, _rx) = ScriptedSource::new(&[r#"{"detail":"bad token"}"#]);
	let relay = relay(source);

	let err = relay.run_cycle().await.unwrap_err();

	assert_eq!(err.kind(), FaultKind::Parse);
	assert!(relay.sink().summaries().is_empty());
}

#[tokio::test]
async fn consecutive_cycles_are_independent() {
	let (source, _rx) = ScriptedSource::new(&[BOTH, BOTH_CHANGED]);
	let relay = relay(source);

	let first = relay.run_cycle().await.unwrap();
	let second = relay.run_cycle().await.unwrap();

	assert_eq!(first.summary.marshgate, SeatCount { free: 2, occupied: 8 });
	assert_eq!(second.summary.pool, SeatCount { free: 0, occupied: 9 });
	assert_eq!(second.summary.marshgate, SeatCount {
		free: 20,
		occupied: 1
	});
	assert_eq!(relay.sink().summaries(), vec![first.summary, second.summary]);
}

#[tokio::test(start_paused = true)]
async fn cycles_start_work_time_plus_interval_apart() {
	let (source, mut rx) = ScriptedSource::new(&[BOTH]);
	let source = source.with_work(Duration::from_secs(5));
	let started = Arc::clone(&source.started);
	let relay = relay(source);

	let completed = relay.run(calls(&mut rx, 3)).await;

	let started = started.lock().unwrap();
	assert_eq!(started.len(), 3);
	for pair in started.windows(2) {
		assert_eq!(pair[1] - pair[0], Duration::from_secs(35));
	}
	assert_eq!(completed, 2);
}

#[tokio::test(start_paused = true)]
async fn failures_do_not_stop_the_loop() {
	let (source, mut rx) = ScriptedSource::new(&[POOL_ONLY, "not json", BOTH]);
	let started = Arc::clone(&source.started);
	let relay = relay(source).with_interval(Duration::from_secs(10));

	relay.run(calls(&mut rx, 3)).await;

	let started = started.lock().unwrap();
	assert_eq!(started[1] - started[0], Duration::from_secs(10));
	assert_eq!(started[2] - started[1], Duration::from_secs(10));
	assert_eq!(relay.sink().summaries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_first_cycle_runs_nothing() {
	let (source, _rx) = ScriptedSource::new(&[BOTH]);
	let relay = relay(source);

	let completed = relay.run(async {}).await;

	assert_eq!(completed, 0);
	assert!(relay.sink().summaries().is_empty());
}
