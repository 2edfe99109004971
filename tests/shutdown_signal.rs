//! SIGTERM ends the relay the same way Ctrl-C does.
//!
//! Kept in its own test binary: once tokio installs the handler, SIGTERM
//! no longer terminates this process.
#![cfg(unix)]

use std::process::Command;
use std::time::Duration;

use seat_relay::relay::shutdown_signal;
use tokio::time;

#[tokio::test]
async fn sigterm_resolves_shutdown_signal() {
	let shutdown = tokio::spawn(shutdown_signal());
	// Let the task install its handlers before signalling
	time::sleep(Duration::from_millis(200)).await;
	assert!(!shutdown.is_finished());

	let status = Command::new("kill")
		.args(["-TERM", &std::process::id().to_string()])
		.status()
		.unwrap();
	assert!(status.success());

	time::timeout(Duration::from_secs(5), shutdown)
		.await
		.expect("shutdown signal did not resolve")
		.unwrap();
}
