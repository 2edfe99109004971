//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Priority (first match wins):
/// 1. `RUST_LOG_DISABLE` set - no tracing at all
/// 2. `force_level` provided - use it
/// 3. `RUST_LOG` set - use environment configuration
/// 4. Otherwise - silent; the `Published:`/`Error:` lines on stdout remain
///
/// Log lines go to stderr so stdout carries only those lines.
pub fn init(force_level: Option<&str>) {
	if std::env::var("RUST_LOG_DISABLE").is_ok() {
		return;
	}

	let filter = if let Some(level) = force_level {
		tracing_subscriber::EnvFilter::new(level)
	} else if std::env::var("RUST_LOG").is_ok() {
		tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| "info".into())
	} else {
		return;
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(true)
				.with_thread_ids(false)
				.with_thread_names(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.init();
}
