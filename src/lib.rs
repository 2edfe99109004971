//! # Seat Relay
//!
//! Polls the UCL workspaces sensor summary for two East Campus buildings
//! and republishes their free/occupied seat counts on MQTT.
//!
//! ```text
//! GET sensors/summary ──► SurveysResponse ──► SeatSummary ──► MQTT publish
//!        (api)               (survey)          (summary)       (client)
//!                  └──────────── relay: every cycle, then sleep ───┘
//! ```
//!
//! Published payload:
//!
//! ```json
//! {"pool":{"free":5,"occupied":3},"marshgate":{"free":2,"occupied":8}}
//! ```
//!
//! Every cycle either publishes a complete summary or fails with a
//! [`RelayError`]; failures are reported and the loop carries on after the
//! usual pause.

pub mod api;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod message_serializer;
pub mod relay;
pub mod summary;
pub mod survey;
pub mod telemetry;

pub use api::{SensorsApiClient, SurveySource};
pub use client::{
	ClientSettings, MqttClient, MqttClientConfig, MqttClientError,
	MqttPublisher,
};
pub use config::{ApiSettings, ConfigError, RelayConfig};
pub use connection::MqttConnection;
pub use error::{FaultKind, RelayError};
pub use message_serializer::{JsonSerializer, MessageSerializer};
pub use relay::{Published, SeatRelay, SummarySink};
pub use summary::{Location, SeatCount, SeatSummary, SurveyTargets};
pub use survey::{SurveyRecord, SurveysResponse};

// Essential external types
pub use rumqttc::QoS;
