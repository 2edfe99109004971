//! HTTP client for the workspaces sensor-summary endpoint.

use std::future::Future;

use reqwest::{Client, Url};
use tracing::debug;

use crate::config::ApiSettings;
use crate::error::RelayError;
use crate::survey::SurveysResponse;

/// Anything that can produce the current survey list.
pub trait SurveySource {
	fn fetch(
		&self,
	) -> impl Future<Output = Result<SurveysResponse, RelayError>> + Send;
}

/// Polls `GET <url>&token=<token>` on the UCL API.
#[derive(Debug, Clone)]
pub struct SensorsApiClient {
	http: Client,
	url: Url,
	token: String,
}

impl SensorsApiClient {
	/// Build the HTTP client. No request timeout unless one is configured.
	pub fn new(settings: &ApiSettings) -> Result<Self, reqwest::Error> {
		let mut builder = Client::builder();
		if let Some(timeout) = settings.request_timeout {
			builder = builder.timeout(timeout);
		}
		Ok(Self {
			http: builder.build()?,
			url: settings.url.clone(),
			token: settings.token.clone(),
		})
	}

	pub fn url(&self) -> &Url {
		&self.url
	}
}

impl SurveySource for SensorsApiClient {
	async fn fetch(&self) -> Result<SurveysResponse, RelayError> {
		let response = self
			.http
			.get(self.url.clone())
			.query(&[("token", self.token.as_str())])
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(RelayError::UpstreamStatus { status });
		}

		let body = response.bytes().await?;
		debug!(bytes = body.len(), "Sensors summary received");
		Ok(serde_json::from_slice(&body)?)
	}
}
