use seat_relay::relay::shutdown_signal;
use seat_relay::{
	JsonSerializer, MqttClient, RelayConfig, SeatRelay, SeatSummary,
	SensorsApiClient, telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Loads .env first, so RUST_LOG from there is visible to telemetry
	let config = RelayConfig::from_env()?;
	telemetry::init(None);

	let source = SensorsApiClient::new(&config.api)?;
	let (broker_host, broker_port) = config.mqtt.connection.broker_address();
	info!(
		api = %source.url(),
		broker = %broker_host,
		port = broker_port,
		topic = %config.topic,
		"Connecting to MQTT broker"
	);

	let (client, connection) =
		MqttClient::<JsonSerializer>::connect_with_config(config.mqtt).await?;
	let publisher = client.get_publisher::<SeatSummary>(config.topic)?;

	let relay = SeatRelay::new(source, publisher, config.targets)
		.with_interval(config.poll_interval);
	relay.run(shutdown_signal()).await;

	connection.shutdown().await?;
	info!("Seat relay stopped");
	Ok(())
}
