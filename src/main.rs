use dishcast::{build_dispatcher, config::Config, server};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let config = Config::from_env()?;

	let dispatcher = build_dispatcher(&config).await?;

	let (sender, receiver) = tokio::sync::oneshot::channel();

	tokio::spawn(async move {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!("signal error: {}", e);
		}
		tracing::info!("server shutdown");
		let _ = sender.send(());
	});

	server::init_with_graceful_shutdown(
		Arc::new(dispatcher),
		config.listen_addr,
		receiver,
	)
	.await?;

	Ok(())
}
