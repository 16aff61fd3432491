use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    application::{
        config::{Args, RuntimeConfig},
        state::SharedState,
    },
    domain::error::DomainError,
    interfaces::http,
    rpc::methods::known_methods,
    storage::{JsonFileSink, TranscriptSink},
};

pub async fn run(args: Args) -> Result<(), DomainError> {
    init_logging(&args.log_filter, args.json_logs)?;

    let config = RuntimeConfig::from_args(args).map_err(DomainError::Configuration)?;
    let listener = TcpListener::bind(config.bind_addr())
        .await
        .map_err(|error| DomainError::Unavailable(format!("failed to bind listener: {error}")))?;

    run_with_listener(listener, config, shutdown_signal()).await
}

pub async fn run_with_listener(
    listener: TcpListener,
    config: RuntimeConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DomainError> {
    let sink = JsonFileSink::create(&config.transcript_path).await?;
    run_with_sink(listener, config, Arc::new(sink), shutdown).await
}

pub async fn run_with_sink(
    listener: TcpListener,
    config: RuntimeConfig,
    sink: Arc<dyn TranscriptSink>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DomainError> {
    info!(
        "starting rawg-gateway host={} port={} upstream={} transcript={}",
        config.host,
        config.port,
        config.base_url,
        config.transcript_path.display()
    );

    let state = SharedState::new(config, sink, known_methods())?;
    http::serve(listener, state, shutdown).await
}

fn init_logging(filter: &str, json_logs: bool) -> Result<(), DomainError> {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(env_filter).with_target(false);

    if json_logs {
        builder.json().try_init().map_err(|error| {
            DomainError::Unavailable(format!("failed to initialize logger: {error}"))
        })?;
    } else {
        builder.compact().try_init().map_err(|error| {
            DomainError::Unavailable(format!("failed to initialize logger: {error}"))
        })?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
