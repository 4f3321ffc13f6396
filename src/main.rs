mod adapters;
mod application;
mod config;
mod domain;
mod error;
mod ports;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{
    BackendClient, DockerAdapter, HostProperties, MysqlStatusSource, ProcfsConfig,
    ProcfsSystemSource, StateFile, StubStatusSource,
};
use application::{scheduler, Agent, CollectorDispatch, Sources};
use config::{AgentConfig, Config};
use error::AgentError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("hostpulse={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting hostpulse v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    if !config.config_path.exists() {
        error!(
            "Config file is not found. Consider creating one at {}",
            config.config_path.display()
        );
        return Err(format!("missing config file {}", config.config_path.display()).into());
    }
    let agent_config = AgentConfig::load(&config.config_path)?;
    info!(targets = agent_config.monitor.len(), "✓ Loaded agent configuration");

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()?;

    // Identity
    let backend = authenticate(&config, &agent_config, http.clone()).await?;
    info!("✓ Agent authenticated");

    let properties = HostProperties::detect();
    backend.init(&properties).await?;
    info!(os = %properties.os, "✓ Host properties published");

    // Initialize adapters
    let containers = match connect_docker(&config) {
        Ok(adapter) => {
            info!("✓ Connected to Docker daemon");
            Some(Arc::new(adapter) as Arc<dyn ports::ContainerSource>)
        }
        Err(e) => {
            warn!("⚠ Failed to connect to Docker: {}. Container monitoring disabled.", e);
            None
        }
    };

    let sources = Sources {
        system: Arc::new(ProcfsSystemSource::new(ProcfsConfig::new(config.proc_path.clone()))),
        containers,
        status: Arc::new(StubStatusSource::new(http)),
        database: Arc::new(MysqlStatusSource::new()),
    };

    let mut agent = Agent::new(
        agent_config.monitor,
        CollectorDispatch::new(sources),
        Arc::new(backend),
    );
    info!(
        "✓ Tracking {} target(s) every {}s",
        agent.targets().len(),
        config.interval
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };
    scheduler::run(&mut agent, config.period(), shutdown).await;

    info!("hostpulse stopped");
    Ok(())
}

/// Reuse the stored agent token, registering with the project token first
/// when there is none
async fn authenticate(
    config: &Config,
    agent_config: &AgentConfig,
    http: reqwest::Client,
) -> Result<BackendClient, AgentError> {
    let state_file = StateFile::new(&config.state_path);
    let mut state = state_file.load()?;
    let backend = BackendClient::new(http, &agent_config.backend);

    let token = match state.token.clone() {
        Some(token) => token,
        None => {
            let project_token = agent_config.project_token.as_deref().ok_or_else(|| {
                AgentError::Config("`projectToken` is required to register this agent".to_string())
            })?;
            let name = adapters::host::os_name_and_version();
            let token = backend.register(project_token, &name).await?;
            info!(name = %name, "✓ Registered agent");

            state.token = Some(token.clone());
            if let Err(e) = state_file.save(&state) {
                warn!(path = %state_file.path().display(), error = %e, "Failed to save agent state");
            }
            token
        }
    };

    Ok(backend.with_token(token))
}

fn connect_docker(config: &Config) -> Result<DockerAdapter, AgentError> {
    match &config.docker_socket {
        Some(socket) => DockerAdapter::with_socket(socket),
        None => DockerAdapter::new(),
    }
}
