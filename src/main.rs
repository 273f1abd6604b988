//! Travomate server binary.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use travomate::config::Config;
use travomate::llm::{
    AnthropicProvider, LLMProvider, OpenAICompatibleProvider, Provider, ProviderRegistry,
};
use travomate::server::{AppState, build_app};
use travomate::session::SessionStore;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "travomate.yaml")]
    config: String,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("loading configuration from {}", cli.config))?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // A missing API key for the configured backend is fatal; everything
    // after startup fails per-request instead.
    if let Some(var) = config.assistant.provider.api_key_var()
        && std::env::var(var).is_err()
    {
        bail!(
            "provider '{}' requires the {} environment variable",
            config.assistant.provider,
            var
        );
    }

    let mut providers = ProviderRegistry::from_env();
    if let Some(base_url) = config.assistant.base_url.clone() {
        let api_key = config
            .assistant
            .provider
            .api_key_var()
            .and_then(|var| std::env::var(var).ok());
        let provider: Arc<dyn LLMProvider> = match config.assistant.provider {
            Provider::Anthropic => {
                Arc::new(AnthropicProvider::new(api_key.unwrap_or_default(), base_url))
            }
            _ => Arc::new(OpenAICompatibleProvider::new(base_url, api_key)),
        };
        providers.register(config.assistant.provider, provider);
    }

    info!(
        provider = %config.assistant.provider,
        model = %config.assistant.model,
        "assistant configured"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let request_timeout_seconds = config.server.request_timeout_seconds;

    let state = AppState {
        sessions: SessionStore::new(),
        providers,
        settings: Arc::new(config.assistant),
    };
    let app = build_app(state, request_timeout_seconds);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "travomate listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
