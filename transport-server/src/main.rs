use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use transport_server::config::AppConfig;
use transport_server::dispatch::{DispatchConfig, Dispatcher, ProviderRegistry};
use transport_server::tools::ToolSurface;
use transport_server::web::{AppState, create_router};

/// Public transport gateway for Swiss, Belgian and UK rail data.
#[derive(Parser, Debug)]
#[command(name = "transport-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Log level (trace, debug, info, warn, error); overrides LOG_LEVEL
    #[arg(long)]
    log_level: Option<String>,
}

/// Determines the log level from the CLI flag or configuration.
fn get_log_level(flag: Option<&str>, config_level: &str) -> Level {
    flag.unwrap_or(config_level)
        .trim()
        .parse()
        .unwrap_or(Level::INFO)
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(get_log_level(args.log_level.as_deref(), &config.log_level));
    info!(version = env!("CARGO_PKG_VERSION"), "starting transport-server");

    let registry = ProviderRegistry::from_config(&config);
    let dispatcher = Dispatcher::new(registry, DispatchConfig::from_app_config(&config));
    let tools = ToolSurface::new(dispatcher);
    info!(
        tools = ?tools.list().iter().map(|t| t.name).collect::<Vec<_>>(),
        "tools available"
    );

    let app = create_router(AppState::new(tools));

    let addr = SocketAddr::new(args.host, args.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "could not bind");
            return ExitCode::FAILURE;
        }
    };
    info!("listening on http://{addr}");

    match axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
