use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod logger;
mod routing;
mod server;
mod session;

/// Path-routed WebSocket fixture server for exercising client behavior
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file path, without extension
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Override `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_from(
        &cli.config,
        &config::Overrides {
            host: cli.host,
            port: cli.port,
        },
    )?;
    logger::init(&cfg)?;

    // 所有会话都在同一个 LocalSet 上运行，单线程运行时即可
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(cfg));
    logger::log_server_start(&addr, &state.config, state.routes.routes());

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown))?;

    // Sessions run as local tasks on this thread
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, shutdown))
        .await?;

    Ok(())
}
