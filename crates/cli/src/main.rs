use anyhow::Context;
use clap::Parser;
use mxcache_api::AppState;
use mxcache_domain::CliOverrides;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser, Debug)]
#[command(name = "mxcache")]
#[command(version)]
#[command(about = "mxcache - caching DNS proxy for A, AAAA and MX records")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Metrics HTTP port
    #[arg(short = 'm', long)]
    metrics_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream DNS server, may be repeated (e.g. 9.9.9.9:53)
    #[arg(short = 'u', long = "upstream", value_name = "ADDR")]
    upstream: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Shorthand for --log-level debug
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dns_port: self.dns_port,
            metrics_port: self.metrics_port,
            bind_address: self.bind.clone(),
            upstream_servers: self.upstream.clone(),
            log_level: self.log_level.clone(),
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);

    info!("Starting mxcache v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();
    let services = di::DnsServices::new(&config, shutdown.clone())?;

    let app_state = AppState {
        get_cache_stats: services.get_cache_stats.clone(),
    };

    let dns_addr = bootstrap::socket_addr(&config.server.bind_address, config.server.dns_port)?;
    let metrics_addr =
        bootstrap::socket_addr(&config.server.bind_address, config.server.metrics_port)?;

    let signal = {
        let shutdown = shutdown.clone();
        async move {
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received");
            shutdown.cancel();
            Ok::<(), anyhow::Error>(())
        }
    };

    let result = tokio::try_join!(
        server::start_dns_server(dns_addr, services.handler, shutdown.clone()),
        server::start_metrics_server(metrics_addr, app_state, shutdown.clone()),
        signal,
    );

    shutdown.cancel();
    result?;

    let stats = services.get_cache_stats.execute();
    info!(
        domains = stats.domains,
        hits = stats.resolution.hits,
        misses = stats.resolution.misses,
        "Server shutdown complete"
    );
    Ok(())
}
