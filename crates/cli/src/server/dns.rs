use anyhow::Context;
use hickory_server::ServerFuture;
use mxcache_infrastructure::dns::DnsServerHandler;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::info;

const TCP_TIMEOUT: Duration = Duration::from_secs(10);

/// Serves DNS on UDP and TCP until `shutdown` fires.
pub async fn start_dns_server(
    bind_addr: SocketAddr,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let udp_socket = UdpSocket::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind UDP socket on {}", bind_addr))?;
    let tcp_listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {}", bind_addr))?;

    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    server.register_listener(tcp_listener, TCP_TIMEOUT);

    info!(bind_address = %bind_addr, "DNS server ready");

    tokio::select! {
        result = server.block_until_done() => {
            result.context("DNS server stopped unexpectedly")?;
        }
        _ = shutdown.cancelled() => {
            info!("DNS server stopping");
        }
    }

    Ok(())
}
