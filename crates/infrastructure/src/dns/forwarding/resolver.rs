use super::message_builder::MessageBuilder;
use super::response_parser::{DnsResponse, ResponseParser};
use crate::dns::transport::{DnsTransport, UdpTransport};
use async_trait::async_trait;
use mxcache_application::ports::UpstreamResolver;
use mxcache_domain::config::UpstreamConfig;
use mxcache_domain::{DomainError, DomainName, MailExchanger, RecordType};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{debug, warn};

/// Floor for the per-server share of the query timeout.
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(100);

/// Forwards lookups to a fixed list of upstream servers over UDP.
///
/// Servers are tried in order; a transport error, an unparsable or
/// mismatched response, or SERVFAIL/REFUSED/NOTIMP moves on to the next one.
/// NXDOMAIN is a definitive answer and is not failed over.
pub struct ForwardingUpstreamResolver {
    transports: Vec<Box<dyn DnsTransport>>,
    attempt_timeout: Duration,
}

impl ForwardingUpstreamResolver {
    /// `query_timeout` is the budget for one lookup across all servers; each
    /// server gets an equal share.
    pub fn new(servers: Vec<SocketAddr>, query_timeout: Duration) -> Self {
        let transports = servers
            .into_iter()
            .map(|addr| Box::new(UdpTransport::new(addr)) as Box<dyn DnsTransport>)
            .collect();
        Self::with_transports(transports, query_timeout)
    }

    pub fn with_transports(transports: Vec<Box<dyn DnsTransport>>, query_timeout: Duration) -> Self {
        let share = query_timeout / transports.len().max(1) as u32;
        Self {
            transports,
            attempt_timeout: share.max(MIN_ATTEMPT_TIMEOUT),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, DomainError> {
        let servers = config.socket_addrs().map_err(DomainError::ConfigError)?;
        if servers.is_empty() {
            return Err(DomainError::ConfigError(
                "No upstream servers configured".to_string(),
            ));
        }
        Ok(Self::new(servers, config.query_timeout()))
    }

    pub fn servers(&self) -> Vec<SocketAddr> {
        self.transports.iter().map(|t| t.server()).collect()
    }

    /// Sends one question, failing over across servers.
    pub async fn query(
        &self,
        domain: &DomainName,
        record_type: RecordType,
    ) -> Result<DnsResponse, DomainError> {
        let mut refusal: Option<&'static str> = None;

        for (position, transport) in self.transports.iter().enumerate() {
            match self.query_server(transport.as_ref(), domain, record_type).await {
                Ok(response) if response.is_server_error() => {
                    let status = ResponseParser::rcode_to_status(response.rcode);
                    warn!(
                        server = %transport.server(),
                        protocol = transport.protocol_name(),
                        domain = %domain,
                        record_type = %record_type,
                        status,
                        position,
                        "Upstream refused, failing over"
                    );
                    refusal = Some(status);
                }
                Ok(response) => {
                    if response.truncated {
                        debug!(domain = %domain, record_type = %record_type, "Using truncated response as-is");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        server = %transport.server(),
                        protocol = transport.protocol_name(),
                        domain = %domain,
                        record_type = %record_type,
                        error = %e,
                        position,
                        "Failing over"
                    );
                }
            }
        }

        match refusal {
            Some(status) => Err(DomainError::UpstreamRefused(status)),
            None => Err(DomainError::TransportAllServersUnreachable),
        }
    }

    async fn query_server(
        &self,
        transport: &dyn DnsTransport,
        domain: &DomainName,
        record_type: RecordType,
    ) -> Result<DnsResponse, DomainError> {
        let (id, request_bytes) = MessageBuilder::build_query(domain, &record_type)?;
        let reply = transport.send(&request_bytes, self.attempt_timeout).await?;
        let response = ResponseParser::parse(&reply.bytes)?;

        if response.id != id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response id {} does not match query id {} from {}",
                response.id, id, reply.server
            )));
        }

        Ok(response)
    }

    async fn lookup(
        &self,
        domain: &DomainName,
        record_type: RecordType,
    ) -> Result<DnsResponse, DomainError> {
        let response = self.query(domain, record_type).await?;
        if response.is_nxdomain() {
            return Err(DomainError::NxDomain);
        }
        Ok(response)
    }
}

#[async_trait]
impl UpstreamResolver for ForwardingUpstreamResolver {
    async fn resolve_addresses(&self, domain: &DomainName) -> Result<Vec<IpAddr>, DomainError> {
        let (ipv4, ipv6) = tokio::join!(
            self.lookup(domain, RecordType::A),
            self.lookup(domain, RecordType::AAAA)
        );

        match (ipv4, ipv6) {
            (Ok(v4), Ok(v6)) => {
                let mut addresses = v4.addresses;
                addresses.extend(v6.addresses);
                Ok(addresses)
            }
            (Ok(v4), Err(e)) => keep_answered_family(domain, RecordType::AAAA, e, v4),
            (Err(e), Ok(v6)) => keep_answered_family(domain, RecordType::A, e, v6),
            (Err(e), Err(_)) => Err(e),
        }
    }

    async fn resolve_mail_exchangers(
        &self,
        domain: &DomainName,
    ) -> Result<Vec<MailExchanger>, DomainError> {
        Ok(self.lookup(domain, RecordType::MX).await?.mail_exchangers)
    }
}

/// A family lost to the network path does not void the other family's
/// answer; a definitive failure (NXDOMAIN, refusal) does.
fn keep_answered_family(
    domain: &DomainName,
    failed: RecordType,
    error: DomainError,
    answered: DnsResponse,
) -> Result<Vec<IpAddr>, DomainError> {
    if !error.is_transport() {
        return Err(error);
    }
    warn!(
        domain = %domain,
        failed = %failed,
        error = %error,
        "Address family lookup failed, keeping the other family"
    );
    Ok(answered.addresses)
}
