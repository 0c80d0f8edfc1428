use async_trait::async_trait;
use mxcache_domain::{DomainError, DomainName, MailExchanger};
use std::net::IpAddr;

/// Authoritative source consulted on a cache miss.
///
/// `Ok(vec![])` is a definitive empty answer and gets cached; any `Err` is
/// treated as transient by the caller.
#[async_trait]
pub trait UpstreamResolver: Send + Sync {
    /// IPv4 and IPv6 addresses of `domain`, in upstream order.
    async fn resolve_addresses(&self, domain: &DomainName) -> Result<Vec<IpAddr>, DomainError>;

    async fn resolve_mail_exchangers(
        &self,
        domain: &DomainName,
    ) -> Result<Vec<MailExchanger>, DomainError>;
}
