use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Upstream answered {0}")]
    UpstreamRefused(&'static str),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors caused by the network path rather than by the upstream's answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DomainError::IoError(_)
                | DomainError::QueryTimeout
                | DomainError::TransportTimeout { .. }
                | DomainError::TransportAllServersUnreachable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failures_are_transport_errors() {
        assert!(DomainError::QueryTimeout.is_transport());
        assert!(DomainError::TransportAllServersUnreachable.is_transport());
        assert!(DomainError::TransportTimeout {
            server: "192.0.2.1:53".to_string()
        }
        .is_transport());
    }

    #[test]
    fn test_upstream_verdicts_are_not_transport_errors() {
        assert!(!DomainError::NxDomain.is_transport());
        assert!(!DomainError::UpstreamRefused("REFUSED").is_transport());
        assert!(!DomainError::InvalidDnsResponse("short".to_string()).is_transport());
    }
}
