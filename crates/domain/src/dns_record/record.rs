use crate::DomainName;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    Ipv4,
    Ipv6,
}

impl AddressKind {
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressKind::Ipv4,
            IpAddr::V6(_) => AddressKind::Ipv6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub domain: DomainName,
    pub kind: AddressKind,
    pub value: IpAddr,
}

impl AddressRecord {
    pub fn new(domain: DomainName, value: IpAddr) -> Self {
        Self {
            domain,
            kind: AddressKind::of(&value),
            value,
        }
    }
}

/// MX data as returned by an upstream, before it is attached to a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailExchanger {
    pub preference: u16,
    pub host: String,
}

impl MailExchanger {
    pub fn new(preference: u16, host: impl Into<String>) -> Self {
        Self {
            preference,
            host: host.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailExchangeRecord {
    pub domain: DomainName,
    pub preference: u16,
    pub host: DomainName,
}

impl MailExchangeRecord {
    pub fn new(domain: DomainName, preference: u16, host: DomainName) -> Self {
        Self {
            domain,
            preference,
            host,
        }
    }
}
