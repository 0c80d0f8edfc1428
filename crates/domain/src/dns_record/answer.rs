use super::RecordType;
use crate::DomainName;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    MX { preference: u16, exchange: DomainName },
}

impl AnswerData {
    pub fn record_type(&self) -> RecordType {
        match self {
            AnswerData::A(_) => RecordType::A,
            AnswerData::AAAA(_) => RecordType::AAAA,
            AnswerData::MX { .. } => RecordType::MX,
        }
    }
}

/// One resource record of the answer section. Class is always IN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub ttl: u32,
    pub data: AnswerData,
}

impl DnsAnswer {
    pub fn new(ttl: u32, data: AnswerData) -> Self {
        Self { ttl, data }
    }
}
