use super::resolve_domain::{DomainRecords, ResolveDomainUseCase};
use mxcache_domain::{AnswerData, DnsAnswer, DnsRequest, DomainName, RecordType};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub struct HandleDnsQueryUseCase {
    engine: Arc<ResolveDomainUseCase>,
    answer_ttl: u32,
}

impl HandleDnsQueryUseCase {
    pub fn new(engine: Arc<ResolveDomainUseCase>, answer_ttl: u32) -> Self {
        Self { engine, answer_ttl }
    }

    /// Answers the question in `request` from the cache, resolving on a miss.
    ///
    /// The domain is resolved whatever the requested type, so every query
    /// warms the cache and feeds the MX crawl. Types other than A, AAAA and
    /// MX, and names that fail to parse, get an empty answer.
    pub async fn execute(&self, request: &DnsRequest) -> Vec<DnsAnswer> {
        let start = Instant::now();

        let domain = match DomainName::new(&request.domain) {
            Ok(domain) => domain,
            Err(e) => {
                debug!(
                    domain = %request.domain,
                    client = %request.client_ip,
                    error = %e,
                    "Unparsable query name, answering empty"
                );
                return Vec::new();
            }
        };

        let records = self.engine.execute(&domain).await;
        let answers = project(&records, request.record_type, self.answer_ttl);

        debug!(
            domain = %domain,
            record_type = %request.record_type,
            client = %request.client_ip,
            answers = answers.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query answered"
        );

        answers
    }
}

fn project(records: &DomainRecords, record_type: RecordType, ttl: u32) -> Vec<DnsAnswer> {
    match record_type {
        RecordType::A => records
            .ipv4()
            .map(|ip| DnsAnswer::new(ttl, AnswerData::A(ip)))
            .collect(),
        RecordType::AAAA => records
            .ipv6()
            .map(|ip| DnsAnswer::new(ttl, AnswerData::AAAA(ip)))
            .collect(),
        RecordType::MX => records
            .mail_exchangers
            .iter()
            .map(|mx| {
                DnsAnswer::new(
                    ttl,
                    AnswerData::MX {
                        preference: mx.preference,
                        exchange: mx.host.clone(),
                    },
                )
            })
            .collect(),
        _ => Vec::new(),
    }
}
