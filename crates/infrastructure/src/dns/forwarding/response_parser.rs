use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use mxcache_domain::{DomainError, MailExchanger};
use std::net::IpAddr;
use tracing::debug;

/// The parts of an upstream response the resolver cares about.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    pub addresses: Vec<IpAddr>,

    pub mail_exchangers: Vec<MailExchanger>,

    /// CNAMEs seen in the answer section; skipped, only counted.
    pub cname_count: usize,
}

impl DnsResponse {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    /// Answers that say nothing about the name and warrant asking the next
    /// server.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.rcode,
            ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::NotImp
        )
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let mut addresses = Vec::new();
        let mut mail_exchangers = Vec::new();
        let mut cname_count = 0;

        for record in message.answers() {
            match record.data() {
                RData::A(a) => addresses.push(IpAddr::V4(a.0)),
                RData::AAAA(aaaa) => addresses.push(IpAddr::V6(aaaa.0)),
                RData::MX(mx) => mail_exchangers.push(MailExchanger::new(
                    mx.preference(),
                    mx.exchange().to_utf8(),
                )),
                RData::CNAME(_) => cname_count += 1,
                _ => {}
            }
        }

        let response = DnsResponse {
            id: message.id(),
            rcode: message.response_code(),
            truncated: message.truncated(),
            addresses,
            mail_exchangers,
            cname_count,
        };

        debug!(
            rcode = ?response.rcode,
            addresses = response.addresses.len(),
            mail_exchangers = response.mail_exchangers.len(),
            cnames = response.cname_count,
            truncated = response.truncated,
            "DNS response parsed"
        );

        Ok(response)
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{MessageType, OpCode};
    use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX};
    use hickory_proto::rr::{Name, Record};
    use hickory_proto::serialize::binary::BinEncodable;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;

    fn response(rcode: ResponseCode, answers: Vec<Record>) -> Vec<u8> {
        let mut message = Message::new(0x4242, MessageType::Response, OpCode::Query);
        message.set_response_code(rcode);
        for answer in answers {
            message.add_answer(answer);
        }
        message.to_vec().unwrap()
    }

    fn owner() -> Name {
        Name::from_str("example.com.").unwrap()
    }

    #[test]
    fn test_extracts_addresses_of_both_families() {
        let bytes = response(
            ResponseCode::NoError,
            vec![
                Record::from_rdata(owner(), 300, RData::A(A(Ipv4Addr::new(93, 184, 216, 34)))),
                Record::from_rdata(owner(), 300, RData::AAAA(AAAA(Ipv6Addr::LOCALHOST))),
            ],
        );

        let parsed = ResponseParser::parse(&bytes).unwrap();

        assert_eq!(parsed.id, 0x4242);
        assert_eq!(parsed.addresses.len(), 2);
        assert!(parsed.mail_exchangers.is_empty());
    }

    #[test]
    fn test_extracts_mail_exchangers_with_preference() {
        let exchange = Name::from_str("mail.example.com.").unwrap();
        let bytes = response(
            ResponseCode::NoError,
            vec![Record::from_rdata(owner(), 300, RData::MX(MX::new(10, exchange)))],
        );

        let parsed = ResponseParser::parse(&bytes).unwrap();

        assert_eq!(parsed.mail_exchangers, vec![MailExchanger::new(10, "mail.example.com.")]);
    }

    #[test]
    fn test_cname_is_skipped() {
        let target = Name::from_str("edge.example.net.").unwrap();
        let bytes = response(
            ResponseCode::NoError,
            vec![
                Record::from_rdata(owner(), 300, RData::CNAME(CNAME(target.clone()))),
                Record::from_rdata(target, 300, RData::A(A(Ipv4Addr::new(192, 0, 2, 7)))),
            ],
        );

        let parsed = ResponseParser::parse(&bytes).unwrap();

        assert_eq!(parsed.cname_count, 1);
        assert_eq!(parsed.addresses, vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7))]);
    }

    #[test]
    fn test_rcode_classification() {
        let nx = ResponseParser::parse(&response(ResponseCode::NXDomain, vec![])).unwrap();
        assert!(nx.is_nxdomain());
        assert!(!nx.is_server_error());

        let servfail = ResponseParser::parse(&response(ResponseCode::ServFail, vec![])).unwrap();
        assert!(servfail.is_server_error());
        assert_eq!(ResponseParser::rcode_to_status(servfail.rcode), "SERVFAIL");
    }

    #[test]
    fn test_garbage_is_invalid_response() {
        let result = ResponseParser::parse(&[0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(DomainError::InvalidDnsResponse(_))));
    }
}
