//! mxcache domain layer
pub mod config;
pub mod dns_record;
pub mod dns_request;
pub mod domain_name;
pub mod errors;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_record::{
    AddressKind, AddressRecord, AnswerData, DnsAnswer, MailExchangeRecord, MailExchanger,
    RecordType,
};
pub use dns_request::DnsRequest;
pub use domain_name::DomainName;
pub use errors::DomainError;
