mod answer;
mod record;
mod record_type;

pub use answer::{AnswerData, DnsAnswer};
pub use record::{AddressKind, AddressRecord, MailExchangeRecord, MailExchanger};
pub use record_type::RecordType;
