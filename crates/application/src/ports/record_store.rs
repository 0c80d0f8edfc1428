use mxcache_domain::{AddressRecord, DomainName, MailExchangeRecord};
use std::sync::Arc;

/// Published address list of one domain. Never mutated after insert.
pub type AddressSet = Arc<[AddressRecord]>;

/// Published MX list of one domain. Never mutated after insert.
pub type MailExchangeSet = Arc<[MailExchangeRecord]>;

/// Result of an insert-if-absent: the value now held by the store and
/// whether this call was the one that put it there.
#[derive(Debug, Clone)]
pub struct PutOutcome<T> {
    pub stored: T,
    pub inserted: bool,
}

impl<T> PutOutcome<T> {
    pub fn inserted(stored: T) -> Self {
        Self {
            stored,
            inserted: true,
        }
    }

    pub fn existing(stored: T) -> Self {
        Self {
            stored,
            inserted: false,
        }
    }
}

/// Per-domain record cache.
///
/// Address and MX lists are tracked independently: `None` means the list was
/// never resolved, `Some(empty)` means the upstream definitively had nothing.
/// Puts are single-writer-wins; a losing writer gets the winner's value back.
pub trait RecordStore: Send + Sync {
    fn get_addresses(&self, domain: &DomainName) -> Option<AddressSet>;

    fn get_mail_exchangers(&self, domain: &DomainName) -> Option<MailExchangeSet>;

    fn put_addresses_if_absent(
        &self,
        domain: &DomainName,
        records: Vec<AddressRecord>,
    ) -> PutOutcome<AddressSet>;

    fn put_mail_exchangers_if_absent(
        &self,
        domain: &DomainName,
        records: Vec<MailExchangeRecord>,
    ) -> PutOutcome<MailExchangeSet>;

    /// Both lists are present for `domain`.
    fn is_fully_resolved(&self, domain: &DomainName) -> bool {
        self.get_addresses(domain).is_some() && self.get_mail_exchangers(domain).is_some()
    }
}
