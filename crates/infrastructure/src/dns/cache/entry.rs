use mxcache_application::ports::{AddressSet, MailExchangeSet};

/// Per-domain slot. Each list is independently unresolved (`None`) or
/// published once and shared from then on.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    pub addresses: Option<AddressSet>,
    pub mail_exchangers: Option<MailExchangeSet>,
}

impl CacheEntry {
    pub fn is_complete(&self) -> bool {
        self.addresses.is_some() && self.mail_exchangers.is_some()
    }
}
