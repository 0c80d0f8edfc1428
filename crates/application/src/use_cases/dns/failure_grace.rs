use dashmap::DashMap;
use mxcache_domain::DomainName;
use rustc_hash::FxBuildHasher;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum LookupKind {
    Addresses,
    MailExchangers,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Addresses => "addresses",
            LookupKind::MailExchangers => "mail_exchangers",
        }
    }
}

/// Remembers recent upstream failures so a flapping name does not turn
/// every client query into an upstream round trip.
pub(super) struct FailureGrace {
    window: Duration,
    failures: DashMap<(DomainName, LookupKind), Instant, FxBuildHasher>,
}

impl FailureGrace {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            failures: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn is_suppressed(&self, domain: &DomainName, kind: LookupKind) -> bool {
        if self.window.is_zero() {
            return false;
        }
        let key = (domain.clone(), kind);
        let expired = match self.failures.get(&key) {
            Some(failed_at) => failed_at.elapsed() >= self.window,
            None => return false,
        };
        if expired {
            self.failures
                .remove_if(&key, |_, failed_at| failed_at.elapsed() >= self.window);
            return false;
        }
        true
    }

    pub fn record_failure(&self, domain: &DomainName, kind: LookupKind) {
        if self.window.is_zero() {
            return;
        }
        self.failures.insert((domain.clone(), kind), Instant::now());
    }

    pub fn clear(&self, domain: &DomainName, kind: LookupKind) {
        if self.window.is_zero() {
            return;
        }
        self.failures.remove(&(domain.clone(), kind));
    }
}
