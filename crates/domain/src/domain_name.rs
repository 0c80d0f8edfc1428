use crate::DomainError;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Normalized cache key for a DNS name.
///
/// Lowercased, with the single trailing root dot removed, so `Example.COM.`
/// and `example.com` compare and hash equal. Cloning is an `Arc` bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainName(Arc<str>);

impl DomainName {
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let without_root = trimmed.strip_suffix('.').unwrap_or(trimmed);

        if without_root.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' has no labels",
                raw
            )));
        }
        if without_root.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' exceeds {} characters",
                raw, MAX_NAME_LEN
            )));
        }
        for label in without_root.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}' contains an empty label",
                    raw
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' exceeds {} characters",
                    label, MAX_LABEL_LEN
                )));
            }
        }

        Ok(Self(Arc::from(without_root.to_ascii_lowercase())))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with its root dot, as written on the wire.
    pub fn to_fqdn(&self) -> String {
        format!("{}.", self.0)
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DomainName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_trailing_dot_are_normalized() {
        let a = DomainName::new("Example.COM.").unwrap();
        let b = DomainName::new("example.com").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "example.com");
    }

    #[test]
    fn test_fqdn_adds_root() {
        let name = DomainName::new("mail.example.com").unwrap();
        assert_eq!(name.to_fqdn(), "mail.example.com.");
    }

    #[test]
    fn test_rejects_root_and_empty() {
        assert!(DomainName::new("").is_err());
        assert!(DomainName::new(".").is_err());
        assert!(DomainName::new("   ").is_err());
    }

    #[test]
    fn test_rejects_empty_label() {
        assert!(DomainName::new("example..com").is_err());
        assert!(DomainName::new("example.com..").is_err());
    }

    #[test]
    fn test_rejects_oversized_label_and_name() {
        let label = "a".repeat(64);
        assert!(DomainName::new(&format!("{}.com", label)).is_err());

        let long = vec!["abcdefghi"; 26].join(".");
        assert!(long.len() > MAX_NAME_LEN);
        assert!(DomainName::new(&long).is_err());
    }
}
