//! Domain name validation
//!
//! Providers that order machines under a DNS domain require the domain to
//! end in a suffix registered in the Public Suffix List.

use crate::error::{ComputeError, Result};

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Validate that `name` is a syntactically valid domain with a known public suffix
///
/// The name needs at least one label in front of the suffix, so a bare
/// suffix such as "com" or "co.uk" is rejected. A single trailing dot is
/// accepted. Matching is case-insensitive.
pub fn validate_domain_name(name: &str) -> Result<()> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    check_syntax(name, trimmed)?;

    let lowered = trimmed.to_ascii_lowercase();
    let known = psl::suffix(lowered.as_bytes()).is_some_and(|suffix| suffix.is_known());
    if !known {
        return Err(ComputeError::InvalidDomain(format!(
            "{} has no public suffix",
            name
        )));
    }
    if psl::domain(lowered.as_bytes()).is_none() {
        return Err(ComputeError::InvalidDomain(format!(
            "{} is a public suffix, not a domain under one",
            name
        )));
    }

    Ok(())
}

/// Whether `name` passes [`validate_domain_name`]
pub fn has_public_suffix(name: &str) -> bool {
    validate_domain_name(name).is_ok()
}

fn check_syntax(original: &str, name: &str) -> Result<()> {
    let invalid = |reason: &str| ComputeError::InvalidDomain(format!("{}: {}", original, reason));

    if name.is_empty() {
        return Err(invalid("empty domain name"));
    }
    if name.len() > MAX_DOMAIN_LEN {
        return Err(invalid("longer than 253 characters"));
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return Err(invalid("single label"));
    }
    for label in &labels {
        if label.is_empty() {
            return Err(invalid("empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid("label longer than 63 characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("label starts or ends with a hyphen"));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid("label contains invalid characters"));
        }
    }

    if labels
        .last()
        .is_some_and(|last| last.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid("top-level label is numeric"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_suffixes_pass() {
        assert!(validate_domain_name("example.com").is_ok());
        assert!(validate_domain_name("sub.example.co.uk").is_ok());
        assert!(validate_domain_name("Example.ORG").is_ok());
        assert!(validate_domain_name("example.com.").is_ok());
    }

    #[test]
    fn test_missing_suffix_fails() {
        for name in ["localhost", "foo", "example.invalid", "com", "dev"] {
            let err = validate_domain_name(name).unwrap_err();
            assert!(
                matches!(err, ComputeError::InvalidDomain(_)),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_bare_public_suffix_fails() {
        for name in ["co.uk", "CO.UK", "co.uk."] {
            assert!(
                matches!(
                    validate_domain_name(name),
                    Err(ComputeError::InvalidDomain(_))
                ),
                "{:?} should be rejected",
                name
            );
        }
        assert!(validate_domain_name("example.co.uk").is_ok());
    }

    #[test]
    fn test_malformed_names_fail() {
        for name in ["", ".", "a..com", "-bad.com", "bad-.com", "sp ace.com", "10.0.0.1"] {
            assert!(
                matches!(
                    validate_domain_name(name),
                    Err(ComputeError::InvalidDomain(_))
                ),
                "{:?} should be rejected",
                name
            );
        }

        let long_label = format!("{}.com", "a".repeat(64));
        assert!(validate_domain_name(&long_label).is_err());
    }

    #[test]
    fn test_has_public_suffix() {
        assert!(has_public_suffix("fleetflow.dev"));
        assert!(!has_public_suffix("localhost"));
    }
}
