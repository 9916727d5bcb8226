//! Custom domain names attached to a deployment

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::DomainError;

const MAX_DOMAIN_LENGTH: usize = 253;

fn label_pattern() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("label pattern is valid")
    })
}

fn tld_pattern() -> &'static Regex {
    static TLD: OnceLock<Regex> = OnceLock::new();
    TLD.get_or_init(|| Regex::new(r"^[a-z]{2,63}$").expect("tld pattern is valid"))
}

/// A validated, normalised (lowercase, no trailing dot) domain name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        // A single trailing dot marks a fully qualified name
        let candidate = trimmed.strip_suffix('.').unwrap_or(trimmed).to_lowercase();

        if candidate.is_empty() {
            return Err(DomainError::Validation("Domain name is required".to_string()));
        }
        if candidate.contains("://") || candidate.contains('/') {
            return Err(DomainError::Validation(
                "Enter the domain only, without a scheme or path".to_string(),
            ));
        }
        if candidate.contains(':') {
            return Err(DomainError::Validation(
                "Domain names cannot include a port".to_string(),
            ));
        }
        if candidate.len() > MAX_DOMAIN_LENGTH {
            return Err(DomainError::Validation(format!(
                "Domain name must be at most {} characters",
                MAX_DOMAIN_LENGTH
            )));
        }

        let labels: Vec<&str> = candidate.split('.').collect();
        if labels.iter().any(|label| label.is_empty()) {
            return Err(DomainError::Validation(format!(
                "'{}' contains an empty label",
                candidate
            )));
        }
        if labels.len() < 2 {
            return Err(DomainError::Validation(format!(
                "'{}' is missing a top-level domain",
                candidate
            )));
        }
        if let Some(bad) = labels.iter().find(|label| !label_pattern().is_match(label)) {
            return Err(DomainError::Validation(format!(
                "Invalid domain label '{}': use letters, numbers and hyphens, 1-63 characters",
                bad
            )));
        }
        let tld = labels[labels.len() - 1];
        if !tld_pattern().is_match(tld) {
            return Err(DomainError::Validation(format!(
                "Invalid top-level domain '{}'",
                tld
            )));
        }

        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registrable part: the last two labels
    pub fn apex(&self) -> &str {
        let mut dots = self.0.rmatch_indices('.');
        dots.next();
        match dots.next() {
            Some((idx, _)) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    pub fn is_subdomain(&self) -> bool {
        self.apex() != self.0
    }
}

impl std::fmt::Display for DomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
