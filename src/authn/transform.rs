//! Username and password transforms applied before verification.
//!
//! Both are single-operation strategies; returning `None` is treated the same
//! as producing a blank value.

use sha2::{Digest, Sha256, Sha512};

pub trait PrincipalNameTransformer: Send + Sync {
    fn transform(&self, username: &str) -> Option<String>;
}

pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, password: &str) -> Option<String>;
}

/// Leaves the username untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPrincipalNameTransformer;

impl PrincipalNameTransformer for NoOpPrincipalNameTransformer {
    fn transform(&self, username: &str) -> Option<String> {
        Some(username.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseConversion {
    Lower,
    Upper,
}

/// Trims the username and converts its case.
#[derive(Debug, Clone, Copy)]
pub struct ConvertCasePrincipalNameTransformer {
    conversion: CaseConversion,
}

impl ConvertCasePrincipalNameTransformer {
    #[must_use]
    pub const fn new(conversion: CaseConversion) -> Self {
        Self { conversion }
    }
}

impl PrincipalNameTransformer for ConvertCasePrincipalNameTransformer {
    fn transform(&self, username: &str) -> Option<String> {
        // Control characters and ASCII space only, NBSP survives.
        let trimmed = username.trim_matches(|c: char| c <= ' ');
        Some(match self.conversion {
            CaseConversion::Lower => trimmed.to_lowercase(),
            CaseConversion::Upper => trimmed.to_uppercase(),
        })
    }
}

/// Wraps the username in a fixed prefix and suffix, e.g. `user` -> `user@acme.tld`.
#[derive(Debug, Clone, Default)]
pub struct PrefixSuffixPrincipalNameTransformer {
    prefix: String,
    suffix: String,
}

impl PrefixSuffixPrincipalNameTransformer {
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl PrincipalNameTransformer for PrefixSuffixPrincipalNameTransformer {
    fn transform(&self, username: &str) -> Option<String> {
        Some(format!("{}{username}{}", self.prefix, self.suffix))
    }
}

/// Leaves the password untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPasswordEncoder;

impl PasswordEncoder for NoOpPasswordEncoder {
    fn encode(&self, password: &str) -> Option<String> {
        Some(password.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

/// Hashes the password and renders it as lower-case hex.
///
/// Lets the allow-list hold digests instead of plaintext passwords.
#[derive(Debug, Clone, Copy)]
pub struct DigestPasswordEncoder {
    algorithm: DigestAlgorithm,
}

impl DigestPasswordEncoder {
    #[must_use]
    pub const fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl PasswordEncoder for DigestPasswordEncoder {
    fn encode(&self, password: &str) -> Option<String> {
        if password.is_empty() {
            return None;
        }

        Some(match self.algorithm {
            DigestAlgorithm::Sha256 => format!("{:x}", Sha256::digest(password.as_bytes())),
            DigestAlgorithm::Sha512 => format!("{:x}", Sha512::digest(password.as_bytes())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_transformer() {
        assert_eq!(
            NoOpPrincipalNameTransformer.transform(" Alice "),
            Some(" Alice ".to_string())
        );
    }

    #[test]
    fn test_convert_case() {
        let lower = ConvertCasePrincipalNameTransformer::new(CaseConversion::Lower);
        let upper = ConvertCasePrincipalNameTransformer::new(CaseConversion::Upper);
        assert_eq!(lower.transform(" Alice "), Some("alice".to_string()));
        assert_eq!(upper.transform("alice"), Some("ALICE".to_string()));
        assert_eq!(lower.transform("\tBob\n"), Some("bob".to_string()));
        assert_eq!(lower.transform("\u{a0}Bob"), Some("\u{a0}bob".to_string()));
    }

    #[test]
    fn test_prefix_suffix() {
        let transformer = PrefixSuffixPrincipalNameTransformer::new("", "@acme.tld");
        assert_eq!(
            transformer.transform("alice"),
            Some("alice@acme.tld".to_string())
        );
    }

    #[test]
    fn test_noop_encoder() {
        assert_eq!(NoOpPasswordEncoder.encode("secret"), Some("secret".to_string()));
    }

    #[test]
    fn test_sha256_encoder() {
        let encoder = DigestPasswordEncoder::new(DigestAlgorithm::Sha256);
        assert_eq!(
            encoder.encode("secret"),
            Some("2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b".to_string())
        );
    }

    #[test]
    fn test_sha512_encoder_length() {
        let encoder = DigestPasswordEncoder::new(DigestAlgorithm::Sha512);
        let encoded = encoder.encode("secret").unwrap_or_default();
        assert_eq!(encoded.len(), 128);
        assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_encoder_rejects_empty() {
        let encoder = DigestPasswordEncoder::new(DigestAlgorithm::Sha256);
        assert_eq!(encoder.encode(""), None);
    }
}
