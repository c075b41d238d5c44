//! Admin gate
//!
//! The admin token is kept only as its SHA-256 digest. Credentials are
//! hashed the same way and compared in constant time.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::utils::AppError;

/// Proof that the caller passed the admin check.
///
/// Only [`AdminGate::authorize`] can construct one.
#[derive(Debug, Clone)]
pub struct AdminAccess {
    _private: (),
}

pub struct AdminGate {
    digest: Option<[u8; 32]>,
}

impl AdminGate {
    /// A gate without a token (or with a blank one) denies everything
    pub fn new(token: Option<String>) -> Self {
        let digest = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|t| hash(&t));
        if digest.is_none() {
            tracing::warn!("ADMIN_TOKEN not set, all admin endpoints will be denied");
        }
        Self { digest }
    }

    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    pub fn authorize(&self, credential: &str) -> Result<AdminAccess, AppError> {
        let Some(expected) = &self.digest else {
            return Err(AppError::invalid_credentials());
        };
        if bool::from(expected.as_slice().ct_eq(hash(credential).as_slice())) {
            Ok(AdminAccess { _private: () })
        } else {
            Err(AppError::invalid_credentials())
        }
    }
}

fn hash(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_authorize_matching_token() {
        let gate = AdminGate::new(Some("s3cret".into()));
        assert!(gate.is_configured());
        assert!(gate.authorize("s3cret").is_ok());
    }

    #[test]
    fn test_authorize_wrong_token() {
        let gate = AdminGate::new(Some("s3cret".into()));
        let err = gate.authorize("s3cret ").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert!(gate.authorize("").is_err());
    }

    #[test]
    fn test_unconfigured_gate_denies_everything() {
        for token in [None, Some("   ".to_string())] {
            let gate = AdminGate::new(token);
            assert!(!gate.is_configured());
            assert!(gate.authorize("").is_err());
            assert!(gate.authorize("anything").is_err());
        }
    }

    #[test]
    fn test_authorize_rejects_token_differing_in_one_char() {
        let gate = AdminGate::new(Some("s3cret-token".into()));
        assert!(gate.authorize("s3cret-tokem").is_err());
        assert!(gate.authorize("s3cret-token").is_ok());
    }
}
