//! Token issuing port for access and refresh tokens.
//!
//! Register, login, and refresh all mint tokens through this one port. The
//! HTTP auth middleware verifies access tokens through it as well.
//!
//! # Contract
//!
//! Implementations must:
//! - Sign access and refresh tokens with distinct keys
//! - Return `AuthError::InvalidToken` for malformed or badly signed tokens
//! - Return `AuthError::TokenExpired` for expired tokens
//! - Return `AuthError::WrongTokenClass` when a valid token is presented for
//!   the other use

use crate::domain::foundation::{AuthError, AuthenticatedUser, TokenClass, Timestamp};

/// Issues and verifies signed bearer tokens.
pub trait TokenIssuer: Send + Sync {
    /// Sign a token of the given class for a principal.
    fn issue(&self, principal: &AuthenticatedUser, class: TokenClass)
        -> Result<IssuedToken, AuthError>;

    /// Verify a raw token (without "Bearer " prefix) for the expected use.
    fn verify(&self, token: &str, expected: TokenClass) -> Result<AuthenticatedUser, AuthError>;
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
    /// Lifetime in seconds, as reported to clients.
    pub expires_in: u64,
}

/// Access/refresh pair returned by register, login, and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

impl TokenPair {
    /// Issues both tokens for a principal.
    pub fn issue(
        issuer: &dyn TokenIssuer,
        principal: &AuthenticatedUser,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            access: issuer.issue(principal, TokenClass::Access)?,
            refresh: issuer.issue(principal, TokenClass::Refresh)?,
        })
    }
}
