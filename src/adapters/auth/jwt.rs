//! HS256 JWT token issuer.
//!
//! Access and refresh tokens are signed with separate secrets and carry a
//! `tokenType` claim. Verification checks signature, issuer, expiry, and that
//! the token class matches the expected use.
//!
//! # Security
//!
//! - Secrets are held in `secrecy::Secret` and only exposed to build keys
//! - A token of the wrong class is rejected even when otherwise valid

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{
    AuthError, AuthenticatedUser, TokenClass, Timestamp, UserId, UserRole,
};
use crate::ports::{IssuedToken, TokenIssuer};

/// Settings for `JwtTokenIssuer`.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub access_secret: Secret<String>,
    pub refresh_secret: Secret<String>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub issuer: String,
}

/// Claims carried by every TaskFlow token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    sub: String,
    email: String,
    role: UserRole,
    token_type: TokenClass,
    iat: i64,
    exp: i64,
    iss: String,
}

struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl ClassKeys {
    fn new(secret: &Secret<String>, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }
}

/// Signs and verifies tokens with HMAC-SHA256.
pub struct JwtTokenIssuer {
    access: ClassKeys,
    refresh: ClassKeys,
    issuer: String,
    validation: Validation,
}

impl JwtTokenIssuer {
    pub fn new(settings: JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&settings.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 5;

        Self {
            access: ClassKeys::new(&settings.access_secret, settings.access_ttl),
            refresh: ClassKeys::new(&settings.refresh_secret, settings.refresh_ttl),
            issuer: settings.issuer,
            validation,
        }
    }

    fn keys(&self, class: TokenClass) -> &ClassKeys {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    fn other(class: TokenClass) -> TokenClass {
        match class {
            TokenClass::Access => TokenClass::Refresh,
            TokenClass::Refresh => TokenClass::Access,
        }
    }

    fn decode_with(&self, token: &str, class: TokenClass) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.keys(class).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(
        &self,
        principal: &AuthenticatedUser,
        class: TokenClass,
    ) -> Result<IssuedToken, AuthError> {
        let keys = self.keys(class);
        let now = Timestamp::now();
        let expires_at = now.plus_secs(keys.ttl.as_secs());

        let claims = Claims {
            sub: principal.id.to_string(),
            email: principal.email.clone(),
            role: principal.role,
            token_type: class,
            iat: now.as_unix_secs() as i64,
            exp: expires_at.as_unix_secs() as i64,
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AuthError::service_unavailable(format!("token signing failed: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: keys.ttl.as_secs(),
        })
    }

    fn verify(&self, token: &str, expected: TokenClass) -> Result<AuthenticatedUser, AuthError> {
        let claims = match self.decode_with(token, expected) {
            Ok(claims) => claims,
            Err(AuthError::InvalidToken)
                if self.decode_with(token, Self::other(expected)).is_ok() =>
            {
                tracing::debug!(expected = %expected, "Token presented for the wrong use");
                return Err(AuthError::WrongTokenClass { expected });
            }
            Err(e) => return Err(e),
        };

        if claims.token_type != expected {
            return Err(AuthError::WrongTokenClass { expected });
        }

        let id: UserId = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, claims.email, claims.role))
    }
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish_non_exhaustive()
    }
}
