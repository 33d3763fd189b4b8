//! Authentication adapters.
//!
//! Implementations of the `TokenIssuer` and `PasswordHasher` ports:
//!
//! - `jwt` - HS256 tokens with separate access and refresh secrets
//! - `argon2_hasher` - Argon2id password hashes

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::{JwtSettings, JwtTokenIssuer};
