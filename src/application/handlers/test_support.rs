//! Shared fixtures for handler tests.

use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use secrecy::Secret;

use crate::adapters::auth::{Argon2PasswordHasher, JwtSettings, JwtTokenIssuer};
use crate::domain::foundation::{AuthenticatedUser, UserRole};
use crate::domain::user::User;
use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

/// Argon2id at minimal cost so tests stay fast.
pub fn fast_hasher() -> Arc<dyn PasswordHasher> {
    let params = Params::new(256, 1, 1, None).expect("valid argon2 params");
    Arc::new(Argon2PasswordHasher::with_params(params))
}

pub fn token_issuer() -> Arc<dyn TokenIssuer> {
    Arc::new(JwtTokenIssuer::new(JwtSettings {
        access_secret: Secret::new("test-access-secret-0123456789abcdef".to_string()),
        refresh_secret: Secret::new("test-refresh-secret-0123456789abcdef".to_string()),
        access_ttl: Duration::from_secs(900),
        refresh_ttl: Duration::from_secs(3600),
        issuer: "taskflow-test".to_string(),
    }))
}

/// Stores a user with the given e-mail and returns it.
pub async fn seed_user(users: &dyn UserRepository, email: &str) -> User {
    let user = User::new(email, "Test User", "$argon2id$placeholder".to_string())
        .expect("valid user");
    users.create(&user).await.expect("seed user");
    user
}

pub fn principal(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::new(*user.id(), user.email(), user.role())
}

pub fn admin() -> AuthenticatedUser {
    AuthenticatedUser::new(crate::domain::foundation::UserId::new(), "root@example.com", UserRole::Admin)
}
