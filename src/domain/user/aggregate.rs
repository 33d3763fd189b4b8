//! User account entity.
//!
//! A user owns tasks and authenticates with e-mail and password. The stored
//! password hash never leaves the domain through response DTOs.

use crate::domain::foundation::{DomainError, Timestamp, UserId, UserRole};

/// Maximum length for a display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for an e-mail address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Inclusive bounds on plaintext password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// User aggregate.
///
/// # Invariants
///
/// - `email` is normalized (trimmed, lowercase) and unique across users
/// - `name` is 1-100 characters after trimming
/// - `password_hash` is a PHC-format hash, never plaintext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
    name: String,
    password_hash: String,
    role: UserRole,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl User {
    /// Create a new user with the default role.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if e-mail or name is malformed
    pub fn new(email: &str, name: &str, password_hash: String) -> Result<Self, DomainError> {
        let email = normalize_email(email)?;
        let name = validate_name(name)?;

        let now = Timestamp::now();
        Ok(Self {
            id: UserId::new(),
            email,
            name,
            password_hash,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a user from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        email: String,
        name: String,
        password_hash: String,
        role: UserRole,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            role,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Change the e-mail address. Uniqueness is checked by the caller.
    pub fn change_email(&mut self, email: &str) -> Result<(), DomainError> {
        self.email = normalize_email(email)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = validate_name(name)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Replace the stored password hash.
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Timestamp::now();
    }

    pub fn promote_to(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Timestamp::now();
    }
}

/// Trims and lowercases an e-mail address, rejecting obviously bad shapes.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("email", "Email cannot be empty"));
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(DomainError::validation(
            "email",
            format!("Email must be {} characters or less", MAX_EMAIL_LENGTH),
        ));
    }

    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !trimmed.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("email", "Email address is not valid"));
    }

    Ok(trimmed.to_lowercase())
}

/// Checks plaintext password length before hashing.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(DomainError::validation(
            "password",
            format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name", "Name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(
            "name",
            format!("Name must be {} characters or less", MAX_NAME_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}
