//! RefreshTokensHandler - Trades a refresh token for a new token pair.

use std::sync::Arc;

use super::{principal_of, AuthSession};
use crate::domain::foundation::{AuthError, TokenClass};
use crate::domain::user::UserError;
use crate::ports::{TokenIssuer, TokenPair, UserRepository};

#[derive(Debug, Clone)]
pub struct RefreshTokensCommand {
    pub refresh_token: String,
}

/// Handler for token refresh.
///
/// Only refresh-class tokens are accepted. Claims are re-read from the user
/// record, so a role change takes effect at the next refresh.
pub struct RefreshTokensHandler {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenIssuer>,
}

impl RefreshTokensHandler {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    pub async fn handle(&self, cmd: RefreshTokensCommand) -> Result<AuthSession, UserError> {
        let claimed = self.tokens.verify(&cmd.refresh_token, TokenClass::Refresh)?;

        let user = self
            .users
            .find_by_id(&claimed.id)
            .await?
            .ok_or(UserError::Unauthorized(AuthError::UserNotFound))?;

        let tokens = TokenPair::issue(self.tokens.as_ref(), &principal_of(&user))?;
        Ok(AuthSession { user, tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::application::handlers::test_support::{principal, seed_user, token_issuer};

    #[tokio::test]
    async fn refresh_token_yields_new_pair() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = token_issuer();
        let ada = seed_user(users.as_ref(), "ada@example.com").await;
        let refresh = tokens.issue(&principal(&ada), TokenClass::Refresh).unwrap();

        let session = RefreshTokensHandler::new(users, tokens.clone())
            .handle(RefreshTokensCommand {
                refresh_token: refresh.token,
            })
            .await
            .unwrap();

        assert_eq!(session.user.id(), ada.id());
        assert!(tokens
            .verify(&session.tokens.access.token, TokenClass::Access)
            .is_ok());
    }

    #[tokio::test]
    async fn access_token_is_rejected() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = token_issuer();
        let ada = seed_user(users.as_ref(), "ada@example.com").await;
        let access = tokens.issue(&principal(&ada), TokenClass::Access).unwrap();

        let err = RefreshTokensHandler::new(users, tokens)
            .handle(RefreshTokensCommand {
                refresh_token: access.token,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn deleted_user_cannot_refresh() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = token_issuer();
        let ada = seed_user(users.as_ref(), "ada@example.com").await;
        let refresh = tokens.issue(&principal(&ada), TokenClass::Refresh).unwrap();
        users.delete(ada.id()).await.unwrap();

        let err = RefreshTokensHandler::new(users, tokens)
            .handle(RefreshTokensCommand {
                refresh_token: refresh.token,
            })
            .await
            .unwrap_err();

        assert_eq!(err, UserError::Unauthorized(AuthError::UserNotFound));
    }
}
