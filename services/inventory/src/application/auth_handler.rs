//! Login, token refresh and account bootstrap

use std::sync::Arc;

use almacen_auth_core::TokenService;
use almacen_common::UserId;
use almacen_errors::{AppError, AppResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{User, UserRole};
use crate::domain::password::HashedPassword;
use crate::domain::repositories::UserRepository;

use super::metrics;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshCommand {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

pub struct AuthHandler {
    user_repo: Arc<dyn UserRepository>,
    token_service: Arc<TokenService>,
}

impl AuthHandler {
    pub fn new(user_repo: Arc<dyn UserRepository>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    pub async fn login(&self, cmd: LoginCommand) -> AppResult<TokenPair> {
        let user = match self.user_repo.find_by_username(&cmd.username).await? {
            Some(user) if user.active => user,
            _ => {
                metrics::record_login_attempt(false);
                // Same message whether the account is missing or disabled.
                return Err(AppError::unauthenticated("invalid credentials"));
            }
        };

        let hashed = HashedPassword::from_hash(user.password_hash.clone());
        if !hashed.verify(&cmd.password)? {
            warn!(username = %cmd.username, "login failed");
            metrics::record_login_attempt(false);
            return Err(AppError::unauthenticated("invalid credentials"));
        }

        metrics::record_login_attempt(true);
        info!(user_id = %user.id, "login succeeded");
        self.issue_tokens(&user)
    }

    pub async fn refresh(&self, cmd: RefreshCommand) -> AppResult<TokenPair> {
        let claims = self.token_service.validate_refresh_token(&cmd.refresh_token)?;
        let user_id = claims.user_id()?;

        // Reload so revoked or demoted accounts lose access on refresh.
        let user = self
            .user_repo
            .find_by_id(user_id.0)
            .await?
            .filter(|u| u.active)
            .ok_or_else(|| AppError::unauthorized("account no longer active"))?;

        self.issue_tokens(&user)
    }

    pub async fn current_user(&self, user_id: UserId) -> AppResult<User> {
        self.user_repo
            .find_by_id(user_id.0)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }

    fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let user_id = UserId::from_uuid(user.id);
        let access_token = self.token_service.generate_access_token(
            &user_id,
            user.role.permissions(),
            vec![user.role.as_str().to_string()],
        )?;
        let refresh_token = self.token_service.generate_refresh_token(&user_id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.token_service.access_token_expires_in(),
        })
    }

    /// Create the initial admin account when the user table is empty
    pub async fn seed_admin(&self, username: &str, password: &str) -> AppResult<()> {
        if self.user_repo.count().await? > 0 {
            return Ok(());
        }

        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            password_hash: HashedPassword::from_plain(password)?.as_str().to_string(),
            display_name: Some("Administrator".to_string()),
            role: UserRole::Admin,
            active: true,
            created_at: Utc::now(),
        };
        self.user_repo.save(&user).await?;
        info!(username = %username, "seeded initial admin account");
        Ok(())
    }
}
