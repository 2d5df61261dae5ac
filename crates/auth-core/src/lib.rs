//! almacen-auth-core - authentication core
//!
//! JWT claims, token issuing/validation and RBAC checks.

use almacen_common::UserId;
use almacen_errors::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Audience
    #[serde(default)]
    pub aud: String,
    /// Token type (access or refresh)
    #[serde(default)]
    pub token_type: String,
    /// Permissions
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Roles
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    pub fn new(
        user_id: &UserId,
        permissions: Vec<String>,
        roles: Vec<String>,
        expires_in_secs: i64,
        token_type: &str,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.0.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            token_type: token_type.to_string(),
            permissions,
            roles,
        }
    }

    pub fn user_id(&self) -> AppResult<UserId> {
        Uuid::parse_str(&self.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(&permission.to_string())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(&role.to_string())
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == "access"
    }

    pub fn is_refresh_token(&self) -> bool {
        self.token_type == "refresh"
    }
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    refresh_token_expires_in: i64,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(
        secret: &str,
        access_token_expires_in: i64,
        refresh_token_expires_in: i64,
        issuer: String,
        audience: String,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            refresh_token_expires_in,
            issuer,
            audience,
        }
    }

    /// Generate an access token
    pub fn generate_access_token(
        &self,
        user_id: &UserId,
        permissions: Vec<String>,
        roles: Vec<String>,
    ) -> AppResult<String> {
        let claims = Claims::new(
            user_id,
            permissions,
            roles,
            self.access_token_expires_in,
            "access",
            &self.issuer,
            &self.audience,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Generate a refresh token
    pub fn generate_refresh_token(&self, user_id: &UserId) -> AppResult<String> {
        let claims = Claims::new(
            user_id,
            vec![],
            vec![],
            self.refresh_token_expires_in,
            "refresh",
            &self.issuer,
            &self.audience,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate refresh token: {}", e)))
    }

    /// Validate a token
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        if claims.token_type.is_empty() {
            return Err(AppError::unauthorized("Token type not specified"));
        }

        if claims.jti.is_empty() {
            return Err(AppError::unauthorized("Token ID (jti) missing"));
        }

        Ok(claims)
    }

    /// Validate an access token (rejects refresh tokens)
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_access_token() {
            return Err(AppError::unauthorized("Not an access token"));
        }

        Ok(claims)
    }

    /// Validate a refresh token (rejects access tokens)
    pub fn validate_refresh_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_refresh_token() {
            return Err(AppError::unauthorized("Not a refresh token"));
        }

        Ok(claims)
    }

    /// Access token lifetime in seconds
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}

/// Reject unless the claims carry `permission`
pub fn require_permission(claims: &Claims, permission: &str) -> AppResult<()> {
    if !claims.has_permission(permission) {
        return Err(AppError::forbidden(format!(
            "Missing permission: {}",
            permission
        )));
    }
    Ok(())
}

/// Reject unless the claims carry `role`
pub fn require_role(claims: &Claims, role: &str) -> AppResult<()> {
    if !claims.has_role(role) {
        return Err(AppError::forbidden(format!("Missing role: {}", role)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            "test_secret",
            3600,
            604800,
            "almacen-iam".to_string(),
            "almacen-api".to_string(),
        )
    }

    #[test]
    fn test_access_token_round_trip() {
        let svc = service();
        let user_id = UserId::new();
        let token = svc
            .generate_access_token(
                &user_id,
                vec!["inventory:write".to_string()],
                vec!["operator".to_string()],
            )
            .unwrap();

        let claims = svc.validate_access_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.has_permission("inventory:write"));
        assert!(claims.has_role("operator"));
        assert!(require_permission(&claims, "inventory:write").is_ok());
        assert!(require_permission(&claims, "audit:read").is_err());
        assert!(require_role(&claims, "admin").is_err());
    }

    #[test]
    fn test_refresh_token_is_not_access_token() {
        let svc = service();
        let user_id = UserId::new();
        let token = svc.generate_refresh_token(&user_id).unwrap();

        assert!(svc.validate_refresh_token(&token).is_ok());
        assert!(svc.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let svc = service();
        let other = TokenService::new(
            "other_secret",
            3600,
            604800,
            "almacen-iam".to_string(),
            "almacen-api".to_string(),
        );
        let token = other
            .generate_access_token(&UserId::new(), vec![], vec![])
            .unwrap();

        assert!(svc.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let svc = TokenService::new(
            "test_secret",
            -60,
            -60,
            "almacen-iam".to_string(),
            "almacen-api".to_string(),
        );
        let token = svc
            .generate_access_token(&UserId::new(), vec![], vec![])
            .unwrap();

        assert!(svc.validate_token(&token).is_err());
    }
}
