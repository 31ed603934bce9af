//! Access token issuing and verification.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use letcook_common::{AppError, AppResult, Config};
use letcook_db::entities::user;
use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Role name at issue time.
    pub role: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies HS256 access tokens with the shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from the auth configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::from_secret(
            config.auth.jwt_secret.as_bytes(),
            i64::try_from(config.auth.token_ttl_secs).unwrap_or(i64::MAX),
        )
    }

    /// Create a token service from a raw secret.
    #[must_use]
    pub fn from_secret(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Issue a token for `user`.
    pub fn issue(&self, user: &user::Model) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role.as_str().to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::Unauthorized,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use letcook_db::entities::user::UserRole;

    fn test_user(role: UserRole) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            username: "alice".to_string(),
            email: None,
            bio: None,
            phone: None,
            address: None,
            avatar: None,
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let service = TokenService::from_secret(b"secret", 3600);
        let token = service.issue(&test_user(UserRole::Admin)).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::from_secret(b"secret", -120);
        let token = service.issue(&test_user(UserRole::User)).unwrap();

        assert!(matches!(service.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let issuer = TokenService::from_secret(b"secret", 3600);
        let verifier = TokenService::from_secret(b"other", 3600);
        let token = issuer.issue(&test_user(UserRole::User)).unwrap();

        assert!(matches!(verifier.verify(&token), Err(AppError::Unauthorized)));
        assert!(matches!(verifier.verify("garbage"), Err(AppError::Unauthorized)));
    }
}
