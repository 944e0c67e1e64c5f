use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::Role;
use crate::services::ServiceError;

/// JWT service for token issuance and verification.
///
/// Tokens are short-lived (60 minutes by default) and carry the account id
/// and role. There is no revocation list; a token stays valid until expiry
/// even if the account is deleted or its role changes.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_minutes: i64,
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    /// Account role at issuance time
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expiry_minutes: config.expiry_minutes,
        }
    }

    /// Issue a signed token asserting `{account id, role}`.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.expiry_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Failed to encode token: {}", e)))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| ServiceError::InvalidToken)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            expiry_minutes: 60,
        })
    }

    #[test]
    fn issued_token_verifies_with_same_claims() {
        let jwt = service();

        let token = jwt.issue("user_123", Role::Counselor).unwrap();
        let claims = jwt.verify(&token).unwrap();

        assert_eq!(claims.sub, "user_123");
        assert_eq!(claims.role, Role::Counselor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt = service();
        let other = JwtService::new(&JwtConfig {
            secret: "another-secret".to_string(),
            expiry_minutes: 60,
        });

        let token = other.issue("user_123", Role::User).unwrap();
        assert!(matches!(
            jwt.verify(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service();

        // Encode claims that expired two hours ago, well past the default
        // 60s validation leeway.
        let now = Utc::now();
        let claims = Claims {
            sub: "user_123".to_string(),
            role: Role::User,
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            jwt.verify(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let jwt = service();
        assert!(matches!(
            jwt.verify("not-a-jwt"),
            Err(ServiceError::InvalidToken)
        ));
    }
}
