//! JWT access tokens and author grants.
//!
//! Both are HS256-signed with the same secret. Access tokens carry
//! [`Claims`] for a signed-in account; author grants carry
//! [`GrantClaims`] scoped to a single inquiry and are never persisted.
//! The two claim shapes do not deserialize into each other, so one
//! cannot stand in for the other.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wonders_core::types::{DbId, InquiryId};

/// Value of [`GrantClaims::scope`].
pub const AUTHOR_GRANT_SCOPE: &str = "inquiry-author";

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the account's internal database id.
    pub sub: DbId,
    /// The account's role name (e.g. `"admin"`, `"member"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Claims of an author grant: proof that the bearer passed author
/// verification for inquiry `sub`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GrantClaims {
    pub sub: InquiryId,
    /// Always [`AUTHOR_GRANT_SCOPE`].
    pub scope: String,
    pub exp: i64,
    pub iat: i64,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
    /// Author grant lifetime in minutes (default: 30).
    pub author_grant_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;
/// Default author grant expiry in minutes.
const DEFAULT_GRANT_EXPIRY_MINS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `JWT_SECRET`                | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`    | no       | `60`    |
    /// | `AUTHOR_GRANT_EXPIRY_MINS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let author_grant_expiry_mins: i64 = std::env::var("AUTHOR_GRANT_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_GRANT_EXPIRY_MINS.to_string())
            .parse()
            .expect("AUTHOR_GRANT_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            author_grant_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for the given account.
pub fn generate_access_token(
    account_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: account_id,
        role: role.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Issue an author grant for `inquiry_id`.
pub fn generate_author_grant(
    inquiry_id: InquiryId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = GrantClaims {
        sub: inquiry_id,
        scope: AUTHOR_GRANT_SCOPE.to_string(),
        exp: now + config.author_grant_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate an author grant and return the inquiry it covers.
pub fn validate_author_grant(
    token: &str,
    config: &JwtConfig,
) -> Result<InquiryId, jsonwebtoken::errors::Error> {
    let claims = decode::<GrantClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;

    if claims.scope != AUTHOR_GRANT_SCOPE {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
            author_grant_expiry_mins: 30,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token =
            generate_access_token(42, "admin", &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "member".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };

        let token =
            generate_access_token(1, "member", &config_a).expect("token generation should succeed");
        assert!(validate_token(&token, &config_b).is_err());
    }

    #[test]
    fn test_author_grant_round_trip() {
        let config = test_config();
        let id = InquiryId::now_v7();
        let grant = generate_author_grant(id, &config).expect("grant generation should succeed");
        assert_eq!(validate_author_grant(&grant, &config).unwrap(), id);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let config = test_config();
        let access = generate_access_token(7, "admin", &config).unwrap();
        assert!(validate_author_grant(&access, &config).is_err());

        let grant = generate_author_grant(InquiryId::now_v7(), &config).unwrap();
        assert!(validate_token(&grant, &config).is_err());
    }

    #[test]
    fn test_grant_with_foreign_scope_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = GrantClaims {
            sub: InquiryId::now_v7(),
            scope: "something-else".into(),
            exp: now + 600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(validate_author_grant(&token, &config).is_err());
    }
}
