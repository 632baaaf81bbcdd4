use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::identity::{CallerIdentity, Role};

/// JWT Claims structure
///
/// The identity provider puts the account email in `sub` and grants either a
/// single `role` or a `roles` list.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (caller email)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl Claims {
    /// Build the caller identity; unknown role strings are dropped.
    pub fn into_identity(self) -> CallerIdentity {
        let mut roles: Vec<Role> = Vec::new();
        for raw in self.role.iter().chain(self.roles.iter()) {
            if let Ok(role) = raw.parse::<Role>() {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
        }
        CallerIdentity::new(self.sub, roles)
    }
}

/// Verifies bearer tokens signed with the shared HS256 secret.
pub struct JwtAuthService {
    jwt_secret: String,
}

impl JwtAuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Issue a token for `email` with `roles`.
    ///
    /// Login belongs to the identity provider; this exists for local tooling
    /// and tests that need a token the gateway accepts.
    pub fn issue_token(&self, email: &str, roles: &[Role], ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .context("Token expiry overflows")?
            .timestamp();

        let claims = Claims {
            sub: email.to_string(),
            exp: expiration as usize,
            iat: now.timestamp() as usize,
            role: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .context("Failed to generate token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtAuthService {
        JwtAuthService::new("test-secret".to_string())
    }

    #[test]
    fn test_issue_then_verify() {
        let svc = service();
        let token = svc
            .issue_token("a@x.com", &[Role::User], Duration::hours(1))
            .unwrap();
        let identity = svc.verify_token(&token).unwrap().into_identity();
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.roles, vec![Role::User]);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .issue_token("a@x.com", &[Role::User], Duration::hours(1))
            .unwrap();
        let other = JwtAuthService::new("another-secret".to_string());
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = service()
            .issue_token("a@x.com", &[Role::User], Duration::hours(-2))
            .unwrap();
        assert!(service().verify_token(&token).is_err());
    }

    #[test]
    fn test_single_role_claim_with_prefix() {
        let claims = Claims {
            sub: "v@x.com".to_string(),
            exp: 0,
            iat: 0,
            role: Some("ROLE_VENDOR".to_string()),
            roles: vec!["vendor".to_string(), "GHOST".to_string()],
        };
        let identity = claims.into_identity();
        assert_eq!(identity.roles, vec![Role::Vendor]);
    }
}
