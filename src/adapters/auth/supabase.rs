//! Supabase access token adapter.
//!
//! Implements the `SessionValidator` port for Supabase-issued access tokens.
//! Supabase signs tokens with the project's JWT secret (HS256), so validation
//! is local:
//!
//! 1. Validate the signature against the shared secret
//! 2. Validate audience and expiry claims
//! 3. Map `sub` and `email` to the domain `AuthenticatedUser`
//!
//! # Example
//!
//! ```ignore
//! use cardwise::adapters::auth::SupabaseSessionValidator;
//! use cardwise::ports::SessionValidator;
//!
//! let validator = SupabaseSessionValidator::from_config(&config.auth);
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// JWT claims carried by Supabase access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct SupabaseClaims {
    /// Subject - the `auth.users` id
    sub: String,

    /// Expiry timestamp (Unix epoch seconds)
    exp: i64,

    #[serde(default)]
    email: Option<String>,

    /// Supabase role, e.g. "authenticated"
    #[serde(default)]
    role: Option<String>,
}

/// Validates Supabase HS256 access tokens.
pub struct SupabaseSessionValidator {
    secret: SecretString,
    audience: String,
    leeway_secs: u64,
}

impl SupabaseSessionValidator {
    pub fn new(secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            audience: audience.into(),
            leeway_secs: 30,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.audience.clone()).with_leeway(config.leeway_secs)
    }

    /// Allowed clock skew for `exp`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        validation
    }
}

#[async_trait]
impl SessionValidator for SupabaseSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return Err(AuthError::service_unavailable("JWT secret is not configured"));
        }

        let key = DecodingKey::from_secret(secret.as_bytes());
        let token_data = decode::<SupabaseClaims>(token, &key, &self.validation()).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;
        let claims = token_data.claims;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!(sub = %claims.sub, "Invalid user ID in token");
            AuthError::InvalidToken
        })?;

        tracing::trace!(user_id = %user_id, role = ?claims.role, "Token validated");
        Ok(AuthenticatedUser::new(user_id, claims.email))
    }
}

impl std::fmt::Debug for SupabaseSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseSessionValidator")
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}
