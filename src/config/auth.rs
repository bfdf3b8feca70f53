//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (Supabase-issued access tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Project JWT secret used to sign access tokens (HS256)
    pub jwt_secret: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Allowed clock skew when checking `exp`, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 characters; Supabase
    /// generates 40+ character secrets.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_JWT_SECRET"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_AUDIENCE"));
        }
        if *environment == Environment::Production && self.jwt_secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            audience: default_audience(),
            leeway_secs: default_leeway(),
        }
    }
}

fn default_audience() -> String {
    "authenticated".to_string()
}

fn default_leeway() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_supabase() {
        let config = AuthConfig::default();
        assert_eq!(config.audience, "authenticated");
        assert_eq!(config.leeway_secs, 30);
    }

    #[test]
    fn missing_secret_is_rejected() {
        assert_eq!(
            AuthConfig::default().validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH_JWT_SECRET"))
        );
    }

    #[test]
    fn short_secret_only_rejected_in_production() {
        let config = AuthConfig {
            jwt_secret: "short-dev-secret".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort)
        );
    }

    #[test]
    fn long_secret_passes_in_production() {
        let config = AuthConfig {
            jwt_secret: "x".repeat(40),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }
}
