//! Session validation port for access token validation.
//!
//! Provider-agnostic contract for turning a bearer token into an
//! authenticated user. The production implementation validates Supabase
//! HS256 access tokens; tests use a mock.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature
/// - Validate audience and expiry claims
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` when misconfigured
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate an access token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;
    use std::sync::RwLock;
    use uuid::Uuid;

    struct TestSessionValidator {
        tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    }

    #[async_trait]
    impl SessionValidator for TestSessionValidator {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn session_validator_works_as_trait_object() {
        let user = AuthenticatedUser::new(UserId::from_uuid(Uuid::new_v4()), None);
        let validator: Box<dyn SessionValidator> = Box::new(TestSessionValidator {
            tokens: RwLock::new(HashMap::from([("good".to_string(), user.clone())])),
        });

        assert_eq!(validator.validate("good").await, Ok(user));
        assert_eq!(validator.validate("bad").await, Err(AuthError::InvalidToken));
    }
}
