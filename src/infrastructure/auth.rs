//! Bearer-token authentication.
//!
//! Decoding is pure: a [`TokenVerifier`] turns an `Authorization` header value
//! into a [`Principal`] without touching storage.

use std::collections::BTreeSet;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

const DEFAULT_ROLE: &str = "user";
const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionLevel {
    #[default]
    Free,
    Premium,
    Club,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Access,
    Refresh,
}

/// Claims as they appear in the token. Everything except `sub` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_level: Option<SubscriptionLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ghost_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

/// The authenticated caller of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub subscription_level: SubscriptionLevel,
    pub ghost_mode: bool,
    /// Never empty.
    pub roles: BTreeSet<String>,
    pub org_id: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
    pub token_type: TokenType,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Premium and club tiers both unlock premium features.
    pub fn is_premium(&self) -> bool {
        matches!(
            self.subscription_level,
            SubscriptionLevel::Premium | SubscriptionLevel::Club
        )
    }

    /// Fails with `Unauthorized` unless the principal holds the admin role.
    pub fn require_admin(self) -> Result<Self, AppError> {
        if self.is_admin() {
            Ok(self)
        } else {
            tracing::warn!(user_id = %self.user_id, "admin_required");
            Err(AppError::unauthorized("Admin access required"))
        }
    }
}

impl TryFrom<Claims> for Principal {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| invalid_token())?;

        let mut roles: BTreeSet<String> = claims.roles.unwrap_or_default().into_iter().collect();
        if roles.is_empty() {
            roles.insert(DEFAULT_ROLE.to_string());
        }

        Ok(Principal {
            user_id,
            email: claims.email,
            subscription_level: claims.subscription_level.unwrap_or_default(),
            ghost_mode: claims.ghost_mode.unwrap_or(false),
            roles,
            org_id: claims.org_id,
            exp: claims.exp,
            iat: claims.iat,
            token_type: claims.token_type.unwrap_or_default(),
        })
    }
}

fn invalid_token() -> AppError {
    AppError::unauthorized("Invalid or expired token")
}

/// Validates bearer credentials with the configured secret and algorithm.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // `exp` is optional, but checked whenever the token carries one.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode a bare token.
    pub fn decode(&self, token: &str) -> Result<Principal, AppError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            tracing::warn!(error = %err, "jwt_decode_failed");
            invalid_token()
        })?;
        Principal::try_from(data.claims)
    }

    /// Authenticate an `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Principal, AppError> {
        let header = header.ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;
        let token = bearer_token(header)
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;
        self.decode(token)
    }

    /// Like [`authenticate`](Self::authenticate), but any failure is `None`.
    pub fn authenticate_optional(&self, header: Option<&str>) -> Option<Principal> {
        header.and_then(|value| self.authenticate(Some(value)).ok())
    }
}

/// Exactly two whitespace-separated parts, the first `bearer` in any case.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Signs tokens with the same secret and algorithm a verifier accepts.
/// Used by tooling and tests; the service itself never issues tokens.
pub struct TokenIssuer {
    key: EncodingKey,
    algorithm: Algorithm,
}

impl TokenIssuer {
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            algorithm,
        }
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(self.algorithm), claims, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    const SECRET: &str = "test-secret";

    #[fixture]
    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET, Algorithm::HS256)
    }

    fn token(claims: &Claims) -> String {
        TokenIssuer::new(SECRET, Algorithm::HS256)
            .issue(claims)
            .expect("token")
    }

    fn claims_for(user_id: Uuid) -> Claims {
        Claims {
            sub: user_id.to_string(),
            exp: Some(Utc::now().timestamp() + 3600),
            ..Claims::default()
        }
    }

    #[rstest]
    fn defaults_fill_missing_claims(verifier: TokenVerifier) {
        let user_id = Uuid::new_v4();
        let header = format!("Bearer {}", token(&claims_for(user_id)));

        let principal = verifier.authenticate(Some(&header)).expect("principal");
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.subscription_level, SubscriptionLevel::Free);
        assert!(!principal.ghost_mode);
        assert_eq!(principal.roles, BTreeSet::from(["user".to_string()]));
        assert_eq!(principal.token_type, TokenType::Access);
        assert!(!principal.is_premium());
    }

    #[rstest]
    fn explicit_empty_roles_fall_back_to_user(verifier: TokenVerifier) {
        let claims = Claims {
            roles: Some(vec![]),
            ..claims_for(Uuid::new_v4())
        };
        let principal = verifier.decode(&token(&claims)).expect("principal");
        assert!(principal.has_role("user"));
    }

    #[rstest]
    #[case(SubscriptionLevel::Premium, true)]
    #[case(SubscriptionLevel::Club, true)]
    #[case(SubscriptionLevel::Free, false)]
    fn premium_tiers(
        verifier: TokenVerifier,
        #[case] level: SubscriptionLevel,
        #[case] premium: bool,
    ) {
        let claims = Claims {
            subscription_level: Some(level),
            ..claims_for(Uuid::new_v4())
        };
        let principal = verifier.decode(&token(&claims)).expect("principal");
        assert_eq!(principal.is_premium(), premium);
    }

    #[rstest]
    #[case("bearer", true)]
    #[case("BEARER", true)]
    #[case("Token", false)]
    fn scheme_is_case_insensitive(
        verifier: TokenVerifier,
        #[case] scheme: &str,
        #[case] accepted: bool,
    ) {
        let header = format!("{scheme} {}", token(&claims_for(Uuid::new_v4())));
        assert_eq!(verifier.authenticate(Some(&header)).is_ok(), accepted);
    }

    #[rstest]
    #[case(None, "Missing authorization header")]
    #[case(Some("Bearer"), "Invalid authorization header format")]
    #[case(Some("Bearer a b"), "Invalid authorization header format")]
    #[case(Some("Bearer not-a-jwt"), "Invalid or expired token")]
    fn malformed_headers_are_unauthorized(
        verifier: TokenVerifier,
        #[case] header: Option<&str>,
        #[case] message: &str,
    ) {
        let err = verifier.authenticate(header).expect_err("rejected");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    fn expired_tokens_are_rejected(verifier: TokenVerifier) {
        let claims = Claims {
            exp: Some(Utc::now().timestamp() - 60),
            ..claims_for(Uuid::new_v4())
        };
        let err = verifier.decode(&token(&claims)).expect_err("expired");
        assert_eq!(err.message(), "Invalid or expired token");
    }

    #[rstest]
    fn tokens_without_expiry_are_accepted(verifier: TokenVerifier) {
        let claims = Claims {
            exp: None,
            ..claims_for(Uuid::new_v4())
        };
        assert!(verifier.decode(&token(&claims)).is_ok());
    }

    #[rstest]
    fn wrong_secret_is_rejected(verifier: TokenVerifier) {
        let forged = TokenIssuer::new("other-secret", Algorithm::HS256)
            .issue(&claims_for(Uuid::new_v4()))
            .expect("token");
        assert!(verifier.decode(&forged).is_err());
    }

    #[rstest]
    fn non_uuid_subject_is_unauthorized(verifier: TokenVerifier) {
        let claims = Claims {
            sub: "user-42".to_string(),
            ..claims_for(Uuid::new_v4())
        };
        let err = verifier.decode(&token(&claims)).expect_err("bad sub");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[rstest]
    fn optional_authentication_swallows_failures(verifier: TokenVerifier) {
        assert!(verifier.authenticate_optional(None).is_none());
        assert!(verifier.authenticate_optional(Some("Basic abc")).is_none());
        let header = format!("Bearer {}", token(&claims_for(Uuid::new_v4())));
        assert!(verifier.authenticate_optional(Some(&header)).is_some());
    }

    #[rstest]
    fn admin_requirement(verifier: TokenVerifier) {
        let user = verifier.decode(&token(&claims_for(Uuid::new_v4()))).expect("user");
        let err = user.require_admin().expect_err("not admin");
        assert_eq!(err.status().as_u16(), 401);
        assert_eq!(err.message(), "Admin access required");

        let claims = Claims {
            roles: Some(vec!["user".into(), "admin".into()]),
            ..claims_for(Uuid::new_v4())
        };
        let admin = verifier.decode(&token(&claims)).expect("admin");
        assert!(admin.require_admin().is_ok());
    }
}
