//! Bearer-token extraction and HS256 JWT validation.
//!
//! Tokens are issued by the surrounding platform; this service only verifies
//! them against the shared secret and resolves the caller's user id from the
//! subject claim.

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const TOKEN_ISSUER: &str = "clipserve";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("invalid authorization header format")]
    MalformedHeader,
    #[error("token has expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token subject is not a valid user id")]
    BadSubject,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    exp: usize,
}

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// Validate an HS256 token against the shared secret and return the caller id.
///
/// Expiry and issuer are checked strictly (no leeway).
pub fn validate_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Invalid(err.to_string()),
    })?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::BadSubject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn make_token(sub: &str, secret: &str, expires_in: i64) -> String {
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + expires_in) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn extract_bearer_requires_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer(&headers),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn extract_bearer_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert!(matches!(
            extract_bearer(&headers),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn extract_bearer_returns_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn valid_token_resolves_user_id() {
        let user = Uuid::new_v4();
        let token = make_token(&user.to_string(), "sekrit", 3600);
        assert_eq!(validate_token(&token, "sekrit").unwrap(), user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = make_token(&Uuid::new_v4().to_string(), "sekrit", 3600);
        assert!(matches!(
            validate_token(&token, "other"),
            Err(AuthError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = make_token(&Uuid::new_v4().to_string(), "sekrit", -3600);
        assert!(matches!(
            validate_token(&token, "sekrit"),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let token = make_token("not-a-uuid", "sekrit", 3600);
        assert!(matches!(
            validate_token(&token, "sekrit"),
            Err(AuthError::BadSubject)
        ));
    }
}
