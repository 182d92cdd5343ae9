use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AuthUser, Claims};

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = validate_jwt(&token)?;

        if claims.is_expired() {
            return Err(AppError::new(ErrorCode::TokenExpired, "token has expired"));
        }

        Ok(AuthUser::from(claims))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::new(ErrorCode::Unauthorized, "missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::new(ErrorCode::Unauthorized, "invalid authorization header"))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::new(ErrorCode::Unauthorized, "authorization header must use Bearer scheme"));
    }

    Ok(auth_header[7..].to_string())
}

fn validate_jwt(token: &str) -> Result<Claims, AppError> {
    let jwt_secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "development-secret-change-in-production".to_string());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::new(ErrorCode::TokenExpired, "token has expired")
        }
        _ => AppError::new(ErrorCode::TokenInvalid, format!("invalid token: {e}")),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::auth::UserRole;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn encode_with_secret(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn validates_a_freshly_issued_token() {
        let user_id = Uuid::now_v7();
        let claims = Claims::new(user_id, UserRole::User, 3600);
        let token = encode_with_secret(&claims, "development-secret-change-in-production");

        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.role, UserRole::User);
        assert!(!decoded.is_expired());
    }

    #[test]
    fn rejects_a_token_signed_with_the_wrong_secret() {
        let claims = Claims::new(Uuid::now_v7(), UserRole::User, 3600);
        let token = encode_with_secret(&claims, "some-other-secret");

        let err = validate_jwt(&token).unwrap_err();
        match err {
            AppError::Known { code, .. } => assert_eq!(code, ErrorCode::TokenInvalid),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_bearer_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_err());

        let empty = HeaderMap::new();
        assert!(extract_bearer_token(&empty).is_err());
    }
}
