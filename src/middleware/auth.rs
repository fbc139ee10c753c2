use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, state::AppState};

/// Authenticated caller: the user plus the server-side session holding their cart.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
    pub session_id: String,
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, "admin")
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_str = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        let claims = decode_claims(token, &state.config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

        // Logging out ends the session, which also retires its token.
        if !state.sessions.is_open(&claims.sid).await {
            tracing::debug!(user_id = %user_id, "session closed or expired");
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            user_id,
            role: claims.role,
            session_id: claims.sid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn user(role: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role: role.to_string(),
            session_id: "sid".to_string(),
        }
    }

    #[test]
    fn admin_guard_rejects_customers() {
        assert!(ensure_admin(&user("admin")).is_ok());
        assert!(matches!(
            ensure_admin(&user("customer")),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "customer".into(),
            sid: "abc".into(),
            exp: (chrono::Utc::now().timestamp() + 600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"right"),
        )
        .unwrap();

        assert_eq!(decode_claims(&token, "right").unwrap().sid, "abc");
        assert!(matches!(
            decode_claims(&token, "wrong"),
            Err(AppError::Unauthorized)
        ));
    }
}
