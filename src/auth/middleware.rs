use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;
use tracing::debug;

use crate::{
    app_state::AppState,
    auth::{jwt::JwtService, session::Session},
};

/// Session resolved from `Authorization: Bearer <token>`.
///
/// Never rejects the request: a missing or unverifiable token yields `None`,
/// and the operations that need a session report `Unauthenticated` themselves.
#[derive(Debug, Clone)]
pub struct BearerSession(pub Option<Session>);

impl FromRequestParts<AppState> for BearerSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_session(&parts.headers, &state.jwt)))
    }
}

fn resolve_session(headers: &HeaderMap, jwt: &JwtService) -> Option<Session> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }

    match jwt.verify_token(token) {
        Ok(claims) => Some(Session::new(token).with_user(claims.sub)),
        Err(e) => {
            debug!("Rejected bearer token: {}", e);
            None
        }
    }
}
