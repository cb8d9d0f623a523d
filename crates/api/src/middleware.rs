use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use brigada_auth::{validate_claims, JwtClaims, Role};
use brigada_core::{Company, UserId};

use crate::authz;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub decoding_key: Arc<DecodingKey>,
}

impl AuthState {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
        }
    }
}

/// The claims as carried on the wire (standard numeric `iat`/`exp`).
#[derive(Debug, Serialize, Deserialize)]
pub struct WireClaims {
    pub sub: Uuid,
    pub company: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = decode_claims(token, &state.decoding_key)?;
    validate_claims(&claims, Utc::now()).map_err(|_e| StatusCode::UNAUTHORIZED)?;

    let principal = authz::principal_from_claims(&claims);
    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

fn decode_claims(token: &str, key: &DecodingKey) -> Result<JwtClaims, StatusCode> {
    let validation = Validation::new(Algorithm::HS256);
    let wire = jsonwebtoken::decode::<WireClaims>(token, key, &validation)
        .map_err(|_e| StatusCode::UNAUTHORIZED)?
        .claims;

    let company = wire
        .company
        .parse::<Company>()
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;
    let issued_at = timestamp(wire.iat)?;
    let expires_at = timestamp(wire.exp)?;

    Ok(JwtClaims {
        sub: UserId::from_uuid(wire.sub),
        company,
        roles: wire.roles.into_iter().map(Role::new).collect(),
        issued_at,
        expires_at,
    })
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, StatusCode> {
    DateTime::from_timestamp(secs, 0).ok_or(StatusCode::UNAUTHORIZED)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
