use crate::domain::identity::Actor;
use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynJwtService, errors::HttpError};
use tracing::debug;

fn bearer_token(cookie_jar: &CookieJar, req: &Request<Body>) -> Option<String> {
    cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
}

/// Verifies the identity provider's token and attaches the caller as an
/// `Actor` extension.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = bearer_token(&cookie_jar, &req).ok_or_else(|| {
        HttpError::Unauthorized("You are not logged in, please provide token".to_string())
    })?;

    let claims = jwt.verify(&token).map_err(|e| {
        debug!("Rejected identity token: {e}");
        HttpError::Unauthorized("Invalid token".to_string())
    })?;

    let actor = Actor::from_claims(claims)
        .map_err(|e| HttpError::Unauthorized(format!("Invalid token: {e}")))?;

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}
