use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde::Serialize;

use crate::error::ServiceError;
use crate::services::db_utils::AppState;
use crate::services::redis_handling::session_login;

pub const ANONYMOUS: &str = "anonymous";
pub const CART_ID_HEADER: &str = "X-Cart-Id";

/// Whoever sent the request. Extracting it from a handler's arguments makes
/// the route require a live session, unless auth is switched off in settings.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub login: String,
    #[serde(skip)]
    pub token: Option<String>,
}

pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
}

impl FromRequest for Principal {
    type Error = ServiceError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| ServiceError::Internal("Application state missing".into()))?;

            if !state.settings.require_auth {
                return Ok(Principal { login: ANONYMOUS.into(), token });
            }

            let token = token.ok_or(ServiceError::Unauthorized)?;
            match session_login(&state.redis_db, &token).await? {
                Some(login) => Ok(Principal { login, token: Some(token) }),
                None => Err(ServiceError::Unauthorized),
            }
        })
    }
}

/// Whose cart a request works on: the bearer session when one is sent,
/// otherwise the browser-chosen `X-Cart-Id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOwner(pub String);

fn cart_id(req: &HttpRequest) -> Option<String> {
    let id = req.headers().get(CART_ID_HEADER)?.to_str().ok()?.trim();
    let well_formed = !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    well_formed.then(|| id.to_owned())
}

impl FromRequest for CartOwner {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let owner = match (bearer_token(req), cart_id(req)) {
            (Some(token), _) => Ok(CartOwner(format!("session-{token}"))),
            (None, Some(id)) => Ok(CartOwner(format!("tab-{id}"))),
            (None, None) => Err(ServiceError::Validation(format!(
                "Send a session token or an {CART_ID_HEADER} header (letters, digits, '-' or '_') to use the cart"
            ))),
        };

        ready(owner)
    }
}
