//! Credential issuing and the authenticated-user extractor.
//!
//! Two credential families are issued at login, mirroring a backend that
//! trusts both its own token table and an external identity provider:
//! an opaque hex key accepted only as `Token <key>`, and a three-segment
//! JWT-shaped string accepted only as `Bearer <jwt>`.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{ApiFailure, Db, Store};

const JWT_HEADER: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

/// Issue both credentials for `user_id` and remember them.
pub fn issue_tokens(store: &mut Store, user_id: Uuid) -> (String, String) {
    let token = Uuid::new_v4().simple().to_string();
    let access_token = format!(
        "{JWT_HEADER}.{}.{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );
    store.tokens.insert(token.clone(), user_id);
    store.access_tokens.insert(access_token.clone(), user_id);
    (token, access_token)
}

/// Forget every credential issued to `user_id`.
pub fn revoke_tokens(store: &mut Store, user_id: Uuid) {
    store.tokens.retain(|_, owner| *owner != user_id);
    store.access_tokens.retain(|_, owner| *owner != user_id);
}

/// The caller, resolved from the `Authorization` header.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub Uuid);

impl FromRequestParts<Db> for CurrentUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        match resolve(parts, db).await? {
            Some(user) => Ok(user),
            None => Err(ApiFailure::detail(
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided.",
            )),
        }
    }
}

impl OptionalFromRequestParts<Db> for CurrentUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Option<Self>, Self::Rejection> {
        resolve(parts, db).await
    }
}

/// `Ok(None)` when no header is present; a present but bad header is a 401.
async fn resolve(parts: &Parts, db: &Db) -> Result<Option<CurrentUser>, ApiFailure> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let invalid = || ApiFailure::detail(StatusCode::UNAUTHORIZED, "Invalid token.");
    let value = value.to_str().map_err(|_| invalid())?;
    let (scheme, credential) = value.split_once(' ').ok_or_else(invalid)?;

    let store = db.read().await;
    let user_id = match scheme {
        "Token" => store.tokens.get(credential),
        "Bearer" => store.access_tokens.get(credential),
        _ => None,
    };
    user_id.map(|id| Some(CurrentUser(*id))).ok_or_else(invalid)
}
