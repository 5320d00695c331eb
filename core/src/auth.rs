//! Authorization header selection.
//!
//! The backend accepts credentials from two identity systems: opaque Django
//! tokens (`Token <key>`) and Supabase-issued JWTs (`Bearer <jwt>`). Callers
//! either name the scheme or let it be inferred from the token's shape.
//! Inference looks only at shape: three non-empty dot-separated
//! segments means JWT, with no decoding of the segments.

use std::fmt;
use std::str::FromStr;

/// Which `Authorization` scheme to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Token <token>`
    Django,
    /// `Bearer <token>`
    Supabase,
}

impl AuthScheme {
    /// Infer the scheme from the token's shape.
    pub fn detect(token: &str) -> Self {
        let parts: Vec<&str> = token.trim().split('.').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
            AuthScheme::Supabase
        } else {
            AuthScheme::Django
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            AuthScheme::Django => "Token",
            AuthScheme::Supabase => "Bearer",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::Django => f.write_str("django"),
            AuthScheme::Supabase => f.write_str("supabase"),
        }
    }
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "django" => Ok(AuthScheme::Django),
            "supabase" => Ok(AuthScheme::Supabase),
            other => Err(format!("unknown auth scheme: {other}")),
        }
    }
}

/// Value for the `Authorization` header, or `None` when there is no usable
/// token. An explicit `hint` always wins over shape detection.
pub fn authorization_header(token: &str, hint: Option<AuthScheme>) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let scheme = hint.unwrap_or_else(|| AuthScheme::detect(token));
    Some(format!("{} {token}", scheme.prefix()))
}

/// A caller-owned credential passed with each authenticated call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub scheme: Option<AuthScheme>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scheme: None,
        }
    }

    pub fn with_scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("scheme", &self.scheme)
            .finish()
    }
}
