//! OAuth2 redirect handling
//!
//! After the provider round-trip the backend redirects to the client with
//! the token in the query or the fragment, under one of several key
//! aliases depending on backend configuration. The user payload is either
//! inlined as URL-encoded JSON or fetched from the profile endpoint with
//! the fresh token. Any failure cleans up partially written session data;
//! the caller navigates back to the dashboard either way.

use super::user_from_profile;
use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::session::{SessionStore, SessionUser};
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

/// Path aliases that all converge on this handler.
pub const REDIRECT_PATHS: &[&str] = &[
    "/oauth2/redirect",
    "/oauth2/success",
    "/auth/oauth2/success",
    "/login/oauth2/redirect",
];

const TOKEN_KEYS: &[&str] = &["token", "access_token", "accessToken", "jwt"];
const USER_KEYS: &[&str] = &["user", "userInfo", "profile"];

pub fn is_redirect_path(path: &str) -> bool {
    REDIRECT_PATHS.contains(&path.trim_end_matches('/'))
}

/// Process a redirect URL and establish the session.
pub async fn handle_redirect(
    raw_url: &str,
    api: &ApiClient,
    session: &SessionStore,
) -> Result<SessionUser> {
    let url = Url::parse(raw_url)
        .map_err(|err| AppError::Auth(format!("invalid redirect URL: {err}")))?;

    // Providers deliver params either as ?a=b or as #a=b.
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if let Some(fragment) = url.fragment() {
        params.extend(
            url::form_urlencoded::parse(fragment.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }

    let lookup = |keys: &[&str]| {
        keys.iter().find_map(|key| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    };

    let Some(token) = lookup(TOKEN_KEYS).filter(|token| !token.is_empty()) else {
        warn!("oauth redirect carried no token");
        return Err(AppError::Auth("missing token in OAuth2 redirect".into()));
    };

    if let Some(raw_user) = lookup(USER_KEYS) {
        match parse_inline_user(&raw_user, &token) {
            Ok(user) => {
                info!(username = %user.username, "oauth login with inline profile");
                session.login(user.clone());
                return Ok(user);
            }
            Err(err) => {
                warn!("failed to decode inline oauth user: {}", err);
                session.logout();
                return Err(err);
            }
        }
    }

    // Token only: persist it, then ask the profile endpoint who we are.
    session.set_token(&token);
    match api.current_user().await {
        Ok(profile) => {
            let user = user_from_profile(profile, token);
            info!(username = %user.username, "oauth login via profile fetch");
            session.login(user.clone());
            Ok(user)
        }
        Err(err) => {
            warn!("oauth profile fetch failed: {}", err);
            session.logout();
            Err(err)
        }
    }
}

/// Inline payloads are URL-encoded JSON with provider-dependent field
/// names; ids may even arrive as numbers.
fn parse_inline_user(raw: &str, token: &str) -> Result<SessionUser> {
    let decoded = urlencoding::decode(raw)
        .map_err(|err| AppError::Auth(format!("undecodable user payload: {err}")))?;
    let value: Value = serde_json::from_str(&decoded)?;

    let field = |keys: &[&str]| {
        keys.iter().find_map(|key| match value.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    };

    let id = field(&["id", "sub"])
        .ok_or_else(|| AppError::Auth("user payload has no id".into()))?;
    let email = field(&["email"]);
    let username = field(&["username"])
        .or_else(|| {
            email
                .as_deref()
                .and_then(|email| email.split('@').next())
                .map(String::from)
        })
        .unwrap_or_else(|| "user".to_string());

    Ok(SessionUser {
        id,
        username,
        role: field(&["role"]).unwrap_or_else(|| super::DEFAULT_ROLE.to_string()),
        email,
        avatar: field(&["avatarUrl", "picture"]),
        token: Some(token.to_string()),
    })
}
