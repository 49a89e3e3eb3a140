//! Profile and credential login service

use crate::api::types::{ProfileUpdate, UserProfile};
use crate::api::ApiClient;
use crate::auth::user_from_profile;
use crate::error::{AppError, Result};
use crate::session::{SessionStore, SessionUser};
use tracing::info;

pub struct ProfileService;

impl ProfileService {
    /// Username/password login. Empty credentials are rejected before any
    /// request goes out. On success the session store is populated and the
    /// token persisted.
    pub async fn login(
        api: &ApiClient,
        session: &SessionStore,
        username: &str,
        password: &str,
    ) -> Result<SessionUser> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "username and password are required".into(),
            ));
        }

        let auth = api.login(username, password).await?;

        let profile = match auth.user {
            Some(profile) => profile,
            None => {
                // Token-only response: persist the token, then ask who we are.
                session.set_token(&auth.token);
                match api.current_user().await {
                    Ok(profile) => profile,
                    Err(err) => {
                        session.logout();
                        return Err(err);
                    }
                }
            }
        };

        let user = user_from_profile(profile, auth.token);
        info!(username = %user.username, "logged in");
        session.login(user.clone());
        Ok(user)
    }

    pub async fn me(api: &ApiClient) -> Result<UserProfile> {
        api.current_user().await
    }

    /// Apply a profile edit and merge the server's answer into the session,
    /// keeping the existing token.
    pub async fn update(
        api: &ApiClient,
        session: &SessionStore,
        update: &ProfileUpdate,
    ) -> Result<SessionUser> {
        let profile = api.update_profile(update).await?;

        let token = session.token().unwrap_or_default();
        let user = user_from_profile(profile, token);
        session.set_user(user.clone());
        // set_user fills the token back in from storage when absent.
        Ok(session.current().unwrap_or(user))
    }
}
