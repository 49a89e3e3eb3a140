//! Authentication flows

pub mod oauth;

use crate::api::types::UserProfile;
use crate::session::SessionUser;

pub const DEFAULT_ROLE: &str = "USER";

/// Build the session record from a server profile, filling the gaps the
/// various identity providers leave: username falls back to the email local
/// part, role to the default.
pub fn user_from_profile(profile: UserProfile, token: String) -> SessionUser {
    let username = profile
        .username
        .filter(|name| !name.is_empty())
        .or_else(|| {
            profile
                .email
                .as_deref()
                .and_then(|email| email.split('@').next())
                .map(String::from)
        })
        .unwrap_or_else(|| "user".to_string());

    SessionUser {
        id: profile.id,
        username,
        role: profile
            .role
            .filter(|role| !role.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        email: profile.email,
        avatar: profile.avatar_url,
        token: Some(token).filter(|token| !token.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_falls_back_to_email_local_part() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":"u1","email":"carol@example.com"}"#).unwrap();
        let user = user_from_profile(profile, "tok".into());
        assert_eq!(user.username, "carol");
        assert_eq!(user.role, DEFAULT_ROLE);
        assert_eq!(user.token.as_deref(), Some("tok"));
    }

    #[test]
    fn empty_token_becomes_none() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":"u1","username":"dave"}"#).unwrap();
        let user = user_from_profile(profile, String::new());
        assert_eq!(user.token, None);
        assert_eq!(user.username, "dave");
    }
}
