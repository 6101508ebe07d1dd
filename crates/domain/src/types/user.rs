//! Users and authentication payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::credentials::CredentialPair;
use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum UserRole {
    #[default]
    Reader,
    Author,
    Editor,
    Admin,
}

impl_domain_status_conversions!(UserRole {
    Reader => "reader",
    Author => "author",
    Editor => "editor",
    Admin => "admin",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Filters for the admin user listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Inner payload of a login/register response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: User,
    #[serde(flatten)]
    pub credentials: CredentialPair,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn auth_session_flattens_credentials() {
        let session: AuthSession = serde_json::from_value(json!({
            "user": {
                "id": "u1",
                "email": "ada@example.com",
                "name": "Ada",
                "role": "admin",
                "createdAt": "2026-03-01T00:00:00Z"
            },
            "accessToken": "A1",
            "refreshToken": "R1"
        }))
        .unwrap();

        assert_eq!(session.user.role, UserRole::Admin);
        assert!(session.user.is_active);
        assert_eq!(session.credentials, CredentialPair::new("A1", "R1"));
    }

    #[test]
    fn login_request_debug_hides_password() {
        let request = LoginRequest { email: "a@b.c".into(), password: "hunter2".into() };
        assert!(!format!("{request:?}").contains("hunter2"));
    }
}
