//! Authentication payloads
//!
//! Request and response bodies for the `/auth/` endpoints. The refresh
//! token itself never appears here: it travels in an httpOnly cookie
//! managed by the transport, so only the short-lived access token is
//! visible to the client.

use serde::{Deserialize, Serialize};

/// Authenticated account as returned alongside the access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Full display name; falls back to the username server-side
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Body for `POST /auth/login/`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from `POST /auth/login/`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer access token for subsequent requests
    pub access: String,
    pub user: User,
}

/// Response from `POST /auth/refresh/`
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Body for `POST /auth/change-password/`
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Generic acknowledgement body (`{"detail": "..."}`)
#[derive(Debug, Clone, Deserialize)]
pub struct Detail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_deserializes_backend_shape() {
        let body = r#"{
            "access": "jwt-token",
            "user": {
                "id": 1,
                "username": "admin",
                "email": "admin@example.com",
                "name": "Site Admin",
                "is_staff": true,
                "is_superuser": true
            }
        }"#;

        let parsed: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.access, "jwt-token");
        assert_eq!(parsed.user.email, "admin@example.com");
        assert!(parsed.user.is_staff);
    }

    #[test]
    fn login_request_serializes_expected_fields() {
        let req = LoginRequest { email: "a@b.com".into(), password: "secret".into() };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["password"], "secret");
    }
}
