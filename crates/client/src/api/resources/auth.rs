//! Authentication operations against `/auth/`

use std::sync::Arc;

use folio_domain::{
    ChangePasswordRequest, Detail, LoginRequest, LoginResponse, RefreshResponse, User,
};
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError};

/// Login, logout, profile and password operations.
///
/// Successful login and refresh install the returned access token into
/// the shared credential store; logout clears it even when the backend
/// call fails.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Log in with email and password; stores the access token and
    /// returns the authenticated user.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let response: LoginResponse = self.client.post("/auth/login/", &body).await?;

        self.client.credentials().set(&response.access);
        info!(user = %response.user.username, "logged in");
        Ok(response.user)
    }

    /// Log out: blacklists the refresh cookie server-side and clears the
    /// local credential regardless of the call's outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result: Result<Detail, ApiError> = self.client.post_empty("/auth/logout/").await;
        self.client.credentials().clear();
        result.map(|_| ())
    }

    /// Current user's profile
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.client.get("/auth/profile/").await
    }

    /// Partial update of the current user's profile
    pub async fn update_profile<B: serde::Serialize>(&self, patch: &B) -> Result<User, ApiError> {
        self.client.patch("/auth/profile/", patch).await
    }

    /// Change the account password
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<Detail, ApiError> {
        let body = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client.post("/auth/change-password/", &body).await
    }

    /// Check that the current access token is still accepted
    pub async fn verify(&self) -> Result<Detail, ApiError> {
        self.client.post_empty("/auth/verify/").await
    }

    /// Explicitly refresh the access token from the refresh cookie and
    /// store it. Used on startup to resume a session.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RefreshResponse, ApiError> {
        self.client.refresh_session().await?;
        let access = self
            .client
            .credentials()
            .get()
            .ok_or_else(|| ApiError::Auth("refresh produced no credential".to_string()))?;
        Ok(RefreshResponse { access })
    }
}
