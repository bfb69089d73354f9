//! Top-level client facade
//!
//! Bundles one shared [`ApiClient`] with every resource service, the
//! credential store and the session event channel.

use std::sync::Arc;

use folio_domain::FolioError;
use tokio::sync::broadcast;

use crate::api::{
    AchievementsApi, ApiClient, ApiError, ApplicationsApi, AuthApi, BlogsApi, ContactApi,
    ProfileApi, ProjectsApi, SkillsApi,
};
use crate::auth::{CredentialStore, SessionEvent};
use crate::config::ClientConfig;

/// Entry point for applications talking to the Folio backend.
///
/// ```no_run
/// # async fn example() -> Result<(), folio_client::ApiError> {
/// use folio_client::{ClientConfig, Folio};
///
/// let folio = Folio::new(ClientConfig::from_env()?)?;
/// let user = folio.auth().login("admin@example.com", "password").await?;
/// let projects = folio.projects().featured().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Folio {
    client: Arc<ApiClient>,
}

impl Folio {
    /// Build a client stack from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self { client: Arc::new(ApiClient::new(config)?) })
    }

    /// Build a client stack from environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        // Pick up a local .env when present; missing files are fine
        let _ = dotenvy::dotenv();
        let config = ClientConfig::from_env().map_err(|e: FolioError| ApiError::from(e))?;
        Self::new(config)
    }

    /// The shared low-level API client
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// The credential store backing this stack
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        self.client.credentials()
    }

    /// Subscribe to session lifecycle events (refreshed / ended)
    pub fn subscribe_session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.client.events().subscribe()
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(Arc::clone(&self.client))
    }

    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(Arc::clone(&self.client))
    }

    pub fn skills(&self) -> SkillsApi {
        SkillsApi::new(Arc::clone(&self.client))
    }

    pub fn blogs(&self) -> BlogsApi {
        BlogsApi::new(Arc::clone(&self.client))
    }

    pub fn achievements(&self) -> AchievementsApi {
        AchievementsApi::new(Arc::clone(&self.client))
    }

    pub fn contact(&self) -> ContactApi {
        ContactApi::new(Arc::clone(&self.client))
    }

    pub fn applications(&self) -> ApplicationsApi {
        ApplicationsApi::new(Arc::clone(&self.client))
    }

    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(Arc::clone(&self.client))
    }
}
