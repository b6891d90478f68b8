use crate::client::AuthorizedClient;
use crate::error::AuthError;
use crate::storage::CredentialStorage;
use crate::strategy::AuthStrategy;
use tracing::info;

/// Loads cached credentials, or creates and persists new ones.
pub struct CredentialProvider {
    storage: CredentialStorage,
    strategy: Box<dyn AuthStrategy>,
}

impl CredentialProvider {
    pub fn new(storage: CredentialStorage, strategy: Box<dyn AuthStrategy>) -> Self {
        Self { storage, strategy }
    }

    pub async fn obtain_credentials(
        &self,
        scopes: &[String],
    ) -> Result<AuthorizedClient, AuthError> {
        if let Some(credentials) = self.storage.load().await {
            if credentials.covers(scopes) {
                info!(
                    "Using cached {} credentials from {}",
                    credentials.grant.kind(),
                    self.storage.path().display()
                );
                return Ok(AuthorizedClient::new(credentials));
            }
            info!("Cached credentials do not cover the requested scopes");
        }

        info!("Creating credentials ({} flow)", self.strategy.name());
        let credentials = self.strategy.create(scopes).await?;
        self.storage.save(&credentials).await?;

        Ok(AuthorizedClient::new(credentials))
    }
}
