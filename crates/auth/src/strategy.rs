use crate::credentials::Credentials;
use crate::error::AuthError;
use async_trait::async_trait;

/// How fresh credentials are created when the cache cannot be used.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    async fn create(&self, scopes: &[String]) -> Result<Credentials, AuthError>;

    fn name(&self) -> &str;
}
