pub mod analyze;
pub mod predict;

use anyhow::{Context, Result};
use har_predict_auth::{
    AuthStrategy, CredentialProvider, CredentialStorage, FlowFlags, InteractiveStrategy,
    ServiceAccountStrategy,
};
use har_predict_core::{AppConfig, AuthConfig, AuthMode};
use har_predict_prediction::{build_client, PredictionApi};
use std::sync::Arc;

pub fn auth_strategy(auth: &AuthConfig, flags: FlowFlags) -> Box<dyn AuthStrategy> {
    match auth.mode {
        AuthMode::ServiceAccount => {
            Box::new(ServiceAccountStrategy::new(&auth.service_account_key))
        }
        AuthMode::Interactive => Box::new(InteractiveStrategy::new(&auth.client_secrets, flags)),
    }
}

/// Authenticate and build the prediction API handle.
pub async fn connect(config: &AppConfig, flags: FlowFlags) -> Result<Arc<dyn PredictionApi>> {
    let provider = CredentialProvider::new(
        CredentialStorage::new(&config.auth.credential_cache),
        auth_strategy(&config.auth, flags),
    );

    let client = provider
        .obtain_credentials(&config.auth.scopes)
        .await
        .context("Failed to obtain credentials")?;

    Ok(Arc::new(build_client(&config.api, client)))
}
