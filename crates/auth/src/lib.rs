//! Credential acquisition for the prediction service.
//!
//! A [`CredentialProvider`] loads cached credentials or creates new ones
//! through an [`AuthStrategy`], and hands back an [`AuthorizedClient`]
//! that signs every request with a bearer token.

pub mod client;
pub mod credentials;
pub mod error;
pub mod interactive;
pub mod provider;
pub mod server;
pub mod service_account;
pub mod storage;
pub mod strategy;
pub mod token;

pub use client::AuthorizedClient;
pub use credentials::{Credentials, Grant};
pub use error::AuthError;
pub use interactive::{FlowFlags, InteractiveStrategy};
pub use provider::CredentialProvider;
pub use service_account::{ServiceAccountKey, ServiceAccountStrategy};
pub use storage::CredentialStorage;
pub use strategy::AuthStrategy;
