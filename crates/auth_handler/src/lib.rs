//! Authentication building blocks for the webhook receiver
//!
//! This crate provides the two pieces of inbound and outbound authentication
//! the receiver needs:
//!
//! - [`secrets`]: resolving the GitHub token and the webhook signature secret,
//!   either from environment variables (development) or Azure Key Vault.
//! - [`signature`]: computing and checking the `x-hub-signature-256` HMAC
//!   GitHub attaches to webhook deliveries.
//!
//! ## Architecture
//!
//! Business logic depends on the [`SecretResolver`] trait; the binary picks
//! the implementation with [`resolver_for_mode`].

pub mod key_vault;
pub mod secrets;
pub mod signature;

pub use key_vault::{KeyVaultSecretResolver, ManagedIdentityCredential};
pub use secrets::{
    resolver_for_mode, EnvironmentSecretResolver, Secret, SecretBinding, SecretError,
    SecretErrorKind, SecretId, SecretMode, SecretResolver, SecretsConfig,
};
pub use signature::{sign, verify, SIGNATURE_HEADER};
