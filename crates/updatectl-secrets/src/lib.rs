//! Credential management for updatectl
//!
//! This crate provides:
//! - **Storage**: a URL-keyed secret store, either an age-encrypted file or
//!   an in-memory transient store
//! - **Resolution**: stored credentials first, interactive prompt otherwise,
//!   persisting what was entered
//! - **Security**: zeroize-on-drop passwords that never show up in logs

pub mod error;
pub mod keyring;
pub mod prompt;
pub mod resolver;
pub mod security;
pub mod types;

pub use error::SecretStoreError;
pub use keyring::{FileKeyring, MemoryKeyring, SecretStore};
pub use prompt::{Prompter, TerminalPrompter};
pub use resolver::CredentialResolver;
pub use security::SecureString;
pub use types::Credentials;
