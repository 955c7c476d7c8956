//! Credential resolution against a secret store

use tracing::{debug, info};

use crate::error::SecretStoreError;
use crate::keyring::SecretStore;
use crate::prompt::Prompter;
use crate::types::Credentials;

/// Looks up URL-scoped credentials, prompting and persisting on first use
pub struct CredentialResolver<'a> {
    store: &'a mut dyn SecretStore,
    prompter: &'a dyn Prompter,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(store: &'a mut dyn SecretStore, prompter: &'a dyn Prompter) -> Self {
        Self { store, prompter }
    }

    /// Resolve credentials for `url`.
    ///
    /// A stored entry with a non-empty password is returned as is. A missing
    /// entry is prompted for, inserted and saved (unless the store is
    /// transient). A malformed store is an error and never prompts.
    pub fn resolve(&mut self, url: &str) -> Result<Credentials, SecretStoreError> {
        match self.store.get(url)? {
            Some(creds) if !creds.password.is_empty() => {
                debug!("Using stored credentials for {} (user {})", url, creds.username);
                return Ok(creds);
            }
            Some(_) => debug!("Stored entry for {} has no password, prompting", url),
            None => debug!("No stored credentials for {}, prompting", url),
        }

        let username = self.prompter.username(url)?;
        let password = self.prompter.password(url)?;
        let creds = Credentials::new(url, username, password);
        if !creds.is_complete() {
            return Err(SecretStoreError::EmptyCredentials {
                url: url.to_string(),
            });
        }

        self.store.insert(creds.clone())?;
        if self.store.is_persistent() {
            self.store.save()?;
            info!("Stored credentials for {}", url);
        } else {
            debug!("Secret store is transient, not persisting credentials");
        }

        Ok(creds)
    }
}
