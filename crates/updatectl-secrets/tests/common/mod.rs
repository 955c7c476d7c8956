//! Shared helpers for updatectl-secrets tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use updatectl_secrets::{Prompter, SecretStoreError, SecureString};

pub const REPO_URL: &str = "https://releases.example.test/updatectl";
pub const USERNAME: &str = "deploy";
pub const PASSWORD: &str = "s3cret";
pub const PASSPHRASE: &str = "correct horse battery staple";

/// Answers prompts from fixed values and counts each kind
#[derive(Default)]
pub struct CountingPrompter {
    pub credential_prompts: AtomicUsize,
    pub passphrase_prompts: AtomicUsize,
}

impl CountingPrompter {
    pub fn credentials(&self) -> usize {
        self.credential_prompts.load(Ordering::SeqCst)
    }

    pub fn passphrases(&self) -> usize {
        self.passphrase_prompts.load(Ordering::SeqCst)
    }
}

impl Prompter for CountingPrompter {
    fn username(&self, _url: &str) -> Result<String, SecretStoreError> {
        self.credential_prompts.fetch_add(1, Ordering::SeqCst);
        Ok(USERNAME.to_string())
    }

    fn password(&self, _url: &str) -> Result<SecureString, SecretStoreError> {
        self.credential_prompts.fetch_add(1, Ordering::SeqCst);
        Ok(SecureString::from(PASSWORD))
    }

    fn passphrase(&self, _confirm: bool) -> Result<SecureString, SecretStoreError> {
        self.passphrase_prompts.fetch_add(1, Ordering::SeqCst);
        Ok(SecureString::from(PASSPHRASE))
    }
}
