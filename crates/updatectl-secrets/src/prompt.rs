//! Interactive input for credentials and the keyring passphrase

use console::style;
use dialoguer::{Input, Password};

use crate::error::SecretStoreError;
use crate::security::SecureString;

/// Source of interactively entered secrets
pub trait Prompter: Send + Sync {
    /// Ask for the username to use against `url`
    fn username(&self, url: &str) -> Result<String, SecretStoreError>;

    /// Ask for the password to use against `url`
    fn password(&self, url: &str) -> Result<SecureString, SecretStoreError>;

    /// Ask for the keyring passphrase.
    /// `confirm` is set when a new keyring is about to be created.
    fn passphrase(&self, confirm: bool) -> Result<SecureString, SecretStoreError>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn username(&self, url: &str) -> Result<String, SecretStoreError> {
        eprintln!("{} Enter credentials for {}", style("ℹ").blue().bold(), url);
        let username: String = Input::new().with_prompt("Username").interact_text()?;
        Ok(username.trim().to_string())
    }

    fn password(&self, _url: &str) -> Result<SecureString, SecretStoreError> {
        let password = Password::new().with_prompt("Password").interact()?;
        Ok(SecureString::new(password))
    }

    fn passphrase(&self, confirm: bool) -> Result<SecureString, SecretStoreError> {
        let mut prompt = Password::new().with_prompt("Keyring passphrase");
        if confirm {
            prompt = prompt.with_confirmation("Confirm passphrase", "Passphrases do not match");
        }
        Ok(SecureString::new(prompt.interact()?))
    }
}
