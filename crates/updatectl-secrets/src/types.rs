//! Credential types

use std::fmt;

use crate::security::SecureString;

/// Username and password scoped to a repository URL
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Lookup key into the secret store
    pub url: String,
    pub username: String,
    pub password: SecureString,
}

impl Credentials {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecureString>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both username and password are present
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password)
            .finish()
    }
}
