//! URL-keyed secret stores
//!
//! [`FileKeyring`] keeps credentials in a YAML document encrypted with an age
//! passphrase. A missing file is an empty store; a file that cannot be
//! decrypted or parsed is reported as [`SecretStoreError::Malformed`] so that
//! callers never mistake a wrong passphrase for "no entry yet".
//!
//! [`MemoryKeyring`] is transient: it answers lookups but never persists.

use age::secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SecretStoreError;
use crate::prompt::Prompter;
use crate::security::SecureString;
use crate::types::Credentials;

/// File name of the keyring inside the updatectl config directory
const KEYRING_FILE: &str = "keyring.yaml.age";

/// Environment variable holding the keyring passphrase
pub const PASSPHRASE_ENV: &str = "UPDATECTL_KEYRING_PASSPHRASE";

/// Keyed lookup, insert and persist of credentials
pub trait SecretStore: Send {
    /// Look up credentials for a URL.
    ///
    /// Returns Ok(None) when there is no entry.
    /// Returns Err(Malformed) when the store exists but cannot be read.
    fn get(&mut self, url: &str) -> Result<Option<Credentials>, SecretStoreError>;

    /// Insert or replace the entry for `credentials.url`
    fn insert(&mut self, credentials: Credentials) -> Result<(), SecretStoreError>;

    /// Write pending changes
    fn save(&mut self) -> Result<(), SecretStoreError>;

    /// Whether `save` writes anywhere
    fn is_persistent(&self) -> bool;
}

/// On-disk item. Plaintext only ever exists in memory.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct StoredItem {
    url: String,
    username: String,
    password: String,
}

#[derive(Default, Serialize, Deserialize)]
struct KeyringData {
    #[serde(default)]
    items: Vec<StoredItem>,
}

/// Transient in-memory store
#[derive(Debug, Default)]
pub struct MemoryKeyring {
    items: HashMap<String, Credentials>,
}

impl MemoryKeyring {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemoryKeyring {
    fn get(&mut self, url: &str) -> Result<Option<Credentials>, SecretStoreError> {
        Ok(self.items.get(url).cloned())
    }

    fn insert(&mut self, credentials: Credentials) -> Result<(), SecretStoreError> {
        self.items.insert(credentials.url.clone(), credentials);
        Ok(())
    }

    fn save(&mut self) -> Result<(), SecretStoreError> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

/// Age-encrypted keyring file
pub struct FileKeyring {
    path: PathBuf,
    passphrase: Option<SecureString>,
    prompter: Arc<dyn Prompter>,
    data: Option<KeyringData>,
    exists_on_disk: bool,
    dirty: bool,
}

impl FileKeyring {
    /// Keyring at `path`. Nothing is read until the first lookup.
    pub fn open(path: impl Into<PathBuf>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            path: path.into(),
            passphrase: None,
            prompter,
            data: None,
            exists_on_disk: false,
            dirty: false,
        }
    }

    /// Use this passphrase instead of prompting
    pub fn with_passphrase(mut self, passphrase: SecureString) -> Self {
        self.passphrase = Some(passphrase);
        self
    }

    /// Default keyring location in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("updatectl").join(KEYRING_FILE))
    }

    fn passphrase(&mut self, confirm: bool) -> Result<SecretString, SecretStoreError> {
        let passphrase = match &self.passphrase {
            Some(p) => p.clone(),
            None => {
                let p = match std::env::var(PASSPHRASE_ENV) {
                    Ok(value) if !value.is_empty() => {
                        debug!("Using keyring passphrase from {}", PASSPHRASE_ENV);
                        SecureString::new(value)
                    }
                    _ => self.prompter.passphrase(confirm)?,
                };
                self.passphrase = Some(p.clone());
                p
            }
        };
        Ok(SecretString::from(passphrase.as_str().to_owned()))
    }

    fn load(&mut self) -> Result<&mut KeyringData, SecretStoreError> {
        let data = match self.data.take() {
            Some(data) => data,
            None if self.path.exists() => {
                self.exists_on_disk = true;
                self.read_encrypted()?
            }
            None => {
                debug!("No keyring at {}, starting empty", self.path.display());
                KeyringData::default()
            }
        };
        Ok(self.data.insert(data))
    }

    fn read_encrypted(&mut self) -> Result<KeyringData, SecretStoreError> {
        let ciphertext = fs::read(&self.path).map_err(|e| SecretStoreError::io(&self.path, e))?;
        let identity = age::scrypt::Identity::new(self.passphrase(false)?);

        let mut plaintext = age::decrypt(&identity, &ciphertext)
            .map_err(|e| SecretStoreError::malformed(&self.path, e))?;
        let parsed = serde_yaml_ng::from_slice::<KeyringData>(&plaintext)
            .map_err(|e| SecretStoreError::malformed(&self.path, e));
        plaintext.zeroize();

        let data = parsed?;
        debug!(
            "Loaded keyring {} ({} entries)",
            self.path.display(),
            data.items.len()
        );
        Ok(data)
    }

    fn write_encrypted(&mut self) -> Result<(), SecretStoreError> {
        let confirm = !self.exists_on_disk;
        let recipient = age::scrypt::Recipient::new(self.passphrase(confirm)?);

        let mut plaintext = match &self.data {
            Some(data) => serde_yaml_ng::to_string(data)?.into_bytes(),
            None => return Ok(()),
        };
        let encrypted = age::encrypt(&recipient, &plaintext)
            .map_err(|e| SecretStoreError::Encrypt(e.to_string()));
        plaintext.zeroize();
        let ciphertext = encrypted?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(|e| SecretStoreError::io(dir, e))?;

        // Write beside the target and rename so a crash never truncates the keyring
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| SecretStoreError::io(dir, e))?;
        tmp.write_all(&ciphertext)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| SecretStoreError::io(tmp.path(), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))
                .map_err(|e| SecretStoreError::io(tmp.path(), e))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| SecretStoreError::io(&self.path, e.error))?;

        self.exists_on_disk = true;
        info!("Saved keyring {}", self.path.display());
        Ok(())
    }
}

impl SecretStore for FileKeyring {
    fn get(&mut self, url: &str) -> Result<Option<Credentials>, SecretStoreError> {
        let data = self.load()?;
        Ok(data.items.iter().find(|item| item.url == url).map(|item| {
            Credentials::new(
                item.url.clone(),
                item.username.clone(),
                item.password.as_str(),
            )
        }))
    }

    fn insert(&mut self, credentials: Credentials) -> Result<(), SecretStoreError> {
        let data = self.load()?;
        data.items.retain(|item| item.url != credentials.url);
        data.items.push(StoredItem {
            url: credentials.url.clone(),
            username: credentials.username.clone(),
            password: credentials.password.as_str().to_owned(),
        });
        self.dirty = true;
        debug!(
            "Added keyring entry for {} (user {})",
            credentials.url, credentials.username
        );
        Ok(())
    }

    fn save(&mut self) -> Result<(), SecretStoreError> {
        if !self.dirty {
            return Ok(());
        }
        self.write_encrypted()?;
        self.dirty = false;
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for FileKeyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKeyring")
            .field("path", &self.path)
            .field("loaded", &self.data.is_some())
            .field("dirty", &self.dirty)
            .finish()
    }
}
