//! Encrypted-at-rest storage for one saved controller login
//!
//! Layout under the per-user storage directory (owner-only, 0700):
//! - `key`: raw 32 byte symmetric key (0600), generated on first use
//! - `credentials.enc`: sealed JSON credential record (0600)
//!
//! Loading never fails towards the caller: a missing, unreadable, tampered
//! or foreign-key blob is reported as an empty record and logged.

pub mod cipher;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;
use zeroize::Zeroize;

use crate::constants::{CREDENTIALS_FILE_NAME, DIR_MODE, FILE_MODE, KEY_FILE_NAME};
use crate::models::CredentialRecord;
use self::cipher::{CipherError, CredentialCipher};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for {path}: {source}")]
    StorageIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("key file {path} is unusable: {source}")]
    InvalidKey {
        path: PathBuf,
        #[source]
        source: CipherError,
    },
    #[error("credential encryption failed: {0}")]
    Encryption(#[from] CipherError),
    #[error("credential serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::StorageIo {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of reading the credential file, before collapsing to a record
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(CredentialRecord),
    /// Nothing saved yet
    Empty,
    /// A blob exists but cannot be used (unreadable, tampered, foreign key, bad JSON)
    Corrupt(String),
}

impl LoadOutcome {
    /// The caller-visible record: `Empty` and `Corrupt` both become the default record
    pub fn into_record(self) -> CredentialRecord {
        match self {
            LoadOutcome::Loaded(record) => record,
            LoadOutcome::Empty | LoadOutcome::Corrupt(_) => CredentialRecord::default(),
        }
    }
}

/// Credential storage rooted at one directory
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// No filesystem access happens until `ensure_ready`, `save` or `load`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join(KEY_FILE_NAME)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE_NAME)
    }

    /// Creates the storage directory and key file if they are missing.
    /// Existing files are left untouched.
    pub fn ensure_ready(&self) -> Result<(), StoreError> {
        if !self.dir.is_dir() {
            create_private_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
            info!("Created credential storage directory {}", self.dir.display());
        }

        let key_path = self.key_path();
        if !key_path.exists() {
            let mut key = CredentialCipher::generate_key();
            let written = write_new_private_file(&key_path, &key);
            key.zeroize();
            match written {
                Ok(()) => info!("Generated new credential key at {}", key_path.display()),
                // another process created it between the check and the write
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("Key file {} appeared concurrently", key_path.display())
                }
                Err(e) => return Err(StoreError::io(&key_path, e)),
            }
        }
        Ok(())
    }

    /// Encrypts the record and replaces the credential file
    pub fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        self.ensure_ready()?;
        let cipher = self.cipher()?;

        let mut plaintext = serde_json::to_vec(record)?;
        let sealed = cipher.seal(&plaintext);
        plaintext.zeroize();
        let sealed = sealed?;

        let path = self.credentials_path();
        replace_private_file(&path, sealed.as_bytes()).map_err(|e| StoreError::io(&path, e))?;
        info!("Saved credentials for {:?} to {}", record.username, path.display());
        Ok(())
    }

    /// Saved record, or the default record when nothing usable is stored
    pub fn load(&self) -> CredentialRecord {
        match self.load_outcome() {
            LoadOutcome::Loaded(record) => record,
            LoadOutcome::Empty => {
                debug!("No saved credentials at {}", self.credentials_path().display());
                CredentialRecord::default()
            }
            LoadOutcome::Corrupt(reason) => {
                warn!("Error loading credentials: {}", reason);
                CredentialRecord::default()
            }
        }
    }

    /// Reads and decrypts the credential file, reporting why nothing was loaded
    pub fn load_outcome(&self) -> LoadOutcome {
        let path = self.credentials_path();
        let sealed = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return LoadOutcome::Empty,
            Err(e) => return LoadOutcome::Corrupt(format!("cannot read {}: {}", path.display(), e)),
        };

        let cipher = match self.cipher() {
            Ok(cipher) => cipher,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };

        let mut plaintext = match cipher.open(sealed.trim()) {
            Ok(bytes) => bytes,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };
        let parsed = serde_json::from_slice::<CredentialRecord>(&plaintext);
        plaintext.zeroize();

        match parsed {
            Ok(record) => LoadOutcome::Loaded(record),
            Err(e) => LoadOutcome::Corrupt(format!("credential record unreadable: {}", e)),
        }
    }

    fn cipher(&self) -> Result<CredentialCipher, StoreError> {
        let path = self.key_path();
        let mut key = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        let cipher = CredentialCipher::from_key_bytes(&key);
        key.zeroize();
        cipher.map_err(|source| StoreError::InvalidKey { path, source })
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(DIR_MODE).create(dir)?;
    set_mode(dir, DIR_MODE)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn private_open_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options
}

/// Fails with `AlreadyExists` instead of overwriting
fn write_new_private_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = private_open_options().create_new(true).open(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    set_mode(path, FILE_MODE)
}

/// Writes a sibling temp file and renames it over the target
fn replace_private_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = (|| {
        let mut file = private_open_options().create(true).truncate(true).open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        set_mode(&tmp_path, FILE_MODE)?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
