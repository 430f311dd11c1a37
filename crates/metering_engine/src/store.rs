use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use metering_core::ViewLedger;
use metering_logging::{meter_debug, meter_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Storage key used when the host does not pick one.
pub const DEFAULT_STORAGE_KEY: &str = "metered-views";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("store directory missing or not writable: {0}")]
    StoreDir(String),
    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Durable home of the single per-reader ledger.
///
/// `load` never fails: absent or unreadable state is reported as `None` so the
/// caller starts a fresh ledger.
pub trait LedgerStore {
    fn load(&self) -> Option<ViewLedger>;
    fn save(&self, ledger: &ViewLedger) -> Result<(), PersistError>;
    fn clear(&self) -> Result<(), PersistError>;
}

/// Ensure the store directory exists; create if missing.
pub fn ensure_store_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StoreDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StoreDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StoreDir(e.to_string()))?;
    }
    Ok(())
}

/// Keeps the ledger as JSON in `{dir}/{key}.json`, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    dir: PathBuf,
    key: String,
}

impl FileLedgerStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}

impl LedgerStore for FileLedgerStore {
    fn load(&self) -> Option<ViewLedger> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                meter_warn!("Failed to read ledger from {:?}: {}", path, err);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(ledger) => Some(ledger),
            Err(err) => {
                meter_warn!("Discarding malformed ledger at {:?}: {}", path, err);
                None
            }
        }
    }

    fn save(&self, ledger: &ViewLedger) -> Result<(), PersistError> {
        ensure_store_dir(&self.dir)?;
        let encoded = serde_json::to_string(ledger)?;

        let target = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(encoded.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        meter_debug!(
            "Saved ledger with {} view(s) to {:?}",
            ledger.views_used(),
            target
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store holding the raw serialized value, like a browser key.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    raw: RefCell<Option<String>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an arbitrary raw value, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> Option<ViewLedger> {
        let raw = self.raw.borrow();
        let text = raw.as_deref()?;
        match serde_json::from_str(text) {
            Ok(ledger) => Some(ledger),
            Err(err) => {
                meter_warn!("Discarding malformed in-memory ledger: {}", err);
                None
            }
        }
    }

    fn save(&self, ledger: &ViewLedger) -> Result<(), PersistError> {
        *self.raw.borrow_mut() = Some(serde_json::to_string(ledger)?);
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        *self.raw.borrow_mut() = None;
        Ok(())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn load(&self) -> Option<ViewLedger> {
        (**self).load()
    }

    fn save(&self, ledger: &ViewLedger) -> Result<(), PersistError> {
        (**self).save(ledger)
    }

    fn clear(&self) -> Result<(), PersistError> {
        (**self).clear()
    }
}
