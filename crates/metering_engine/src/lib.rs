//! Metering engine: ledger storage, content truncation and effect execution.
mod engine;
mod store;
mod truncate;

pub use engine::{Meter, PageReport};
pub use store::{
    ensure_store_dir, FileLedgerStore, LedgerStore, MemoryLedgerStore, PersistError,
    DEFAULT_STORAGE_KEY,
};
pub use truncate::{
    ContentTruncator, HtmlTruncator, TruncateError, TruncateStrategy, Truncation,
    DEFAULT_CONTAINER_SELECTOR, DEFAULT_GATE_CLASS,
};
