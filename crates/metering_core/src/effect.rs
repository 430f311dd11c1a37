use crate::ViewLedger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the ledger to durable storage.
    PersistLedger(ViewLedger),
    /// Hide the gated part of the page.
    Truncate(TruncatePlan),
}

/// What the truncator needs to know to cut the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatePlan {
    pub visible_paragraphs: usize,
    pub use_more_tag: bool,
}
