use crate::{ContentId, GateDecision, ViewLedger};

/// Result of evaluating one page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageViewOutcome {
    pub content_id: ContentId,
    /// Ledger after rollover and recording.
    pub ledger: ViewLedger,
    pub decision: GateDecision,
    /// The stored ledger had expired and was reset during this view.
    pub rolled_over: bool,
    pub allowance: u32,
}

impl PageViewOutcome {
    pub fn locked(&self) -> bool {
        self.decision.locked
    }

    pub fn views_used(&self) -> usize {
        self.ledger.views_used()
    }

    pub fn views_remaining(&self) -> usize {
        (self.allowance as usize).saturating_sub(self.views_used())
    }
}
