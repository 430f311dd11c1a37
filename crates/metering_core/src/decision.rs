use crate::{ContentId, MeteringSettings, ViewLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateDecision {
    pub locked: bool,
    pub should_record_view: bool,
}

/// Pure gate decision for `content_id` against the current ledger.
///
/// Content already in the ledger never locks and is never counted twice.
/// A locked view is not recorded.
pub fn decide(
    ledger: &ViewLedger,
    settings: &MeteringSettings,
    content_id: &ContentId,
) -> GateDecision {
    let seen = ledger.contains(content_id);
    let within_allowance = ledger.views_used() < settings.count as usize;
    let locked = !(within_allowance || seen);
    GateDecision {
        locked,
        should_record_view: !locked && !seen,
    }
}
