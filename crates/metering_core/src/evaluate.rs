use chrono::{DateTime, TimeZone};

use crate::{
    decide, Effect, GateDecision, MeteringSettings, PageViewOutcome, Period, TruncatePlan,
    ViewLedger,
};

/// Pure page-view pipeline: rollover, decide, record.
///
/// Takes whatever ledger was read from storage and returns the outcome plus
/// the effects the caller must perform, in order. A rollover is persisted
/// before anything else so an expired ledger is never acted upon twice.
pub fn evaluate<Tz: TimeZone>(
    persisted: Option<ViewLedger>,
    settings: &MeteringSettings,
    now: &DateTime<Tz>,
) -> (PageViewOutcome, Vec<Effect>) {
    let content_id = settings.post_id.clone();

    // An unknown period cannot produce a meaningful window: fail open.
    if settings.period == Period::Unrecognized {
        let ledger = ViewLedger::load_or_fresh(persisted, settings.period, now);
        let outcome = PageViewOutcome {
            content_id,
            ledger,
            decision: GateDecision::default(),
            rolled_over: false,
            allowance: settings.count,
        };
        return (outcome, Vec::new());
    }

    let mut effects = Vec::with_capacity(2);
    // Only a stored ledger can roll over; a fresh one is already current.
    let rolled_over = persisted
        .as_ref()
        .is_some_and(|stored| stored.is_expired(now));
    let loaded = ViewLedger::load_or_fresh(persisted, settings.period, now);
    let mut ledger = if rolled_over {
        loaded.rollover_if_expired(settings.period, now)
    } else {
        loaded
    };
    if rolled_over {
        effects.push(Effect::PersistLedger(ledger.clone()));
    }

    let decision = decide(&ledger, settings, &content_id);
    if decision.locked {
        effects.push(Effect::Truncate(TruncatePlan {
            visible_paragraphs: settings.visible_paragraphs,
            use_more_tag: settings.use_more_tag,
        }));
    }
    if decision.should_record_view && ledger.record_view(&content_id) {
        effects.push(Effect::PersistLedger(ledger.clone()));
    }

    let outcome = PageViewOutcome {
        content_id,
        ledger,
        decision,
        rolled_over,
        allowance: settings.count,
    };
    (outcome, effects)
}
