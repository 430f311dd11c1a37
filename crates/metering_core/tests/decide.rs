use metering_core::{decide, ContentId, GateDecision, MeteringSettings, Period, ViewLedger};

fn ledger(ids: &[&str]) -> ViewLedger {
    ViewLedger {
        content: ids.iter().map(|id| ContentId::from(*id)).collect(),
        expiration: i64::MAX,
    }
}

#[test]
fn seen_content_never_locks() {
    let settings = MeteringSettings::new(Period::Month, 3, "x");
    let decision = decide(&ledger(&["x", "y", "z"]), &settings, &"x".into());
    assert_eq!(
        decision,
        GateDecision {
            locked: false,
            should_record_view: false,
        }
    );
}

#[test]
fn new_content_past_allowance_locks_without_recording() {
    let settings = MeteringSettings::new(Period::Month, 3, "w");
    let decision = decide(&ledger(&["x", "y", "z"]), &settings, &"w".into());
    assert_eq!(
        decision,
        GateDecision {
            locked: true,
            should_record_view: false,
        }
    );
}

#[test]
fn new_content_within_allowance_is_recorded() {
    let settings = MeteringSettings::new(Period::Month, 3, "w");
    let decision = decide(&ledger(&["x", "y"]), &settings, &"w".into());
    assert_eq!(
        decision,
        GateDecision {
            locked: false,
            should_record_view: true,
        }
    );
}

#[test]
fn zero_allowance_locks_everything_new() {
    let settings = MeteringSettings::new(Period::Day, 0, "a");
    let decision = decide(&ledger(&[]), &settings, &"a".into());
    assert!(decision.locked);
    assert!(!decision.should_record_view);
}
