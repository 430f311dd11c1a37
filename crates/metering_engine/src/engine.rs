use chrono::{DateTime, TimeZone};
use metering_core::{evaluate, Effect, MeteringSettings, PageViewOutcome};
use metering_logging::{meter_debug, meter_error, meter_info, meter_warn};

use crate::{ContentTruncator, LedgerStore, TruncateError, TruncateStrategy};

/// Everything a host needs after one page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub outcome: PageViewOutcome,
    /// The page to serve; unchanged unless it was truncated.
    pub html: String,
    pub truncation: Option<TruncateStrategy>,
}

/// Runs the metering pipeline against a store and a truncator.
pub struct Meter<S, T> {
    store: S,
    truncator: T,
}

impl<S: LedgerStore, T: ContentTruncator> Meter<S, T> {
    pub fn new(store: S, truncator: T) -> Self {
        Self { store, truncator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load, evaluate and apply effects for one view of `html`.
    ///
    /// Storage and DOM failures are logged and leave the page readable.
    pub fn view_page<Tz: TimeZone>(
        &self,
        settings: &MeteringSettings,
        html: &str,
        now: &DateTime<Tz>,
    ) -> PageReport {
        let persisted = self.store.load();
        let (outcome, effects) = evaluate(persisted, settings, now);
        meter_debug!(
            "Evaluated view of {}: locked={} used={} allowance={} effects={}",
            outcome.content_id,
            outcome.locked(),
            outcome.views_used(),
            outcome.allowance,
            effects.len()
        );

        let mut report = PageReport {
            outcome,
            html: html.to_owned(),
            truncation: None,
        };
        for effect in effects {
            self.apply(effect, &mut report);
        }
        report
    }

    fn apply(&self, effect: Effect, report: &mut PageReport) {
        match effect {
            Effect::PersistLedger(ledger) => {
                if let Err(err) = self.store.save(&ledger) {
                    meter_error!("Failed to persist ledger: {}", err);
                }
            }
            Effect::Truncate(plan) => match self.truncator.truncate(&report.html, &plan) {
                Ok(truncation) => {
                    meter_info!(
                        "Locked {} ({:?}, removed {} element(s))",
                        report.outcome.content_id,
                        truncation.strategy,
                        truncation.removed
                    );
                    report.html = truncation.html;
                    report.truncation = Some(truncation.strategy);
                }
                Err(err @ TruncateError::MissingContainer(_)) => {
                    meter_debug!("Skipping truncation: {}", err);
                }
                Err(err) => {
                    meter_warn!("Skipping truncation: {}", err);
                }
            },
        }
    }
}
