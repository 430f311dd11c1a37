//! Metering core: pure period math, view ledger and gate decisions.
mod decision;
mod effect;
mod evaluate;
mod ledger;
mod outcome;
mod period;
mod settings;

pub use decision::{decide, GateDecision};
pub use effect::{Effect, TruncatePlan};
pub use evaluate::evaluate;
pub use ledger::{ContentId, ViewLedger};
pub use outcome::PageViewOutcome;
pub use period::{compute_expiration, day_floor, Period};
pub use settings::MeteringSettings;
