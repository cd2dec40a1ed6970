//! Metrics collection.
//!
//! # Metrics
//! - `minter_pins_total` (counter): pin calls by payload kind, outcome
//! - `minter_pin_duration_seconds` (histogram): pinning round trip
//! - `minter_transactions_total` (counter): submissions by stage, outcome
//! - `minter_flows_total` (counter): finished attempts by flow, outcome

use std::time::Duration;

/// Record one pinning round trip.
pub fn record_pin(kind: &'static str, success: bool, elapsed: Duration) {
    let outcome = outcome(success);
    metrics::counter!("minter_pins_total", "kind" => kind, "outcome" => outcome).increment(1);
    metrics::histogram!("minter_pin_duration_seconds", "kind" => kind).record(elapsed.as_secs_f64());
}

/// Record a transaction reaching `stage` ("send" or "confirm").
pub fn record_transaction(stage: &'static str, success: bool) {
    metrics::counter!("minter_transactions_total", "stage" => stage, "outcome" => outcome(success))
        .increment(1);
}

/// Record a finished orchestrator attempt.
pub fn record_flow(flow: &'static str, success: bool) {
    metrics::counter!("minter_flows_total", "flow" => flow, "outcome" => outcome(success)).increment(1);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}
