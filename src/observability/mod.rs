//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! pinning / blockchain / pipeline produce:
//!     → logging.rs (structured log events, attempt id on every flow event)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stderr via the fmt layer
//!     → whatever `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted strings
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
