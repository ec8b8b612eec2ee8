//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (contract, tx_hash, stage)
//!     → a per-run span carrying the run ID
//!
//! Consumers:
//!     → stderr (human-readable fmt layer)
//! ```

pub mod logging;

pub use logging::init_logging;
