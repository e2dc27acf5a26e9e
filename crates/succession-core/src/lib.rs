pub mod allocation;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod facts;
pub mod nudges;
pub mod report;
pub mod sources;
pub mod tax;
pub mod types;

#[cfg(feature = "export")]
pub mod export;

pub use config::{EngineConfig, UnresolvedPolicy};
pub use error::SuccessionError;
pub use facts::Facts;
pub use report::{analyse, compute_report, Report};
pub use types::*;

/// Standard result type for the non-core surfaces (config, parsing, envelopes)
pub type SuccessionResult<T> = Result<T, SuccessionError>;
