//! Counter-increment core
//!
//! Classifies a typed analytics event into per-site and per-video counter
//! increments under dotted key names, and decodes those keys back into the
//! nested JSON shape delivered to subscribers. Persistence of the increments
//! and delivery of the JSON are the callers' concern.

pub mod classifier;
pub mod json;
pub mod models;

pub use classifier::{stat_incs, stat_incs_with_hits};
pub use json::incs_to_json;
pub use models::{IncrementSet, SiteIncs, VideoIncs};

use thiserror::Error;

/// Classification failure. All internal faults during key construction are
/// collapsed into the single opaque `BadParameters` value; no field-level
/// detail is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("bad parameters")]
    BadParameters,
}

pub type StatResult<T> = Result<T, StatError>;
