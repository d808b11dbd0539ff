//! Normalization of raw study values to SDTM controlled terminology.

pub mod ct;
pub mod frame;

pub use ct::{NormalizedValue, ResolutionKind, compact_key, normalize};
pub use frame::{NormalizedFrame, ResolutionTally, normalize_domain_frame, resolve_codelists};
