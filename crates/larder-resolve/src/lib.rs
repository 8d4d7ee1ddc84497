//! # larder-resolve
//!
//! Decides whether a newly observed name refers to an already-known record.
//!
//! - [`normalize`]: canonical comparison form (case, whitespace, plurals)
//! - [`resolve`] / [`resolve_with_tier`]: four matching tiers, first hit wins
//! - [`NameIndex`]: name → id lookup built once per batch

mod index;
mod normalize;
mod tiers;

pub use index::NameIndex;
pub use normalize::normalize;
pub use tiers::{MatchTier, resolve, resolve_with_tier};
