//! # openmemory-classify
//!
//! Sector classification and near-duplicate fingerprinting: the L2 stage
//! of the HSG pipeline that decides which cognitive sectors a new memory
//! belongs to, and the simhash fingerprint used to dedupe against
//! existing ones.

mod classifier;
mod fingerprint;
mod rules;

pub use classifier::classify;
pub use fingerprint::{hamming_distance, simhash64};
