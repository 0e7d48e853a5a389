//! # openmemory-crypto
//!
//! Content encryption envelope and key derivation. Every `Memory.content`
//! field is sealed through this crate before it reaches the metadata store;
//! nothing downstream of `openmemory-storage` ever sees plaintext.

mod envelope;
mod key_derivation;

pub use envelope::{open, open_with_rotation, seal};
pub use key_derivation::derive_content_key;
