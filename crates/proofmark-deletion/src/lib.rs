//! Proofmark Deletion - tamper verification and verifiable destruction
//!
//! Two components with one shared rule: content is fingerprinted before it
//! is touched, moved, or destroyed.
//!
//! - [`verifier`] checks fetched bytes against the fingerprint committed at
//!   upload time, before any further processing.
//! - [`engine`] destroys every copy of the transient artifacts and emits a
//!   self-fingerprinted [`proofmark_core::DeletionReceipt`] proving what was
//!   hashed and removed.

#![forbid(unsafe_code)]

/// Committed-fingerprint verification
pub mod verifier;

/// The deletion engine
pub mod engine;

pub use engine::{CorrelationIds, DeletionEngine};
pub use verifier::verify;
