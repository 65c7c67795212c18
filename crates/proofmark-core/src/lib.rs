//! Proofmark Core - data model and effect interfaces
//!
//! This crate provides the foundational types for the Proofmark fulfillment
//! pipeline: the immutable request/result data model, jurisdiction
//! configuration, content fingerprinting, transient buffer ownership, the
//! deletion receipt, and the pure effect traits that every external
//! collaborator (blob store, document composer, mail gateway, attestation
//! ledger, email, result cache) implements.
//!
//! It contains no I/O. Production effect handlers live in
//! `proofmark-effects` and `proofmark-documents`; mock handlers for tests
//! live in `proofmark-testkit`.

#![forbid(unsafe_code)]

/// Request references and correlation identifiers
pub mod identifiers;

/// Unified error handling
pub mod errors;

/// SHA-256 content fingerprinting
pub mod fingerprint;

/// Owned, zeroizable byte buffers for in-flight artifacts
pub mod buffer;

/// Jurisdiction configuration and registry
pub mod config;

/// The immutable fulfillment request
pub mod request;

/// The verifiable deletion receipt
pub mod receipt;

/// Terminal pipeline results and attestation identifier sets
pub mod result;

/// Pure effect interfaces (no implementations)
pub mod effects;

pub use buffer::TransientBuffer;
pub use errors::PipelineError;
pub use identifiers::RequestRef;
pub use receipt::{ArtifactDigest, DeletionReceipt};
pub use request::{ApplicantRecord, FulfillmentRequest};
pub use result::{AttestationUids, FulfillmentCacheEntry, FulfillmentResult};
