//! Proofmark Effects - production effect handlers
//!
//! Stateless HTTP-backed implementations of the effect traits in
//! `proofmark-core`: blob fetch and delete against the short-lived upload
//! store, the postal mail gateway, the attestation relay, and the outbound
//! email sender, plus an in-process TTL result cache.
//!
//! No mock handlers live here; those belong in `proofmark-testkit`. Each
//! handler owns a [`reqwest::Client`] and is cheap to clone.

#![forbid(unsafe_code)]

/// Stored-object fetch over HTTP
pub mod fetch;

/// Stored-object delete over HTTP
pub mod storage;

/// Postal mail gateway client
pub mod mail;

/// Attestation relay client
pub mod ledger;

/// Outbound email sender
pub mod email;

/// In-process TTL result cache
pub mod cache;

pub use cache::InMemoryResultCache;
pub use email::HttpEmailSender;
pub use fetch::HttpFetcher;
pub use ledger::AttestationRelay;
pub use mail::{MailerConfig, PostalMailer};
pub use storage::HttpBlobDeleter;
