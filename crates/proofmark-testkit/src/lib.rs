//! Proofmark Testkit - mock effect handlers and fixtures
//!
//! Recording, failure-injectable implementations of every effect trait in
//! `proofmark-core`, plus request and fixture builders. Used as a
//! dev-dependency by the other crates; no mock handlers live anywhere else.

#![forbid(unsafe_code)]

/// Mock effect handlers
pub mod mocks;

/// Request and fixture builders
pub mod builders;

pub use mocks::CallJournal;
