//! Proofmark Pipeline - the fulfillment orchestrator
//!
//! The top-level state machine that turns a confirmed payment into a mailed
//! packet, a destroyed data set, and published proof. One entry point for
//! callers that want the result ([`FulfillmentPipeline::process`]) and one
//! for webhook dispatchers that must acknowledge immediately
//! ([`dispatch::Dispatcher`]).
//!
//! Every external touchpoint goes through the effect traits in
//! `proofmark-core`, so a run is fully observable and failure-injectable in
//! tests.

#![forbid(unsafe_code)]

/// The orchestrator state machine
pub mod orchestrator;

/// Fire-and-forget dispatch with duplicate-trigger protection
pub mod dispatch;

/// Confirmation email content
pub mod notify;

/// Polling-client status lookup
pub mod status;

pub use dispatch::{DispatchAck, Dispatcher};
pub use orchestrator::{FulfillmentPipeline, PipelineEffects};
pub use status::FulfillmentStatus;
