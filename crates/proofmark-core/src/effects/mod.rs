//! Pure effect interfaces for external collaborators
//!
//! Every external system the pipeline touches is reached through one of
//! these traits. Production handlers live in `proofmark-effects` and
//! `proofmark-documents`; recording mocks live in `proofmark-testkit`.
//! The orchestrator only ever sees the trait, so every external call site
//! is swappable and observable in tests.

/// Stored-object fetch
pub mod fetch;

/// Document composition (form fill, consent letter, packet merge)
pub mod documents;

/// Physical mail gateway
pub mod mail;

/// Stored-object deletion
pub mod storage;

/// Append-only attestation ledger
pub mod ledger;

/// Outbound email
pub mod email;

/// Best-effort result cache
pub mod cache;

pub use cache::ResultCache;
pub use documents::DocumentEffects;
pub use email::EmailEffects;
pub use fetch::{FetchEffects, FetchedObject};
pub use ledger::{LedgerEffects, PublishedRecord};
pub use mail::{CheckStatus, MailEffects, MailedCheck, MailedLetter};
pub use storage::StorageEffects;
