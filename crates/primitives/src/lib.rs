//! Shared data model for the consensus-to-execution coordination core.
//!
//! This crate holds the types that both the execution engine coordinator
//! and the subnet participation manager need, plus the small pieces of
//! ambient machinery (error taxonomy leaves, metrics handles) that are
//! identical in both.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod blob;
pub mod block;
pub mod invalidity;
pub mod metrics;
pub mod payload;
pub mod subnet;

pub use block::{BlockRef, BlockVersion};
pub use invalidity::InvalidityRecord;
pub use payload::{PayloadAttributes, PayloadAttributesError, VersionedPayloadAttributesTag};
pub use subnet::SubnetId;

/// The operation's caller-supplied cancellation token expired or was
/// cancelled before (or during) the operation.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("operation was cancelled")]
pub struct Cancelled;
