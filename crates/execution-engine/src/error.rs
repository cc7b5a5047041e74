//! Error taxonomy for the execution engine coordinator, per `spec.md` §7.

use nodecore_primitives::{Cancelled, InvalidityRecord};

/// Opaque wrapper around a store collaborator's underlying failure.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct StoreError(#[from] Box<dyn std::error::Error + Send + Sync>);

/// The engine returned neither a known status nor a clean success —
/// treated as transient; the coordinator never mutates state on this path.
#[derive(Debug, thiserror::Error)]
#[error("execution engine returned an undefined response: {0}")]
pub struct EngineRpcError(pub String);

/// Public error type for [`crate::coordinator::ExecutionEngineCoordinator`]
/// operations that can fail (`notify_new_payload`, `prune_invalid_block`).
///
/// `notify_forkchoice_updated` and `build_payload_attribute` are
/// deliberately infallible — see `spec.md` §7 and §9's open question.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorKind);

impl Error {
    pub(crate) fn invalid_block(record: InvalidityRecord) -> Self {
        Self(ErrorKind::InvalidBlock(record))
    }

    pub(crate) fn undefined_engine(error: EngineRpcError) -> Self {
        Self(ErrorKind::UndefinedEngine(error))
    }

    pub(crate) fn store(source: StoreError) -> Self {
        Self(ErrorKind::Store(source))
    }

    /// The [`InvalidityRecord`] carried by this error, if any — callers use
    /// this to feed the pruning path (`spec.md` §7: "invalid-block errors
    /// are always surfaced so the caller can feed the pruning path").
    pub fn invalidity_record(&self) -> Option<&InvalidityRecord> {
        match &self.0 {
            ErrorKind::InvalidBlock(record) => Some(record),
            _ => None,
        }
    }
}

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Self(ErrorKind::Cancelled)
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorKind {
    #[error(transparent)]
    InvalidBlock(InvalidityRecord),
    #[error(transparent)]
    UndefinedEngine(EngineRpcError),
    #[error("store collaborator failed")]
    Store(#[source] StoreError),
    #[error("operation was cancelled")]
    Cancelled,
}
