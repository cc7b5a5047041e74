//! Error taxonomy for the subnet participation manager, per `spec.md` §7.

/// Opaque wrapper around a collaborator's underlying failure.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct StoreError(#[from] Box<dyn std::error::Error + Send + Sync>);

/// Public error type for [`crate::discovery::SubnetDiscovery::find_peers_with_subnet`]
/// and [`crate::record::SubnetRecordUpdater`] operations.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorKind);

impl Error {
    pub(crate) fn unknown_topic(topic: String) -> Self {
        Self(ErrorKind::UnknownTopic(topic))
    }

    pub(crate) fn cancelled_with_progress(found: usize, threshold: usize) -> Self {
        Self(ErrorKind::Cancelled { found, threshold })
    }

    pub(crate) fn store(source: StoreError) -> Self {
        Self(ErrorKind::Store(source))
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorKind {
    #[error("no subnet for topic {0:?}")]
    UnknownTopic(String),
    #[error("discovery cancelled with {found}/{threshold} peers found")]
    Cancelled { found: usize, threshold: usize },
    #[error("collaborator failed")]
    Store(#[source] StoreError),
}
