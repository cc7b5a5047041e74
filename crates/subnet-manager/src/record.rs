//! Atomic record maintenance (`spec.md` §4.2.2).

use std::sync::Arc;

use nodecore_primitives::subnet::{AttestationBitfield, MetadataVersion, SyncCommitteeBitfield};
use tokio::sync::Mutex;

use crate::collaborators::NodeRecord;
use crate::error::Error;
use crate::metrics::SubnetManagerMetrics;

/// Wraps a [`NodeRecord`] with the single writer lock `spec.md` §5 requires
/// ("concurrent readers see either the old or the new triple, never a
/// mixed state"). All three writes — bitfield(s), then sequence number —
/// happen while the lock is held.
pub struct SubnetRecordUpdater<R: NodeRecord> {
    record: Arc<R>,
    writer_lock: Mutex<()>,
    metrics: SubnetManagerMetrics,
}

impl<R: NodeRecord> SubnetRecordUpdater<R> {
    pub fn new(record: Arc<R>, metrics: SubnetManagerMetrics) -> Self {
        Self { record, writer_lock: Mutex::new(()), metrics }
    }

    /// V1 metadata: attestation bitfield only.
    #[tracing::instrument(skip_all)]
    pub async fn update_v1(&self, attestation: AttestationBitfield) -> Result<u64, Error> {
        let _guard = self.writer_lock.lock().await;
        self.record.set_attestation_bitfield(attestation).await.map_err(Error::store)?;
        let sequence_number = self.record.bump_sequence_number().await.map_err(Error::store)?;
        self.metrics.subnets_subscribed.increment();
        tracing::debug!(sequence_number, ?attestation, version = ?MetadataVersion::V1, "updated subnet record");
        Ok(sequence_number)
    }

    /// V2 metadata: attestation and sync-committee bitfields together.
    #[tracing::instrument(skip_all)]
    pub async fn update_v2(
        &self,
        attestation: AttestationBitfield,
        sync: SyncCommitteeBitfield,
    ) -> Result<u64, Error> {
        let _guard = self.writer_lock.lock().await;
        self.record.set_attestation_bitfield(attestation).await.map_err(Error::store)?;
        self.record.set_sync_bitfield(sync).await.map_err(Error::store)?;
        let sequence_number = self.record.bump_sequence_number().await.map_err(Error::store)?;
        self.metrics.subnets_subscribed.increment();
        tracing::debug!(sequence_number, ?attestation, ?sync, version = ?MetadataVersion::V2, "updated subnet record");
        Ok(sequence_number)
    }
}
