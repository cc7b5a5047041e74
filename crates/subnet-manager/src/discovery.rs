//! Peer discovery loop and broadcast-peer gate (`spec.md` §4.2.3, §4.2.4).

use std::sync::Arc;

use futures::StreamExt as _;
use nodecore_primitives::SubnetId;
use tokio_util::sync::CancellationToken;

use crate::collaborators::{Dialer, DiscoveredNode, Discovery, PeerPool};
use crate::config::SubnetManagerConfig;
use crate::error::Error;
use crate::metrics::SubnetManagerMetrics;

/// Which bitfield a subnet topic predicate reads. `None` at the call site
/// means the topic name didn't resolve to either namespace (`spec.md`
/// §4.2.3 step 2's "unrecognised topic").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetTopicKind {
    Attestation,
    SyncCommittee,
}

fn topic_admits(kind: SubnetTopicKind, index: SubnetId, node: &DiscoveredNode) -> bool {
    match kind {
        SubnetTopicKind::Attestation => node.attestation_bitfield.is_set(index),
        SubnetTopicKind::SyncCommittee => node.sync_bitfield.is_set(index),
    }
}

/// Drives subnet-targeted peer discovery and reports broadcast-peer
/// availability.
pub struct SubnetDiscovery<D, P, L> {
    discovery: Arc<D>,
    peers: Arc<P>,
    dialer: Arc<L>,
    config: SubnetManagerConfig,
    metrics: SubnetManagerMetrics,
}

impl<D, P, L> SubnetDiscovery<D, P, L>
where
    D: Discovery,
    P: PeerPool,
    L: Dialer,
{
    pub fn new(discovery: Arc<D>, peers: Arc<P>, dialer: Arc<L>, config: SubnetManagerConfig) -> Self {
        Self { discovery, peers, dialer, config, metrics: SubnetManagerMetrics::new() }
    }

    /// `spec.md` §4.2.3. Dials are dispatched in bounded, fully-drained
    /// batches; cancellation is checked cooperatively at the top of each
    /// iteration. Per §9's open question, no internal timeout is
    /// introduced — a caller-supplied cancellation token is the only thing
    /// that bounds an iterator yielding no matching nodes.
    #[tracing::instrument(skip_all, fields(topic, index = index.0, threshold))]
    pub async fn find_peers_with_subnet(
        &self,
        topic: &str,
        kind: Option<SubnetTopicKind>,
        index: SubnetId,
        threshold: usize,
        cancel: &CancellationToken,
    ) -> Result<bool, Error> {
        if !self.config.discovery_enabled {
            return Ok(false);
        }
        let Some(kind) = kind else {
            return Err(Error::unknown_topic(topic.to_string()));
        };

        let suffixed_topic = self.discovery.topic_suffixed(topic);
        let mut candidates = self.discovery.random_nodes();

        loop {
            let found = self.peers.peer_count_for_topic(&suffixed_topic).await;
            if found >= threshold {
                tracing::info!(topic = %suffixed_topic, found, threshold, "subnet peer threshold reached");
                return Ok(true);
            }
            if cancel.is_cancelled() {
                return Err(Error::cancelled_with_progress(found, threshold));
            }

            let batch_size = match self.config.max_concurrent_dials {
                Some(cap) => cap.min(self.config.min_peers_in_subnet_search),
                None => self.config.min_peers_in_subnet_search,
            };

            let mut batch = Vec::with_capacity(batch_size);
            while batch.len() < batch_size {
                match candidates.next().await {
                    Some(node) if topic_admits(kind, index, &node) => batch.push(node),
                    Some(_) => continue,
                    None => break,
                }
            }

            if batch.is_empty() {
                continue;
            }

            let dialed = self.dispatch_batch(batch).await;
            self.metrics.discovery_batches_completed.increment();
            tracing::debug!(topic = %suffixed_topic, dialed, batch_size, "completed a discovery batch");
        }
    }

    async fn dispatch_batch(&self, batch: Vec<DiscoveredNode>) -> usize {
        let mut tasks = tokio::task::JoinSet::new();
        for node in batch {
            let dialer = Arc::clone(&self.dialer);
            tasks.spawn(async move { dialer.dial(node).await });
        }

        let mut dialed = 0usize;
        while let Some(outcome) = tasks.join_next().await {
            match outcome {
                Ok(Ok(())) => dialed += 1,
                Ok(Err(error)) => tracing::debug!(%error, "dial attempt failed"),
                Err(join_error) => tracing::warn!(%join_error, "dial task panicked"),
            }
        }
        dialed
    }

    /// `spec.md` §4.2.4. A weaker gate than discovery: broadcast must
    /// remain possible even when peer counts are low.
    pub async fn has_peer_with_subnet(&self, topic: &str) -> bool {
        let threshold = self.config.min_peers_per_subnet.min(1);
        self.peers.peer_count_for_topic(topic).await >= threshold
    }
}
