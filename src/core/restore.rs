//! Queue state reconstruction from the store.
//!
//! Best-effort like the rest of the persistence boundary: a service with no
//! store, or a store that cannot answer, starts empty rather than failing
//! startup.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::core::node::Node;
use crate::core::queue_service::QueueService;
use crate::infra::store::QueueKind;

impl QueueService {
    /// Rebuild nodes and resource queues from persisted state, returning how
    /// many nodes were re-registered.
    ///
    /// Every non-completed persisted node is registered in the index. Nodes
    /// whose latest persisted transition says `service` land in that queue,
    /// ordered by transition time; everything else (including nodes that
    /// never moved, keyed by creation time) lands in `waiting`. Queues are
    /// loaded directly, bypassing capacity, so a resource can legitimately
    /// come back over-full. A node naming a resource this service does not
    /// know is restored unassigned.
    pub async fn restore_from_store(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };

        let rows = match store.list_nodes().await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "node listing failed, restoring nothing");
                return 0;
            }
        };
        if rows.is_empty() {
            return 0;
        }
        let states = match store.list_latest_node_states().await {
            Ok(states) => states,
            Err(err) => {
                warn!(error = %err, "node state listing failed, restoring nothing");
                return 0;
            }
        };

        let mut guard = self.state.write().await;
        let state = &mut *guard;

        // Placement lists per resource: (sort key, node id).
        let mut waiting: HashMap<String, Vec<(u128, String)>> = HashMap::new();
        let mut service: HashMap<String, Vec<(u128, String)>> = HashMap::new();
        let mut count = 0_usize;

        for row in rows {
            let resource_id = match row.resource_id {
                Some(rid) if state.resources.contains_key(&rid) => Some(rid),
                Some(rid) => {
                    warn!(
                        node_id = %row.node_id,
                        resource_id = %rid,
                        "persisted resource unknown, restoring node unassigned"
                    );
                    None
                }
                None => None,
            };

            if let Some(rid) = resource_id.clone() {
                let (queue, sort_key) = states
                    .get(&row.node_id)
                    .map_or((QueueKind::Waiting, row.created_at_ms), |entry| {
                        (entry.queue, entry.ts_ms)
                    });
                let placement = (sort_key, row.node_id.clone());
                match queue {
                    QueueKind::Waiting => waiting.entry(rid).or_default().push(placement),
                    QueueKind::Service => service.entry(rid).or_default().push(placement),
                }
            }

            let node = Node::restored(row.node_id, row.entity_name, resource_id, row.created_at_ms);
            state.nodes.insert(node.id.clone(), node);
            count += 1;
        }

        for (resource_id, mut placements) in waiting {
            placements.sort_by_key(|(sort_key, _)| *sort_key);
            let ids = placements.into_iter().map(|(_, id)| id).collect();
            if let Some(resource) = state.resources.get_mut(&resource_id) {
                resource.load_queues(ids, Vec::new());
            }
        }
        for (resource_id, mut placements) in service {
            placements.sort_by_key(|(sort_key, _)| *sort_key);
            let ids = placements.into_iter().map(|(_, id)| id).collect();
            if let Some(resource) = state.resources.get_mut(&resource_id) {
                resource.load_queues(Vec::new(), ids);
            }
        }

        info!(count, "restored nodes from store");
        count
    }
}
