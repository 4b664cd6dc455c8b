//! Observable scene store.
//!
//! Wraps a `SceneGraph` so that every successful mutation notifies
//! subscribers and (re)schedules a debounced save. Failed operations leave
//! both alone. Write failures are logged and swallowed; the in-memory graph
//! stays authoritative.

use crate::persist::{Clock, PersistError, Persistence, SaveScheduler};
use std::time::Duration;
use vecta_core::config::EditorConfig;
use vecta_core::error::SceneError;
use vecta_core::id::NodeId;
use vecta_core::model::{Node, NodePatch, SceneGraph};
use vecta_core::record::NodeRecord;

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    Added { id: NodeId },
    Updated { id: NodeId },
    Removed { id: NodeId },
    Moved { id: NodeId, group: NodeId },
    Ungrouped { id: NodeId },
    /// The whole graph was replaced from storage.
    Loaded { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SceneChange)>;

pub struct SceneStore<P: Persistence> {
    graph: SceneGraph,
    persistence: P,
    clock: Box<dyn Clock>,
    scheduler: SaveScheduler,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<P: Persistence> SceneStore<P> {
    pub fn new(persistence: P, clock: impl Clock + 'static, config: &EditorConfig) -> Self {
        Self {
            graph: SceneGraph::new(),
            persistence,
            clock: Box::new(clock),
            scheduler: SaveScheduler::new(Duration::from_millis(config.save_debounce_ms)),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    // ─── Observers ───────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&SceneChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: SceneChange) {
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }

    fn changed(&mut self, change: SceneChange) {
        log::trace!("scene change {change:?}");
        self.notify(change);
        self.scheduler.schedule(self.clock.now());
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// # Errors
    /// Same as [`SceneGraph::add`].
    pub fn add(&mut self, record: NodeRecord) -> Result<NodeId, SceneError> {
        let id = self.graph.add(record)?;
        self.changed(SceneChange::Added { id });
        Ok(id)
    }

    pub fn update(&mut self, id: &str, patch: NodePatch) -> bool {
        let Some(id) = self.graph.update(id, patch).map(|node| node.id) else {
            return false;
        };
        self.changed(SceneChange::Updated { id });
        true
    }

    /// # Errors
    /// Same as [`SceneGraph::update_json`].
    pub fn update_json(&mut self, id: &str, value: serde_json::Value) -> Result<bool, SceneError> {
        let Some(id) = self.graph.update_json(id, value)?.map(|node| node.id) else {
            return Ok(false);
        };
        self.changed(SceneChange::Updated { id });
        Ok(true)
    }

    /// Apply `edit` to the live node, wherever it lives. The edit reports
    /// whether it changed anything.
    pub fn edit(&mut self, id: NodeId, edit: impl FnOnce(&mut Node) -> bool) -> bool {
        let Some(node) = self.graph.find_in_groups_mut(id.as_str()) else {
            return false;
        };
        if !edit(node) {
            return false;
        }
        self.changed(SceneChange::Updated { id });
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(node) = NodeId::lookup(id) else {
            return false;
        };
        if !self.graph.remove(id) {
            return false;
        }
        self.changed(SceneChange::Removed { id: node });
        true
    }

    pub fn clone_node(&mut self, id: &str) -> Option<NodeId> {
        let copy = self.graph.clone_node(id)?;
        self.changed(SceneChange::Added { id: copy });
        Some(copy)
    }

    pub fn move_to_group(&mut self, object_id: &str, group_id: &str) -> bool {
        let (Some(id), Some(group)) = (NodeId::lookup(object_id), NodeId::lookup(group_id)) else {
            return false;
        };
        if !self.graph.move_to_group(object_id, group_id) {
            return false;
        }
        self.changed(SceneChange::Moved { id, group });
        true
    }

    pub fn remove_from_group(&mut self, object_id: &str) -> bool {
        let Some(id) = NodeId::lookup(object_id) else {
            return false;
        };
        if !self.graph.remove_from_group(object_id) {
            return false;
        }
        self.changed(SceneChange::Ungrouped { id });
        true
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn has_pending_save(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Write the scene if the debounce period has elapsed. Returns whether a
    /// write succeeded. A failed write is retried after another quiet period.
    pub fn tick(&mut self) -> bool {
        if self.scheduler.take_due(self.clock.now()) {
            self.write()
        } else {
            false
        }
    }

    /// Write now, dropping any pending debounced save.
    pub fn force_save(&mut self) -> bool {
        self.scheduler.cancel();
        self.write()
    }

    /// Replace the graph with the stored scene.
    ///
    /// # Errors
    /// Storage or decode failures; the current graph is kept.
    pub fn load(&mut self) -> Result<usize, PersistError> {
        let records = self.persistence.load()?;
        let graph = SceneGraph::from_records(records)?;
        let count = graph.len();
        self.graph = graph;
        self.scheduler.cancel();
        log::debug!("loaded {count} nodes");
        self.notify(SceneChange::Loaded { count });
        Ok(count)
    }

    fn write(&mut self) -> bool {
        match self.persistence.save(&self.graph.to_records()) {
            Ok(()) => {
                log::debug!("saved {} nodes", self.graph.len());
                true
            }
            Err(err) => {
                log::warn!("scene save failed, retrying later: {err}");
                self.scheduler.schedule(self.clock.now());
                false
            }
        }
    }
}
