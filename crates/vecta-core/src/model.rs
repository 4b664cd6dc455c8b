//! Core scene-graph data model.
//!
//! The document is an acyclic forest of objects and groups. Nodes live in a
//! `StableDiGraph` arena under a hidden document root; edges go parent→child
//! and carry a sequence number that fixes child order. Node data never points
//! back at its parent, so the only way to express a cycle is through the edge
//! set, and every reparenting walks the ancestor chain before touching it.

use crate::error::SceneError;
use crate::id::NodeId;
use crate::record::NodeRecord;
use kurbo::{Point, Vec2};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Deepest allowed nesting (top-level nodes sit at depth 1).
pub const MAX_DEPTH: usize = 32;

// ─── Geometry ────────────────────────────────────────────────────────────

/// Three-component vector used for `offset` and `rotate`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// A path point: an anchor plus optional curve control offsets.
///
/// `start` and `end` are relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Vec2>,
}

impl PathPoint {
    pub const fn corner(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            start: None,
            end: None,
        }
    }

    pub const fn smooth(x: f64, y: f64, start: Vec2, end: Vec2) -> Self {
        Self {
            x,
            y,
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ─── Styling ─────────────────────────────────────────────────────────────

/// Presentation attributes. Opaque to the core; handed to the renderer as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

// ─── Scene Graph Nodes ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Hidden document root; parent of every top-level node.
    Root,
    /// A drawable shape described by `geometry`.
    Object,
    /// A container whose children inherit its offset.
    Group,
}

impl NodeKind {
    fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Object | NodeKind::Root => "obj",
        }
    }
}

/// A single node in the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub label: String,
    /// Path points. Only meaningful for `Object`.
    pub geometry: Vec<PathPoint>,
    pub style: Style,
    /// Local translation, inherited by descendants.
    pub offset: Vec3,
    /// Local rotation. Stored and persisted, never propagated to children.
    pub rotate: Vec3,
    /// Locked nodes cannot be dragged; gestures on them pan the camera.
    pub locked: bool,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            name: id.as_str().to_string(),
            label: String::new(),
            geometry: Vec::new(),
            style: Style::default(),
            offset: Vec3::ZERO,
            rotate: Vec3::ZERO,
            locked: false,
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }
}

/// Partial update for [`SceneGraph::update`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NodePatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub geometry: Option<Vec<PathPoint>>,
    pub style: Option<Style>,
    pub offset: Option<Vec3>,
    pub rotate: Option<Vec3>,
    pub locked: Option<bool>,
}

impl NodePatch {
    fn apply(self, node: &mut Node) {
        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(label) = self.label {
            node.label = label;
        }
        if let Some(geometry) = self.geometry {
            node.geometry = geometry;
        }
        if let Some(style) = self.style {
            node.style = style;
        }
        if let Some(offset) = self.offset {
            node.offset = offset;
        }
        if let Some(rotate) = self.rotate {
            node.rotate = rotate;
        }
        if let Some(locked) = self.locked {
            node.locked = locked;
        }
    }
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// The complete document: an ordered forest of `Node` values.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// Node arena. Edge weights are insertion sequence numbers.
    graph: StableDiGraph<Node, u64>,

    /// The hidden root; its children are the top-level nodes.
    pub root: NodeIndex,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,

    next_seq: u64,
}

impl SceneGraph {
    /// Create a new empty scene graph with a root node.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(Node::new(NodeId::root(), NodeKind::Root));

        let mut id_index = HashMap::new();
        id_index.insert(NodeId::root(), root);

        Self {
            graph,
            root,
            id_index,
            next_seq: 0,
        }
    }

    // ─── Structure primitives ────────────────────────────────────────────

    /// Append `child` as the last child of `parent`.
    fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.graph.add_edge(parent, child, seq);
    }

    fn detach(&mut self, child: NodeIndex) {
        if let Some(edge) = self
            .graph
            .edges_directed(child, Direction::Incoming)
            .next()
            .map(|e| e.id())
        {
            self.graph.remove_edge(edge);
        }
    }

    /// Get the node stored at `idx`.
    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    /// Get the index for a NodeId. The root is never returned.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied().filter(|&idx| idx != self.root)
    }

    /// Resolve an untrusted id string. Malformed ids resolve to `None`.
    fn resolve(&self, id: &str) -> Option<NodeIndex> {
        NodeId::lookup(id).and_then(|id| self.index_of(id))
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
    }

    /// Get children of a node in document order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(u64, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (*e.weight(), e.target()))
            .collect();
        edges.sort_unstable_by_key(|(seq, _)| *seq);
        edges.into_iter().map(|(_, child)| child).collect()
    }

    /// Ancestors of `idx` from the outermost top-level node down to the
    /// direct parent. The root is excluded.
    pub fn ancestors(&self, idx: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        let mut chain = SmallVec::new();
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            if parent == self.root {
                break;
            }
            chain.push(parent);
            current = parent;
            // Every mutation enforces MAX_DEPTH, so a longer chain is a broken graph.
            debug_assert!(
                chain.len() <= MAX_DEPTH,
                "ancestor chain of {:?} exceeds {MAX_DEPTH}",
                self.graph[idx].id
            );
            if chain.len() > MAX_DEPTH {
                log::error!("ancestor chain of {:?} exceeds {MAX_DEPTH}", self.graph[idx].id);
                break;
            }
        }
        chain.reverse();
        chain
    }

    /// Nesting depth: top-level nodes are at depth 1.
    pub fn depth(&self, idx: NodeIndex) -> usize {
        self.ancestors(idx).len() + 1
    }

    /// All nodes below `idx` in document (pre-)order, `idx` excluded.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.children(idx).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        out
    }

    /// Levels below `idx`: 0 for a leaf.
    fn subtree_height(&self, idx: NodeIndex) -> usize {
        let mut height = 0;
        let mut stack = vec![(idx, 0usize)];
        while let Some((current, level)) = stack.pop() {
            height = height.max(level);
            for child in self.children(current) {
                stack.push((child, level + 1));
            }
        }
        height
    }

    /// Every node in document order, root excluded.
    pub fn walk(&self) -> Vec<NodeIndex> {
        self.descendants(self.root)
    }

    /// Number of nodes in the document, root excluded.
    pub fn len(&self) -> usize {
        self.id_index.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    /// Check if `ancestor_id` is a parent/grandparent/etc. of `descendant_id`.
    pub fn is_ancestor_of(&self, ancestor_id: NodeId, descendant_id: NodeId) -> bool {
        match (self.index_of(ancestor_id), self.index_of(descendant_id)) {
            (Some(ancestor), Some(descendant)) => self.ancestors(descendant).contains(&ancestor),
            _ => false,
        }
    }

    // ─── CRUD ────────────────────────────────────────────────────────────

    /// Insert a node (and any children it carries) at top level.
    ///
    /// Nodes without an id get a generated one. All ids in the record are
    /// checked before anything is inserted.
    ///
    /// # Errors
    /// `InvalidId` for a malformed id, `DuplicateId` if any id is already in
    /// the tree, `DepthExceeded` if the record nests deeper than [`MAX_DEPTH`].
    pub fn add(&mut self, record: NodeRecord) -> Result<NodeId, SceneError> {
        self.insert_record(self.root, record)
    }

    fn insert_record(
        &mut self,
        parent: NodeIndex,
        record: NodeRecord,
    ) -> Result<NodeId, SceneError> {
        let base_depth = if parent == self.root {
            0
        } else {
            self.depth(parent)
        };

        // Plan first: flatten to pre-order with parent links and final ids.
        let mut plan: Vec<(Option<usize>, Node)> = Vec::new();
        let mut taken: HashSet<NodeId> = HashSet::new();
        let mut stack: Vec<(Option<usize>, usize, NodeRecord)> = vec![(None, 1, record)];
        while let Some((plan_parent, depth, mut rec)) = stack.pop() {
            if base_depth + depth > MAX_DEPTH {
                return Err(SceneError::DepthExceeded { max: MAX_DEPTH });
            }
            let kind = rec.kind.node_kind();
            let id = match rec.id.take() {
                Some(raw) => {
                    let id = NodeId::parse(&raw).ok_or(SceneError::InvalidId(raw))?;
                    if self.id_index.contains_key(&id) || !taken.insert(id) {
                        return Err(SceneError::DuplicateId(id));
                    }
                    id
                }
                None => {
                    let id = self.fresh_id(kind, &taken);
                    taken.insert(id);
                    id
                }
            };
            let children = std::mem::take(&mut rec.children).unwrap_or_default();
            if kind != NodeKind::Group && !children.is_empty() {
                log::debug!("dropping {} children of object {id}", children.len());
            }
            let slot = plan.len();
            plan.push((plan_parent, rec.into_node(id)));
            if kind == NodeKind::Group {
                for child in children.into_iter().rev() {
                    stack.push((Some(slot), depth + 1, child));
                }
            }
        }

        let mut placed: Vec<NodeIndex> = Vec::with_capacity(plan.len());
        for (plan_parent, node) in plan {
            let id = node.id;
            let idx = self.graph.add_node(node);
            self.id_index.insert(id, idx);
            let parent_idx = plan_parent.map_or(parent, |slot| placed[slot]);
            self.attach(parent_idx, idx);
            placed.push(idx);
        }

        let top = self.graph[placed[0]].id;
        log::debug!("added {top} ({} nodes)", placed.len());
        Ok(top)
    }

    fn fresh_id(&self, kind: NodeKind, taken: &HashSet<NodeId>) -> NodeId {
        loop {
            let id = NodeId::with_prefix(kind.id_prefix());
            if !self.id_index.contains_key(&id) && !taken.contains(&id) {
                return id;
            }
        }
    }

    /// Merge `patch` into the node with `id`, wherever it lives.
    pub fn update(&mut self, id: &str, patch: NodePatch) -> Option<&Node> {
        let node = self.find_in_groups_mut(id)?;
        patch.apply(node);
        log::debug!("updated {}", node.id);
        Some(node)
    }

    /// Like [`SceneGraph::update`] for an untyped JSON payload.
    ///
    /// # Errors
    /// `InvalidPatch` if `value` is not a JSON object, `Json` if its fields
    /// do not match [`NodePatch`]. Both are caller contract violations.
    pub fn update_json(
        &mut self,
        id: &str,
        value: serde_json::Value,
    ) -> Result<Option<&Node>, SceneError> {
        if !value.is_object() {
            return Err(SceneError::InvalidPatch(json_kind(&value).to_string()));
        }
        let patch: NodePatch = serde_json::from_value(value)?;
        Ok(self.update(id, patch))
    }

    /// Remove a top-level node and its subtree. Nested nodes are not removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(idx) = self.resolve(id) else {
            return false;
        };
        if self.parent(idx) != Some(self.root) {
            return false;
        }
        let mut doomed = self.descendants(idx);
        doomed.push(idx);
        for i in doomed {
            if let Some(node) = self.graph.remove_node(i) {
                self.id_index.remove(&node.id);
            }
        }
        log::debug!("removed {id}");
        true
    }

    /// Deep-copy the subtree at `id` and insert it at top level.
    ///
    /// Every copied node gets a fresh id; the copy's root is named `<name>_copy`.
    pub fn clone_node(&mut self, id: &str) -> Option<NodeId> {
        let idx = self.resolve(id)?;
        let mut record = self.record_of(idx);
        record.strip_ids();
        record.name = format!("{}_copy", record.name);
        match self.add(record) {
            Ok(copy) => Some(copy),
            Err(err) => {
                log::warn!("clone of {id} failed: {err}");
                None
            }
        }
    }

    /// Reparent `object_id` as the last child of `group_id`.
    ///
    /// Returns `false`, leaving the tree untouched, when either id is
    /// missing, the target is not a group, the ids are equal, the move would
    /// create a cycle, or the result would nest deeper than [`MAX_DEPTH`].
    pub fn move_to_group(&mut self, object_id: &str, group_id: &str) -> bool {
        let (Some(object), Some(group)) = (self.resolve(object_id), self.resolve(group_id)) else {
            return false;
        };
        if object == group || !self.graph[group].is_group() {
            return false;
        }
        // Group inside the object's subtree.
        if self.descendants(object).contains(&group) {
            log::debug!("rejecting move of {object_id} into its own descendant {group_id}");
            return false;
        }
        // Object above the group.
        if self.ancestors(group).contains(&object) {
            return false;
        }
        if self.depth(group) + 1 + self.subtree_height(object) > MAX_DEPTH {
            log::warn!("moving {object_id} into {group_id} would exceed depth {MAX_DEPTH}");
            return false;
        }

        self.detach(object);
        self.attach(group, object);
        log::debug!("moved {object_id} into {group_id}");
        true
    }

    /// Move a grouped node back to the top level (appended last).
    pub fn remove_from_group(&mut self, object_id: &str) -> bool {
        let Some(object) = self.resolve(object_id) else {
            return false;
        };
        if self.parent(object) == Some(self.root) {
            return false;
        }
        self.detach(object);
        self.attach(self.root, object);
        log::debug!("ungrouped {object_id}");
        true
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Find a node anywhere in the tree. Returns the live node.
    pub fn find_in_groups(&self, id: &str) -> Option<&Node> {
        self.resolve(id).map(|idx| &self.graph[idx])
    }

    /// Mutable variant of [`SceneGraph::find_in_groups`]; edits are visible
    /// to the tree.
    pub fn find_in_groups_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = self.resolve(id)?;
        Some(&mut self.graph[idx])
    }

    /// Top-level nodes in document order.
    pub fn top_level(&self) -> Vec<&Node> {
        self.children(self.root)
            .into_iter()
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Direct children of `id`; empty for objects and unknown ids.
    pub fn children_of(&self, id: &str) -> Vec<&Node> {
        self.resolve(id)
            .map(|idx| {
                self.children(idx)
                    .into_iter()
                    .map(|child| &self.graph[child])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The group holding `id`, or `None` for top-level and unknown nodes.
    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        let parent = self.parent(self.resolve(id)?)?;
        (parent != self.root).then(|| &self.graph[parent])
    }

    /// Every group at any depth, in document order.
    pub fn get_all_groups(&self) -> Vec<&Node> {
        self.walk()
            .into_iter()
            .map(|idx| &self.graph[idx])
            .filter(|node| node.is_group())
            .collect()
    }

    // ─── Records ─────────────────────────────────────────────────────────

    /// Export the subtree at `idx` as a record (ids included).
    pub fn record_of(&self, idx: NodeIndex) -> NodeRecord {
        let node = &self.graph[idx];
        let mut record = NodeRecord::from_node(node);
        if node.is_group() {
            // Depth is bounded by MAX_DEPTH, so plain recursion is fine here.
            record.children = Some(
                self.children(idx)
                    .into_iter()
                    .map(|child| self.record_of(child))
                    .collect(),
            );
        }
        record
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
