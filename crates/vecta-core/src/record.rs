//! Persisted record form of the scene.
//!
//! A document is an ordered JSON array of top-level node records; groups
//! carry their children inline. This is the only wire format the core knows.

use crate::error::SceneError;
use crate::id::NodeId;
use crate::model::{Node, NodeKind, PathPoint, SceneGraph, Style, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Object,
    Group,
}

impl RecordKind {
    pub fn node_kind(self) -> NodeKind {
        match self {
            RecordKind::Object => NodeKind::Object,
            RecordKind::Group => NodeKind::Group,
        }
    }
}

/// One node as stored on disk. `id` may be absent on input; the graph
/// generates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: RecordKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub geometry: Vec<PathPoint>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default)]
    pub rotate: Vec3,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Present for groups only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeRecord>>,
}

impl NodeRecord {
    fn bare(id: Option<&str>, kind: RecordKind) -> Self {
        Self {
            id: id.map(str::to_string),
            kind,
            name: String::new(),
            label: String::new(),
            geometry: Vec::new(),
            style: Style::default(),
            offset: Vec3::ZERO,
            rotate: Vec3::ZERO,
            locked: false,
            children: None,
        }
    }

    pub fn object(id: Option<&str>, geometry: Vec<PathPoint>) -> Self {
        Self {
            geometry,
            ..Self::bare(id, RecordKind::Object)
        }
    }

    pub fn group(id: Option<&str>, children: Vec<NodeRecord>) -> Self {
        Self {
            children: Some(children),
            ..Self::bare(id, RecordKind::Group)
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Vec3::new(x, y, self.offset.z);
        self
    }

    /// Snapshot a single node; children are filled in by the graph.
    pub fn from_node(node: &Node) -> Self {
        let kind = match node.kind {
            NodeKind::Group => RecordKind::Group,
            NodeKind::Object | NodeKind::Root => RecordKind::Object,
        };
        Self {
            id: Some(node.id.as_str().to_string()),
            kind,
            name: node.name.clone(),
            label: node.label.clone(),
            geometry: node.geometry.clone(),
            style: node.style.clone(),
            offset: node.offset,
            rotate: node.rotate,
            locked: node.locked,
            children: (kind == RecordKind::Group).then(Vec::new),
        }
    }

    /// Build the stored node. An empty name falls back to the id.
    pub fn into_node(self, id: NodeId) -> Node {
        let mut node = Node::new(id, self.kind.node_kind());
        if !self.name.is_empty() {
            node.name = self.name;
        }
        node.label = self.label;
        node.geometry = self.geometry;
        node.style = self.style;
        node.offset = self.offset;
        node.rotate = self.rotate;
        node.locked = self.locked;
        node
    }

    /// Clear every id in the subtree so the graph assigns fresh ones.
    pub fn strip_ids(&mut self) {
        let mut stack: Vec<&mut NodeRecord> = vec![self];
        while let Some(record) = stack.pop() {
            record.id = None;
            if let Some(children) = record.children.as_mut() {
                stack.extend(children.iter_mut());
            }
        }
    }
}

impl SceneGraph {
    /// Export the ordered list of top-level records.
    pub fn to_records(&self) -> Vec<NodeRecord> {
        self.children(self.root)
            .into_iter()
            .map(|idx| self.record_of(idx))
            .collect()
    }

    /// Rebuild a graph from records.
    ///
    /// # Errors
    /// Any error [`SceneGraph::add`] reports for one of the records.
    pub fn from_records(records: Vec<NodeRecord>) -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new();
        for record in records {
            graph.add(record)?;
        }
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let records: Vec<NodeRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }
}
