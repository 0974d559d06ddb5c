use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[default]
    #[serde(rename = "mindmapNode")]
    Mindmap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    #[default]
    #[serde(rename = "mindmapEdge")]
    Mindmap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "arrow")]
    Arrow,
    #[default]
    #[serde(rename = "arrowclosed")]
    ArrowClosed,
}

/// Arrowhead drawn at the child end of an edge. Cosmetic only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

impl Default for EdgeMarker {
    fn default() -> Self {
        Self {
            kind: MarkerKind::ArrowClosed,
            width: 20.0,
            height: 20.0,
            color: "#6366F1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub is_root: bool,
    pub level: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Position,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, level: usize) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Mindmap,
            data: NodeData {
                label: label.into(),
                is_root: level == 0,
                level,
            },
            position: Position::ORIGIN,
        }
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }

    pub fn level(&self) -> usize {
        self.data.level
    }

    pub fn is_root(&self) -> bool {
        self.data.is_root
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<EdgeMarker>,
}

impl GraphEdge {
    /// Parent → child edge with the default arrowhead.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
            kind: EdgeKind::Mindmap,
            marker_end: Some(EdgeMarker::default()),
        }
    }
}

pub fn edge_id(source: &str, target: &str) -> String {
    format!("edge-{source}-{target}")
}

/// Flattened outline: an arena of nodes plus the parent → child edge list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindmapGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl MindmapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.is_root())
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Child ids of `id`, in edge order.
    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|edge| edge.source == id)
            .map(|edge| edge.target.as_str())
            .collect()
    }

    /// Parent → ordered children lookup built from the edge list.
    pub fn adjacency(&self) -> HashMap<&str, Vec<&str>> {
        adjacency(&self.edges)
    }
}

pub(crate) fn adjacency(edges: &[GraphEdge]) -> HashMap<&str, Vec<&str>> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }
    children
}
