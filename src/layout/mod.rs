mod bounds;
mod tree;

pub use bounds::{GraphBounds, Viewport};
pub use tree::layout_nodes;

use serde::{Deserialize, Serialize};

use crate::ir::{GraphEdge, GraphNode, MindmapGraph};

/// Vertical distance between two depth levels.
pub const LEVEL_SPACING: f32 = 150.0;
/// Horizontal distance between two adjacent siblings.
pub const SIBLING_SPACING: f32 = 200.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayoutConfig {
    pub level_spacing: f32,
    pub sibling_spacing: f32,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            level_spacing: LEVEL_SPACING,
            sibling_spacing: SIBLING_SPACING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoNodes,
    NoRoot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Nodes that received a position, root included.
    pub placed: usize,
    /// Nodes the root cannot reach; their positions are left untouched.
    pub unreachable: usize,
    /// Edges pointing at an already-placed node (cycles, shared children).
    pub revisits: usize,
    /// Edges whose target is not among the nodes.
    pub missing_targets: usize,
}

/// What a layout pass did. Layout never fails; a caller that wants to show
/// an error checks for [`LayoutOutcome::Skipped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    Placed(LayoutStats),
    Skipped(SkipReason),
}

impl LayoutOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, LayoutOutcome::Placed(_))
    }
}

/// Owned variant of [`layout_nodes`]: positions `nodes` and hands them back.
pub fn layout(
    mut nodes: Vec<GraphNode>,
    edges: &[GraphEdge],
    config: &TreeLayoutConfig,
) -> Vec<GraphNode> {
    layout_nodes(&mut nodes, edges, config);
    nodes
}

impl MindmapGraph {
    pub fn apply_layout(&mut self, config: &TreeLayoutConfig) -> LayoutOutcome {
        layout_nodes(&mut self.nodes, &self.edges, config)
    }

    pub fn bounds(&self, node_size: impl Fn(&GraphNode) -> (f32, f32)) -> Option<GraphBounds> {
        GraphBounds::of(&self.nodes, node_size)
    }
}
