//! Outline → graph flattening.
//!
//! Nodes are numbered `node-0`, `node-1`, ... in pre-order. The counter lives
//! in the call, so two transforms never share ids by accident and the function
//! stays pure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ir::{GraphEdge, GraphNode, MindmapGraph};
use crate::outline::{MAX_OUTLINE_DEPTH, OutlineNode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("malformed outline: depth {depth} exceeds the limit of {limit}")]
    TooDeep { depth: usize, limit: usize },
    #[error("malformed outline: more than {limit} nodes")]
    TooManyNodes { limit: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Deepest level accepted; the root is level 0. Defaults to the deepest
    /// outline `parse_outline` can return.
    pub max_depth: usize,
    pub max_nodes: usize,
    /// Attach the closed-arrow marker to every edge.
    pub edge_markers: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_OUTLINE_DEPTH,
            max_nodes: 100_000,
            edge_markers: true,
        }
    }
}

struct IdCounter {
    next: usize,
}

impl IdCounter {
    fn new() -> Self {
        Self { next: 0 }
    }

    fn next_id(&mut self) -> String {
        let id = format!("node-{}", self.next);
        self.next += 1;
        id
    }
}

pub fn transform(outline: &OutlineNode) -> Result<MindmapGraph, TransformError> {
    transform_with(outline, &TransformOptions::default())
}

pub fn transform_with(
    outline: &OutlineNode,
    options: &TransformOptions,
) -> Result<MindmapGraph, TransformError> {
    let mut ids = IdCounter::new();
    let mut graph = MindmapGraph::new();
    // (node, parent index, level); children are pushed in reverse so they pop
    // in document order.
    let mut stack: Vec<(&OutlineNode, Option<usize>, usize)> = vec![(outline, None, 0)];

    while let Some((node, parent, level)) = stack.pop() {
        if level > options.max_depth {
            return Err(TransformError::TooDeep {
                depth: level,
                limit: options.max_depth,
            });
        }
        if graph.nodes.len() >= options.max_nodes {
            return Err(TransformError::TooManyNodes {
                limit: options.max_nodes,
            });
        }

        let id = ids.next_id();
        if let Some(parent) = parent {
            let mut edge = GraphEdge::new(graph.nodes[parent].id.clone(), id.clone());
            if !options.edge_markers {
                edge.marker_end = None;
            }
            graph.edges.push(edge);
        }
        let index = graph.nodes.len();
        graph.nodes.push(GraphNode::new(id, node.label(), level));

        for child in node.children.iter().rev() {
            stack.push((child, Some(index), level + 1));
        }
    }

    log::debug!(
        "transformed outline into {} nodes and {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}
