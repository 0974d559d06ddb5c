use std::collections::HashMap;

use super::{LayoutOutcome, LayoutStats, SkipReason, TreeLayoutConfig};
use crate::ir::{GraphEdge, GraphNode, Position, adjacency};

/// Positions every node reachable from the root.
///
/// The root sits at the origin. A node at tree depth `d` lands on
/// `y = d * level_spacing`, and each sibling group is centered under its
/// parent's x with `sibling_spacing` between neighbours. Subtrees of
/// different widths may overlap; nothing pushes them apart.
///
/// Traversal is iterative and tracks placed nodes, so a cyclic or
/// multi-parent edge list terminates and the first placement wins.
pub fn layout_nodes(
    nodes: &mut [GraphNode],
    edges: &[GraphEdge],
    config: &TreeLayoutConfig,
) -> LayoutOutcome {
    if nodes.is_empty() {
        return LayoutOutcome::Skipped(SkipReason::NoNodes);
    }
    let Some(root) = nodes.iter().position(|node| node.is_root()) else {
        log::warn!("layout skipped: none of {} nodes is flagged as root", nodes.len());
        return LayoutOutcome::Skipped(SkipReason::NoRoot);
    };

    let placed = compute_positions(nodes, edges, root, config);

    let mut stats = placed.stats;
    for (node, position) in nodes.iter_mut().zip(placed.positions) {
        if let Some(position) = position {
            node.position = position;
        }
    }
    stats.unreachable = nodes.len() - stats.placed;
    if stats.unreachable > 0 || stats.revisits > 0 || stats.missing_targets > 0 {
        log::warn!(
            "layout placed {} nodes ({} unreachable, {} revisits, {} dangling edges)",
            stats.placed,
            stats.unreachable,
            stats.revisits,
            stats.missing_targets
        );
    } else {
        log::debug!("layout placed {} nodes", stats.placed);
    }
    LayoutOutcome::Placed(stats)
}

struct Placement {
    positions: Vec<Option<Position>>,
    stats: LayoutStats,
}

fn compute_positions(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    root: usize,
    config: &TreeLayoutConfig,
) -> Placement {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let children = adjacency(edges);

    let mut positions: Vec<Option<Position>> = vec![None; nodes.len()];
    let mut stats = LayoutStats::default();

    positions[root] = Some(Position::ORIGIN);
    stats.placed = 1;

    let mut stack = vec![(root, 0usize)];
    while let Some((parent, depth)) = stack.pop() {
        let Some(kids) = children.get(nodes[parent].id.as_str()) else {
            continue;
        };
        let parent_x = positions[parent].map(|p| p.x).unwrap_or(0.0);
        let count = kids.len() as f32;
        let start_x = parent_x - (count - 1.0) * config.sibling_spacing / 2.0;
        let y = (depth + 1) as f32 * config.level_spacing;

        let mut next = Vec::with_capacity(kids.len());
        for (i, child_id) in kids.iter().enumerate() {
            let Some(&child) = index.get(child_id) else {
                stats.missing_targets += 1;
                continue;
            };
            if positions[child].is_some() {
                stats.revisits += 1;
                continue;
            }
            positions[child] = Some(Position::new(
                start_x + i as f32 * config.sibling_spacing,
                y,
            ));
            stats.placed += 1;
            next.push((child, depth + 1));
        }
        stack.extend(next.into_iter().rev());
    }

    Placement { positions, stats }
}
