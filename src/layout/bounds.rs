use serde::Serialize;

use crate::ir::GraphNode;

/// Axis-aligned box around a set of positioned nodes. Node positions are
/// centers; `node_size` supplies each node's extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl GraphBounds {
    pub fn of(nodes: &[GraphNode], node_size: impl Fn(&GraphNode) -> (f32, f32)) -> Option<Self> {
        let mut bounds: Option<GraphBounds> = None;
        for node in nodes {
            let (width, height) = node_size(node);
            let half_w = width / 2.0;
            let half_h = height / 2.0;
            let node_box = GraphBounds {
                min_x: node.position.x - half_w,
                min_y: node.position.y - half_h,
                max_x: node.position.x + half_w,
                max_y: node.position.y + half_h,
            };
            bounds = Some(match bounds {
                Some(current) => current.union(&node_box),
                None => node_box,
            });
        }
        bounds
    }

    pub fn union(&self, other: &GraphBounds) -> GraphBounds {
        GraphBounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Pan and zoom that fit a bounds box into a viewport, the "fit view" step
/// run after every layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Viewport {
    pub const MIN_ZOOM: f32 = 0.5;
    pub const MAX_ZOOM: f32 = 2.0;

    /// `padding` is a fraction of the bounds size (0.2 leaves 20% slack).
    pub fn fit(bounds: &GraphBounds, width: f32, height: f32, padding: f32) -> Viewport {
        let scale = 1.0 + padding.max(0.0);
        let zoom_x = width / (bounds.width().max(1.0) * scale);
        let zoom_y = height / (bounds.height().max(1.0) * scale);
        let zoom = zoom_x.min(zoom_y).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        let (center_x, center_y) = bounds.center();
        Viewport {
            x: width / 2.0 - center_x * zoom,
            y: height / 2.0 - center_y * zoom,
            zoom,
        }
    }

    /// Maps a graph-space point to viewport space.
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.zoom + self.x, y * self.zoom + self.y)
    }
}
