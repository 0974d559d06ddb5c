use crate::config::RenderConfig;
use crate::ir::{GraphEdge, GraphNode, MindmapGraph};
use crate::label::node_size;
use crate::layout::{GraphBounds, Viewport};
use crate::outline::OutlineSource;
use crate::theme::Theme;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Everything a graph-rendering surface needs to draw a mind map: the
/// positioned nodes, the edges, and the viewport that fits them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub nodes: &'a [GraphNode],
    pub edges: &'a [GraphEdge],
    pub bounds: Option<GraphBounds>,
    pub viewport: Option<Viewport>,
}

impl<'a> PresentationPayload<'a> {
    pub fn from_graph(graph: &'a MindmapGraph, theme: &Theme, render: &RenderConfig) -> Self {
        let bounds = graph.bounds(|node| node_size(node, theme));
        let viewport = bounds
            .as_ref()
            .map(|b| Viewport::fit(b, render.width, render.height, render.fit_padding));
        Self {
            source: None,
            nodes: &graph.nodes,
            edges: &graph.edges,
            bounds,
            viewport,
        }
    }

    pub fn with_source(mut self, source: Option<&OutlineSource>) -> Self {
        self.source = source.map(ToString::to_string);
        self
    }
}

/// Writes the payload as pretty JSON to `path`, or stdout when absent.
pub fn write_payload(payload: &PresentationPayload<'_>, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, payload)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, payload)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
