pub mod config;
pub mod error;
pub mod ir;
pub mod label;
pub mod layout;
pub mod layout_dump;
pub mod outline;
pub mod render;
pub mod session;
pub mod theme;
pub mod transform;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use error::Error;
pub use ir::{EdgeKind, EdgeMarker, GraphEdge, GraphNode, MindmapGraph, NodeData, NodeKind, Position};
pub use layout::{LayoutOutcome, TreeLayoutConfig, layout, layout_nodes};
pub use layout_dump::PresentationPayload;
pub use outline::{MAX_OUTLINE_DEPTH, OutlineError, OutlineNode, OutlineSource, parse_outline};
pub use render::render_svg;
pub use session::{Completion, MindmapSession, RequestTicket};
pub use theme::Theme;
pub use transform::{TransformError, TransformOptions, transform, transform_with};

/// Runs the whole pipeline on a service response body: parse, transform and
/// lay out with the given configuration.
pub fn build_mindmap(input: &str, config: &Config) -> Result<MindmapGraph, Error> {
    let outline = parse_outline(input)?;
    let mut graph = transform_with(&outline, &config.transform)?;
    graph.apply_layout(&config.layout);
    Ok(graph)
}

/// Like [`build_mindmap`] but renders straight to SVG.
pub fn render_outline_svg(input: &str, config: &Config) -> Result<String, Error> {
    let graph = build_mindmap(input, config)?;
    Ok(render_svg(&graph, &config.theme, &config.render))
}
