use crate::config::RenderConfig;
use crate::ir::{EdgeMarker, GraphEdge, MarkerKind, MindmapGraph};
use crate::label::{TextBlock, node_box};
use crate::layout::Viewport;
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

struct NodeBox {
    cx: f32,
    cy: f32,
    width: f32,
    height: f32,
    level: usize,
    label: TextBlock,
}

/// Renders a positioned graph as a standalone SVG document, fitted into
/// `config.width` x `config.height`.
pub fn render_svg(graph: &MindmapGraph, theme: &Theme, config: &RenderConfig) -> String {
    let boxes: HashMap<&str, NodeBox> = graph
        .nodes
        .iter()
        .map(|node| {
            let (label, width, height) = node_box(node, theme);
            (
                node.id.as_str(),
                NodeBox {
                    cx: node.position.x,
                    cy: node.position.y,
                    width,
                    height,
                    level: node.level(),
                    label,
                },
            )
        })
        .collect();
    let viewport = graph
        .bounds(|node| {
            boxes
                .get(node.id.as_str())
                .map(|b| (b.width, b.height))
                .unwrap_or((0.0, 0.0))
        })
        .map(|bounds| Viewport::fit(&bounds, config.width, config.height, config.fit_padding))
        .unwrap_or(Viewport {
            x: config.width / 2.0,
            y: config.height / 2.0,
            zoom: 1.0,
        });

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = config.width,
        h = config.height,
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(config.background.as_deref().unwrap_or(theme.background.as_str()))
    ));

    let markers = collect_markers(&graph.edges);
    svg.push_str("<defs>");
    for (idx, level) in theme.levels.iter().enumerate() {
        svg.push_str(&format!(
            "<linearGradient id=\"level-{idx}\" x1=\"0\" y1=\"1\" x2=\"1\" y2=\"0\"><stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/></linearGradient>",
            escape_xml(&level.fill),
            escape_xml(&level.fill_end)
        ));
    }
    for (idx, marker) in markers.iter().enumerate() {
        svg.push_str(&marker_svg(idx, marker));
    }
    svg.push_str("</defs>");

    svg.push_str(&format!(
        "<g transform=\"translate({:.2} {:.2}) scale({:.4})\">",
        viewport.x, viewport.y, viewport.zoom
    ));

    for edge in &graph.edges {
        let (Some(source), Some(target)) = (
            boxes.get(edge.source.as_str()),
            boxes.get(edge.target.as_str()),
        ) else {
            continue;
        };
        let points = smooth_step_points(source, target);
        let marker = edge
            .marker_end
            .as_ref()
            .and_then(|m| markers.iter().position(|candidate| candidate == m))
            .map(|idx| format!(" marker-end=\"url(#marker-{idx})\""))
            .unwrap_or_default();
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{} />",
            points_to_path(&points),
            escape_xml(&theme.line_color),
            theme.line_width,
            marker
        ));
    }

    for node in &graph.nodes {
        let Some(b) = boxes.get(node.id.as_str()) else {
            continue;
        };
        let style = theme.level_style(b.level);
        let fill = match theme.levels.len() {
            0 => escape_xml(&style.fill),
            len => format!("url(#level-{})", b.level.min(len - 1)),
        };
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1\"/>",
            b.cx - b.width / 2.0,
            b.cy - b.height / 2.0,
            b.width,
            b.height,
            escape_xml(&theme.border_color),
            r = style.corner_radius,
        ));
        svg.push_str(&text_block_svg(b, theme));
    }

    svg.push_str("</g></svg>");
    svg
}

fn collect_markers(edges: &[GraphEdge]) -> Vec<EdgeMarker> {
    let mut markers: Vec<EdgeMarker> = Vec::new();
    for marker in edges.iter().filter_map(|edge| edge.marker_end.as_ref()) {
        if !markers.contains(marker) {
            markers.push(marker.clone());
        }
    }
    markers
}

fn marker_svg(idx: usize, marker: &EdgeMarker) -> String {
    let path = match marker.kind {
        MarkerKind::ArrowClosed => format!(
            "<path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{c}\" stroke=\"{c}\"/>",
            c = escape_xml(&marker.color)
        ),
        MarkerKind::Arrow => format!(
            "<path d=\"M 0 0 L 10 5 L 0 10\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            escape_xml(&marker.color)
        ),
    };
    format!(
        "<marker id=\"marker-{idx}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerUnits=\"userSpaceOnUse\" markerWidth=\"{:.1}\" markerHeight=\"{:.1}\" orient=\"auto-start-reverse\">{path}</marker>",
        marker.width / 2.0,
        marker.height / 2.0,
    )
}

/// Orthogonal route from the bottom of `source` to the top of `target`,
/// bending halfway between them.
fn smooth_step_points(source: &NodeBox, target: &NodeBox) -> Vec<(f32, f32)> {
    let start = (source.cx, source.cy + source.height / 2.0);
    let end = (target.cx, target.cy - target.height / 2.0);
    if (start.0 - end.0).abs() < 0.01 {
        return vec![start, end];
    }
    let mid_y = (start.1 + end.1) / 2.0;
    vec![start, (start.0, mid_y), (end.0, mid_y), end]
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn text_block_svg(b: &NodeBox, theme: &Theme) -> String {
    let style = theme.level_style(b.level);
    let line_step = style.font_size * theme.label_line_height;
    let total_height = b.label.lines.len() as f32 * line_step;
    let start_y = b.cy - total_height / 2.0 + style.font_size;
    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">",
        escape_xml(&theme.font_family),
        style.font_size,
        style.font_weight,
        escape_xml(&style.text_color),
        x = b.cx,
    ));
    for (idx, line) in b.label.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_step };
        text.push_str(&format!(
            "<tspan x=\"{:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            b.cx,
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    log::info!("wrote {}x{} PNG to {}", size.width(), size.height(), output.display());
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TreeLayoutConfig;
    use crate::outline::OutlineNode;
    use crate::transform::transform;

    fn sample_graph() -> MindmapGraph {
        let outline = OutlineNode::new("Paper <draft>").with_children(vec![
            OutlineNode::new("Methods").with_children(vec![OutlineNode::new("Survey")]),
            OutlineNode::new("Results & Discussion"),
        ]);
        let mut graph = transform(&outline).unwrap();
        graph.apply_layout(&TreeLayoutConfig::default());
        graph
    }

    #[test]
    fn render_svg_basic() {
        let svg = render_svg(&sample_graph(), &Theme::indigo(), &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Methods"));
        assert!(svg.contains("Paper &lt;draft&gt;"));
        assert!(svg.contains("Results &amp; Discussion"));
        assert_eq!(svg.matches("<rect x=").count(), 4);
        assert_eq!(svg.matches("marker-end=").count(), 3);
        assert!(svg.contains("<marker id=\"marker-0\""));
    }

    #[test]
    fn empty_graph_renders_background_only() {
        let svg = render_svg(&MindmapGraph::new(), &Theme::plain(), &RenderConfig::default());
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn theme_colors_are_escaped() {
        let mut theme = Theme::indigo();
        theme.line_color = "#000\" onload=\"alert(1)".to_string();
        theme.border_color = "<red>".to_string();
        theme.levels[1].text_color = "a&b".to_string();
        let svg = render_svg(&sample_graph(), &theme, &RenderConfig::default());
        assert!(!svg.contains("\" onload=\""));
        assert!(svg.contains("stroke=\"#000&quot; onload=&quot;alert(1)\""));
        assert!(svg.contains("stroke=\"&lt;red&gt;\""));
        assert!(svg.contains("fill=\"a&amp;b\""));
    }

    #[test]
    fn theme_without_levels_still_renders() {
        let mut theme = Theme::indigo();
        theme.levels.clear();
        let svg = render_svg(&sample_graph(), &theme, &RenderConfig::default());
        assert_eq!(svg.matches("<rect x=").count(), 4);
        assert!(!svg.contains("url(#level-"));
        assert!(svg.contains("Methods"));
    }

    #[test]
    fn edges_bend_between_levels() {
        let graph = sample_graph();
        let theme = Theme::indigo();
        let source = NodeBox {
            cx: 0.0,
            cy: 0.0,
            width: 200.0,
            height: 40.0,
            level: 0,
            label: crate::label::measure_label("a", 16.0, 160.0, 1.4),
        };
        let target = NodeBox {
            cx: -100.0,
            cy: 150.0,
            width: 80.0,
            height: 30.0,
            level: 1,
            label: crate::label::measure_label("b", 14.0, 160.0, 1.4),
        };
        let points = smooth_step_points(&source, &target);
        assert_eq!(points, vec![(0.0, 20.0), (0.0, 77.5), (-100.0, 77.5), (-100.0, 135.0)]);
        assert!(render_svg(&graph, &theme, &RenderConfig::default()).contains(" L "));
    }
}
