use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use outline_mindmap::config::RenderConfig;
use outline_mindmap::layout::TreeLayoutConfig;
use outline_mindmap::outline::{OutlineNode, parse_outline};
use outline_mindmap::render::render_svg;
use outline_mindmap::theme::Theme;
use outline_mindmap::transform::transform;
use std::hint::black_box;

fn wide_outline(children: usize) -> OutlineNode {
    OutlineNode::new("root").with_children(
        (0..children)
            .map(|i| OutlineNode::new(format!("Topic {i}")))
            .collect(),
    )
}

fn deep_outline(depth: usize) -> OutlineNode {
    let mut node = OutlineNode::new("leaf");
    for level in (0..depth).rev() {
        node = OutlineNode::new(format!("Level {level}")).with_children(vec![node]);
    }
    node
}

fn bushy_outline(fanout: usize, depth: usize) -> OutlineNode {
    fn build(label: String, fanout: usize, remaining: usize) -> OutlineNode {
        let children = if remaining == 0 {
            Vec::new()
        } else {
            (0..fanout)
                .map(|i| build(format!("{label}.{i}"), fanout, remaining - 1))
                .collect()
        };
        OutlineNode::new(label).with_children(children)
    }
    build("root".to_string(), fanout, depth)
}

fn bench_transform_and_layout(c: &mut Criterion) {
    let config = TreeLayoutConfig::default();
    let cases = [
        ("wide_200", wide_outline(200)),
        ("deep_100", deep_outline(100)),
        ("bushy_4x5", bushy_outline(4, 5)),
    ];
    let mut group = c.benchmark_group("transform_layout");
    for (name, outline) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), outline, |b, outline| {
            b.iter(|| {
                let mut graph = transform(black_box(outline)).expect("transform failed");
                graph.apply_layout(&config);
                black_box(graph)
            })
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let envelope = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service_envelope.json"
    ));
    let model = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/model_response.txt"
    ));
    let mut group = c.benchmark_group("parse");
    group.bench_function("envelope", |b| {
        b.iter(|| parse_outline(black_box(envelope)).expect("parse failed"))
    });
    group.bench_function("model_response", |b| {
        b.iter(|| parse_outline(black_box(model)).expect("parse failed"))
    });
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let theme = Theme::indigo();
    let render = RenderConfig::default();
    let mut graph = transform(&bushy_outline(3, 4)).expect("transform failed");
    graph.apply_layout(&TreeLayoutConfig::default());
    c.bench_function("render_svg_bushy_3x4", |b| {
        b.iter(|| render_svg(black_box(&graph), &theme, &render))
    });
}

criterion_group!(benches, bench_transform_and_layout, bench_parse, bench_render);
criterion_main!(benches);
