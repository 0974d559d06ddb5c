use crate::config::{Config, load_config};
use crate::layout_dump::{PresentationPayload, write_payload};
use crate::outline::{OutlineSource, parse_outline};
use crate::render::{render_svg, write_output_svg};
use crate::transform::transform_with;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mindmap", version, about = "Lay out a document outline as a mind map")]
pub struct Args {
    /// Outline JSON (bare, service envelope, or model output) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for JSON and SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Viewport height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Vertical distance between depth levels
    #[arg(long = "level-spacing")]
    pub level_spacing: Option<f32>,

    /// Horizontal distance between siblings
    #[arg(long = "sibling-spacing")]
    pub sibling_spacing: Option<f32>,

    /// Record the outline as generated for this document
    #[arg(long = "filename", conflicts_with = "source_id")]
    pub filename: Option<String>,

    /// Record the outline as a stored mind map with this identifier
    #[arg(long = "source-id")]
    pub source_id: Option<String>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(log_level(args.verbose, args.quiet));

    let config = resolve_config(&args)?;
    let source = outline_source(&args);
    let input = read_input(args.input.as_deref())?;

    let outline = parse_outline(&input).context("Failed to read outline")?;
    let mut graph = transform_with(&outline, &config.transform)?;
    let outcome = graph.apply_layout(&config.layout);
    log::info!(
        "{} nodes, {} edges ({:?})",
        graph.nodes.len(),
        graph.edges.len(),
        outcome
    );

    match args.output_format {
        OutputFormat::Json => {
            let payload = PresentationPayload::from_graph(&graph, &config.theme, &config.render)
                .with_source(source.as_ref());
            write_payload(&payload, args.output.as_deref())?;
        }
        OutputFormat::Svg => {
            let svg = render_svg(&graph, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&graph, &config, args.output.as_deref())?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(graph: &crate::ir::MindmapGraph, config: &Config, output: Option<&Path>) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    let svg = render_svg(graph, &config.theme, &config.render);
    crate::render::write_output_png(&svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_graph: &crate::ir::MindmapGraph, _config: &Config, _output: Option<&Path>) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("Failed to load config {:?}", args.config))?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(spacing) = args.level_spacing {
        config.layout.level_spacing = spacing;
    }
    if let Some(spacing) = args.sibling_spacing {
        config.layout.sibling_spacing = spacing;
    }
    Ok(config)
}

fn outline_source(args: &Args) -> Option<OutlineSource> {
    if let Some(id) = &args.source_id {
        return Some(OutlineSource::Stored { id: id.clone() });
    }
    args.filename
        .as_ref()
        .map(|filename| OutlineSource::Generated {
            filename: filename.clone(),
        })
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        eprintln!("[{tag} {}] {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
