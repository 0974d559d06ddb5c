use crate::layout::TreeLayoutConfig;
use crate::theme::{LevelStyle, Theme};
use crate::transform::TransformOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    /// Overrides the theme background when set.
    pub background: Option<String>,
    /// Slack around the graph when fitting the view, as a fraction of its size.
    pub fit_padding: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: None,
            fit_padding: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: TreeLayoutConfig,
    pub transform: TransformOptions,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    border_color: Option<String>,
    label_line_height: Option<f32>,
    max_label_width: Option<f32>,
    levels: Option<Vec<LevelStyle>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    level_spacing: Option<f32>,
    sibling_spacing: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TransformConfigFile {
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
    edge_markers: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
    fit_padding: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    transform: Option<TransformConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Applies a JSON config document over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme `{theme_name}`"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.border_color {
            config.theme.border_color = v;
        }
        if let Some(v) = vars.label_line_height {
            config.theme.label_line_height = v;
        }
        if let Some(v) = vars.max_label_width {
            config.theme.max_label_width = v;
        }
        if let Some(levels) = vars.levels {
            if levels.is_empty() {
                return Err(anyhow::anyhow!("themeVariables.levels must not be empty"));
            }
            config.theme.levels = levels;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.level_spacing {
            config.layout.level_spacing = v;
        }
        if let Some(v) = layout.sibling_spacing {
            config.layout.sibling_spacing = v;
        }
    }

    if let Some(transform) = parsed.transform {
        if let Some(v) = transform.max_depth {
            config.transform.max_depth = v;
        }
        if let Some(v) = transform.max_nodes {
            config.transform.max_nodes = v;
        }
        if let Some(v) = transform.edge_markers {
            config.transform.edge_markers = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if render.background.is_some() {
            config.render.background = render.background;
        }
        if let Some(v) = render.fit_padding {
            config.render.fit_padding = v;
        }
    }

    Ok(config)
}
