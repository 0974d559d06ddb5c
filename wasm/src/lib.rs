use log::Level;
use outline_mindmap::{Config, PresentationPayload, Theme, build_mindmap, render_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MindmapOptions {
    theme: Option<String>,
    font_family: Option<String>,
    level_spacing: Option<f32>,
    sibling_spacing: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    fit_padding: Option<f32>,
}

fn build_config(options: MindmapOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(spacing) = options.level_spacing {
        config.layout.level_spacing = spacing;
    }
    if let Some(spacing) = options.sibling_spacing {
        config.layout.sibling_spacing = spacing;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(padding) = options.fit_padding {
        config.render.fit_padding = padding;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<MindmapOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str::<MindmapOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(MindmapOptions::default()),
    }
}

fn layout_json(body: &str, config: &Config) -> Result<String, String> {
    let graph = build_mindmap(body, config).map_err(|error| error.to_string())?;
    let payload = PresentationPayload::from_graph(&graph, &config.theme, &config.render);
    serde_json::to_string(&payload).map_err(|error| error.to_string())
}

/// Console logging and readable panics for the browser.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
    log::info!("Logging initialized");
}

/// Lays out an outline response body and returns the nodes, edges and
/// fitted viewport as JSON.
#[wasm_bindgen]
pub fn layout_outline(body: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    layout_json(body, &config).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_outline_svg(body: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    let graph = build_mindmap(body, &config).map_err(|error| JsValue::from_str(&error.to_string()))?;
    Ok(render_svg(&graph, &config.theme, &config.render))
}

#[cfg(test)]
mod tests {
    use crate::{MindmapOptions, build_config, layout_json};

    #[test]
    fn lays_out_service_envelope() {
        let body = r#"{"success": true, "mindmap": {"name": "Doc", "children": [
            {"name": "Intro"}, {"name": "Method", "children": [{"name": "Data"}]}]}}"#;
        let config = build_config(MindmapOptions::default());
        let json = layout_json(body, &config).expect("envelope should lay out");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(value["nodes"][1]["position"]["x"], -100.0);
        assert_eq!(value["nodes"][3]["position"]["y"], 300.0);
        assert_eq!(value["edges"][2]["type"], "mindmapEdge");
    }

    #[test]
    fn options_override_spacing() {
        let options: MindmapOptions =
            serde_json::from_str(r#"{"siblingSpacing": 300, "theme": "plain"}"#).unwrap();
        let config = build_config(options);
        assert_eq!(config.layout.sibling_spacing, 300.0);
        assert_eq!(config.theme.levels.len(), 2);
    }

    #[test]
    fn service_errors_propagate() {
        let config = build_config(MindmapOptions::default());
        let err = layout_json(r#"{"success": false, "error": "PDF file not found"}"#, &config)
            .unwrap_err();
        assert!(err.contains("PDF file not found"));
    }
}
