use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static FALLBACK_LEVEL: Lazy<LevelStyle> = Lazy::new(|| LevelStyle {
    fill: "#FFFFFF".to_string(),
    fill_end: "#FFFFFF".to_string(),
    text_color: "#1C2430".to_string(),
    font_size: 14.0,
    font_weight: 400,
    corner_radius: 4.0,
    padding_x: 12.0,
    padding_y: 8.0,
    min_width: 0.0,
});

/// Look of one depth level. The last entry of [`Theme::levels`] is reused for
/// every deeper level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStyle {
    pub fill: String,
    pub fill_end: String,
    pub text_color: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub corner_radius: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub min_width: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub line_color: String,
    pub line_width: f32,
    pub border_color: String,
    pub label_line_height: f32,
    /// Labels wrap once a line grows past this many pixels.
    pub max_label_width: f32,
    /// Index 0 styles the root.
    pub levels: Vec<LevelStyle>,
}

impl Theme {
    pub fn indigo() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            line_color: "#6366F1".to_string(),
            line_width: 2.0,
            border_color: "rgba(255, 255, 255, 0.2)".to_string(),
            label_line_height: 1.4,
            max_label_width: 160.0,
            levels: vec![
                LevelStyle {
                    fill: "#4338CA".to_string(),
                    fill_end: "#6366F1".to_string(),
                    text_color: "#FFFFFF".to_string(),
                    font_size: 16.0,
                    font_weight: 600,
                    corner_radius: 10.0,
                    padding_x: 22.0,
                    padding_y: 14.0,
                    min_width: 200.0,
                },
                LevelStyle {
                    fill: "#6366F1".to_string(),
                    fill_end: "#818CF8".to_string(),
                    text_color: "#FFFFFF".to_string(),
                    font_size: 14.0,
                    font_weight: 500,
                    corner_radius: 8.0,
                    padding_x: 18.0,
                    padding_y: 10.0,
                    min_width: 0.0,
                },
                LevelStyle {
                    fill: "#0D9488".to_string(),
                    fill_end: "#2DD4BF".to_string(),
                    text_color: "#FFFFFF".to_string(),
                    font_size: 12.0,
                    font_weight: 400,
                    corner_radius: 6.0,
                    padding_x: 14.0,
                    padding_y: 8.0,
                    min_width: 0.0,
                },
                LevelStyle {
                    fill: "#9333EA".to_string(),
                    fill_end: "#C084FC".to_string(),
                    text_color: "#FFFFFF".to_string(),
                    font_size: 12.0,
                    font_weight: 400,
                    corner_radius: 5.0,
                    padding_x: 12.0,
                    padding_y: 6.0,
                    min_width: 0.0,
                },
            ],
        }
    }

    pub fn plain() -> Self {
        let level = |font_size: f32, font_weight: u16, padding: f32, min_width: f32| LevelStyle {
            fill: "#FFFFFF".to_string(),
            fill_end: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            font_size,
            font_weight,
            corner_radius: 4.0,
            padding_x: padding * 1.5,
            padding_y: padding,
            min_width,
        };
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            line_color: "#333333".to_string(),
            line_width: 1.4,
            border_color: "#333333".to_string(),
            label_line_height: 1.4,
            max_label_width: 160.0,
            levels: vec![level(16.0, 600, 12.0, 200.0), level(14.0, 400, 8.0, 0.0)],
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "indigo" | "default" => Some(Self::indigo()),
            "plain" | "neutral" => Some(Self::plain()),
            _ => None,
        }
    }

    /// Style for `level`. A theme with no levels falls back to a plain box.
    pub fn level_style(&self, level: usize) -> &LevelStyle {
        let last = self.levels.len().saturating_sub(1);
        self.levels.get(level.min(last)).unwrap_or(&*FALLBACK_LEVEL)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::indigo()
    }
}
