//! Label sizing for rendered nodes.
//!
//! Widths come from a per-character advance table calibrated against a
//! 16px sans-serif face; no font files are read.

use crate::ir::GraphNode;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

/// Wrapped label of `text` at `font_size`, wrapping at `max_width` pixels.
pub fn measure_label(text: &str, font_size: f32, max_width: f32, line_height: f32) -> TextBlock {
    let mut lines = Vec::new();
    for line in split_lines(text) {
        lines.extend(wrap_line(&line, max_width, font_size));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

/// Label block and box size of a node under `theme`.
pub fn node_box(node: &GraphNode, theme: &Theme) -> (TextBlock, f32, f32) {
    let style = theme.level_style(node.level());
    let label = measure_label(
        node.label(),
        style.font_size,
        theme.max_label_width,
        theme.label_line_height,
    );
    let width = (label.width + style.padding_x * 2.0).max(style.min_width);
    let height = label.height + style.padding_y * 2.0;
    (label, width, height)
}

pub fn node_size(node: &GraphNode, theme: &Theme) -> (f32, f32) {
    let (_, width, height) = node_box(node, theme);
    (width, height)
}

pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'i' | 'j' | 'l' | 'I' => 0.25,
        'f' | 't' | 'r' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        'A'..='Z' => 0.67,
        'a'..='z' => 0.57,
        '1' => 0.396,
        '0'..='9' => 0.6,
        '@' | '#' | '%' | '&' => 0.946,
        c if c.is_ascii() => 0.568,
        // CJK and other wide glyphs
        _ => 1.0,
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

fn wrap_line(line: &str, max_width: f32, font_size: f32) -> Vec<String> {
    if max_width <= 0.0 || text_width(line, font_size) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, font_size) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
