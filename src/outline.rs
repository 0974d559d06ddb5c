//! Outlines as produced by the document-analysis service.
//!
//! The service answers with one of three shapes: a bare outline object, the
//! `generate-mindmap` envelope (`{"success": true, "mindmap": {...}}`), or raw
//! model output with the JSON object embedded in prose. [`parse_outline`]
//! accepts all three.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_json::error::Category;
use std::fmt;
use thiserror::Error;

/// Label used when a node carries none of `text`, `name` or `title`.
pub const UNNAMED_NODE: &str = "Unnamed Node";

/// Deepest outline [`parse_outline`] accepts; the root is level 0.
pub const MAX_OUTLINE_DEPTH: usize = 128;

// Every level opens an object and its `children` array, plus one for the
// envelope.
const MAX_NESTING: usize = 2 * MAX_OUTLINE_DEPTH + 2;

static JSON_OBJECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)(\{.*\})").unwrap());

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("outline input is empty")]
    Empty,
    #[error("malformed outline: {0}")]
    Malformed(String),
    #[error("analysis service reported an error: {0}")]
    Service(String),
    #[error("outline does not match the expected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// One node of a document outline. Depth is implicit in the nesting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutlineNode {
    #[serde(default, deserialize_with = "label_field")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "label_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "label_field")]
    pub title: Option<String>,
    /// Identifier emitted by the service. Informational only; graph ids are
    /// always synthesized.
    #[serde(default, deserialize_with = "label_field")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = children;
        self
    }

    /// Display label: `text`, then `name`, then `title`, then [`UNNAMED_NODE`].
    /// Empty strings are skipped.
    pub fn label(&self) -> &str {
        [&self.text, &self.name, &self.title]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.is_empty())
            .unwrap_or(UNNAMED_NODE)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Depth of the deepest node; a lone root has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

/// Where an outline came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineSource {
    /// Freshly generated for an uploaded document.
    Generated { filename: String },
    /// A previously generated outline looked up by identifier.
    Stored { id: String },
}

impl fmt::Display for OutlineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlineSource::Generated { filename } => write!(f, "generated:{filename}"),
            OutlineSource::Stored { id } => write!(f, "stored:{id}"),
        }
    }
}

/// Parses a service response body into an outline.
pub fn parse_outline(input: &str) -> Result<OutlineNode, OutlineError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(OutlineError::Empty);
    }
    if nesting_depth(trimmed) > MAX_NESTING {
        return Err(OutlineError::Malformed(format!(
            "outline nesting exceeds {MAX_OUTLINE_DEPTH} levels"
        )));
    }
    let value = match parse_json_value(trimmed) {
        Ok(value) => value,
        Err(whole) => {
            let embedded = JSON_OBJECT_RE
                .captures(trimmed)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .ok_or_else(|| OutlineError::Malformed(format!("no JSON object found ({whole})")))?;
            log::debug!("extracting embedded outline object ({} bytes)", embedded.len());
            parse_json_value(embedded).map_err(|err| {
                OutlineError::Malformed(format!("embedded object is not valid JSON or JSON5: {err}"))
            })?
        }
    };
    outline_from_value(value)
}

/// Converts an already-decoded JSON value (bare outline or envelope).
pub fn outline_from_value(value: Value) -> Result<OutlineNode, OutlineError> {
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(OutlineError::Malformed(format!(
                "expected an object, found {}",
                value_kind(&other)
            )));
        }
    };

    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(OutlineError::Service(message));
    }

    let outline = match map.remove("mindmap") {
        Some(Value::Object(inner)) => inner,
        Some(other) => {
            return Err(OutlineError::Malformed(format!(
                "`mindmap` must be an object, found {}",
                value_kind(&other)
            )));
        }
        None => map,
    };

    if let Some(message) = outline.get("error").and_then(Value::as_str) {
        let has_content = ["text", "name", "title", "children"]
            .iter()
            .any(|key| outline.contains_key(*key));
        if !has_content {
            return Err(OutlineError::Service(message.to_string()));
        }
    }

    serde_json::from_value(Value::Object(outline)).map_err(OutlineError::Shape)
}

/// Strict JSON first; JSON5 only when the text is not JSON syntax at all.
/// The caller bounds nesting, so the recursion limit is lifted here.
fn parse_json_value(input: &str) -> Result<Value, String> {
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let err = match Value::deserialize(&mut de).and_then(|value| de.end().map(|()| value)) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    if err.classify() != Category::Syntax {
        return Err(err.to_string());
    }
    json5::from_str::<Value>(input).map_err(|json5_err| format!("{err}; as JSON5: {json5_err}"))
}

/// Deepest `{`/`[` nesting in `input`, skipping double-quoted strings. If the
/// quotes do not balance, every opening bracket is counted instead.
fn nesting_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for ch in input.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if in_string {
        return input.chars().filter(|ch| matches!(ch, '{' | '[')).count();
    }
    deepest
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn label_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<OutlineNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<OutlineNode>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_through_fields() {
        let node: OutlineNode = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(node.label(), "T");
        let node: OutlineNode = serde_json::from_str(r#"{"name": "N", "title": "T"}"#).unwrap();
        assert_eq!(node.label(), "N");
        let node: OutlineNode =
            serde_json::from_str(r#"{"text": "X", "name": "N", "title": "T"}"#).unwrap();
        assert_eq!(node.label(), "X");
    }

    #[test]
    fn missing_labels_resolve_to_placeholder() {
        let node: OutlineNode = serde_json::from_str(r#"{"children": []}"#).unwrap();
        assert_eq!(node.label(), "Unnamed Node");
        let node: OutlineNode = serde_json::from_str(r#"{"text": "", "name": null}"#).unwrap();
        assert_eq!(node.label(), "Unnamed Node");
    }

    #[test]
    fn numeric_labels_are_stringified() {
        let node: OutlineNode = serde_json::from_str(r#"{"name": 42}"#).unwrap();
        assert_eq!(node.label(), "42");
    }

    #[test]
    fn absent_or_null_children_are_empty() {
        let node = parse_outline(r#"{"name": "root"}"#).unwrap();
        assert!(node.is_leaf());
        let node = parse_outline(r#"{"name": "root", "children": null}"#).unwrap();
        assert!(node.is_leaf());
    }

    #[test]
    fn parses_service_envelope() {
        let input = r#"{"success": true, "mindmap": {"id": "root", "name": "Doc",
            "children": [{"id": "topic1", "name": "Intro"}]}}"#;
        let outline = parse_outline(input).unwrap();
        assert_eq!(outline.label(), "Doc");
        assert_eq!(outline.id.as_deref(), Some("root"));
        assert_eq!(outline.children.len(), 1);
    }

    #[test]
    fn failed_envelope_is_a_service_error() {
        let input = r#"{"success": false, "error": "PDF file not found"}"#;
        match parse_outline(input) {
            Err(OutlineError::Service(message)) => assert_eq!(message, "PDF file not found"),
            other => panic!("unexpected result: {other:?}"),
        }
        let input = r#"{"success": true, "mindmap": {"error": "Failed to extract text"}}"#;
        assert!(matches!(parse_outline(input), Err(OutlineError::Service(_))));
    }

    #[test]
    fn extracts_object_embedded_in_prose() {
        let input = "Here is your mind map:\n```json\n{\"name\": \"Doc\", \"children\": [{\"name\": \"A\"}]}\n```\nEnjoy!";
        let outline = parse_outline(input).unwrap();
        assert_eq!(outline.label(), "Doc");
        assert_eq!(outline.node_count(), 2);
    }

    #[test]
    fn accepts_json5_syntax() {
        let input = "{name: 'Doc', children: [{name: 'A',},],}";
        let outline = parse_outline(input).unwrap();
        assert_eq!(outline.children[0].label(), "A");
    }

    #[test]
    fn rejects_inputs_without_an_object() {
        assert!(matches!(parse_outline("   "), Err(OutlineError::Empty)));
        assert!(matches!(parse_outline("no json here"), Err(OutlineError::Malformed(_))));
        assert!(matches!(parse_outline("[1, 2]"), Err(OutlineError::Malformed(_))));
        assert!(matches!(
            parse_outline(r#"{"mindmap": "text"}"#),
            Err(OutlineError::Malformed(_))
        ));
    }

    fn chain(depth: usize) -> String {
        let mut json = String::new();
        for level in 0..depth {
            json.push_str(&format!(r#"{{"text": "level {level}", "children": ["#));
        }
        json.push_str(r#"{"text": "leaf"}"#);
        for _ in 0..depth {
            json.push_str("]}");
        }
        json
    }

    #[test]
    fn deep_outlines_parse_as_strict_json() {
        let outline = parse_outline(&chain(100)).unwrap();
        assert_eq!(outline.depth(), 100);
        assert_eq!(outline.node_count(), 101);
        let enveloped = format!(r#"{{"success": true, "mindmap": {}}}"#, chain(MAX_OUTLINE_DEPTH));
        assert_eq!(parse_outline(&enveloped).unwrap().depth(), MAX_OUTLINE_DEPTH);
    }

    #[test]
    fn nesting_past_the_limit_is_reported() {
        match parse_outline(&chain(400)) {
            Err(OutlineError::Malformed(message)) => {
                assert_eq!(message, "outline nesting exceeds 128 levels")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            parse_outline(&chain(MAX_OUTLINE_DEPTH + 1)),
            Err(OutlineError::Malformed(_))
        ));
    }

    #[test]
    fn nesting_ignores_brackets_inside_strings() {
        assert_eq!(nesting_depth(r#"{"text": "[[[{{{", "children": []}"#), 2);
        assert_eq!(nesting_depth(r#"{"text": "a \"[[\" b"}"#), 1);
        assert_eq!(nesting_depth(r#"say "hi {"a": [1]}"#), 2);
    }

    #[test]
    fn truncated_json_keeps_the_json_error() {
        match parse_outline(r#"{"name": "root", "children": [{"name": "A"}"#) {
            Err(OutlineError::Malformed(message)) => {
                assert!(message.contains("EOF"), "got {message}")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn wrong_children_type_is_a_shape_error() {
        assert!(matches!(
            parse_outline(r#"{"name": "root", "children": "none"}"#),
            Err(OutlineError::Shape(_))
        ));
    }

    #[test]
    fn counts_nodes_and_depth() {
        let outline = OutlineNode::new("A").with_children(vec![
            OutlineNode::new("B").with_children(vec![OutlineNode::new("D")]),
            OutlineNode::new("C"),
        ]);
        assert_eq!(outline.node_count(), 4);
        assert_eq!(outline.depth(), 2);
    }

    #[test]
    fn source_display() {
        let generated = OutlineSource::Generated {
            filename: "paper.pdf".to_string(),
        };
        assert_eq!(generated.to_string(), "generated:paper.pdf");
        let stored = OutlineSource::Stored { id: "42".to_string() };
        assert_eq!(stored.to_string(), "stored:42");
    }
}
