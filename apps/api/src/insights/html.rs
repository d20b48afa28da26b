//! Converts LLM JSON sections into the small HTML fragments stored on records.
//!
//! Two placeholder policies exist and must stay distinct:
//! property sections fall back to a one-item list, city sections to a paragraph.
//! Generated text is always entity-encoded before it is wrapped in markup.

use ammonia::clean_text;
use serde_json::Value;

pub const PROPERTY_PLACEHOLDER: &str = "<ul><li>Information not available</li></ul>";
pub const CITY_PLACEHOLDER: &str = "<p>Information not available.</p>";

/// Property section: absent/empty → placeholder list, array → one `<li>` per
/// element, any other value → single-item list.
pub fn property_bullets(section: Option<&Value>) -> String {
    match section {
        Some(value) if !is_blank(value) => match value {
            Value::Array(items) => bullet_list(items),
            scalar => format!("<ul><li>{}</li></ul>", display(scalar)),
        },
        _ => PROPERTY_PLACEHOLDER.to_string(),
    }
}

/// City section: array → bullet list, string → paragraph, anything else
/// (absent, empty, numbers, objects) → placeholder paragraph.
pub fn city_bullets(section: Option<&Value>) -> String {
    match section {
        Some(value) if !is_blank(value) => match value {
            Value::Array(items) => bullet_list(items),
            Value::String(text) => format!("<p>{}</p>", clean_text(text)),
            _ => CITY_PLACEHOLDER.to_string(),
        },
        _ => CITY_PLACEHOLDER.to_string(),
    }
}

fn bullet_list(items: &[Value]) -> String {
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", display(item)))
        .collect();
    format!("<ul>{items}</ul>")
}

/// Null, false, zero and empty strings/arrays/objects count as "no data".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => clean_text(s),
        other => clean_text(&other.to_string()),
    }
}
