//! Forgiving deserializers for model-authored JSON.
//!
//! Models drift from the requested schema: numbers arrive as strings, lists
//! arrive as a single string, fields come back `null`. These helpers map such
//! drift onto the typed shape instead of failing the whole brief.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::verdict::{clamp_confidence, MutationType, Severity, Verdict};

/// Render a scalar JSON value as text; `null` becomes empty.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Interpret a JSON value as a confidence in `[0, 1]`.
///
/// Accepts numbers and numeric strings (a trailing `%` is read as a
/// percentage). Anything else is `0.0`.
pub fn value_to_confidence(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(pct) => pct.trim().parse::<f64>().map(|v| v / 100.0).unwrap_or(0.0),
                None => s.parse::<f64>().unwrap_or(0.0),
            }
        }
        _ => 0.0,
    };
    clamp_confidence(raw)
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = value_to_text(&value);
    Ok(if text.is_empty() { None } else { Some(text) })
}

pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        other => {
            let single = value_to_text(&other);
            if single.is_empty() {
                Vec::new()
            } else {
                vec![single]
            }
        }
    })
}

pub fn confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_confidence(&value))
}

pub fn verdict<'de, D>(deserializer: D) -> Result<Verdict, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Verdict::parse_lenient(&value_to_text(&value)))
}

pub fn optional_verdict<'de, D>(deserializer: D) -> Result<Option<Verdict>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = value_to_text(&value);
    Ok(if raw.trim().is_empty() {
        None
    } else {
        Some(Verdict::parse_lenient(&raw))
    })
}

pub fn severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Severity::parse_lenient(&value_to_text(&value)))
}

pub fn mutation_types<'de, D>(deserializer: D) -> Result<Vec<MutationType>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = text_list(deserializer)?;
    Ok(labels.iter().map(|s| MutationType::from(s.as_str())).collect())
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "text_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "confidence")]
        confidence: f64,
        #[serde(default, deserialize_with = "severity")]
        severity: Option<Severity>,
    }

    #[test]
    fn test_null_and_missing_fields_default() {
        let probe: Probe = serde_json::from_value(json!({"name": null})).unwrap();
        assert_eq!(probe.name, "");
        assert!(probe.items.is_empty());
        assert_eq!(probe.confidence, 0.0);
        assert_eq!(probe.severity, None);
    }

    #[test]
    fn test_string_where_list_expected() {
        let probe: Probe = serde_json::from_value(json!({"items": "only one"})).unwrap();
        assert_eq!(probe.items, vec!["only one".to_string()]);
    }

    #[test]
    fn test_confidence_forms() {
        assert_eq!(value_to_confidence(&json!(0.8)), 0.8);
        assert_eq!(value_to_confidence(&json!("0.65")), 0.65);
        assert_eq!(value_to_confidence(&json!("85%")), 0.85);
        assert_eq!(value_to_confidence(&json!(3)), 1.0);
        assert_eq!(value_to_confidence(&json!("high")), 0.0);
    }

    #[test]
    fn test_severity_in_struct() {
        let probe: Probe = serde_json::from_value(json!({"severity": "Medium"})).unwrap();
        assert_eq!(probe.severity, Some(Severity::Medium));
    }
}
