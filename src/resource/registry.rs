//! Resource Registry - Load resource definitions from JSON
//!
//! Tables and forms are data driven: each club collection declares its
//! columns, form fields, required flags and option sources in an embedded
//! JSON file, loaded once on first access.

use crate::model::{parse_timestamp, Draft, ResourceKind};
use chrono::{NaiveDate, SecondsFormat};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/club.json")];

/// Color definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColorDef {
    pub value: String,
    pub color: [u8; 3],
}

/// How a cell value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    Date,
    DateTime,
}

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
    #[serde(default)]
    pub color_map: Option<String>,
    /// Resolve the ids found at `json_path` to names from this resource
    #[serde(default)]
    pub lookup: Option<String>,
    #[serde(default)]
    pub format: Option<CellFormat>,
}

/// Input kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Date,
    DateTime,
    Select,
    MultiSelect,
    Choice,
}

impl FieldKind {
    /// True when the field picks from a list instead of taking typed text
    pub fn is_option(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect | Self::Choice)
    }
}

/// Form field definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Resource key whose records populate select/multiselect options
    #[serde(default)]
    pub options_from: Option<String>,
    /// Fixed values for `choice` fields
    #[serde(default)]
    pub choices: Vec<String>,
}

impl FieldDef {
    /// Normalize a raw input value for storage in a draft
    ///
    /// `Ok(Value::Null)` clears the key. `Err` means the input is rejected
    /// and the draft must stay as it was.
    pub fn normalize(&self, value: Value) -> Result<Value, String> {
        match self.kind {
            FieldKind::Text | FieldKind::Email => match value {
                Value::Null | Value::String(_) => Ok(value),
                other => Ok(Value::String(other.to_string())),
            },
            FieldKind::Date => match value {
                Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
                Value::String(s) => Ok(Value::String(truncate_to_date(&s))),
                Value::Null => Ok(Value::Null),
                other => Err(format!("{} expects a date, got {}", self.label, other)),
            },
            FieldKind::DateTime => match value {
                Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
                Value::String(_) | Value::Null => Ok(value),
                other => Err(format!("{} expects a date and time, got {}", self.label, other)),
            },
            FieldKind::Select => match value {
                Value::Null => Ok(Value::Null),
                Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
                other => to_id(&other)
                    .map(Value::from)
                    .ok_or_else(|| format!("{} expects an id", self.label)),
            },
            FieldKind::MultiSelect => match value {
                Value::Null => Ok(Value::Array(Vec::new())),
                Value::Array(items) => {
                    let mut ids: Vec<i64> = Vec::with_capacity(items.len());
                    for item in &items {
                        let id = to_id(item)
                            .ok_or_else(|| format!("{} expects a list of ids", self.label))?;
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                    Ok(Value::from(ids))
                },
                other => Err(format!("{} expects a list of ids, got {}", self.label, other)),
            },
            FieldKind::Choice => match value {
                Value::Null => Ok(Value::Null),
                Value::String(s) if s.is_empty() => Ok(Value::Null),
                Value::String(s) if self.choices.iter().any(|c| *c == s) => Ok(Value::String(s)),
                _ => Err(format!(
                    "{} must be one of: {}",
                    self.label,
                    self.choices.join(", ")
                )),
            },
        }
    }
}

fn to_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Keep only the `YYYY-MM-DD` part of an ISO-8601 timestamp
fn truncate_to_date(raw: &str) -> String {
    let head: String = raw.chars().take(10).collect();
    if raw.chars().count() > 10 && NaiveDate::parse_from_str(&head, "%Y-%m-%d").is_ok() {
        head
    } else {
        raw.to_string()
    }
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Singular name used in messages ("team", "event")
    pub entity_name: String,
    pub name_field: String,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

fn default_items_per_page() -> usize {
    10
}

impl ResourceDef {
    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// First required field left blank, as a user-facing message
    pub fn check_required(&self, draft: &Draft) -> Result<(), String> {
        match self
            .fields
            .iter()
            .find(|f| f.required && draft.is_blank(&f.key))
        {
            Some(field) => Err(format!("{} is required.", field.label)),
            None => Ok(()),
        }
    }

    /// Payload to send: date-time fields converted to RFC 3339 UTC
    pub fn finalize(&self, draft: &Draft) -> Draft {
        let mut out = draft.clone();
        for field in self.fields.iter().filter(|f| f.kind == FieldKind::DateTime) {
            if let Some(ts) = draft.str(&field.key).and_then(parse_timestamp) {
                out.set(
                    &field.key,
                    Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
                );
            }
        }
        out
    }

    /// Resource keys referenced by option fields and lookup columns
    pub fn reference_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        let from_fields = self.fields.iter().filter_map(|f| f.options_from.as_deref());
        let from_columns = self.columns.iter().filter_map(|c| c.lookup.as_deref());
        for key in from_fields.chain(from_columns) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub color_maps: HashMap<String, Vec<ColorDef>>,
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            color_maps: HashMap::new(),
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.color_maps.extend(partial.color_maps);
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Definition of one of the club collections
///
/// Every [`ResourceKind`] has an embedded definition.
pub fn definition(kind: ResourceKind) -> &'static ResourceDef {
    get_resource(kind.key())
        .unwrap_or_else(|| panic!("No embedded resource definition for '{}'", kind.key()))
}

/// Get a color map by name
pub fn get_color_map(name: &str) -> Option<&'static Vec<ColorDef>> {
    get_registry().color_maps.get(name)
}

/// Get color for a value based on color map name
pub fn get_color_for_value(color_map_name: &str, value: &str) -> Option<[u8; 3]> {
    get_color_map(color_map_name)?
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_kind_has_a_definition() {
        for kind in ResourceKind::ALL {
            let def = definition(kind);
            assert!(!def.entity_name.is_empty(), "{} has no entity name", kind.key());
            assert!(!def.columns.is_empty(), "{} has no columns", kind.key());
            assert!(!def.fields.is_empty(), "{} has no fields", kind.key());
        }
    }

    #[test]
    fn test_option_sources_exist() {
        for kind in ResourceKind::ALL {
            for key in definition(kind).reference_keys() {
                assert!(get_resource(key).is_some(), "unknown reference '{}'", key);
            }
        }
    }

    #[test]
    fn test_teams_layout() {
        let def = definition(ResourceKind::Teams);
        assert_eq!(def.items_per_page, 9);
        assert_eq!(def.entity_name, "team");
        assert_eq!(def.reference_keys(), vec!["coaches", "students"]);
        assert_eq!(def.field("studentIds").unwrap().kind, FieldKind::MultiSelect);
    }

    #[test]
    fn test_event_type_colors() {
        assert_eq!(get_color_for_value("event_type", "match"), Some([255, 107, 107]));
        assert_eq!(get_color_for_value("event_type", "training"), Some([108, 99, 255]));
        assert_eq!(get_color_for_value("event_type", "friendly"), None);
    }

    #[test]
    fn test_check_required() {
        let def = definition(ResourceKind::Teams);
        assert_eq!(
            def.check_required(&Draft::new()).unwrap_err(),
            "Team Name is required."
        );
        assert!(def.check_required(&Draft::new().with("name", "U12 Reds")).is_ok());
    }

    #[test]
    fn test_multiselect_converts_and_dedupes() {
        let field = definition(ResourceKind::Teams).field("studentIds").unwrap();
        assert_eq!(field.normalize(json!(["3", 7, 3])).unwrap(), json!([3, 7]));
        assert!(field.normalize(json!(["x"])).is_err());
    }

    #[test]
    fn test_date_is_truncated() {
        let field = definition(ResourceKind::Students).field("dateOfBirth").unwrap();
        assert_eq!(
            field.normalize(json!("2012-04-09T00:00:00.000Z")).unwrap(),
            json!("2012-04-09")
        );
        assert_eq!(field.normalize(json!("2012-0")).unwrap(), json!("2012-0"));
    }

    #[test]
    fn test_choice_rejects_unknown() {
        let field = definition(ResourceKind::Events).field("type").unwrap();
        assert_eq!(field.normalize(json!("match")).unwrap(), json!("match"));
        assert!(field.normalize(json!("friendly")).is_err());
    }

    #[test]
    fn test_finalize_converts_datetimes() {
        let def = definition(ResourceKind::Events);
        let draft = Draft::new()
            .with("startDate", "2026-10-03T14:00")
            .with("name", "Derby");
        let out = def.finalize(&draft);
        assert_eq!(out.str("startDate"), Some("2026-10-03T14:00:00.000Z"));
        assert_eq!(out.str("name"), Some("Derby"));
    }
}
