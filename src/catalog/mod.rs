//! Catalog of searchable items.
//!
//! A [`CatalogItem`] exposes the fields the search core reads (`id`, `description`,
//! `tags`) and keeps the whole source object, so serialization reproduces every
//! display field in its original key order. The built-in event list is compiled into
//! the binary from `events.json`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CatalogError;

const BUILTIN_EVENTS: &str = include_str!("events.json");

/// An immutable catalog record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CatalogItem {
    id: i64,
    description: String,
    tags: Vec<String>,
    /// The source object, display payload included, never inspected by search.
    fields: Map<String, Value>,
}

impl CatalogItem {
    pub fn new(id: i64, description: impl Into<String>, tags: &[&str]) -> Self {
        let description = description.into();
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        let mut fields = Map::new();
        fields.insert("id".into(), Value::from(id));
        fields.insert("description".into(), Value::from(description.clone()));
        fields.insert("tags".into(), Value::from(tags.clone()));
        Self {
            id,
            description,
            tags,
            fields,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Every field of the source object, in source order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Text sent to the embedding provider: description followed by space-joined tags.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.description, self.tags.join(" "))
    }

    /// The `title` display field, if present.
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }
}

impl TryFrom<Map<String, Value>> for CatalogItem {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = fields
            .get("id")
            .and_then(Value::as_i64)
            .ok_or("catalog item needs an integer `id`")?;
        let description = fields
            .get("description")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("catalog item {id} needs a string `description`"))?
            .to_string();
        let tags = match fields.get("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| format!("catalog item {id} has a non-string tag"))?,
            Some(_) => return Err(format!("catalog item {id} has non-array `tags`")),
        };
        Ok(Self {
            id,
            description,
            tags,
            fields,
        })
    }
}

impl Serialize for CatalogItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Parse the events compiled into the binary.
pub fn builtin() -> Result<Vec<CatalogItem>, CatalogError> {
    parse(BUILTIN_EVENTS)
}

/// Load a catalog from a JSON array file.
pub fn load(path: &Path) -> Result<Vec<CatalogItem>, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&contents)
}

/// Parse and validate a JSON array of catalog items.
pub fn parse(json: &str) -> Result<Vec<CatalogItem>, CatalogError> {
    let items: Vec<CatalogItem> = serde_json::from_str(json)?;
    validate(&items)?;
    Ok(items)
}

fn validate(items: &[CatalogItem]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            return Err(CatalogError::DuplicateId(item.id));
        }
        if item.description.trim().is_empty() {
            return Err(CatalogError::EmptyDescription(item.id));
        }
    }
    Ok(())
}
