#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts field descriptors into JSON Schema fragments.
//! Mappers are plain functions keyed by field type id; anything unregistered
//! goes through the fallback, which never fails.

use crate::fields::FieldDescriptor;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// A JSON Schema fragment describing one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchema {
    /// The JSON type (or, for unmapped field types, the field type id).
    #[serde(rename = "type")]
    pub type_: String,
    /// Human label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional format specifier (e.g., "email", "date-time").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Item schema for multi-valued fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
    /// Upper bound for bounded multi-valued fields. Never set for unbounded ones.
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Mapper-specific keywords copied from field settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JsonSchema {
    /// A bare `{type: ...}` fragment.
    pub fn of_type(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            description: None,
            format: None,
            items: None,
            max_items: None,
            extra: Map::new(),
        }
    }

    /// Sets the format specifier.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Signature of a single-type mapper.
pub type MapFn = fn(&FieldDescriptor) -> JsonSchema;

/// Trait for converting field descriptors to JSON Schemas.
pub trait TypeMapper {
    /// Maps a field to its schema fragment.
    fn map(&self, field: &FieldDescriptor) -> JsonSchema;
}

/// Registry of per-type mappers with a fallback.
#[derive(Clone)]
pub struct TypeMapperRegistry {
    mappers: HashMap<String, MapFn>,
    fallback: MapFn,
}

impl Default for TypeMapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapperRegistry {
    /// A registry pre-loaded with the built-in field type mappers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for id in [
            "string_long",
            "uuid",
            "text",
            "text_long",
            "text_with_summary",
            "language",
            "password",
            "list_string",
        ] {
            registry.register(id, plain_string);
        }
        registry.register("string", bounded_string);
        registry.register("email", |_| JsonSchema::of_type("string").with_format("email"));
        registry.register("uri", |_| JsonSchema::of_type("string").with_format("uri"));
        registry.register("link", |_| JsonSchema::of_type("string").with_format("uri"));
        for id in ["created", "changed", "timestamp", "datetime"] {
            registry.register(id, date_time);
        }
        for id in ["integer", "list_integer"] {
            registry.register(id, |_| JsonSchema::of_type("integer"));
        }
        for id in ["float", "decimal", "list_float"] {
            registry.register(id, |_| JsonSchema::of_type("number"));
        }
        registry.register("boolean", |_| JsonSchema::of_type("boolean"));
        registry
    }

    /// A registry with no specialized mappers; every type uses the fallback.
    pub fn empty() -> Self {
        Self {
            mappers: HashMap::new(),
            fallback,
        }
    }

    /// Adds (or replaces) the mapper for a field type id.
    pub fn register(&mut self, field_type: impl Into<String>, mapper: MapFn) -> &mut Self {
        self.mappers.insert(field_type.into(), mapper);
        self
    }

    /// The mapper used for a field type id.
    pub fn mapper_for(&self, field_type: &str) -> MapFn {
        match self.mappers.get(field_type) {
            Some(mapper) => *mapper,
            None => {
                debug!(field_type, "no type mapper registered; using fallback");
                self.fallback
            }
        }
    }
}

impl TypeMapper for TypeMapperRegistry {
    fn map(&self, field: &FieldDescriptor) -> JsonSchema {
        let mut schema = (self.mapper_for(&field.field_type))(field);
        if field.cardinality.is_multiple() {
            schema = JsonSchema {
                items: Some(Box::new(schema)),
                max_items: field.cardinality.max_items(),
                ..JsonSchema::of_type("array")
            };
        }
        if schema.title.is_none() {
            schema.title = field.label.clone().filter(|l| !l.is_empty());
        }
        if schema.description.is_none() {
            schema.description = field.description.clone().filter(|d| !d.is_empty());
        }
        schema
    }
}

// Mapper functions

fn fallback(field: &FieldDescriptor) -> JsonSchema {
    JsonSchema::of_type(field.field_type.clone())
}

fn plain_string(_: &FieldDescriptor) -> JsonSchema {
    JsonSchema::of_type("string")
}

fn bounded_string(field: &FieldDescriptor) -> JsonSchema {
    let mut schema = JsonSchema::of_type("string");
    // maxLength must be a non-negative integer; other settings are dropped.
    if let Some(max) = field.settings.get("max_length").and_then(|m| m.as_u64()) {
        schema.extra.insert("maxLength".to_string(), max.into());
    }
    schema
}

fn date_time(_: &FieldDescriptor) -> JsonSchema {
    JsonSchema::of_type("string").with_format("date-time")
}
