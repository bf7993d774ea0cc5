#![deny(missing_docs)]

//! # Field Descriptors
//!
//! Normalizes a host field definition into the descriptor the schema and
//! discovery layers work with.

use crate::registry::{Cardinality, ContentModel, FieldDefinition};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// A normalized field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its entity type / bundle.
    #[serde(skip)]
    pub name: String,
    /// Human label.
    pub label: Option<String>,
    /// Help text.
    #[serde(skip)]
    pub description: Option<String>,
    /// Field type id (`string`, `entity_reference`, ...).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Typed-data type of the item list.
    pub data_type: String,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Whether the value is computed / immutable.
    #[serde(rename = "readonly")]
    pub read_only: bool,
    /// Storage cardinality.
    pub cardinality: Cardinality,
    /// Type-specific settings, verbatim.
    pub settings: Map<String, Value>,
    /// Whether the field type is an entity reference.
    pub is_reference: bool,
}

/// Maps one host field definition to a [`FieldDescriptor`].
///
/// The reference flag is a capability lookup against the host's field-type
/// registry; unknown field types are treated as non-references.
pub fn map_field(
    name: &str,
    definition: &FieldDefinition,
    model: &dyn ContentModel,
) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        label: definition.label.clone(),
        description: definition.description.clone(),
        field_type: definition.field_type.clone(),
        data_type: definition.data_type.clone(),
        required: definition.required,
        read_only: definition.read_only,
        cardinality: definition.cardinality,
        settings: definition.settings.clone(),
        is_reference: model.is_reference_field_type(&definition.field_type),
    }
}

/// Maps a whole field set, keeping the provider's order.
pub fn map_fields(
    definitions: &IndexMap<String, FieldDefinition>,
    model: &dyn ContentModel,
) -> IndexMap<String, FieldDescriptor> {
    definitions
        .iter()
        .map(|(name, def)| (name.clone(), map_field(name, def, model)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::site;
    use serde_json::json;

    #[test]
    fn test_reference_flag() {
        let snapshot = site();
        let fields = map_fields(&snapshot.base_field_definitions("node"), &snapshot);
        assert!(fields["uid"].is_reference);
        assert!(fields["type"].is_reference);
        assert!(!fields["title"].is_reference);
    }

    #[test]
    fn test_unknown_field_type_is_not_reference() {
        let snapshot = site();
        let def: FieldDefinition =
            serde_json::from_value(json!({"type": "geofield", "label": "Where"})).unwrap();
        let field = map_field("field_where", &def, &snapshot);
        assert!(!field.is_reference);
        assert_eq!(field.name, "field_where");
    }

    #[test]
    fn test_settings_copied_verbatim() {
        let snapshot = site();
        let fields = map_fields(&snapshot.field_definitions("node", "article"), &snapshot);
        assert_eq!(fields["field_image"].settings["default_image"], Value::Null);
        assert_eq!(fields["field_tags"].cardinality, Cardinality::UNLIMITED);
    }

    #[test]
    fn test_serialized_shape() {
        let snapshot = site();
        let fields = map_fields(&snapshot.base_field_definitions("node"), &snapshot);
        let value = serde_json::to_value(&fields["created"]).unwrap();
        assert_eq!(
            value,
            json!({
                "label": "Authored on",
                "type": "created",
                "data_type": "list",
                "required": false,
                "readonly": false,
                "cardinality": 1,
                "settings": {},
                "is_reference": false,
            })
        );
    }
}
