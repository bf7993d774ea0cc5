#![deny(missing_docs)]

//! # Registry Snapshot
//!
//! A frozen, serde-loadable copy of a host's content model and routing table.
//! Implements both [`ContentModel`] and [`RouteRegistry`], so a site exported
//! to JSON/YAML can be documented without the host running.

use crate::error::{AppError, AppResult};
use crate::registry::models::{
    BundleDescriptor, EntityTypeDescriptor, FieldDefinition, ResourceDescriptor, RouteDescriptor,
};
use crate::registry::{ContentModel, RouteRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Whole-site snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Entity types with their fields and bundles.
    #[serde(default)]
    pub entity_types: Vec<EntityTypeEntry>,
    /// Field types that are (or derive from) the entity-reference field type.
    #[serde(default = "default_reference_field_types")]
    pub reference_field_types: Vec<String>,
    /// Enabled REST resources, in registration order.
    #[serde(default)]
    pub resources: Vec<ResourceDescriptor>,
    /// The routing table.
    #[serde(default)]
    pub routes: Vec<RouteDescriptor>,
}

fn default_reference_field_types() -> Vec<String> {
    ["entity_reference", "file", "image"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// One entity type plus the field data hanging off it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeEntry {
    /// The entity type itself.
    #[serde(flatten)]
    pub definition: EntityTypeDescriptor,
    /// Base fields shared by every bundle.
    #[serde(default)]
    pub base_fields: IndexMap<String, FieldDefinition>,
    /// Fields configured on the implicit bundle of a bundle-less type.
    #[serde(default)]
    pub fields: IndexMap<String, FieldDefinition>,
    /// Bundles, when `bundle_entity_type` is set.
    #[serde(default)]
    pub bundles: Vec<BundleEntry>,
}

/// One bundle plus its configured fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEntry {
    /// The bundle itself.
    #[serde(flatten)]
    pub bundle: BundleDescriptor,
    /// Fields configured on this bundle only.
    #[serde(default)]
    pub fields: IndexMap<String, FieldDefinition>,
}

impl RegistrySnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::General(format!("Failed to parse registry JSON: {}", e)))
    }

    /// Parses a snapshot from YAML.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::General(format!("Failed to parse registry YAML: {}", e)))
    }

    /// Loads a snapshot file; `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    fn entry(&self, entity_type_id: &str) -> Option<&EntityTypeEntry> {
        self.entity_types
            .iter()
            .find(|e| e.definition.id == entity_type_id)
    }
}

impl ContentModel for RegistrySnapshot {
    fn entity_type_definition(&self, id: &str) -> Option<EntityTypeDescriptor> {
        self.entry(id).map(|e| e.definition.clone())
    }

    fn entity_type_definitions(&self) -> Vec<EntityTypeDescriptor> {
        self.entity_types
            .iter()
            .map(|e| e.definition.clone())
            .collect()
    }

    fn bundle_entity_type_id(&self, entity_type_id: &str) -> Option<String> {
        self.entry(entity_type_id)
            .and_then(|e| e.definition.bundle_entity_type.clone())
    }

    fn bundles(&self, bundle_entity_type_id: &str) -> IndexMap<String, BundleDescriptor> {
        self.entity_types
            .iter()
            .filter(|e| e.definition.bundle_entity_type.as_deref() == Some(bundle_entity_type_id))
            .flat_map(|e| e.bundles.iter())
            .map(|b| (b.bundle.id.clone(), b.bundle.clone()))
            .collect()
    }

    fn base_field_definitions(&self, entity_type_id: &str) -> IndexMap<String, FieldDefinition> {
        self.entry(entity_type_id)
            .map(|e| e.base_fields.clone())
            .unwrap_or_default()
    }

    fn field_definitions(
        &self,
        entity_type_id: &str,
        bundle: &str,
    ) -> IndexMap<String, FieldDefinition> {
        let Some(entry) = self.entry(entity_type_id) else {
            return IndexMap::new();
        };
        let mut fields = entry.base_fields.clone();
        if entry.definition.supports_bundles() {
            if let Some(b) = entry.bundles.iter().find(|b| b.bundle.id == bundle) {
                fields.extend(b.fields.clone());
            }
        } else if bundle == entity_type_id {
            fields.extend(entry.fields.clone());
        }
        fields
    }

    fn is_reference_field_type(&self, field_type_id: &str) -> bool {
        self.reference_field_types.iter().any(|t| t == field_type_id)
    }
}

impl RouteRegistry for RegistrySnapshot {
    fn resource_configs(&self) -> Vec<ResourceDescriptor> {
        self.resources.clone()
    }

    fn routes_by_name(&self, name: &str) -> Vec<RouteDescriptor> {
        self.routes.iter().filter(|r| r.name == name).cloned().collect()
    }

    fn routes_for_resource(&self, resource_id: &str) -> Vec<RouteDescriptor> {
        self.routes
            .iter()
            .filter(|r| r.resource.as_deref() == Some(resource_id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HttpMethod;
    use crate::testing::site;

    #[test]
    fn test_bundles_lookup_by_bundle_entity_type() {
        let snapshot = site();
        let bundles = snapshot.bundles("node_type");
        assert_eq!(bundles.keys().collect::<Vec<_>>(), vec!["page", "article"]);
        assert!(snapshot.bundles("user_type").is_empty());
    }

    #[test]
    fn test_bundle_fields_extend_base_fields() {
        let snapshot = site();
        let base = snapshot.base_field_definitions("node");
        let article = snapshot.field_definitions("node", "article");
        assert!(!base.contains_key("field_tags"));
        assert!(article.contains_key("field_tags"));
        assert!(base.keys().all(|k| article.contains_key(k)));
    }

    #[test]
    fn test_implicit_bundle_fields() {
        let snapshot = site();
        let fields = snapshot.field_definitions("user", "user");
        assert!(fields.contains_key("user_picture"));
        assert!(!snapshot.base_field_definitions("user").contains_key("user_picture"));
    }

    #[test]
    fn test_reference_types_default() {
        let snapshot = RegistrySnapshot::from_json_str("{}").unwrap();
        assert!(snapshot.is_reference_field_type("entity_reference"));
        assert!(snapshot.is_reference_field_type("image"));
        assert!(!snapshot.is_reference_field_type("string"));
    }

    #[test]
    fn test_routes_queries() {
        let snapshot = site();
        let by_name = snapshot.routes_by_name("rest.entity.node.GET");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].path, "/node/{node}");

        let own = snapshot.routes_for_resource("dblog");
        assert_eq!(own.len(), 1);
        assert!(own[0].allows(HttpMethod::Get));
    }

    #[test]
    fn test_invalid_yaml_is_general_error() {
        let err = RegistrySnapshot::from_yaml_str("entity_types: [").unwrap_err();
        assert!(matches!(err, AppError::General(_)));
    }
}
