#![deny(missing_docs)]

//! # Discovery Listings
//!
//! Describes the content model for clients that browse it before reading
//! the OpenAPI document: entity types with their REST paths, base fields of
//! one entity type, and the full field set of one bundle.

use crate::error::{AppError, AppResult};
use crate::fields::{map_fields, FieldDescriptor};
use crate::oas::routes::resolve_route;
use crate::registry::{
    bundles_of, Cardinality, ContentModel, EntityTypeDescriptor, MetaKind, RouteRegistry,
};
use crate::schema_generator::validate_scope;
use indexmap::IndexMap;
use serde::Serialize;

/// One entry of the entity type listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityTypeSummary {
    /// Entity type label.
    pub label: String,
    /// `content`, `config` or `other`.
    #[serde(rename = "type")]
    pub kind: MetaKind,
    /// Enabled REST method -> path serving it.
    pub methods: IndexMap<String, String>,
    /// Path template of the bundle info listing.
    pub more: String,
    /// Bundle ids; absent for bundle-less types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundles: Option<Vec<String>>,
}

/// A base field as shown in the entity type info.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseFieldSummary {
    /// Field label.
    pub label: Option<String>,
    /// Field type id.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether a value is mandatory.
    pub required: bool,
    /// Whether the field is computed / not writable.
    pub readonly: bool,
    /// Value count.
    pub cardinality: Cardinality,
}

impl From<FieldDescriptor> for BaseFieldSummary {
    fn from(field: FieldDescriptor) -> Self {
        Self {
            label: field.label,
            field_type: field.field_type,
            required: field.required,
            readonly: field.read_only,
            cardinality: field.cardinality,
        }
    }
}

/// Detail of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityTypeInfo {
    /// Entity type label.
    pub label: String,
    /// `content`, `config` or `other`.
    #[serde(rename = "type")]
    pub kind: MetaKind,
    /// Enabled REST method -> path serving it.
    pub methods: IndexMap<String, String>,
    /// Base fields; content entity types only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, BaseFieldSummary>>,
}

/// Detail of one bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleInfo {
    /// Bundle label.
    pub label: String,
    /// Base and bundle-configured fields.
    pub fields: IndexMap<String, FieldDescriptor>,
}

/// Path template of the bundle info listing of an entity type.
pub fn bundle_info_path(entity_type_id: &str) -> String {
    format!("/entity/types/{}/{{bundle}}", entity_type_id)
}

fn rest_methods(
    routes: &dyn RouteRegistry,
    entity_type: &EntityTypeDescriptor,
) -> IndexMap<String, String> {
    let resource_id = format!("entity:{}", entity_type.id);
    let Some(resource) = routes
        .resource_configs()
        .into_iter()
        .find(|r| r.id == resource_id)
    else {
        return IndexMap::new();
    };

    resource
        .enabled_methods()
        .filter_map(|method| {
            resolve_route(routes, &resource, method)
                .ok()
                .map(|route| (method.to_string(), route.path))
        })
        .collect()
}

/// Every entity type with its REST paths and bundles, keyed by id.
pub fn list_entity_types(
    model: &dyn ContentModel,
    routes: &dyn RouteRegistry,
) -> IndexMap<String, EntityTypeSummary> {
    model
        .entity_type_definitions()
        .into_iter()
        .map(|entity_type| {
            let bundles = entity_type
                .supports_bundles()
                .then(|| bundles_of(model, &entity_type.id).into_keys().collect());
            let summary = EntityTypeSummary {
                label: entity_type.label.clone(),
                kind: entity_type.kind,
                methods: rest_methods(routes, &entity_type),
                more: bundle_info_path(&entity_type.id),
                bundles,
            };
            (entity_type.id, summary)
        })
        .collect()
}

/// Detail of one entity type.
pub fn entity_type_info(
    model: &dyn ContentModel,
    routes: &dyn RouteRegistry,
    entity_type_id: &str,
) -> AppResult<EntityTypeInfo> {
    let entity_type = model.entity_type_definition(entity_type_id).ok_or_else(|| {
        AppError::NotFound(format!("No entity type found: {}", entity_type_id))
    })?;

    let fields = (entity_type.kind == MetaKind::Content).then(|| {
        map_fields(&model.base_field_definitions(entity_type_id), model)
            .into_iter()
            .map(|(name, field)| (name, BaseFieldSummary::from(field)))
            .collect()
    });

    Ok(EntityTypeInfo {
        label: entity_type.label.clone(),
        kind: entity_type.kind,
        methods: rest_methods(routes, &entity_type),
        fields,
    })
}

/// Detail of one bundle of an entity type.
pub fn bundle_info(
    model: &dyn ContentModel,
    entity_type_id: &str,
    bundle: &str,
) -> AppResult<BundleInfo> {
    let (entity_type, descriptor) = validate_scope(model, entity_type_id, Some(bundle))?;
    let label = descriptor.map(|b| b.label).unwrap_or_default();
    Ok(BundleInfo {
        label,
        fields: map_fields(&model.field_definitions(&entity_type.id, bundle), model),
    })
}
