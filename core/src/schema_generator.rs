#![deny(missing_docs)]

//! # Schema Generator
//!
//! Builds JSON Schema documents for an entity type or an entity type + bundle
//! pair from the host's field definitions.
//!
//! Base (non-bundle) schemas of bundled entity types carry a `discriminator`
//! naming the bundle key, so consumers know which field selects the concrete
//! bundle schema.

use crate::error::{AppError, AppResult};
use crate::fields::map_fields;
use crate::oas::normalization::scrub_nulls;
use crate::registry::{
    bundles_of, BundleDescriptor, ContentModel, EntityTypeDescriptor, FieldDefinition,
};
use crate::type_mapping::{JsonSchema, TypeMapper};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// A JSON Schema document for one entity type or bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaDocument {
    /// Always `object`.
    #[serde(rename = "type")]
    pub type_: String,
    /// Entity type label, or `<entity label>: <bundle label>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// One entry per field, keyed by field name.
    pub properties: IndexMap<String, JsonSchema>,
    /// Bundle key field name; only on base schemas of bundled entity types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

impl JsonSchemaDocument {
    /// Serializes the schema with `null` leaves replaced by empty strings.
    pub fn to_json(&self) -> AppResult<Value> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| AppError::General(format!("Schema serialization failed: {}", e)))?;
        scrub_nulls(&mut value);
        Ok(value)
    }
}

/// Key of a schema inside `definitions`: `<entity>` or `<entity>.<bundle>`.
pub fn definition_key(entity_type_id: &str, bundle: Option<&str>) -> String {
    match bundle {
        Some(b) => format!("{}.{}", entity_type_id, b),
        None => entity_type_id.to_string(),
    }
}

/// Checks that an entity type exists and, if given, that the bundle belongs to it.
pub fn validate_scope(
    model: &dyn ContentModel,
    entity_type_id: &str,
    bundle: Option<&str>,
) -> AppResult<(EntityTypeDescriptor, Option<BundleDescriptor>)> {
    let entity_type = model.entity_type_definition(entity_type_id).ok_or_else(|| {
        AppError::NotFound(format!("No entity type found: {}", entity_type_id))
    })?;

    let Some(bundle) = bundle else {
        return Ok((entity_type, None));
    };

    if !entity_type.supports_bundles() {
        return Err(AppError::Unsupported(format!(
            "Entity type {} does not support bundles",
            entity_type_id
        )));
    }

    let bundle = bundles_of(model, entity_type_id)
        .shift_remove(bundle)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Bundle {} does not exist for entity type {}",
                bundle, entity_type_id
            ))
        })?;

    Ok((entity_type, Some(bundle)))
}

/// Builds schema documents from a content model.
pub struct SchemaBuilder<'a> {
    model: &'a dyn ContentModel,
    mapper: &'a dyn TypeMapper,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates a builder over a content model and a type mapper.
    pub fn new(model: &'a dyn ContentModel, mapper: &'a dyn TypeMapper) -> Self {
        Self { model, mapper }
    }

    /// Builds the schema of an entity type (base fields) or of one of its
    /// bundles (base + bundle-configured fields).
    pub fn build_schema(
        &self,
        entity_type_id: &str,
        bundle: Option<&str>,
    ) -> AppResult<JsonSchemaDocument> {
        let (entity_type, bundle) = validate_scope(self.model, entity_type_id, bundle)?;

        let schema = match &bundle {
            Some(b) => {
                let definitions = self.model.field_definitions(&entity_type.id, &b.id);
                self.assemble(
                    format!("{}: {}", entity_type.label, b.label),
                    &definitions,
                    None,
                )
            }
            None => {
                let definitions = self.model.base_field_definitions(&entity_type.id);
                self.assemble(
                    entity_type.label.clone(),
                    &definitions,
                    self.discriminator(&entity_type),
                )
            }
        };

        info!(
            entity_type = %entity_type.id,
            bundle = bundle.as_ref().map(|b| b.id.as_str()).unwrap_or("N/A"),
            "schema generated"
        );
        Ok(schema)
    }

    /// Builds the single schema of a bundle-less entity type from the fields
    /// of its implicit bundle, which shares the entity type id.
    pub fn build_implicit_bundle_schema(
        &self,
        entity_type: &EntityTypeDescriptor,
    ) -> JsonSchemaDocument {
        let definitions = self.model.field_definitions(&entity_type.id, &entity_type.id);
        self.assemble(entity_type.label.clone(), &definitions, None)
    }

    fn discriminator(&self, entity_type: &EntityTypeDescriptor) -> Option<String> {
        if !entity_type.supports_bundles() {
            return None;
        }
        let key = entity_type.bundle_key().map(str::to_string);
        if key.is_none() {
            warn!(
                entity_type = %entity_type.id,
                "entity type has bundles but declares no bundle key; discriminator omitted"
            );
        }
        key
    }

    fn assemble(
        &self,
        title: String,
        definitions: &IndexMap<String, FieldDefinition>,
        discriminator: Option<String>,
    ) -> JsonSchemaDocument {
        let properties = map_fields(definitions, self.model)
            .into_iter()
            .map(|(name, field)| {
                let schema = self.mapper.map(&field);
                (name, schema)
            })
            .collect();

        JsonSchemaDocument {
            type_: "object".to_string(),
            title: Some(title).filter(|t| !t.is_empty()),
            properties,
            discriminator,
        }
    }
}
