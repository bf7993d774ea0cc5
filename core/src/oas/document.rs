#![deny(missing_docs)]

//! # Document Assembly
//!
//! Combines paths, definitions and security definitions into a Swagger 2.0
//! document, optionally scoped to one entity type (and bundle).
//!
//! Failures while walking *all* resources and entity types degrade the
//! affected entry only. Failures about an explicitly requested entity type or
//! bundle propagate to the caller.

use crate::config::DocumentConfig;
use crate::error::{AppError, AppResult};
use crate::oas::models::{DefinitionsMap, OpenApiDocument, PathsMap};
use crate::oas::normalization::scrub_nulls;
use crate::oas::paths::{PathBuilder, ResourceFilter};
use crate::oas::security::build_security_definitions;
use crate::registry::{bundles_of, ContentModel, RouteRegistry};
use crate::schema_generator::{definition_key, validate_scope, JsonSchemaDocument, SchemaBuilder};
use crate::type_mapping::TypeMapperRegistry;
use serde_json::Value;
use tracing::{info, warn};

/// Swagger version emitted in every document.
pub const SWAGGER_VERSION: &str = "2.0";

impl OpenApiDocument {
    /// Serializes the document with `null` leaves replaced by empty strings.
    pub fn to_json(&self) -> AppResult<Value> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| AppError::General(format!("Document serialization failed: {}", e)))?;
        scrub_nulls(&mut value);
        Ok(value)
    }

    /// Pretty JSON text of [`OpenApiDocument::to_json`].
    pub fn to_json_string(&self) -> AppResult<String> {
        serde_json::to_string_pretty(&self.to_json()?)
            .map_err(|e| AppError::General(format!("Document serialization failed: {}", e)))
    }
}

/// Generates documents and schemas from the host registries.
pub struct SpecGenerator<'a> {
    model: &'a dyn ContentModel,
    routes: &'a dyn RouteRegistry,
    mapper: TypeMapperRegistry,
    config: DocumentConfig,
}

impl<'a> SpecGenerator<'a> {
    /// Creates a generator with the built-in type mappers and default config.
    pub fn new(model: &'a dyn ContentModel, routes: &'a dyn RouteRegistry) -> Self {
        Self {
            model,
            routes,
            mapper: TypeMapperRegistry::new(),
            config: DocumentConfig::default(),
        }
    }

    /// Replaces the document config.
    pub fn with_config(mut self, config: DocumentConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the type mapper registry.
    pub fn with_mapper(mut self, mapper: TypeMapperRegistry) -> Self {
        self.mapper = mapper;
        self
    }

    /// The active document config.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    fn schema_builder(&self) -> SchemaBuilder<'_> {
        SchemaBuilder::new(self.model, &self.mapper)
    }

    /// Schema of an entity type or bundle, as served by the schema endpoints.
    ///
    /// A bundle-less entity type is described by its implicit bundle.
    pub fn build_schema(
        &self,
        entity_type_id: &str,
        bundle: Option<&str>,
    ) -> AppResult<JsonSchemaDocument> {
        let (entity_type, _) = validate_scope(self.model, entity_type_id, bundle)?;
        if bundle.is_none() && !entity_type.supports_bundles() {
            return Ok(self.schema_builder().build_implicit_bundle_schema(&entity_type));
        }
        self.schema_builder().build_schema(entity_type_id, bundle)
    }

    /// `paths` for the resources the filter admits.
    pub fn build_paths(&self, filter: ResourceFilter<'_>) -> PathsMap {
        PathBuilder::new(self.model, self.routes).build_paths(filter)
    }

    /// Entity types bound to at least one admitted resource, in resource order.
    pub fn rest_enabled_entity_types(&self, filter: ResourceFilter<'_>) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for resource in self.routes.resource_configs() {
            if !filter.accepts(&resource) {
                continue;
            }
            if let Some(id) = resource.entity_type {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// `definitions` for the REST-enabled entity types the filter admits.
    ///
    /// Each entity type contributes its bare schema plus one schema per
    /// bundle (only the filtered bundle when the filter names one).
    pub fn build_definitions(&self, filter: ResourceFilter<'_>) -> DefinitionsMap {
        let builder = self.schema_builder();
        let mut definitions = DefinitionsMap::new();

        for id in self.rest_enabled_entity_types(filter) {
            let Some(entity_type) = self.model.entity_type_definition(&id) else {
                warn!(entity_type = %id, "resource bound to unknown entity type; definition omitted");
                continue;
            };

            if !entity_type.supports_bundles() {
                definitions.insert(id, builder.build_implicit_bundle_schema(&entity_type));
                continue;
            }

            match builder.build_schema(&id, None) {
                Ok(schema) => {
                    definitions.insert(id.clone(), schema);
                }
                Err(err) => warn!(entity_type = %id, error = %err, "definition omitted"),
            }

            let bundles: Vec<String> = match filter.bundle() {
                Some(b) => vec![b.to_string()],
                None => bundles_of(self.model, &id).into_keys().collect(),
            };
            for bundle in bundles {
                match builder.build_schema(&id, Some(&bundle)) {
                    Ok(schema) => {
                        definitions.insert(definition_key(&id, Some(&bundle)), schema);
                    }
                    Err(err) => warn!(
                        entity_type = %id,
                        bundle = %bundle,
                        error = %err,
                        "definition omitted"
                    ),
                }
            }
        }

        definitions
    }

    /// Builds the document, optionally scoped to an entity type and bundle.
    pub fn build_document(
        &self,
        entity_type: Option<&str>,
        bundle: Option<&str>,
    ) -> AppResult<OpenApiDocument> {
        let filter = match (entity_type, bundle) {
            (Some(entity_type), bundle) => ResourceFilter::Entity {
                entity_type,
                bundle,
            },
            (None, None) => ResourceFilter::All,
            (None, Some(bundle)) => {
                return Err(AppError::General(format!(
                    "Bundle filter '{}' requires an entity type",
                    bundle
                )))
            }
        };
        self.build_filtered_document(filter)
    }

    /// Builds the document covering only resources without an entity binding.
    pub fn build_non_entity_document(&self) -> AppResult<OpenApiDocument> {
        self.build_filtered_document(ResourceFilter::NonEntity)
    }

    /// Builds the document for an arbitrary resource filter.
    pub fn build_filtered_document(
        &self,
        filter: ResourceFilter<'_>,
    ) -> AppResult<OpenApiDocument> {
        if let ResourceFilter::Entity {
            entity_type,
            bundle,
        } = filter
        {
            validate_scope(self.model, entity_type, bundle)?;
        }

        let paths = self.build_paths(filter);
        let definitions = self.build_definitions(filter);
        info!(
            ?filter,
            paths = paths.len(),
            definitions = definitions.len(),
            "document generated"
        );

        Ok(OpenApiDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: self.config.info(),
            host: self.config.host.clone(),
            base_path: self.config.base_path.clone(),
            paths,
            definitions,
            security_definitions: build_security_definitions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::ParamLocation;
    use crate::testing::site;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn keys(definitions: &DefinitionsMap) -> Vec<&str> {
        definitions.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_full_document_definitions() {
        let snapshot = site();
        let doc = SpecGenerator::new(&snapshot, &snapshot)
            .build_document(None, None)
            .unwrap();
        assert_eq!(doc.swagger, "2.0");
        assert_eq!(
            keys(&doc.definitions),
            vec!["node", "node.page", "node.article", "user"]
        );
        assert!(doc.definitions["user"].discriminator.is_none());
        assert!(doc.definitions["user"].properties.contains_key("user_picture"));
        assert_eq!(doc.definitions["node"].discriminator.as_deref(), Some("type"));
    }

    #[test]
    fn test_generic_post_references_bare_definition() {
        let snapshot = site();
        let doc = SpecGenerator::new(&snapshot, &snapshot)
            .build_document(None, None)
            .unwrap();

        let get = &doc.paths["/node/{node}"]["get"];
        assert!(get
            .parameters
            .iter()
            .any(|p| p.name == "node" && p.location == ParamLocation::Path && p.required));

        let post = &doc.paths["/entity/node"]["post"];
        let body = post
            .parameters
            .iter()
            .find(|p| p.location == ParamLocation::Body)
            .unwrap();
        assert_eq!(body.schema.as_ref().unwrap().reference, "#/definitions/node");
    }

    #[test]
    fn test_bundle_scoped_document() {
        let snapshot = site();
        let doc = SpecGenerator::new(&snapshot, &snapshot)
            .build_document(Some("node"), Some("article"))
            .unwrap();
        assert_eq!(keys(&doc.definitions), vec!["node", "node.article"]);
        assert!(!doc.paths.contains_key("/dblog/{id}"));
        let body = &doc.paths["/node/{node}"]["patch"].parameters[2];
        assert_eq!(
            body.schema.as_ref().unwrap().reference,
            "#/definitions/node.article"
        );
    }

    #[test]
    fn test_scope_errors() {
        let snapshot = site();
        let generator = SpecGenerator::new(&snapshot, &snapshot);

        let err = generator.build_document(Some("comment"), None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = generator
            .build_document(Some("node"), Some("blog"))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = generator
            .build_document(Some("user"), Some("user"))
            .unwrap_err();
        assert!(matches!(err, AppError::Unsupported(_)));

        let err = generator.build_document(None, Some("page")).unwrap_err();
        assert!(matches!(err, AppError::General(_)));
    }

    #[test]
    fn test_non_entity_document() {
        let snapshot = site();
        let doc = SpecGenerator::new(&snapshot, &snapshot)
            .build_non_entity_document()
            .unwrap();
        assert_eq!(doc.paths.keys().collect::<Vec<_>>(), vec!["/dblog/{id}"]);
        assert!(doc.definitions.is_empty());
        assert_eq!(doc.security_definitions.len(), 2);
    }

    #[test]
    fn test_config_applied() {
        let snapshot = site();
        let config = DocumentConfig::new("Site", "3")
            .with_origin_str("http://cms.local:8080/api")
            .unwrap();
        let value = SpecGenerator::new(&snapshot, &snapshot)
            .with_config(config)
            .build_non_entity_document()
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(value["info"], json!({"title": "Site", "version": "3"}));
        assert_eq!(value["host"], "cms.local:8080");
        assert_eq!(value["basePath"], "/api");
    }

    #[test]
    fn test_build_schema_for_bundle_less_type_uses_implicit_bundle() {
        let snapshot = site();
        let generator = SpecGenerator::new(&snapshot, &snapshot);
        let user = generator.build_schema("user", None).unwrap();
        assert!(user.properties.contains_key("user_picture"));
        let node = generator.build_schema("node", None).unwrap();
        assert!(!node.properties.contains_key("body"));
    }

    #[test]
    fn test_null_max_length_absent_from_definitions() {
        let snapshot = site();
        let value = SpecGenerator::new(&snapshot, &snapshot)
            .build_document(Some("node"), Some("article"))
            .unwrap()
            .to_json()
            .unwrap();
        assert!(value["definitions"]["node.article"]["properties"]["field_subtitle"]
            .get("maxLength")
            .is_none());
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_dangling_resource_binding_omitted() {
        let mut snapshot = site();
        snapshot.resources[0].entity_type = Some("comment".into());
        let doc = SpecGenerator::new(&snapshot, &snapshot)
            .build_document(None, None)
            .unwrap();
        assert_eq!(keys(&doc.definitions), vec!["user"]);
        assert!(logs_contain("resource bound to unknown entity type"));
    }
}
