#![deny(missing_docs)]

//! # Contentdoc Core
//!
//! Introspects a CMS content model and its REST routing table and produces
//! a Swagger 2.0 document plus per-entity / per-bundle JSON Schemas.

/// Shared error types.
pub mod error;

/// Host registry interfaces and the in-memory snapshot.
pub mod registry;

/// Field descriptor normalization.
pub mod fields;

/// Type mapping logic (field type -> JSON Schema).
pub mod type_mapping;

/// JSON Schema generation.
pub mod schema_generator;

/// OpenAPI (Swagger 2.0) generation.
pub mod oas;

/// Document metadata configuration.
pub mod config;

/// Entity type / bundle discovery listings.
pub mod discovery;

/// Swagger UI pages and the documentation index.
pub mod viewer;

#[cfg(test)]
mod testing;

pub use config::DocumentConfig;
pub use discovery::{bundle_info, entity_type_info, list_entity_types};
pub use error::{AppError, AppResult};
pub use oas::{OpenApiDocument, ResourceFilter, SpecGenerator};
pub use registry::{ContentModel, RegistrySnapshot, RouteRegistry};
pub use schema_generator::{JsonSchemaDocument, SchemaBuilder};
pub use type_mapping::{JsonSchema, TypeMapper, TypeMapperRegistry};
pub use viewer::{
    documentation_index, render_index_page, render_viewer_page, spec_url, SwaggerUiConfig,
};
