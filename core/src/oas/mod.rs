#![deny(missing_docs)]

//! # OpenAPI Generation Module
//!
//! - **models**: Swagger 2.0 document structures.
//! - **routes**: Resolving the concrete route of a resource method.
//! - **security**: Security requirements and the fixed security definitions.
//! - **paths**: Operations per path and method.
//! - **document**: Assembly of scoped documents.
//! - **normalization**: Post-processing of serialized output.

pub mod document;
pub mod models;
pub mod normalization;
pub mod paths;
pub mod routes;
pub mod security;

pub use document::{SpecGenerator, SWAGGER_VERSION};
pub use models::{
    DefinitionsMap, Info, OpenApiDocument, Operation, ParamLocation, Parameter, PathsMap,
    SchemaRef, SecurityDefinitionsMap, SecurityRequirement, SecurityScheme,
};
pub use paths::{PathBuilder, ResourceFilter};
pub use routes::{resolve_route, route_name};
pub use security::{build_security, build_security_definitions};
