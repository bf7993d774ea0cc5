#![deny(missing_docs)]

//! # Path Builder
//!
//! Walks the registered REST resources and turns every enabled method into a
//! Swagger operation under the path of the route that serves it.
//!
//! Parameters are merged in a fixed order: the `_format` query parameter
//! first, then entity parameters (entity resources) or one string parameter
//! per path placeholder (everything else).

use crate::error::{AppError, AppResult};
use crate::oas::models::{Operation, ParamLocation, Parameter, PathsMap, SchemaRef};
use crate::oas::routes::resolve_route;
use crate::oas::security::build_security;
use crate::registry::{
    ContentModel, EntityTypeDescriptor, HttpMethod, ResourceDescriptor, RouteDescriptor,
    RouteRegistry,
};
use crate::schema_generator::definition_key;
use tracing::warn;

/// Media type of entity request and response bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Name of the query parameter selecting the serialization format.
pub const FORMAT_PARAMETER: &str = "_format";

/// Which resources a document covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceFilter<'a> {
    /// Every registered resource.
    #[default]
    All,
    /// Every entity-bound resource.
    Entities,
    /// Resources without an entity binding.
    NonEntity,
    /// Resources bound to one entity type, optionally narrowed to a bundle.
    Entity {
        /// Entity type id.
        entity_type: &'a str,
        /// Bundle id; body parameters then reference the bundle schema.
        bundle: Option<&'a str>,
    },
}

impl ResourceFilter<'_> {
    /// Whether a resource belongs in the document.
    pub fn accepts(&self, resource: &ResourceDescriptor) -> bool {
        match self {
            ResourceFilter::All => true,
            ResourceFilter::Entities => resource.is_entity(),
            ResourceFilter::NonEntity => !resource.is_entity(),
            ResourceFilter::Entity { entity_type, .. } => {
                resource.entity_type.as_deref() == Some(*entity_type)
            }
        }
    }

    /// The bundle the document is scoped to.
    pub fn bundle(&self) -> Option<&str> {
        match self {
            ResourceFilter::Entity { bundle, .. } => *bundle,
            _ => None,
        }
    }
}

/// The required `_format` query parameter of a method.
///
/// A default is only advertised when exactly one format is supported.
pub fn format_parameter(formats: &[String]) -> Parameter {
    Parameter {
        name: FORMAT_PARAMETER.to_string(),
        location: ParamLocation::Query,
        description: None,
        required: true,
        param_type: Some("string".to_string()),
        allowed: formats.to_vec(),
        default: match formats {
            [only] => Some(only.clone()),
            _ => None,
        },
        schema: None,
    }
}

/// Parameters identifying / carrying an entity for one method.
///
/// `GET`, `DELETE` and `PATCH` take the entity id in the path; `POST` and
/// `PATCH` take the entity in the body.
pub fn entity_parameters(
    entity_type: &EntityTypeDescriptor,
    method: HttpMethod,
    bundle: Option<&str>,
) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    if matches!(
        method,
        HttpMethod::Get | HttpMethod::Delete | HttpMethod::Patch
    ) {
        parameters.push(Parameter::path(entity_type.id.clone()).with_description(format!(
            "The {} of the {}",
            entity_type.id_key(),
            entity_type.id
        )));
    }
    if matches!(method, HttpMethod::Post | HttpMethod::Patch) {
        let key = definition_key(&entity_type.id, bundle);
        parameters.push(
            Parameter::body("body", SchemaRef::definition(&key))
                .with_description(format!("The {} entity", entity_type.label)),
        );
    }
    parameters
}

/// One string path parameter per placeholder of the route template.
pub fn path_variable_parameters(route: &RouteDescriptor) -> Vec<Parameter> {
    route
        .path_variables()
        .into_iter()
        .map(Parameter::path)
        .collect()
}

/// `Get a Content`, `Delete a User`, ...
fn entity_summary(method: HttpMethod, label: &str) -> String {
    let lower = method.swagger_key();
    let mut chars = lower.chars();
    let verb = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} a {}", verb, label)
}

/// Builds `paths` from the routing registry.
pub struct PathBuilder<'a> {
    model: &'a dyn ContentModel,
    routes: &'a dyn RouteRegistry,
}

impl<'a> PathBuilder<'a> {
    /// Creates a builder over the host registries.
    pub fn new(model: &'a dyn ContentModel, routes: &'a dyn RouteRegistry) -> Self {
        Self { model, routes }
    }

    /// Builds every operation the filter admits.
    ///
    /// A method whose route cannot be resolved is logged and left out; the
    /// rest of the document is unaffected.
    pub fn build_paths(&self, filter: ResourceFilter<'_>) -> PathsMap {
        let mut paths = PathsMap::new();

        for resource in self.routes.resource_configs() {
            if !filter.accepts(&resource) {
                continue;
            }
            for method in resource.enabled_methods() {
                match self.build_operation(&resource, method, filter.bundle()) {
                    Ok((path, operation)) => {
                        paths
                            .entry(path)
                            .or_default()
                            .insert(method.swagger_key(), operation);
                    }
                    Err(err) => warn!(
                        resource = %resource.id,
                        %method,
                        error = %err,
                        "method omitted from paths"
                    ),
                }
            }
        }

        paths
    }

    /// Builds the operation for one resource method, returning it with its path.
    pub fn build_operation(
        &self,
        resource: &ResourceDescriptor,
        method: HttpMethod,
        bundle: Option<&str>,
    ) -> AppResult<(String, Operation)> {
        let route = resolve_route(self.routes, resource, method)?;

        let mut parameters = vec![format_parameter(resource.formats(method))];
        let (summary, media_types) = match &resource.entity_type {
            Some(entity_type_id) => {
                let entity_type = self
                    .model
                    .entity_type_definition(entity_type_id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("No entity type found: {}", entity_type_id))
                    })?;
                parameters.extend(entity_parameters(&entity_type, method, bundle));
                (
                    entity_summary(method, &entity_type.label),
                    vec![JSON_MEDIA_TYPE.to_string()],
                )
            }
            None => {
                parameters.extend(path_variable_parameters(&route));
                (resource.label.clone(), Vec::new())
            }
        };

        let operation = Operation {
            summary,
            parameters,
            consumes: media_types.clone(),
            produces: media_types,
            operation_id: resource.id.clone(),
            schemes: vec!["http".to_string()],
            security: build_security(self.routes, resource, method),
        };

        Ok((route.path, operation))
    }
}
