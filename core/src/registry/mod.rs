#![deny(missing_docs)]

//! # Host Registries
//!
//! Read-only query interfaces onto the host CMS.
//!
//! - **models**: descriptor types returned by the registries.
//! - **snapshot**: an in-memory, serde-loadable implementation of both traits.

pub mod models;
pub mod snapshot;

pub use models::{
    BundleDescriptor, Cardinality, EntityTypeDescriptor, FieldDefinition, HttpMethod,
    MetaKind, MethodConfig, ResourceDescriptor, RouteDescriptor, CSRF_REQUIREMENT,
};
pub use snapshot::RegistrySnapshot;

use indexmap::IndexMap;

/// The host's content-model registry.
pub trait ContentModel {
    /// Returns the entity type with the given id.
    fn entity_type_definition(&self, id: &str) -> Option<EntityTypeDescriptor>;

    /// Returns every entity type known to the host.
    fn entity_type_definitions(&self) -> Vec<EntityTypeDescriptor>;

    /// Returns the bundle entity type of an entity type, if it has bundles.
    fn bundle_entity_type_id(&self, entity_type_id: &str) -> Option<String>;

    /// Returns the bundles stored by a bundle entity type (e.g. `node_type`).
    fn bundles(&self, bundle_entity_type_id: &str) -> IndexMap<String, BundleDescriptor>;

    /// Returns the base fields shared by all bundles of an entity type.
    fn base_field_definitions(&self, entity_type_id: &str) -> IndexMap<String, FieldDefinition>;

    /// Returns base + bundle-configured fields of one bundle.
    fn field_definitions(
        &self,
        entity_type_id: &str,
        bundle: &str,
    ) -> IndexMap<String, FieldDefinition>;

    /// Whether a field type is (or derives from) the entity-reference field type.
    /// Unknown field types are not references.
    fn is_reference_field_type(&self, field_type_id: &str) -> bool;
}

/// The host's routing and REST-resource registry.
pub trait RouteRegistry {
    /// Returns every enabled REST resource, in registration order.
    fn resource_configs(&self) -> Vec<ResourceDescriptor>;

    /// Returns routes registered under a route name.
    fn routes_by_name(&self, name: &str) -> Vec<RouteDescriptor>;

    /// Returns the routes a resource declares for itself.
    fn routes_for_resource(&self, resource_id: &str) -> Vec<RouteDescriptor>;
}

/// Bundles of an entity type, empty when the type has none.
pub fn bundles_of(
    model: &dyn ContentModel,
    entity_type_id: &str,
) -> IndexMap<String, BundleDescriptor> {
    model
        .bundle_entity_type_id(entity_type_id)
        .map(|bundle_type| model.bundles(&bundle_type))
        .unwrap_or_default()
}
