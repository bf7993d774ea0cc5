#![deny(missing_docs)]

//! # Route Resolution
//!
//! Finds the concrete route a resource answers a method on.
//!
//! Entity resources are looked up by canonical route name. Hosts that enable
//! several formats for a method register one route per format, so a miss on
//! the bare name is retried with the first supported format appended.
//! Non-entity resources are matched against their own declared routes.

use crate::error::{AppError, AppResult};
use crate::registry::{HttpMethod, ResourceDescriptor, RouteDescriptor, RouteRegistry};
use tracing::debug;

/// Canonical route name of a resource method, optionally format-qualified.
///
/// e.g. `entity:node` + `GET` -> `rest.entity.node.GET`, or with `json`,
/// `rest.entity.node.GET.json`.
pub fn route_name(resource_id: &str, method: HttpMethod, format: Option<&str>) -> String {
    let base = format!("rest.{}.{}", resource_id.replace(':', "."), method);
    match format {
        Some(f) => format!("{}.{}", base, f),
        None => base,
    }
}

/// Resolves the route a resource serves `method` on.
pub fn resolve_route(
    routes: &dyn RouteRegistry,
    resource: &ResourceDescriptor,
    method: HttpMethod,
) -> AppResult<RouteDescriptor> {
    let found = if resource.is_entity() {
        resolve_entity_route(routes, resource, method)
    } else {
        routes
            .routes_for_resource(&resource.id)
            .into_iter()
            .find(|r| r.allows(method))
    };

    found.ok_or_else(|| AppError::RouteResolution {
        resource: resource.id.clone(),
        method,
    })
}

fn resolve_entity_route(
    routes: &dyn RouteRegistry,
    resource: &ResourceDescriptor,
    method: HttpMethod,
) -> Option<RouteDescriptor> {
    let formats = resource.formats(method);
    let mut candidates = vec![route_name(&resource.id, method, None)];
    if formats.len() > 1 {
        candidates.push(route_name(&resource.id, method, Some(&formats[0])));
    }

    for name in candidates {
        // Tables are de-duplicated upstream; if not, the last registration wins.
        if let Some(route) = routes.routes_by_name(&name).into_iter().last() {
            debug!(resource = %resource.id, %method, route = %name, "route resolved");
            return Some(route);
        }
    }
    None
}
