#![deny(missing_docs)]

//! # Security Descriptors
//!
//! Maps authentication providers and route access requirements onto the
//! closed set of Swagger security schemes this crate emits.
//!
//! Providers without an OpenAPI equivalent (cookie sessions, most OAuth
//! bridges) are skipped rather than guessed at.

use crate::oas::models::{SecurityDefinitionsMap, SecurityRequirement, SecurityScheme};
use crate::oas::routes::resolve_route;
use crate::registry::{HttpMethod, ResourceDescriptor, RouteRegistry};
use tracing::warn;

/// Scheme id for HTTP Basic authentication.
pub const BASIC_AUTH: &str = "basic_auth";

/// Scheme id for the CSRF request header.
pub const CSRF_TOKEN: &str = "csrf_token";

/// Header carrying the CSRF token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Scheme id for an authentication provider id, if the provider has one.
pub fn scheme_for_provider(provider: &str) -> Option<&'static str> {
    match provider {
        "basic_auth" => Some(BASIC_AUTH),
        _ => None,
    }
}

/// Security requirements of one resource method.
///
/// Entity resources additionally get `csrf_token` when their concrete route
/// demands the CSRF request header.
pub fn build_security(
    routes: &dyn RouteRegistry,
    resource: &ResourceDescriptor,
    method: HttpMethod,
) -> Vec<SecurityRequirement> {
    let mut security: Vec<SecurityRequirement> = Vec::new();
    let mut push = |scheme: &str| {
        if !security.iter().any(|s| s.scheme() == scheme) {
            security.push(SecurityRequirement(scheme.to_string()));
        }
    };

    for provider in resource.auth_providers(method) {
        match scheme_for_provider(provider) {
            Some(scheme) => push(scheme),
            None => warn!(
                resource = %resource.id,
                %method,
                provider = %provider,
                "authentication provider has no security scheme"
            ),
        }
    }

    if resource.is_entity() {
        if let Ok(route) = resolve_route(routes, resource, method) {
            if route.requires_csrf_header() {
                push(CSRF_TOKEN);
            }
        }
    }

    security
}

/// The fixed `securityDefinitions` map.
pub fn build_security_definitions() -> SecurityDefinitionsMap {
    let mut definitions = SecurityDefinitionsMap::new();
    definitions.insert(
        CSRF_TOKEN.to_string(),
        SecurityScheme::ApiKey {
            name: CSRF_HEADER.to_string(),
            location: "header".to_string(),
        },
    );
    definitions.insert(BASIC_AUTH.to_string(), SecurityScheme::Basic);
    definitions
}
