//! Shared fixtures for unit tests.

use crate::registry::RegistrySnapshot;

/// The site used across the unit tests: bundled `node`, bundle-less `user`,
/// and a non-entity `dblog` resource.
pub(crate) fn site() -> RegistrySnapshot {
    RegistrySnapshot::from_yaml_str(include_str!("../tests/fixtures/site.yaml"))
        .expect("fixture must parse")
}
