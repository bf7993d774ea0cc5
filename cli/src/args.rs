//! # Shared Arguments
//!
//! Flags common to every command: the registry snapshot to load and the
//! optional entity type / bundle scope.

use crate::error::{CliError, CliResult};
use contentdoc_core::RegistrySnapshot;
use std::path::PathBuf;
use tracing::debug;

/// Location of the registry snapshot.
#[derive(clap::Args, Debug, Clone)]
pub struct RegistryArgs {
    /// Registry snapshot file (.json, .yaml or .yml).
    #[clap(long, env = "CONTENTDOC_REGISTRY")]
    pub registry: PathBuf,
}

impl RegistryArgs {
    /// Loads the snapshot.
    pub fn load(&self) -> CliResult<RegistrySnapshot> {
        if !self.registry.exists() {
            return Err(CliError::General(format!(
                "Registry file not found: {:?}",
                self.registry
            )));
        }
        let snapshot = RegistrySnapshot::from_path(&self.registry)?;
        debug!(
            path = ?self.registry,
            entity_types = snapshot.entity_types.len(),
            resources = snapshot.resources.len(),
            routes = snapshot.routes.len(),
            "registry loaded"
        );
        Ok(snapshot)
    }
}

/// Entity type / bundle scope.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Limit output to one entity type.
    #[clap(long)]
    pub entity_type: Option<String>,

    /// Limit output to one bundle of the entity type.
    #[clap(long, requires = "entity_type")]
    pub bundle: Option<String>,
}
