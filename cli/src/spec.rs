#![deny(missing_docs)]

//! # Spec Command
//!
//! Emits the OpenAPI document for the whole site, one entity type, one
//! bundle, or only the non-entity resources.

use crate::args::{RegistryArgs, ScopeArgs};
use crate::error::CliResult;
use crate::output::emit;
use contentdoc_core::{DocumentConfig, SpecGenerator};
use std::path::PathBuf;
use tracing::warn;

/// Arguments for the spec command.
#[derive(clap::Args, Debug, Clone)]
pub struct SpecArgs {
    #[clap(flatten)]
    registry: RegistryArgs,

    #[clap(flatten)]
    scope: ScopeArgs,

    /// Only resources without an entity binding.
    #[clap(long, conflicts_with = "entity_type")]
    pub non_entity: bool,

    /// Origin the API is served from; sets `host` and `basePath`.
    #[clap(long, env = "CONTENTDOC_ORIGIN")]
    pub origin: Option<String>,

    /// API title.
    #[clap(long)]
    pub title: Option<String>,

    /// API version.
    #[clap(long)]
    pub api_version: Option<String>,

    /// Output path. Supports .json and .yaml/.yml; prints JSON when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

impl SpecArgs {
    fn config(&self) -> CliResult<DocumentConfig> {
        let mut config = DocumentConfig::default();
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(version) = &self.api_version {
            config.version = version.clone();
        }
        match &self.origin {
            Some(origin) => Ok(config.with_origin_str(origin)?),
            None => Ok(config),
        }
    }
}

/// Executes the spec command.
pub fn execute(args: &SpecArgs) -> CliResult<()> {
    let snapshot = args.registry.load()?;
    let generator = SpecGenerator::new(&snapshot, &snapshot).with_config(args.config()?);

    let document = if args.non_entity {
        generator.build_non_entity_document()?
    } else {
        generator.build_document(args.scope.entity_type.as_deref(), args.scope.bundle.as_deref())?
    };

    let value = document.to_json()?;
    if value["paths"].as_object().is_some_and(|p| p.is_empty()) {
        warn!("generated document has no paths");
    }
    emit(&value, args.output.as_deref())
}
