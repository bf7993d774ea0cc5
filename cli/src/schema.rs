#![deny(missing_docs)]

//! # Schema Command
//!
//! Emits the JSON Schema of one entity type or bundle.

use crate::args::RegistryArgs;
use crate::error::CliResult;
use crate::output::emit;
use contentdoc_core::SpecGenerator;
use std::path::PathBuf;

/// Arguments for the schema command.
#[derive(clap::Args, Debug, Clone)]
pub struct SchemaArgs {
    #[clap(flatten)]
    registry: RegistryArgs,

    /// Entity type id.
    #[clap(long)]
    pub entity_type: String,

    /// Bundle id.
    #[clap(long)]
    pub bundle: Option<String>,

    /// Output path. Supports .json and .yaml/.yml; prints JSON when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the schema command.
pub fn execute(args: &SchemaArgs) -> CliResult<()> {
    let snapshot = args.registry.load()?;
    let schema = SpecGenerator::new(&snapshot, &snapshot)
        .build_schema(&args.entity_type, args.bundle.as_deref())?;
    emit(&schema.to_json()?, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::testing::registry_file;
    use contentdoc_core::AppError;
    use std::fs;
    use tempfile::tempdir;

    fn args(dir: &std::path::Path, entity_type: &str, bundle: Option<&str>) -> SchemaArgs {
        SchemaArgs {
            registry: RegistryArgs {
                registry: registry_file(dir),
            },
            entity_type: entity_type.to_string(),
            bundle: bundle.map(str::to_string),
            output: Some(dir.join("schema.json")),
        }
    }

    #[test]
    fn test_bundle_schema() {
        let dir = tempdir().unwrap();
        let args = args(dir.path(), "node", Some("article"));
        execute(&args).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("schema.json")).unwrap())
                .unwrap();
        assert_eq!(value["title"], "Content: Article");
        assert_eq!(value["properties"]["field_tags"]["type"], "array");
        assert!(value.get("discriminator").is_none());
    }

    #[test]
    fn test_bundle_of_bundle_less_type() {
        let dir = tempdir().unwrap();
        let err = execute(&args(dir.path(), "user", Some("user"))).unwrap_err();
        assert!(matches!(err, CliError::App(AppError::Unsupported(_))));
    }
}
