#![deny(missing_docs)]

//! # Types Command
//!
//! Prints discovery data: all entity types, one entity type, or one bundle.

use crate::args::{RegistryArgs, ScopeArgs};
use crate::error::{CliError, CliResult};
use crate::output::emit;
use contentdoc_core::discovery::{bundle_info, entity_type_info, list_entity_types};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the types command.
#[derive(clap::Args, Debug, Clone)]
pub struct TypesArgs {
    #[clap(flatten)]
    registry: RegistryArgs,

    #[clap(flatten)]
    scope: ScopeArgs,

    /// Output path. Supports .json and .yaml/.yml; prints JSON when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

fn to_value<T: Serialize>(value: &T) -> CliResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))
}

/// Executes the types command.
pub fn execute(args: &TypesArgs) -> CliResult<()> {
    let snapshot = args.registry.load()?;
    let value = match (&args.scope.entity_type, &args.scope.bundle) {
        (None, _) => to_value(&list_entity_types(&snapshot, &snapshot))?,
        (Some(entity_type), None) => {
            to_value(&entity_type_info(&snapshot, &snapshot, entity_type)?)?
        }
        (Some(entity_type), Some(bundle)) => {
            to_value(&bundle_info(&snapshot, entity_type, bundle)?)?
        }
    };
    emit(&value, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::registry_file;
    use std::fs;
    use tempfile::tempdir;

    fn run(entity_type: Option<&str>, bundle: Option<&str>) -> CliResult<Value> {
        let dir = tempdir().unwrap();
        let out = dir.path().join("types.json");
        let args = TypesArgs {
            registry: RegistryArgs {
                registry: registry_file(dir.path()),
            },
            scope: ScopeArgs {
                entity_type: entity_type.map(str::to_string),
                bundle: bundle.map(str::to_string),
            },
            output: Some(out.clone()),
        };
        execute(&args)?;
        Ok(serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap())
    }

    #[test]
    fn test_listing() {
        let value = run(None, None).unwrap();
        assert_eq!(value["node"]["more"], "/entity/types/node/{bundle}");
        assert_eq!(value["node_type"]["type"], "config");
    }

    #[test]
    fn test_entity_type_and_bundle() {
        let node = run(Some("node"), None).unwrap();
        assert_eq!(node["fields"]["title"]["required"], true);

        let page = run(Some("node"), Some("page")).unwrap();
        assert_eq!(page["label"], "Basic page");
        assert_eq!(page["fields"]["body"]["type"], "text_with_summary");
    }

    #[test]
    fn test_unknown_bundle() {
        assert!(run(Some("node"), Some("blog")).is_err());
    }
}
