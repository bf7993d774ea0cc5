use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const SITE_YAML: &str = include_str!("../../core/tests/fixtures/site.yaml");

/// Writes the shared site fixture into `dir` and returns its path.
pub(crate) fn registry_file(dir: &Path) -> PathBuf {
    let path = dir.join("site.yaml");
    fs::write(&path, SITE_YAML).expect("fixture must be writable");
    path
}
