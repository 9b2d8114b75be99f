use crate::config::MetadataPaths;
use crate::json_file::{JsonFile, JsonFileError};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("Metadata file error: {0}")]
    Json(#[from] JsonFileError),
}

/// Writes `version` into `package.json` and into the packaging config's
/// `package.version`.
///
/// Each file is an independent read-modify-write; if the second one fails the
/// first has already been written. Returns the paths written (or that would
/// have been written when `dry_run`).
pub fn propagate_version(
    root: &Path,
    paths: &MetadataPaths,
    version: &str,
    dry_run: bool,
) -> Result<Vec<PathBuf>, MetadataError> {
    let edits: [(&Path, &[&str]); 2] = [
        (paths.package_json.as_path(), &[]),
        (paths.packaging_config.as_path(), &["package"]),
    ];

    let mut updated = Vec::with_capacity(edits.len());
    for (relative, parents) in edits {
        let mut doc = JsonFile::load(&root.join(relative))?;
        doc.set_string(parents, "version", version)?;

        if !dry_run {
            doc.save()?;
        }
        info!("Set version {version} in {}", relative.display());
        updated.push(relative.to_path_buf());
    }

    Ok(updated)
}
