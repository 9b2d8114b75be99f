use crate::config::SyncConfig;
use crate::manifest::{Manifest, ManifestError};
use crate::metadata::{MetadataError, propagate_version};
use crate::signature::{SignatureError, SignatureLookup, find_signature};
use crate::targets::{Target, TargetSelector};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),
    #[error("{0}")]
    Metadata(#[from] MetadataError),
    #[error("No signature matches {pattern} for {target} (required by --signature)")]
    SignatureMissing { target: Target, pattern: String },
    #[error("Signature glob {pattern} for {target} is ambiguous, matched {count} files (required by --signature)")]
    SignatureAmbiguous {
        target: Target,
        pattern: String,
        count: usize,
    },
    #[error("Signature file {path} for {target} is empty (required by --signature)")]
    SignatureEmpty { target: Target, path: PathBuf },
    #[error("Failed to write manifest to output: {0}")]
    Output(std::io::Error),
}

/// How to treat a signature glob that does not resolve to exactly one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignaturePolicy {
    /// Leave the signature fields alone and warn.
    Lenient,
    /// Fail the run.
    Required,
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub selector: TargetSelector,
    pub version: Option<String>,
    pub notes: Option<String>,
    pub signature_policy: SignaturePolicy,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: Target,
    pub manifest: PathBuf,
    /// Signature file applied to the manifest, if any.
    pub signature: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct SyncResult {
    pub targets: Vec<TargetOutcome>,
    pub metadata_updated: Vec<PathBuf>,
}

/// Updates every selected manifest, then the metadata files when a version is
/// given.
///
/// Targets are processed in order and each is written before the next is
/// read, so a failure part way leaves earlier targets updated. Each rendered
/// manifest is written to `out` once it has been saved.
pub fn sync_manifests(
    root: &Path,
    config: &SyncConfig,
    options: &SyncOptions,
    now: DateTime<Utc>,
    out: &mut dyn Write,
) -> Result<SyncResult, SyncError> {
    let mut result = SyncResult::default();

    for target in options.selector.targets() {
        let outcome = update_target(root, config, options, target, now, out)?;
        result.targets.push(outcome);
    }

    if let Some(version) = &options.version {
        result.metadata_updated =
            propagate_version(root, &config.metadata, version, options.dry_run)?;
    }

    Ok(result)
}

fn update_target(
    root: &Path,
    config: &SyncConfig,
    options: &SyncOptions,
    target: Target,
    now: DateTime<Utc>,
    out: &mut dyn Write,
) -> Result<TargetOutcome, SyncError> {
    let target_config = config.target(target);
    info!("Updating {target} manifest");

    let mut manifest = Manifest::load(&root.join(&target_config.manifest))?;

    let signature = resolve_signature(root, target, &target_config.signature_glob, options)?;
    let url = options
        .version
        .as_deref()
        .map(|version| target_config.download_url(version));

    for platform in &target_config.platforms {
        if let Some((_, signature)) = &signature {
            manifest.set_signature(platform, signature)?;
        }
        if let Some(url) = &url {
            manifest.set_url(platform, url)?;
        }
    }

    if let Some(version) = &options.version {
        manifest.set_version(version)?;
    }
    if let Some(notes) = &options.notes {
        manifest.set_notes(notes)?;
    }
    manifest.set_pub_date(now)?;

    let rendered = manifest.render()?;
    if !options.dry_run {
        manifest.save()?;
        info!(
            "Wrote {} ({})",
            target_config.manifest.display(),
            manifest.version().unwrap_or("no version")
        );
    }
    writeln!(out, "{rendered}").map_err(SyncError::Output)?;

    Ok(TargetOutcome {
        target,
        manifest: target_config.manifest.clone(),
        signature: signature.map(|(path, _)| path),
    })
}

fn resolve_signature(
    root: &Path,
    target: Target,
    pattern: &str,
    options: &SyncOptions,
) -> Result<Option<(PathBuf, String)>, SyncError> {
    let required = options.signature_policy == SignaturePolicy::Required;

    match find_signature(root, pattern)? {
        SignatureLookup::Found { path, signature } if signature.is_empty() => {
            if required {
                return Err(SyncError::SignatureEmpty { target, path });
            }
            warn!(
                "{target} signature {} is empty, leaving signatures unchanged",
                path.display()
            );
            Ok(None)
        }
        SignatureLookup::Found { path, signature } => {
            info!("Using {target} signature {}", path.display());
            Ok(Some((path, signature)))
        }
        SignatureLookup::NotFound if required => Err(SyncError::SignatureMissing {
            target,
            pattern: pattern.to_string(),
        }),
        SignatureLookup::NotFound => {
            warn!("No {target} signature matches {pattern}, leaving signatures unchanged");
            Ok(None)
        }
        SignatureLookup::Ambiguous(matches) if required => Err(SyncError::SignatureAmbiguous {
            target,
            pattern: pattern.to_string(),
            count: matches.len(),
        }),
        SignatureLookup::Ambiguous(matches) => {
            warn!(
                "{} files match {target} signature glob {pattern}, leaving signatures unchanged:",
                matches.len()
            );
            for path in &matches {
                warn!("  {}", path.display());
            }
            Ok(None)
        }
    }
}
