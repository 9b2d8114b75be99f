//! Locating release signatures produced by the external signing step.
//!
//! Bundle file names embed the version, so signatures are found by glob rather
//! than by fixed path. Only an unambiguous match is usable: when a glob matches
//! nothing, or more than one file, the caller decides whether that is fatal.

use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Invalid signature glob {pattern}: {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },
    #[error("IO error reading signature {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureLookup {
    /// Exactly one file matched; its contents, unmodified.
    Found { path: PathBuf, signature: String },
    NotFound,
    /// Sorted list of every match.
    Ambiguous(Vec<PathBuf>),
}

/// Resolves `pattern` and reads the signature if exactly one file matches.
///
/// Relative patterns (with or without a leading `./`) resolve against `root`,
/// absolute ones against the filesystem root. `*`, `?` and `[...]` never
/// cross a `/`; `**` matches any number of directories.
pub fn find_signature(root: &Path, pattern: &str) -> Result<SignatureLookup, SignatureError> {
    let mut matches = glob_files(root, pattern)?;

    match matches.len() {
        0 => Ok(SignatureLookup::NotFound),
        1 => {
            let path = matches.remove(0);
            let signature = std::fs::read_to_string(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    SignatureError::PermissionDenied(path.clone())
                } else {
                    SignatureError::Io {
                        path: path.clone(),
                        source: e,
                    }
                }
            })?;
            debug!("Read {} byte signature from {}", signature.len(), path.display());
            Ok(SignatureLookup::Found { path, signature })
        }
        _ => Ok(SignatureLookup::Ambiguous(matches)),
    }
}

/// Every regular file matching `pattern`.
fn glob_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, SignatureError> {
    let (pattern, absolute) = normalize(pattern);
    let matcher = compile(pattern)?;
    let (base, max_depth) = walk_plan(pattern);
    let start = if absolute {
        Path::new("/").join(&base)
    } else {
        root.join(&base)
    };

    if !start.is_dir() {
        debug!("Signature directory {} does not exist", start.display());
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&start).min_depth(1);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut matches = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Unreadable corners of the bundle tree cannot hold our signature.
                debug!("Skipping unreadable entry while globbing {pattern}: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let candidate = if absolute {
            entry.path()
        } else {
            match entry.path().strip_prefix(root) {
                Ok(relative) => relative,
                Err(_) => continue,
            }
        };

        if matcher.is_match(candidate) {
            debug!("Signature glob {pattern} matched {}", entry.path().display());
            matches.push(entry.path().to_path_buf());
        }
    }

    matches.sort();
    Ok(matches)
}

/// Strips leading `./` segments and reports whether the pattern is absolute.
fn normalize(pattern: &str) -> (&str, bool) {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.trim_start_matches('/');
    }
    (pattern, pattern.starts_with('/'))
}

fn compile(pattern: &str) -> Result<GlobMatcher, SignatureError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| SignatureError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

/// Splits a pattern into the literal directory the walk can start from and how
/// deep the walk must go below it (`None` when `**` makes it unbounded).
fn walk_plan(pattern: &str) -> (PathBuf, Option<usize>) {
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let Some((_, dirs)) = segments.split_last() else {
        return (PathBuf::new(), Some(1));
    };

    let literal = dirs.iter().take_while(|s| !has_glob_meta(s)).count();

    let mut base = PathBuf::new();
    for segment in &segments[..literal] {
        base.push(segment);
    }

    let remaining = &segments[literal..];
    let depth = if remaining.contains(&"**") {
        None
    } else {
        Some(remaining.len())
    };

    (base, depth)
}
