//! The updater manifest: a JSON document describing the latest release.
//!
//! ```json
//! {
//!   "version": "v1.2.3",
//!   "notes": "...",
//!   "pub_date": "2024-01-01T00:00:00Z",
//!   "platforms": {
//!     "darwin-x86_64": { "signature": "...", "url": "https://..." }
//!   }
//! }
//! ```
//!
//! Edits are field level. Everything else in the document is left exactly as
//! it was loaded, including key order.

use crate::json_file::{JsonFile, JsonFileError};
use chrono::{DateTime, Utc};
use std::path::Path;

/// `pub_date` format: UTC with second precision and a literal `Z`.
pub const PUB_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const PLATFORMS: &str = "platforms";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error(transparent)]
    Json(#[from] JsonFileError),
    #[error("{manifest}: platform {platform} is not listed under \"platforms\"")]
    UnknownPlatform {
        manifest: std::path::PathBuf,
        platform: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    doc: JsonFile,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        Ok(Manifest {
            doc: JsonFile::load(path)?,
        })
    }

    #[cfg(test)]
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(Manifest {
            doc: JsonFile::parse(Path::new("manifest.json"), content)?,
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.doc.root().get("version").and_then(|v| v.as_str())
    }

    /// Sets the release version, prefixed with `v`.
    pub fn set_version(&mut self, version: &str) -> Result<(), ManifestError> {
        self.doc.set_string(&[], "version", &format!("v{version}"))?;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) -> Result<(), ManifestError> {
        self.doc.set_string(&[], "notes", notes)?;
        Ok(())
    }

    pub fn set_pub_date(&mut self, now: DateTime<Utc>) -> Result<(), ManifestError> {
        let formatted = now.format(PUB_DATE_FORMAT).to_string();
        self.doc.set_string(&[], "pub_date", &formatted)?;
        Ok(())
    }

    pub fn set_signature(&mut self, platform: &str, signature: &str) -> Result<(), ManifestError> {
        self.set_platform_field(platform, "signature", signature)
    }

    pub fn set_url(&mut self, platform: &str, url: &str) -> Result<(), ManifestError> {
        self.set_platform_field(platform, "url", url)
    }

    /// Platform entries are never created here: the build decides which
    /// platforms a manifest advertises.
    fn set_platform_field(
        &mut self,
        platform: &str,
        field: &str,
        value: &str,
    ) -> Result<(), ManifestError> {
        match self.doc.set_string(&[PLATFORMS, platform], field, value) {
            Err(JsonFileError::MissingKey { path, pointer })
                if pointer == format!("/{PLATFORMS}/{platform}") =>
            {
                Err(ManifestError::UnknownPlatform {
                    manifest: path,
                    platform: platform.to_string(),
                })
            }
            other => Ok(other?),
        }
    }

    pub fn render(&self) -> Result<String, ManifestError> {
        Ok(self.doc.render()?)
    }

    pub fn save(&self) -> Result<(), ManifestError> {
        Ok(self.doc.save()?)
    }
}
