//! Optional `manifest-sync.toml` overriding the built-in target table.
//!
//! Every key is optional. Anything not set keeps the built-in value, so a
//! project only has to spell out where its layout differs.

use crate::targets::{Target, TargetConfig, VERSION_PLACEHOLDER};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "manifest-sync.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("TOML parse error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Unknown target {0:?} in config (expected darwin, linux or windows)")]
    UnknownTarget(String),
    #[error("URL template for {target} does not contain {{version}}")]
    UrlWithoutVersion { target: Target },
    #[error("Platform list for {target} is empty")]
    NoPlatforms { target: Target },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    targets: BTreeMap<String, TargetOverrides>,
    #[serde(default)]
    metadata: MetadataOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetOverrides {
    manifest: Option<PathBuf>,
    signature: Option<String>,
    url: Option<String>,
    platforms: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MetadataOverrides {
    package_json: Option<PathBuf>,
    packaging_config: Option<PathBuf>,
}

/// Files that carry the application version besides the manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPaths {
    /// `version` at the top level.
    pub package_json: PathBuf,
    /// `version` nested under `package`.
    pub packaging_config: PathBuf,
}

impl Default for MetadataPaths {
    fn default() -> Self {
        MetadataPaths {
            package_json: PathBuf::from("package.json"),
            packaging_config: PathBuf::from("src-tauri/tauri.conf.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Indexed by [`Target::index`].
    targets: [TargetConfig; 3],
    pub metadata: MetadataPaths,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            targets: Target::ALL.map(TargetConfig::builtin),
            metadata: MetadataPaths::default(),
        }
    }
}

impl SyncConfig {
    pub fn target(&self, target: Target) -> &TargetConfig {
        &self.targets[target.index()]
    }

    /// Loads `explicit` if given, else `manifest-sync.toml` under `root` if it
    /// exists, else the built-in configuration.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let implicit = root.join(CONFIG_FILENAME);
        if implicit.is_file() {
            return Self::load(&implicit);
        }

        Ok(Self::default())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ConfigError::PermissionDenied(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;

        Self::default().merged(file)
    }

    #[cfg(test)]
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(Path::new(CONFIG_FILENAME), content)
    }

    fn merged(mut self, file: ConfigFile) -> Result<Self, ConfigError> {
        for (name, overrides) in file.targets {
            let target = Target::ALL
                .into_iter()
                .find(|t| t.name() == name)
                .ok_or_else(|| ConfigError::UnknownTarget(name.clone()))?;

            let config = &mut self.targets[target.index()];

            if let Some(manifest) = overrides.manifest {
                config.manifest = manifest;
            }
            if let Some(signature) = overrides.signature {
                config.signature_glob = signature;
            }
            if let Some(url) = overrides.url {
                if !url.contains(VERSION_PLACEHOLDER) {
                    return Err(ConfigError::UrlWithoutVersion { target });
                }
                config.url_template = url;
            }
            if let Some(platforms) = overrides.platforms {
                if platforms.is_empty() {
                    return Err(ConfigError::NoPlatforms { target });
                }
                config.platforms = platforms;
            }
        }

        if let Some(path) = file.metadata.package_json {
            self.metadata.package_json = path;
        }
        if let Some(path) = file.metadata.packaging_config {
            self.metadata.packaging_config = path;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_the_builtin_table() {
        assert_eq!(SyncConfig::from_toml("").unwrap(), SyncConfig::default());
    }

    #[test]
    fn overrides_replace_only_named_keys() {
        let config = SyncConfig::from_toml(
            r#"
[targets.linux]
url = "https://downloads.example.com/{version}/app.AppImage.tar.gz"

[metadata]
package_json = "web/package.json"
"#,
        )
        .unwrap();

        let linux = config.target(Target::Linux);
        assert_eq!(
            linux.download_url("2.0.0"),
            "https://downloads.example.com/2.0.0/app.AppImage.tar.gz"
        );
        assert_eq!(linux.manifest, TargetConfig::builtin(Target::Linux).manifest);
        assert_eq!(config.target(Target::Darwin), &TargetConfig::builtin(Target::Darwin));
        assert_eq!(config.metadata.package_json, PathBuf::from("web/package.json"));
        assert_eq!(
            config.metadata.packaging_config,
            MetadataPaths::default().packaging_config
        );
    }

    #[test]
    fn every_target_resolves_to_its_own_entry() {
        let config = SyncConfig::from_toml("[targets.windows]\nmanifest = \"win.json\"\n").unwrap();
        assert_eq!(config.target(Target::Windows).manifest, PathBuf::from("win.json"));
        for target in [Target::Darwin, Target::Linux] {
            assert_eq!(config.target(target), &TargetConfig::builtin(target));
        }
    }

    #[test]
    fn platform_list_can_be_replaced() {
        let config = SyncConfig::from_toml(
            r#"
[targets.darwin]
platforms = ["darwin-universal"]
"#,
        )
        .unwrap();
        assert_eq!(config.target(Target::Darwin).platforms, vec!["darwin-universal"]);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let result = SyncConfig::from_toml("[targets.freebsd]\nmanifest = \"x.json\"\n");
        assert!(matches!(result, Err(ConfigError::UnknownTarget(name)) if name == "freebsd"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = SyncConfig::from_toml("[targets.linux]\nsig = \"*.sig\"\n");
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));

        let result = SyncConfig::from_toml("[unrelated]\nkey = 1\n");
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn url_without_placeholder_is_rejected() {
        let result = SyncConfig::from_toml("[targets.windows]\nurl = \"https://x/latest.msi.zip\"\n");
        assert!(matches!(
            result,
            Err(ConfigError::UrlWithoutVersion {
                target: Target::Windows
            })
        ));
    }

    #[test]
    fn empty_platform_list_is_rejected() {
        let result = SyncConfig::from_toml("[targets.linux]\nplatforms = []\n");
        assert!(matches!(
            result,
            Err(ConfigError::NoPlatforms {
                target: Target::Linux
            })
        ));
    }

    #[test]
    fn discover_prefers_explicit_then_implicit_then_builtin() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            SyncConfig::discover(temp.path(), None).unwrap(),
            SyncConfig::default()
        );

        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            "[targets.linux]\nmanifest = \"implicit.json\"\n",
        )
        .unwrap();
        let implicit = SyncConfig::discover(temp.path(), None).unwrap();
        assert_eq!(
            implicit.target(Target::Linux).manifest,
            PathBuf::from("implicit.json")
        );

        let explicit_path = temp.path().join("other.toml");
        std::fs::write(&explicit_path, "[targets.linux]\nmanifest = \"explicit.json\"\n").unwrap();
        let explicit = SyncConfig::discover(temp.path(), Some(&explicit_path)).unwrap();
        assert_eq!(
            explicit.target(Target::Linux).manifest,
            PathBuf::from("explicit.json")
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let result = SyncConfig::discover(temp.path(), Some(&missing));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
