//! The platform families an update manifest exists for, and the static table
//! describing where each family's manifest, signature and download live.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Placeholder substituted with the release version in URL templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Darwin,
    Linux,
    Windows,
}

impl Target {
    /// All targets, in the order `all` processes them.
    pub const ALL: [Target; 3] = [Target::Darwin, Target::Linux, Target::Windows];

    /// Position in [`Target::ALL`].
    pub fn index(self) -> usize {
        match self {
            Target::Darwin => 0,
            Target::Linux => 1,
            Target::Windows => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Target::Darwin => "darwin",
            Target::Linux => "linux",
            Target::Windows => "windows",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid target. Specify one of: linux, darwin, windows, all")]
pub struct InvalidTarget;

/// What `--target` selected: a single family or every family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelector {
    One(Target),
    All,
}

impl TargetSelector {
    pub fn targets(self) -> Vec<Target> {
        match self {
            TargetSelector::One(target) => vec![target],
            TargetSelector::All => Target::ALL.to_vec(),
        }
    }
}

impl FromStr for TargetSelector {
    type Err = InvalidTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "darwin" => Ok(TargetSelector::One(Target::Darwin)),
            "linux" => Ok(TargetSelector::One(Target::Linux)),
            "windows" => Ok(TargetSelector::One(Target::Windows)),
            "all" => Ok(TargetSelector::All),
            _ => Err(InvalidTarget),
        }
    }
}

/// Where one family's release artifacts and manifest live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Manifest path, relative to the working directory.
    pub manifest: PathBuf,
    /// Glob locating the signature sidecar, relative to the working directory
    /// unless absolute.
    pub signature_glob: String,
    /// Download URL with [`VERSION_PLACEHOLDER`] standing in for the version.
    pub url_template: String,
    /// Keys under `platforms` this family owns. Never empty.
    pub platforms: Vec<String>,
}

impl TargetConfig {
    /// Renders the download URL for `version`.
    pub fn download_url(&self, version: &str) -> String {
        self.url_template.replace(VERSION_PLACEHOLDER, version)
    }

    /// Built-in configuration for `target`.
    pub fn builtin(target: Target) -> Self {
        const RELEASES: &str = "https://github.com/andrewinci/insulator2/releases/download";
        const BUNDLE: &str = "src-tauri/target/release/bundle";

        match target {
            Target::Darwin => TargetConfig {
                manifest: PathBuf::from("manifests/update-darwin.json"),
                signature_glob: format!("{BUNDLE}/macos/*.app.tar.gz.sig"),
                url_template: format!("{RELEASES}/v{{version}}/Insulator.2.app.tar.gz"),
                platforms: vec!["darwin-x86_64".to_string(), "darwin-aarch64".to_string()],
            },
            Target::Linux => TargetConfig {
                manifest: PathBuf::from("manifests/update-linux.json"),
                signature_glob: format!("{BUNDLE}/appimage/insulator-*_amd64.AppImage.tar.gz.sig"),
                url_template: format!(
                    "{RELEASES}/v{{version}}/insulator-2_{{version}}_amd64.AppImage.tar.gz"
                ),
                platforms: vec!["linux-x86_64".to_string()],
            },
            Target::Windows => TargetConfig {
                manifest: PathBuf::from("manifests/update-windows.json"),
                signature_glob: format!("{BUNDLE}/msi/Insulator*.msi.zip.sig"),
                url_template: format!(
                    "{RELEASES}/v{{version}}/Insulator_2_{{version}}_x64_en-US.msi.zip"
                ),
                platforms: vec!["windows-x86_64".to_string()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parses_every_family_and_all() {
        assert_eq!(
            "darwin".parse::<TargetSelector>(),
            Ok(TargetSelector::One(Target::Darwin))
        );
        assert_eq!(
            "linux".parse::<TargetSelector>(),
            Ok(TargetSelector::One(Target::Linux))
        );
        assert_eq!(
            "windows".parse::<TargetSelector>(),
            Ok(TargetSelector::One(Target::Windows))
        );
        assert_eq!("all".parse::<TargetSelector>(), Ok(TargetSelector::All));
    }

    #[test]
    fn selector_rejects_unknown_and_differently_cased_names() {
        assert_eq!("bogus".parse::<TargetSelector>(), Err(InvalidTarget));
        assert_eq!("Darwin".parse::<TargetSelector>(), Err(InvalidTarget));
        assert_eq!("".parse::<TargetSelector>(), Err(InvalidTarget));
    }

    #[test]
    fn all_expands_in_fixed_order() {
        assert_eq!(
            TargetSelector::All.targets(),
            vec![Target::Darwin, Target::Linux, Target::Windows]
        );
        assert_eq!(
            TargetSelector::One(Target::Linux).targets(),
            vec![Target::Linux]
        );
    }

    #[test]
    fn index_matches_position_in_all() {
        for (position, target) in Target::ALL.into_iter().enumerate() {
            assert_eq!(target.index(), position);
        }
    }

    #[test]
    fn darwin_owns_both_architectures() {
        let config = TargetConfig::builtin(Target::Darwin);
        assert_eq!(config.platforms, vec!["darwin-x86_64", "darwin-aarch64"]);
    }

    #[test]
    fn download_url_substitutes_every_placeholder() {
        let config = TargetConfig::builtin(Target::Linux);
        assert_eq!(
            config.download_url("1.2.3"),
            "https://github.com/andrewinci/insulator2/releases/download/v1.2.3/insulator-2_1.2.3_amd64.AppImage.tar.gz"
        );
    }

    #[test]
    fn builtin_templates_all_carry_the_placeholder() {
        for target in Target::ALL {
            let config = TargetConfig::builtin(target);
            assert!(
                config.url_template.contains(VERSION_PLACEHOLDER),
                "{target} template lacks placeholder"
            );
            assert!(!config.download_url("9.9.9").contains(VERSION_PLACEHOLDER));
        }
    }
}
