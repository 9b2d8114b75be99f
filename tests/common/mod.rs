// Each integration test file is compiled as its own crate and uses a different
// subset of these helpers.
#![allow(dead_code)]

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const DARWIN_SIG: &str = "src-tauri/target/release/bundle/macos/Insulator 2.app.tar.gz.sig";
pub const LINUX_SIG: &str =
    "src-tauri/target/release/bundle/appimage/insulator-2_1.0.0_amd64.AppImage.tar.gz.sig";
pub const WINDOWS_SIG: &str =
    "src-tauri/target/release/bundle/msi/Insulator_2_1.0.0_x64_en-US.msi.zip.sig";

pub const MANIFESTS: [&str; 3] = [
    "manifests/update-darwin.json",
    "manifests/update-linux.json",
    "manifests/update-windows.json",
];

pub fn sync_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("manifest-sync");
    cmd.arg("-C").arg(cwd);
    cmd
}

fn manifest(platforms: &[&str]) -> String {
    let platforms: serde_json::Map<String, Value> = platforms
        .iter()
        .map(|p| {
            (
                p.to_string(),
                json!({ "signature": "old-signature", "url": format!("https://old.example.com/{p}") }),
            )
        })
        .collect();
    serde_json::to_string_pretty(&json!({
        "version": "v0.9.0",
        "notes": "Previous release",
        "pub_date": "2022-06-01T10:00:00Z",
        "platforms": platforms,
    }))
    .unwrap()
}

/// A project tree laid out the way the built-in target table expects.
pub fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("manifests")).unwrap();
    fs::write(
        root.join(MANIFESTS[0]),
        manifest(&["darwin-x86_64", "darwin-aarch64"]),
    )
    .unwrap();
    fs::write(root.join(MANIFESTS[1]), manifest(&["linux-x86_64"])).unwrap();
    fs::write(root.join(MANIFESTS[2]), manifest(&["windows-x86_64"])).unwrap();

    fs::write(
        root.join("package.json"),
        "{\n  \"name\": \"insulator-2\",\n  \"version\": \"0.9.0\"\n}\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("src-tauri")).unwrap();
    fs::write(
        root.join("src-tauri/tauri.conf.json"),
        "{\n  \"package\": {\n    \"productName\": \"Insulator 2\",\n    \"version\": \"0.9.0\"\n  }\n}\n",
    )
    .unwrap();

    temp
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read_json(root: &Path, relative: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(root.join(relative)).unwrap()).unwrap()
}

pub fn snapshot(root: &Path) -> Vec<String> {
    MANIFESTS
        .iter()
        .chain(["package.json", "src-tauri/tauri.conf.json"].iter())
        .map(|relative| fs::read_to_string(root.join(relative)).unwrap())
        .collect()
}
