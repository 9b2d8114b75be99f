pub(super) const ROOT_LONG_ABOUT: &str = "\
Patch desktop auto-update manifests for a release

Each supported platform family (darwin, linux, windows) has a JSON manifest
that the application's updater polls. manifest-sync loads the manifest for the
selected target(s), fills in what changed for this release and writes it back
in place, printing the result to stdout.

WHAT GETS UPDATED:

  pub_date
    Always set to the current UTC time (YYYY-MM-DDTHH:MM:SSZ).

  platforms.<id>.signature
    Set when the target's signature glob matches exactly one file. The file
    contents are used verbatim. With no match, or several, the signature is
    left as is and a warning is logged; pass --signature to make that fatal.

  platforms.<id>.url and version
    Set when --version is given. The URL comes from the target's template,
    the manifest version becomes v<VERSION>.

  notes
    Set when --notes is given.

  package.json and src-tauri/tauri.conf.json
    When --version is given, their version fields are set to VERSION as well.

OUTPUT:

  stdout carries only the updated manifests, one JSON document per target.
  Progress such as \"Updating darwin manifest\" is logged to stderr at info
  level (-v) instead of being interleaved with the JSON, so the output can be
  piped to other tools.

TARGETS:

  darwin    manifests/update-darwin.json   (darwin-x86_64, darwin-aarch64)
  linux     manifests/update-linux.json    (linux-x86_64)
  windows   manifests/update-windows.json  (windows-x86_64)
  all       all three, in that order

  Manifests are never given new platform entries: every platform a target
  owns must already be listed in its manifest.

CONFIGURATION:

  Paths, signature globs, URL templates and platform lists can be overridden
  in manifest-sync.toml (or the file given with --config). Relative globs,
  with or without a leading ./, resolve against the working directory;
  absolute globs are used as is:

    [targets.linux]
    signature = \"bundle/appimage/*.AppImage.tar.gz.sig\"
    url = \"https://example.com/download/v{version}/app.AppImage.tar.gz\"

    [metadata]
    package_json = \"package.json\"
    packaging_config = \"src-tauri/tauri.conf.json\"

EXAMPLES:

  $ manifest-sync --target all --version 1.4.0 --notes \"Bug fixes\"
  $ manifest-sync -C /path/to/repo --target darwin --signature
  $ manifest-sync --target linux --version 1.4.0 --dry-run

EXIT CODES:

  0    Success
  1    Invalid or missing --target
  2    Invalid command line
  255  Any other error (missing manifest, invalid JSON, I/O errors, ...)";
