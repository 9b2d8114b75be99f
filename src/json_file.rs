use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum JsonFileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{path}: expected a JSON object at {pointer}")]
    NotAnObject { path: PathBuf, pointer: String },
    #[error("{path}: missing key {pointer}")]
    MissingKey { path: PathBuf, pointer: String },
}

fn io_error(path: &Path, e: std::io::Error) -> JsonFileError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        JsonFileError::PermissionDenied(path.to_path_buf())
    } else {
        JsonFileError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// A JSON document loaded from disk for in-place editing.
///
/// Key order is preserved, and so is a trailing newline if the file had one,
/// so that rewriting a document only changes the fields that were edited.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonFile {
    path: PathBuf,
    root: Value,
    trailing_newline: bool,
}

impl JsonFile {
    pub fn load(path: &Path) -> Result<Self, JsonFileError> {
        let content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, JsonFileError> {
        let root = serde_json::from_str(content).map_err(|source| JsonFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(JsonFile {
            path: path.to_path_buf(),
            root,
            trailing_newline: content.ends_with('\n'),
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Walks `keys` from the root, requiring every step to be an existing object.
    pub fn object_at_mut(&mut self, keys: &[&str]) -> Result<&mut Map<String, Value>, JsonFileError> {
        let path = &self.path;
        let mut pointer = String::new();
        let mut current = &mut self.root;

        for key in keys {
            let object = current
                .as_object_mut()
                .ok_or_else(|| JsonFileError::NotAnObject {
                    path: path.clone(),
                    pointer: display_pointer(&pointer),
                })?;
            pointer.push('/');
            pointer.push_str(key);
            current = object
                .get_mut(*key)
                .ok_or_else(|| JsonFileError::MissingKey {
                    path: path.clone(),
                    pointer: pointer.clone(),
                })?;
        }

        current.as_object_mut().ok_or_else(|| JsonFileError::NotAnObject {
            path: path.clone(),
            pointer: display_pointer(&pointer),
        })
    }

    /// Sets `leaf` to a string inside the object found at `parents`.
    ///
    /// The parents must exist; the leaf is inserted if absent and keeps its
    /// position if present.
    pub fn set_string(
        &mut self,
        parents: &[&str],
        leaf: &str,
        value: &str,
    ) -> Result<(), JsonFileError> {
        let object = self.object_at_mut(parents)?;
        object.insert(leaf.to_string(), Value::String(value.to_string()));
        Ok(())
    }

    /// Pretty JSON with two space indentation, as written to disk.
    pub fn render(&self) -> Result<String, JsonFileError> {
        let mut rendered = serde_json::to_string_pretty(&self.root)?;
        if self.trailing_newline {
            rendered.push('\n');
        }
        Ok(rendered)
    }

    /// Writes the document back to where it was loaded from, atomically.
    ///
    /// Writes to a temporary file, fsyncs it, then atomically renames it into place.
    pub fn save(&self) -> Result<(), JsonFileError> {
        use std::io::Write;

        let content = self.render()?;
        let path = self.path.as_path();

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| io_error(parent, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| io_error(path, e))?;

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| io_error(path, e))?;

        temp_file.persist(path).map_err(|e| io_error(path, e.error))?;

        Ok(())
    }
}

fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
