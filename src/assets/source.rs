use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::error::TidepoolError;

/// Somewhere asset bytes come from.
pub trait AssetSource {
    /// Read the asset at `path` (relative to the asset root, `/`-separated).
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::AssetLoad`] if the asset is unavailable.
    fn read(&self, path: &str) -> Result<Vec<u8>, TidepoolError>;
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FileSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, TidepoolError> {
        let full = self.root.join(path.trim_start_matches('/'));
        std::fs::read(&full).map_err(|e| TidepoolError::asset(path, e))
    }
}

/// Assets held in memory, keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Add or replace an asset.
    pub fn insert(&mut self, path: &str, bytes: Vec<u8>) {
        let _ = self.files.insert(normalize(path), bytes);
    }

    /// Whether `path` has been added.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&normalize(path))
    }

    /// Number of assets held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, TidepoolError> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| TidepoolError::asset(path, "not found"))
    }
}

/// Collapse `.`/`..` segments and strip the leading `/`.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                let _ = parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

/// Resolve a URI found inside the asset at `base` to an asset path.
///
/// The URI is percent-decoded and taken relative to `base`'s directory.
#[must_use]
pub fn resolve_uri(base: &str, uri: &str) -> String {
    let decoded = percent_decode(uri);
    let dir = base.rsplit_once('/').map_or("", |(dir, _)| dir);
    if dir.is_empty() {
        normalize(&decoded)
    } else {
        normalize(&format!("{dir}/{decoded}"))
    }
}

fn percent_decode(uri: &str) -> String {
    let bytes = uri.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uris_resolve_against_the_model_directory() {
        assert_eq!(
            resolve_uri("models/04/Gold.gltf", "Gold.bin"),
            "models/04/Gold.bin"
        );
        assert_eq!(
            resolve_uri("models/04/Gold.gltf", "../textures/a%20b.png"),
            "models/textures/a b.png"
        );
        assert_eq!(resolve_uri("scene.gltf", "./buf.bin"), "buf.bin");
        assert_eq!(resolve_uri("m.gltf", "100%"), "100%");
    }

    #[test]
    fn memory_source_normalizes_paths() {
        let mut source = MemorySource::default();
        source.insert("/models/img/Inside.png", vec![1, 2, 3]);
        assert!(source.contains("models/img/Inside.png"));
        assert_eq!(source.read("models/./img/Inside.png").unwrap(), vec![1, 2, 3]);
        assert_eq!(source.len(), 1);

        let err = source.read("models/missing.png").unwrap_err();
        assert!(matches!(err, TidepoolError::AssetLoad { .. }));
    }

    #[test]
    fn file_source_reports_missing_files() {
        let source = FileSource::new(std::env::temp_dir());
        let err = source.read("/tidepool-does-not-exist.gltf").unwrap_err();
        assert!(err.to_string().contains("tidepool-does-not-exist.gltf"));
    }
}
