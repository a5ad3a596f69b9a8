use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Scratch ground-truth root with a `mapping/mapping.txt` and annotation files.
pub struct DatasetDir {
    dir: TempDir,
}

impl DatasetDir {
    pub fn new(mapping: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mapping_dir = dir.path().join("mapping");
        std::fs::create_dir_all(&mapping_dir).expect("create mapping dir");
        std::fs::write(mapping_dir.join("mapping.txt"), mapping).expect("write mapping");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn cache_blob(&self, name: &str) -> PathBuf {
        self.root().join("mapping").join(format!("{name}.json"))
    }

    /// Write an annotation file with one frame label per line.
    pub fn video(&self, name: &str, frames: &[&str]) -> &Self {
        let mut body = frames.join("\n");
        body.push('\n');
        std::fs::write(self.root().join(name), body).expect("write annotation");
        self
    }
}
