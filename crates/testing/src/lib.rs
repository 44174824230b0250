//! Test support shared by the workspace crates: a synthetic TrueType font
//! and label document fixtures.

pub mod fixtures;
pub mod font;

pub use font::test_font_bytes;

use std::path::PathBuf;
use tempfile::TempDir;

/// A font file written to a temporary directory that lives as long as this value.
pub struct FontFile {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl FontFile {
    pub fn write() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("test-sans.ttf");
        std::fs::write(&path, test_font_bytes())?;
        Ok(Self { dir, path })
    }

    /// A font catalog JSON document registering this file under `family` with id `"1"`.
    pub fn catalog_json(&self, family: &str) -> String {
        serde_json::json!([{ "id": "1", "name": family, "path": self.path }]).to_string()
    }
}
