use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::saved::SavedBuild;

/// Write a saved build to disk as JSON, atomically.
///
/// Uses a temporary file in the same directory as `target_path`, writes
/// the JSON content, then atomically renames the temp file to the target.
/// An interrupted write never leaves a partial file.
pub fn write_build_atomic(build: &SavedBuild, target_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(build)?;

    let parent = target_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(parent)?;

    // Same directory keeps the rename on one filesystem
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(json.as_bytes())?;
    temp.flush()?;

    temp.persist(target_path)?;

    info!("Wrote build '{}' to {:?}", build.build_name, target_path);
    Ok(())
}

/// Read a saved build written by [`write_build_atomic`].
pub fn read_build(path: &Path) -> Result<SavedBuild> {
    let content = std::fs::read_to_string(path)?;
    let build: SavedBuild = serde_json::from_str(&content)?;
    debug!(
        "Read build '{}' with {} components from {:?}",
        build.build_name,
        build.components.len(),
        path
    );
    Ok(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("rig.json");

        let mut components = BTreeMap::new();
        components.insert(Category::Psu, "psu-rm750e".to_string());
        let build = SavedBuild {
            id: Some(3),
            build_name: "Quiet Office".to_string(),
            components,
            total_price: 650_000,
            created_at: "2026-03-04T05:06:07+00:00".to_string(),
        };

        write_build_atomic(&build, &path).unwrap();
        let back = read_build(&path).unwrap();
        assert_eq!(back, build);

        // No temp files left behind
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_read_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(read_build(&dir.path().join("missing.json")).is_err());
    }
}
