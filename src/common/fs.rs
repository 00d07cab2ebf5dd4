use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Error unless `path` exists and is a regular file.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Lowercased file extension, or an empty string.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Extracts the given `.zip` file into a fresh temporary directory.
/// The directory is removed when the returned handle is dropped.
pub(crate) fn extract_zip_to_temp(zip_path: &Path) -> Result<TempDir> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("failed to open {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive {}", zip_path.display()))?;

    let dest = tempfile::tempdir().context("failed to create temporary directory")?;
    archive.extract(dest.path())
        .with_context(|| format!("failed to extract {} to {}", zip_path.display(), dest.path().display()))?;

    Ok(dest)
}

/// Find the first file under `dir` with the given extension, in sorted path order.
pub(crate) fn find_first_with_extension(dir: &Path, ext: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| extension_of(path) == ext)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{extension_of, find_first_with_extension};

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of(Path::new("a/Sumatera.SHP")), "shp");
        assert_eq!(extension_of(Path::new("no_extension")), "");
    }

    #[test]
    fn finds_nested_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/b.shp"), b"").unwrap();
        std::fs::write(dir.path().join("a.dbf"), b"").unwrap();

        let found = find_first_with_extension(dir.path(), "shp").unwrap();
        assert!(found.ends_with("nested/b.shp"));
        assert!(find_first_with_extension(dir.path(), "geojson").is_none());
    }
}
