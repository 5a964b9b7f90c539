use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

pub struct ReferenceImageManager {
    reference_dir: PathBuf,
}

impl ReferenceImageManager {
    pub fn new(reference_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference_dir: reference_dir.into(),
        }
    }

    pub fn list_references(&self) -> Vec<PathBuf> {
        let mut references = Vec::new();
        let Ok(entries) = fs::read_dir(&self.reference_dir) else {
            return references;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_lowercase);
            if matches!(extension.as_deref(), Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext)) {
                references.push(path);
            }
        }

        references.sort();
        references
    }

    pub fn add_reference(&self, source: &Path, name: Option<&str>) -> Result<PathBuf> {
        if !source.exists() {
            return Err(anyhow!("源文件不存在: {}", source.display()));
        }

        fs::create_dir_all(&self.reference_dir)?;

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let target_name = match name {
            Some(name) if !extension.is_empty() && !name.ends_with(&format!(".{extension}")) => {
                format!("{name}.{extension}")
            }
            Some(name) => name.to_string(),
            None => source
                .file_name()
                .ok_or_else(|| anyhow!("源文件路径无效: {}", source.display()))?
                .to_string_lossy()
                .into_owned(),
        };

        let target = self.reference_dir.join(target_name);
        fs::copy(source, &target)?;

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_filters_by_supported_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("b.PNG"), b"x").unwrap();
        fs::write(dir.path().join("c.webp"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let manager = ReferenceImageManager::new(dir.path());
        let references = manager.list_references();

        assert_eq!(references.len(), 3);
        assert!(references.iter().all(|path| path.extension().is_some()));
    }

    #[test]
    fn listing_missing_directory_is_empty() {
        let manager = ReferenceImageManager::new("/no/such/reference/dir");
        assert!(manager.list_references().is_empty());
    }

    #[test]
    fn add_copies_into_directory_and_appends_extension() {
        let source_dir = tempfile::tempdir().unwrap();
        let reference_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("face.jpg");
        fs::write(&source, b"imagedata").unwrap();

        let manager = ReferenceImageManager::new(reference_dir.path().join("refs"));
        let copied = manager.add_reference(&source, Some("portrait")).unwrap();

        assert_eq!(copied.file_name().unwrap(), "portrait.jpg");
        assert_eq!(fs::read(&copied).unwrap(), b"imagedata");
    }

    #[test]
    fn add_missing_source_is_an_error() {
        let reference_dir = tempfile::tempdir().unwrap();
        let manager = ReferenceImageManager::new(reference_dir.path());

        let result = manager.add_reference(Path::new("/no/such/file.jpg"), None);
        assert!(result.is_err());
    }
}
