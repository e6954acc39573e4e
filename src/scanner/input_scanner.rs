use crate::error::{Result, ZhExtractError};
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct InputFile {
    pub source_path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl InputFile {
    pub fn new(source_path: PathBuf, size: u64) -> Self {
        let filename = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            source_path,
            filename,
            size,
        }
    }
}

/// Lists the regular files directly inside one directory.
pub struct InputScanner {
    root: PathBuf,
}

impl InputScanner {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Returns the regular files of the input directory sorted by name.
    /// Subdirectories are skipped, never descended into. Symlinks count as
    /// files when they resolve to one.
    pub fn scan(&self) -> Result<Vec<InputFile>> {
        let root_path = self.root.as_path();

        if !root_path.exists() {
            return Err(ZhExtractError::InputDirectoryNotFound {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(ZhExtractError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut files = Vec::new();

        for entry in walker {
            let entry = entry.map_err(|e| ZhExtractError::Io(e.into()))?;
            let path = entry.path();

            // `Path::metadata` follows symlinks, `DirEntry::metadata` does not.
            let metadata = match path.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "unreadable entry");
                    continue;
                }
            };

            if !metadata.is_file() {
                tracing::debug!(path = %path.display(), "skipping non-regular entry");
                continue;
            }

            files.push(InputFile::new(path.to_path_buf(), metadata.len()));
        }

        tracing::debug!(root = %root_path.display(), count = files.len(), "scanned input directory");

        Ok(files)
    }

    pub fn get_statistics(&self, files: &[InputFile]) -> ScanStatistics {
        let (largest_file_size, largest_file) = files
            .iter()
            .max_by_key(|f| f.size)
            .map(|f| (f.size, f.filename.clone()))
            .unwrap_or((0, String::new()));

        ScanStatistics {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            largest_file_size,
            largest_file,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file: String,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        if self.total_files == 0 {
            return "Scan found no input files".to_string();
        }

        format!(
            "Scan found {} files ({} bytes), largest: {} ({} bytes)",
            self.total_files, self.total_size, self.largest_file, self.largest_file_size
        )
    }
}
