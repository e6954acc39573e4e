use crate::error::{Result, ZhExtractError};
use crate::extractor::{ExtractionProgress, FileOutcome};
use crate::scanner::InputFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub extraction_summary: ExtractionSummary,
    pub files: Vec<FileRecord>,
    pub extraction_time: DateTime<Utc>,
    pub errors: Vec<String>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub files_scanned: usize,
    pub files_written: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub lines_written: usize,
    pub bytes_read: u64,
    pub extraction_duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Processed,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub input: String,
    pub output: Option<String>,
    pub status: FileStatus,
    pub lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub connectors: String,
    pub output_prefix: String,
}

impl From<&FileOutcome> for FileRecord {
    fn from(outcome: &FileOutcome) -> Self {
        match outcome {
            FileOutcome::Processed { input, output, lines } => Self {
                input: input.clone(),
                output: Some(output.clone()),
                status: FileStatus::Processed,
                lines: *lines,
                error: None,
            },
            FileOutcome::Skipped { input } => Self {
                input: input.clone(),
                output: None,
                status: FileStatus::Skipped,
                lines: 0,
                error: None,
            },
            FileOutcome::Failed { input, error } => Self {
                input: input.clone(),
                output: None,
                status: FileStatus::Failed,
                lines: 0,
                error: Some(error.clone()),
            },
        }
    }
}

/// Owns the output directory: creation, `<prefix><name>` naming and writes.
pub struct OutputManager {
    output_directory: PathBuf,
    prefix: String,
}

impl OutputManager {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(output_directory: P, prefix: S) -> Self {
        Self {
            output_directory: output_directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates the output directory and any missing parents. Failure here is
    /// fatal for the run.
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.output_directory).map_err(|source| {
            ZhExtractError::OutputDirectory {
                path: self.output_directory.display().to_string(),
                source,
            }
        })?;

        tracing::debug!(path = %self.output_directory.display(), "output directory ready");
        Ok(())
    }

    /// Absolute form of the output directory, falling back to the configured
    /// path when it cannot be resolved.
    pub fn absolute_output_directory(&self) -> PathBuf {
        fs::canonicalize(&self.output_directory)
            .or_else(|_| std::path::absolute(&self.output_directory))
            .unwrap_or_else(|_| self.output_directory.clone())
    }

    pub fn output_name_for(&self, input: &InputFile) -> OsString {
        let mut name = OsString::from(&self.prefix);
        match input.source_path.file_name() {
            Some(file_name) => name.push(file_name),
            None => name.push(&input.filename),
        }
        name
    }

    pub fn output_path_for(&self, input: &InputFile) -> PathBuf {
        self.output_directory.join(self.output_name_for(input))
    }

    /// Writes `lines` joined by `\n` (no trailing newline), replacing any
    /// existing file. Returns the number of bytes written.
    pub fn write_lines(&self, path: &Path, lines: &[String]) -> Result<u64> {
        let content = lines.join("\n");
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;

        Ok(content.len() as u64)
    }

    pub fn create_extraction_report(
        &self,
        input_directory: &Path,
        outcomes: &[FileOutcome],
        progress: &ExtractionProgress,
        config: &ConfigSnapshot,
    ) -> ExtractionReport {
        ExtractionReport {
            input_directory: input_directory.to_path_buf(),
            output_directory: self.absolute_output_directory(),
            extraction_summary: ExtractionSummary {
                files_scanned: progress.total_files,
                files_written: progress.files_written,
                files_skipped: progress.files_skipped,
                files_failed: progress.errors.len(),
                lines_written: progress.lines_written,
                bytes_read: progress.bytes_read,
                extraction_duration: progress.elapsed(),
            },
            files: outcomes.iter().map(FileRecord::from).collect(),
            extraction_time: Utc::now(),
            errors: progress.errors.clone(),
            config_used: config.clone(),
        }
    }
}
