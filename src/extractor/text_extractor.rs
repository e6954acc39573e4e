use crate::error::{Result, ZhExtractError};
use crate::extractor::{ChinesePattern, OutputManager};
use crate::scanner::InputFile;
use crate::ui::GracefulShutdown;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Processed {
        input: String,
        output: String,
        lines: usize,
    },
    Skipped {
        input: String,
    },
    Failed {
        input: String,
        error: String,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &str {
        match self {
            FileOutcome::Processed { input, .. }
            | FileOutcome::Skipped { input }
            | FileOutcome::Failed { input, .. } => input,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub files_written: usize,
    pub files_skipped: usize,
    pub lines_written: usize,
    pub bytes_read: u64,
    pub total_bytes: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ExtractionProgress {
    pub fn new(total_files: usize, total_bytes: u64) -> Self {
        Self {
            files_processed: 0,
            total_files,
            files_written: 0,
            files_skipped: 0,
            lines_written: 0,
            bytes_read: 0,
            total_bytes,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, file: &InputFile, outcome: &FileOutcome) {
        self.files_processed += 1;
        self.current_file = Some(outcome.input().to_string());

        match outcome {
            FileOutcome::Processed { lines, .. } => {
                self.files_written += 1;
                self.lines_written += lines;
                self.bytes_read += file.size;
            }
            FileOutcome::Skipped { .. } => {
                self.files_skipped += 1;
                self.bytes_read += file.size;
            }
            FileOutcome::Failed { input, error } => {
                self.add_error(format!("{}: {}", input, error));
            }
        }
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let rate = self.files_processed as f64 / elapsed.as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Outcomes of a full pass over the input files, in scan order.
#[derive(Debug, Clone)]
pub struct ExtractionRun {
    pub outcomes: Vec<FileOutcome>,
    pub progress: ExtractionProgress,
}

pub struct TextExtractor {
    pattern: ChinesePattern,
    dry_run: bool,
}

impl TextExtractor {
    pub fn new(pattern: ChinesePattern) -> Self {
        Self {
            pattern,
            dry_run: false,
        }
    }

    /// In dry-run mode files are read and matched but nothing is written.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs every file through [`Self::process_file`]. A failing file is
    /// recorded and the loop moves on; only cancellation stops the pass.
    pub fn extract_files(
        &self,
        files: &[InputFile],
        output: &OutputManager,
        shutdown: Option<&GracefulShutdown>,
        on_outcome: Option<&dyn Fn(&FileOutcome, &ExtractionProgress)>,
    ) -> Result<ExtractionRun> {
        let total_bytes = files.iter().map(|f| f.size).sum();
        let mut progress = ExtractionProgress::new(files.len(), total_bytes);
        let mut outcomes = Vec::with_capacity(files.len());

        for file in files {
            if let Some(shutdown) = shutdown {
                shutdown.check_shutdown()?;
            }

            let outcome = match self.process_file(file, output) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(file = %file.filename, error = %e, "file failed");
                    FileOutcome::Failed {
                        input: file.filename.clone(),
                        error: e.to_string(),
                    }
                }
            };

            progress.record(file, &outcome);

            if let Some(callback) = on_outcome {
                callback(&outcome, &progress);
            }

            outcomes.push(outcome);
        }

        Ok(ExtractionRun { outcomes, progress })
    }

    pub fn process_file(&self, file: &InputFile, output: &OutputManager) -> Result<FileOutcome> {
        let lines = self.extract_lines(&file.source_path)?;
        if lines.is_empty() {
            return Ok(FileOutcome::Skipped {
                input: file.filename.clone(),
            });
        }

        let output_path = output.output_path_for(file);
        let output_name = output.output_name_for(file).to_string_lossy().to_string();

        if !self.dry_run {
            let bytes = output.write_lines(&output_path, &lines)?;
            tracing::debug!(
                input = %file.filename,
                output = %output_path.display(),
                lines = lines.len(),
                bytes,
                "wrote output"
            );
        }

        Ok(FileOutcome::Processed {
            input: file.filename.clone(),
            output: output_name,
            lines: lines.len(),
        })
    }

    /// Filtered lines of one file; empty means nothing to write.
    pub fn extract_lines(&self, path: &Path) -> Result<Vec<String>> {
        let content = read_utf8(path)?;
        Ok(self.pattern.extract_lines(&content))
    }
}

pub fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| ZhExtractError::Decode {
        path: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string()),
        source: e.utf8_error(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::InputScanner;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn extractor() -> TextExtractor {
        TextExtractor::new(ChinesePattern::new().unwrap())
    }

    fn run(input: &Path, output: &Path) -> ExtractionRun {
        let files = InputScanner::new(input).scan().unwrap();
        let manager = OutputManager::new(output, "zh_");
        manager.initialize().unwrap();
        extractor().extract_files(&files, &manager, None, None).unwrap()
    }

    #[test]
    fn test_greeting_example() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(
            input.path().join("greeting.txt"),
            "Hello\n你好，世界！\nBye\n混合 mixed line 文本",
        )
        .unwrap();

        let run = run(input.path(), output.path());

        assert_eq!(
            run.outcomes,
            vec![FileOutcome::Processed {
                input: "greeting.txt".to_string(),
                output: "zh_greeting.txt".to_string(),
                lines: 2,
            }]
        );
        let content = fs::read_to_string(output.path().join("zh_greeting.txt")).unwrap();
        assert_eq!(content, "你好，世界！\n混合 mixed line 文本");
    }

    #[test]
    fn test_ascii_file_is_skipped() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("plain.txt"), "no chinese here").unwrap();

        let run = run(input.path(), output.path());

        assert_eq!(
            run.outcomes,
            vec![FileOutcome::Skipped {
                input: "plain.txt".to_string()
            }]
        );
        assert!(!output.path().join("zh_plain.txt").exists());
        assert_eq!(run.progress.files_skipped, 1);
    }

    #[test]
    fn test_punctuation_only_file_is_skipped() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("marks.txt"), "note：。。").unwrap();

        let run = run(input.path(), output.path());

        assert!(matches!(run.outcomes[0], FileOutcome::Skipped { .. }));
        assert!(!output.path().join("zh_marks.txt").exists());
    }

    #[test]
    fn test_decode_error_does_not_stop_batch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a_bad.txt"), [0xe4, 0xbd, 0x41, 0xff]).unwrap();
        fs::write(input.path().join("b_good.txt"), "好").unwrap();

        let run = run(input.path(), output.path());

        match &run.outcomes[0] {
            FileOutcome::Failed { input, error } => {
                assert_eq!(input, "a_bad.txt");
                assert!(error.contains("a_bad.txt"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!output.path().join("zh_a_bad.txt").exists());
        assert_eq!(
            fs::read_to_string(output.path().join("zh_b_good.txt")).unwrap(),
            "好"
        );
        assert_eq!(run.progress.errors.len(), 1);
        assert_eq!(run.progress.files_written, 1);
    }

    #[test]
    fn test_write_error_does_not_stop_batch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "甲").unwrap();
        fs::write(input.path().join("b.txt"), "乙").unwrap();
        fs::create_dir(output.path().join("zh_a.txt")).unwrap();

        let run = run(input.path(), output.path());

        match &run.outcomes[0] {
            FileOutcome::Failed { input, .. } => assert_eq!(input, "a.txt"),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(output.path().join("zh_a.txt").is_dir());
        assert_eq!(
            fs::read_to_string(output.path().join("zh_b.txt")).unwrap(),
            "乙"
        );
        assert_eq!(run.progress.errors.len(), 1);
        assert_eq!(run.progress.files_written, 1);
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let nested = input.path().join("season2");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("ep.txt"), "中文").unwrap();

        let run = run(input.path(), output.path());

        assert!(run.outcomes.is_empty());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "一\nx\n二 two\n").unwrap();

        run(input.path(), output.path());
        let first = fs::read(output.path().join("zh_a.txt")).unwrap();
        run(input.path(), output.path());
        let second = fs::read(output.path().join("zh_a.txt")).unwrap();

        assert_eq!(first, second);
        // the block closes on 二, so the Latin tail stays out
        assert_eq!(first, "一\n二".as_bytes());
    }

    #[test]
    fn test_every_output_line_has_an_ideograph() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(
            input.path().join("mixed.srt"),
            "1\n00:00:01,000 --> 00:00:02,000\n这是 CPU\n\n2\n00:00:02,500 --> 00:00:04,000\n   \n（掌声）\n",
        )
        .unwrap();

        run(input.path(), output.path());
        let content = fs::read_to_string(output.path().join("zh_mixed.srt")).unwrap();

        assert_eq!(content, "这是 CPU\n（掌声）");
        for line in content.lines() {
            assert!(!line.trim().is_empty());
            assert!(crate::extractor::pattern::contains_ideograph(line));
        }
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "中文").unwrap();

        let files = InputScanner::new(input.path()).scan().unwrap();
        let manager = OutputManager::new(output.path(), "zh_");
        let run = extractor()
            .with_dry_run(true)
            .extract_files(&files, &manager, None, None)
            .unwrap();

        assert!(matches!(run.outcomes[0], FileOutcome::Processed { lines: 1, .. }));
        assert!(!output.path().join("zh_a.txt").exists());
    }

    #[test]
    fn test_callback_sees_each_outcome() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "中").unwrap();
        fs::write(input.path().join("b.txt"), "b").unwrap();

        let files = InputScanner::new(input.path()).scan().unwrap();
        let manager = OutputManager::new(output.path(), "zh_");
        let seen = RefCell::new(Vec::new());
        let callback = |outcome: &FileOutcome, progress: &ExtractionProgress| {
            seen.borrow_mut()
                .push((outcome.input().to_string(), progress.files_processed));
        };

        extractor()
            .extract_files(&files, &manager, None, Some(&callback))
            .unwrap();

        assert_eq!(
            seen.into_inner(),
            vec![("a.txt".to_string(), 1), ("b.txt".to_string(), 2)]
        );
    }

    #[test]
    fn test_cancellation_stops_before_next_file() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "中").unwrap();

        let files = InputScanner::new(input.path()).scan().unwrap();
        let manager = OutputManager::new(output.path(), "zh_");
        let shutdown = GracefulShutdown::new_for_test();
        shutdown.request_shutdown();

        let result = extractor().extract_files(&files, &manager, Some(&shutdown), None);

        assert!(matches!(result, Err(ZhExtractError::Cancelled)));
        assert!(!output.path().join("zh_a.txt").exists());
    }

    #[test]
    fn test_progress_tracking() {
        let mut progress = ExtractionProgress::new(4, 100);
        assert!(progress.current_file.is_none());

        let file = InputFile::new("/in/a.txt".into(), 25);
        progress.record(
            &file,
            &FileOutcome::Processed {
                input: "a.txt".to_string(),
                output: "zh_a.txt".to_string(),
                lines: 3,
            },
        );
        assert_eq!(progress.files_processed, 1);
        assert_eq!(progress.current_file.as_deref(), Some("a.txt"));
        assert_eq!(progress.lines_written, 3);
        assert_eq!(progress.bytes_read, 25);

        progress.record(
            &file,
            &FileOutcome::Failed {
                input: "a.txt".to_string(),
                error: "boom".to_string(),
            },
        );
        assert_eq!(progress.errors, vec!["a.txt: boom".to_string()]);
    }
}
