pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractionConfig, PathsConfig};
pub use error::{Result, UserFriendlyError, ZhExtractError};

// Core functionality re-exports
pub use extractor::{
    ChinesePattern, ConfigSnapshot, ExtractionProgress, ExtractionReport, ExtractionRun,
    FileOutcome, OutputManager, TextExtractor,
};
pub use scanner::{InputFile, InputScanner};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::Path;

/// Main library interface: one batch run from an input folder to an output
/// folder.
pub struct ZhExtract {
    config: Config,
    output_formatter: OutputFormatter,
    show_progress: bool,
    shutdown: GracefulShutdown,
}

impl ZhExtract {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, output_mode, verbose, quiet, shutdown))
    }

    /// Create an instance without installing a Ctrl+C handler.
    pub fn new_without_signals(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self::with_shutdown(config, output_mode, verbose, quiet, GracefulShutdown::new_for_test())
    }

    fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            show_progress: output_mode == OutputMode::Human && !quiet,
            shutdown,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    /// Runs the configured input directory into the configured output
    /// directory.
    pub fn run(&self, dry_run: bool) -> Result<ExtractionReport> {
        let input = self.config.input_directory()?;
        let output = self.config.output_directory();
        self.execute(input, output, dry_run)
    }

    /// Scans `input_dir`, creates `output_dir`, then writes one
    /// `<prefix><name>` file per input file that yields Chinese lines.
    pub fn extract(&self, input_dir: &Path, output_dir: &Path) -> Result<ExtractionReport> {
        self.execute(input_dir, output_dir, false)
    }

    /// Same pass as [`Self::extract`] without touching the output directory.
    pub fn dry_run(&self, input_dir: &Path, output_dir: &Path) -> Result<ExtractionReport> {
        self.execute(input_dir, output_dir, true)
    }

    fn execute(&self, input_dir: &Path, output_dir: &Path, dry_run: bool) -> Result<ExtractionReport> {
        self.shutdown.check_shutdown()?;

        let pattern = ChinesePattern::with_connectors(&self.config.extraction.connectors)?;
        tracing::debug!(pattern = pattern.as_str(), "compiled block pattern");

        self.output_formatter.start_operation(&format!(
            "Scanning {} for Chinese text",
            input_dir.display()
        ));
        let scanner = InputScanner::new(input_dir);
        let files = scanner.scan()?;
        self.output_formatter
            .debug(&scanner.get_statistics(&files).display_summary());

        let output_manager = OutputManager::new(output_dir, &self.config.extraction.output_prefix);
        if !dry_run {
            output_manager.initialize()?;
        }

        let mut progress_manager = ProgressManager::new(self.show_progress);
        let file_progress = progress_manager.create_file_progress(files.len() as u64);

        let run = {
            let output = ProgressAwareOutput::new(&self.output_formatter, Some(&progress_manager));
            let on_outcome = |outcome: &FileOutcome, progress: &ExtractionProgress| {
                ui::progress::update_file_progress(&file_progress, progress);
                output.file_outcome(outcome, dry_run);
            };

            let extractor = TextExtractor::new(pattern).with_dry_run(dry_run);
            extractor.extract_files(&files, &output_manager, Some(&self.shutdown), Some(&on_outcome))
        };

        let run = match run {
            Ok(run) => run,
            Err(e) => {
                progress_manager.clear();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("{} files written", run.progress.files_written),
            run.progress.elapsed(),
        );
        progress_manager.clear();

        let report = output_manager.create_extraction_report(
            input_dir,
            &run.outcomes,
            &run.progress,
            &self.create_config_snapshot(),
        );

        self.output_formatter
            .print_completion(&report.output_directory, dry_run);

        Ok(report)
    }

    fn create_config_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            connectors: self.config.extraction.connectors.clone(),
            output_prefix: self.config.extraction.output_prefix.clone(),
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &ZhExtractError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extracts the Chinese text of every file in `input_dir` into `output_dir`
/// with default settings and plain console output.
pub fn extract_chinese_text<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
) -> Result<ExtractionReport> {
    let zh = ZhExtract::new_without_signals(Config::default(), OutputMode::Plain, 0, false);
    zh.extract(input_dir.as_ref(), output_dir.as_ref())
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
