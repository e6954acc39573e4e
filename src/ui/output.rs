use crate::error::{UserFriendlyError, ZhExtractError};
use crate::extractor::{ExtractionReport, FileOutcome};
use crate::ui::progress::format_duration;
use crate::ui::ProgressManager;
use console::{style, Emoji, Term};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SKIP: Emoji = Emoji("⏭️  ", "- ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("{}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("{}", message),
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    /// One console line per input file.
    pub fn file_outcome(&self, outcome: &FileOutcome, dry_run: bool) {
        if let OutputMode::Json = self.mode {
            self.print_json_outcome(outcome, dry_run);
            return;
        }

        match outcome {
            FileOutcome::Processed { input, output, lines } => {
                if dry_run {
                    self.success(&format!("would write: {} -> {} ({} lines)", input, output, lines));
                } else {
                    self.success(&format!("processed: {} -> {}", input, output));
                }
            }
            FileOutcome::Skipped { input } => {
                if !self.should_show_message(0) {
                    return;
                }
                let message = format!("skipped (no Chinese content): {}", input);
                match self.mode {
                    OutputMode::Human if self.use_colors => {
                        println!("{}{}", SKIP, style(message).dim())
                    }
                    OutputMode::Human => println!("- {}", message),
                    _ => println!("{}", message),
                }
            }
            FileOutcome::Failed { input, error } => {
                self.error(&format!("error processing {}: {}", input, error));
            }
        }
    }

    /// Final line naming where the results went, or would go on a dry run.
    pub fn print_completion(&self, output_directory: &Path, dry_run: bool) {
        if self.quiet {
            return;
        }

        let message = if dry_run {
            format!("dry run: would save to {}", output_directory.display())
        } else {
            format!("done: Chinese text saved to {}", output_directory.display())
        };

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", SPARKLES, style(message).green().bold());
                } else {
                    println!("{}", message);
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "complete",
                    "output_directory": output_directory.display().to_string(),
                    "dry_run": dry_run,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
            }
            OutputMode::Plain => println!("{}", message),
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &ZhExtractError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_extraction_report(&self, report: &ExtractionReport) {
        match self.mode {
            OutputMode::Human => {
                if self.should_show_message(1) {
                    self.print_human_report(report);
                }
            }
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => {
                if self.should_show_message(1) {
                    self.print_plain_report(report);
                }
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_outcome(&self, outcome: &FileOutcome, dry_run: bool) {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let processed_status = if dry_run { "would_write" } else { "processed" };
        let event = match outcome {
            FileOutcome::Processed { input, output, lines } => {
                if self.quiet {
                    return;
                }
                serde_json::json!({
                    "type": "file",
                    "status": processed_status,
                    "input": input,
                    "output": output,
                    "lines": lines,
                    "timestamp": timestamp
                })
            }
            FileOutcome::Skipped { input } => {
                if self.quiet {
                    return;
                }
                serde_json::json!({
                    "type": "file",
                    "status": "skipped",
                    "input": input,
                    "timestamp": timestamp
                })
            }
            FileOutcome::Failed { input, error } => serde_json::json!({
                "type": "file",
                "status": "error",
                "input": input,
                "error": error,
                "timestamp": timestamp
            }),
        };

        self.print_json_object(&event);
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &ExtractionReport) {
        let summary = &report.extraction_summary;
        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };

        println!();
        self.print_separator();
        println!("  Files scanned:   {}", highlight(summary.files_scanned.to_string()));
        println!("  Files written:   {}", highlight(summary.files_written.to_string()));
        println!("  Files skipped:   {}", highlight(summary.files_skipped.to_string()));
        println!("  Lines written:   {}", highlight(summary.lines_written.to_string()));
        println!("  Bytes read:      {}", highlight(format_bytes(summary.bytes_read)));
        println!(
            "  Time taken:      {}",
            highlight(format_duration(summary.extraction_duration))
        );

        if !report.errors.is_empty() {
            println!("  Errors:          {}", report.errors.len());
            for error in &report.errors {
                println!("    - {}", error);
            }
        }
        self.print_separator();
    }

    fn print_plain_report(&self, report: &ExtractionReport) {
        let summary = &report.extraction_summary;
        println!("Files scanned: {}", summary.files_scanned);
        println!("Files written: {}", summary.files_written);
        println!("Files skipped: {}", summary.files_skipped);
        println!("Lines written: {}", summary.lines_written);
        println!("Bytes read: {}", summary.bytes_read);
        println!("Duration: {:?}", summary.extraction_duration);
        if !report.errors.is_empty() {
            println!("Errors: {}", report.errors.len());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Routes formatter output through the progress bar so lines print cleanly
/// above it.
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn file_outcome(&self, outcome: &FileOutcome, dry_run: bool) {
        self.suspend_and_print(|f| f.file_outcome(outcome, dry_run));
    }
}
