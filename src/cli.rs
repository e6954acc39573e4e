use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zhextract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract Chinese text from a folder of text files")]
#[command(
    long_about = "zhextract reads every regular file in INPUT_DIR as UTF-8, keeps the lines \
                  that contain Chinese characters, and writes them to OUTPUT_DIR/zh_<name>."
)]
#[command(after_help = "EXAMPLES:\n  \
    zhextract subtitles zh_text\n  \
    zhextract subtitles zh_text --output-format plain\n  \
    zhextract subtitles out --prefix cn_ --dry-run\n  \
    zhextract --config zhextract.toml")]
pub struct Cli {
    /// Folder holding the source text files
    pub input_dir: Option<PathBuf>,

    /// Folder receiving the zh_ files (created if missing)
    pub output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output file name prefix
    #[arg(long, help = "Prefix for output file names (default: zh_)")]
    pub prefix: Option<String>,

    /// Symbols allowed between two Chinese runs of one block
    #[arg(long, help = "Connector symbols allowed inside a Chinese block")]
    pub connectors: Option<String>,

    /// Output format for console messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be written without writing)
    #[arg(long, help = "Show which files would be written without writing them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_input_dir(self.input_dir.clone())
            .with_output_dir(self.output_dir.clone())
            .with_output_prefix(self.prefix.clone())
            .with_connectors(self.connectors.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
