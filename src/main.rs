use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;
use zhextract::{Cli, OutputFormatter, OutputMode, UserFriendlyError, ZhExtract, ZhExtractError};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let zh = match ZhExtract::from_cli(&cli) {
        Ok(zh) => zh,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    match zh.run(cli.dry_run) {
        Ok(report) => {
            zh.output_formatter().print_extraction_report(&report);

            if report.errors.is_empty() {
                0
            } else {
                2 // completed, some files failed
            }
        }
        Err(e) => {
            zh.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &ZhExtractError) -> i32 {
    match error {
        ZhExtractError::Cancelled => 130,
        ZhExtractError::InputDirectoryNotFound { .. } => 3,
        ZhExtractError::OutputDirectory { .. } => 4,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "zhextract.toml".to_string());

    match ZhExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  zhextract --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &ZhExtractError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

/// Diagnostics go to stderr; `RUST_LOG` wins over the verbosity flags.
fn setup_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "zhextract=warn",
        1 => "zhextract=info",
        _ => "zhextract=debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::parse_from([
            "zhextract",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[extraction]"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&ZhExtractError::Cancelled), 130);
        assert_eq!(
            exit_code_for(&ZhExtractError::InputDirectoryNotFound {
                path: "x".to_string()
            }),
            3
        );
        assert_eq!(
            exit_code_for(&ZhExtractError::Config {
                message: "x".to_string()
            }),
            1
        );
    }
}
