use crate::error::{Result, ZhExtractError};
use crate::extractor::ChinesePattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Punctuation and symbols allowed between two CJK runs of the same block.
pub const DEFAULT_CONNECTORS: &str = r#",.;:()'"?!@#$%^&*_+-=[]{}|\<>`~"#;
pub const DEFAULT_OUTPUT_PREFIX: &str = "zh_";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "zh_text";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_directory: Option<PathBuf>,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub connectors: String,
    pub output_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_directory: None,
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            connectors: DEFAULT_CONNECTORS.to_string(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ZhExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ZhExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ZhExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["zhextract.toml", ".zhextract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        tracing::debug!(path = default_path, "using configuration file");
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref input_dir) = cli_args.input_dir {
            self.paths.input_directory = Some(input_dir.clone());
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.paths.output_directory = output_dir.clone();
        }

        if let Some(ref prefix) = cli_args.output_prefix {
            self.extraction.output_prefix = prefix.clone();
        }

        if let Some(ref connectors) = cli_args.connectors {
            self.extraction.connectors = connectors.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ZhExtractError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ZhExtractError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let prefix = &self.extraction.output_prefix;
        if prefix.is_empty() {
            return Err(ZhExtractError::Config {
                message: "Output prefix must not be empty".to_string(),
            });
        }

        if prefix.contains('/') || prefix.contains('\\') {
            return Err(ZhExtractError::Config {
                message: format!("Output prefix must not contain path separators: {}", prefix),
            });
        }

        if self.paths.output_directory.as_os_str().is_empty() {
            return Err(ZhExtractError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        ChinesePattern::with_connectors(&self.extraction.connectors)?;
        self.input_directory()?;

        Ok(())
    }

    /// Input directory, or a configuration error when neither the CLI nor the
    /// config file supplied one.
    pub fn input_directory(&self) -> Result<&Path> {
        self.paths
            .input_directory
            .as_deref()
            .ok_or_else(|| ZhExtractError::Config {
                message: "No input directory given (pass INPUT_DIR or set paths.input_directory)"
                    .to_string(),
            })
    }

    pub fn output_directory(&self) -> &Path {
        &self.paths.output_directory
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.paths.input_directory = Some(PathBuf::from("subtitles"));
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output_prefix: Option<String>,
    pub connectors: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_dir(mut self, input_dir: Option<PathBuf>) -> Self {
        self.input_dir = input_dir;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_output_prefix(mut self, prefix: Option<String>) -> Self {
        self.output_prefix = prefix;
        self
    }

    pub fn with_connectors(mut self, connectors: Option<String>) -> Self {
        self.connectors = connectors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extraction.output_prefix, "zh_");
        assert_eq!(config.extraction.connectors, DEFAULT_CONNECTORS);
        assert_eq!(config.paths.output_directory, PathBuf::from("zh_text"));
        assert!(config.paths.input_directory.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.paths.input_directory = Some(PathBuf::from("subs"));
        assert!(config.validate().is_ok());

        config.extraction.output_prefix.clear();
        assert!(config.validate().is_err());

        config.extraction.output_prefix = "out/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_input_directory() {
        let config = Config::default();
        assert!(matches!(
            config.input_directory(),
            Err(ZhExtractError::Config { .. })
        ));
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.extraction.output_prefix = "cn_".to_string();
        config.paths.input_directory = Some(PathBuf::from("in"));
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.extraction.output_prefix, "cn_");
        assert_eq!(loaded_config.extraction.connectors, DEFAULT_CONNECTORS);
        assert_eq!(loaded_config.paths.input_directory, Some(PathBuf::from("in")));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_file(temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ZhExtractError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_input_dir(Some(PathBuf::from("subs")))
            .with_output_dir(Some(PathBuf::from("out")))
            .with_output_prefix(Some("cn_".to_string()));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.input_directory().unwrap(), Path::new("subs"));
        assert_eq!(config.output_directory(), Path::new("out"));
        assert_eq!(config.extraction.output_prefix, "cn_");
        assert_eq!(config.extraction.connectors, DEFAULT_CONNECTORS);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[paths]"));
        assert!(sample.contains("[extraction]"));
        assert!(sample.contains("output_prefix"));

        let parsed: Config = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.extraction.connectors, DEFAULT_CONNECTORS);
    }
}
