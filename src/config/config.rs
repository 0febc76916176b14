use crate::Result;
use crate::diagnostics::DEFAULT_MAX_CAUSE_DEPTH;
use crate::expr::DEFAULT_MAX_DEPTH;
use camino::Utf8Path;
use ohno::{IntoAppError, app_err, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use strum::Display;

const LOG_TARGET: &str = "config";

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

const fn default_max_cause_depth() -> usize {
    DEFAULT_MAX_CAUSE_DEPTH
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Maximum nesting of compound and negated conditions
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Print the root cause of a failure ahead of the full tree
    #[serde(default)]
    pub root_cause_first: bool,

    /// Color the pass/fail markers with ANSI escapes
    #[serde(default)]
    pub use_colors: bool,

    /// Maximum number of causes followed when tracing a root cause
    #[serde(default = "default_max_cause_depth")]
    pub max_cause_depth: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            root_cause_first: false,
            use_colors: false,
            max_cause_depth: default_max_cause_depth(),
        }
    }
}

impl Config {
    /// Parse a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this configuration or fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).into_app_err("parsing TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, picking the format from its extension
    /// (`toml`, `yml`/`yaml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the extension names no known format, or if the file cannot be read,
    /// parsed or validated.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let format = FileFormat::of(path)?;
        let text = fs::read_to_string(path).into_app_err_with(|| format!("could not read settings from {path}"))?;

        let config = format.parse(&text, path)?;
        config.validate()?;
        log::debug!(target: LOG_TARGET, "Loaded {format} settings from {path}");
        Ok(config)
    }

    /// Save configuration to a file, picking the format from its extension.
    ///
    /// Nothing is written when the extension names no known format.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension names no known format, or if rendering or writing fails.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let format = FileFormat::of(path)?;
        let text = format.render(self, path)?;

        fs::write(path, text).into_app_err_with(|| format!("could not write settings to {path}"))?;
        log::debug!(target: LOG_TARGET, "Saved {format} settings to {path}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if a depth limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.evaluator.max_depth == 0 {
            bail!("evaluator.max_depth must be at least 1");
        }

        if self.diagnostics.max_cause_depth == 0 {
            bail!("diagnostics.max_cause_depth must be at least 1");
        }

        Ok(())
    }
}

/// On-disk encodings of [`Config`], chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn of(path: &Utf8Path) -> Result<Self> {
        match path.extension() {
            Some("toml") => Ok(Self::Toml),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some(other) => Err(app_err!("no settings format is known for '.{other}' files ({path})")),
            None => Err(app_err!("cannot pick a settings format for {path} without a file extension")),
        }
    }

    fn parse(self, text: &str, path: &Utf8Path) -> Result<Config> {
        let context = || format!("could not parse {self} settings in {path}");
        match self {
            Self::Toml => toml::from_str(text).into_app_err_with(context),
            Self::Yaml => serde_yaml::from_str(text).into_app_err_with(context),
            Self::Json => serde_json::from_str(text).into_app_err_with(context),
        }
    }

    fn render(self, config: &Config, path: &Utf8Path) -> Result<String> {
        let context = || format!("could not render settings as {self} for {path}");
        match self {
            Self::Toml => toml::to_string_pretty(config).into_app_err_with(context),
            Self::Yaml => serde_yaml::to_string(config).into_app_err_with(context),
            Self::Json => serde_json::to_string_pretty(config).into_app_err_with(context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.evaluator.max_depth, 100);
        assert_eq!(config.diagnostics.max_cause_depth, 1024);
        assert!(!config.diagnostics.root_cause_first);
        assert!(!config.diagnostics.use_colors);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            "
[evaluator]
max_depth = 8

[diagnostics]
root_cause_first = true
",
        )
        .unwrap();

        assert_eq!(config.evaluator.max_depth, 8);
        assert!(config.diagnostics.root_cause_first);
        assert_eq!(config.diagnostics.max_cause_depth, 1024);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = Config::from_toml_str("[evaluator]\nmax_dept = 8\n");
        assert!(result.is_err(), "misspelled field should be rejected");
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = Config::from_toml_str("[evaluator]\nmax_depth = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_depth must be at least 1"));

        let err = Config::from_toml_str("[diagnostics]\nmax_cause_depth = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_cause_depth must be at least 1"));
    }

    #[test]
    fn test_file_format_from_extension() {
        assert_eq!(FileFormat::of(Utf8Path::new("a/settings.toml")).unwrap(), FileFormat::Toml);
        assert_eq!(FileFormat::of(Utf8Path::new("settings.yml")).unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::of(Utf8Path::new("settings.yaml")).unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::of(Utf8Path::new("settings.json")).unwrap(), FileFormat::Json);

        let err = FileFormat::of(Utf8Path::new("settings.ini")).unwrap_err();
        assert!(err.to_string().contains("no settings format is known for '.ini' files"));

        let err = FileFormat::of(Utf8Path::new("settings")).unwrap_err();
        assert!(err.to_string().contains("without a file extension"));
    }

    #[test]
    fn test_parse_error_names_format_and_path() {
        let err = FileFormat::Json.parse("{", Utf8Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().contains("could not parse JSON settings in broken.json"));
    }

    #[test]
    fn test_every_format_renders_what_it_parses() {
        let mut config = Config::default();
        config.evaluator.max_depth = 7;
        let path = Utf8Path::new("settings");

        for format in [FileFormat::Toml, FileFormat::Yaml, FileFormat::Json] {
            let text = format.render(&config, path).unwrap();
            assert_eq!(format.parse(&text, path).unwrap(), config, "{format}");
        }
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.diagnostics.use_colors = true;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
