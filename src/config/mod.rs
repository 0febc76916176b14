//! Evaluator and diagnostics settings, loadable from TOML, YAML or JSON files

mod config;

pub use config::{Config, DiagnosticsConfig, EvaluatorConfig};
