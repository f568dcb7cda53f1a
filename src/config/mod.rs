//! # Generator configuration
//!
//! Options are layered, later sources winning:
//!
//! 1. built-in defaults ([`GeneratorConfig::default`])
//! 2. `gokitmux.toml`, given with `--config` or found next to the descriptor
//!    document
//! 3. a protoc-style parameter string (`--param "k=v,flag,Mfile.proto=path"`)
//! 4. individual CLI flags
//!
//! ## Example `gokitmux.toml`
//!
//! ```toml
//! output_path = "github.com/acme/api/gateway"
//! module = "github.com/acme/api"
//! repeated_path_param_separator = "pipes"
//! generate_service = true
//! metrics = "github.com/acme/api/internal/metrics"
//!
//! [go_package_map]
//! "acme/types/v1/types.proto" = "github.com/acme/api/types/v1;typesv1"
//! ```

mod error;
mod layout;


pub use error::ConfigError;
pub use layout::OutputLayout;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::casing::go_identifier;
use crate::descriptor::LoadOptions;

/// File name looked up next to the descriptor document.
pub const CONFIG_FILE_NAME: &str = "gokitmux.toml";

/// How unit artifact paths are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// Everything under `output_path`
    #[default]
    Import,
    /// Unit artifacts next to their proto file
    SourceRelative,
}

impl FromStr for PathType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "import" => Ok(PathType::Import),
            "source_relative" => Ok(PathType::SourceRelative),
            other => Err(ConfigError::InvalidValue {
                key: "paths".to_string(),
                value: other.to_string(),
                expected: "import or source_relative",
            }),
        }
    }
}

/// Separator for repeated enum path parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Csv,
    Pipes,
    Ssv,
    Tsv,
}

impl Separator {
    /// The separator as a Go string literal.
    #[must_use]
    pub fn go_literal(self) -> &'static str {
        match self {
            Separator::Csv => r#"",""#,
            Separator::Pipes => r#""|""#,
            Separator::Ssv => r#"" ""#,
            Separator::Tsv => r#""\t""#,
        }
    }
}

impl FromStr for Separator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Separator::Csv),
            "pipes" => Ok(Separator::Pipes),
            "ssv" => Ok(Separator::Ssv),
            "tsv" => Ok(Separator::Tsv),
            other => Err(ConfigError::InvalidValue {
                key: "repeated_path_param_separator".to_string(),
                value: other.to_string(),
                expected: "csv, pipes, ssv or tsv",
            }),
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Separator::Csv => "csv",
            Separator::Pipes => "pipes",
            Separator::Ssv => "ssv",
            Separator::Tsv => "tsv",
        })
    }
}

/// Every option of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Go import path of the generated package
    pub output_path: String,
    /// Go package name; the last element of `output_path` when unset
    pub package_name: Option<String>,
    /// Module prefix stripped from `output_path` to get the output directory
    pub module: Option<String>,
    pub paths: PathType,
    /// Prepended to derived Go import paths
    pub import_prefix: String,
    /// Go import path for files without `go_package`
    pub import_path: Option<String>,
    /// Suffix of the go-kit server variables in `Register`
    pub register_func_suffix: String,
    pub repeated_path_param_separator: Separator,
    /// Import path of a package exposing `ForHandler(http.Handler, string) http.Handler`
    pub metrics: Option<String>,
    /// Emit the aggregated `GatewayService` interface
    pub generate_service: bool,
    /// Go expression passed to `httptransport.ServerErrorEncoder`
    pub error_encoder: Option<String>,
    /// Call a user-provided `ManualRouter(svc, r)` from `Router`
    pub manual_router: bool,
    /// Overrides the descriptor document's setting
    pub allow_colon_final_segments: Option<bool>,
    /// gRPC API configuration YAML with additional HTTP rules
    pub grpc_api_configuration: Option<PathBuf>,
    /// Proto file → Go import path (`path` or `path;name`)
    pub go_package_map: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_path: "gateway".to_string(),
            package_name: None,
            module: None,
            paths: PathType::Import,
            import_prefix: String::new(),
            import_path: None,
            register_func_suffix: "Handler".to_string(),
            repeated_path_param_separator: Separator::Csv,
            metrics: None,
            generate_service: false,
            error_encoder: None,
            manual_router: false,
            allow_colon_final_segments: None,
            grpc_api_configuration: None,
            go_package_map: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Apply a protoc-style parameter string: comma-separated `key=value`
    /// pairs, bare `key` for boolean flags, and `M<file>=<import path>`.
    pub fn apply_params(&mut self, params: &str) -> Result<(), ConfigError> {
        for item in params.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = match item.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (item, None),
            };
            self.apply_param(key, value)?;
        }
        Ok(())
    }

    fn apply_param(&mut self, key: &str, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(file) = key.strip_prefix('M') {
            if let Some(path) = value {
                self.go_package_map.insert(file.to_string(), path.to_string());
                return Ok(());
            }
        }
        let text = value.unwrap_or_default().to_string();
        match key {
            "output_path" => self.output_path = text,
            "package_name" => self.package_name = non_empty(text),
            "module" => self.module = non_empty(text),
            "paths" => self.paths = text.parse()?,
            "import_prefix" => self.import_prefix = text,
            "import_path" => self.import_path = non_empty(text),
            "register_func_suffix" => self.register_func_suffix = text,
            "repeated_path_param_separator" => {
                self.repeated_path_param_separator = text.parse()?;
            }
            "metrics" => self.metrics = non_empty(text),
            "gen_service" | "generate_service" => self.generate_service = parse_flag(key, value)?,
            "error_encoder" => self.error_encoder = non_empty(text),
            "manual_router" => self.manual_router = parse_flag(key, value)?,
            "allow_colon_final_segments" => {
                self.allow_colon_final_segments = Some(parse_flag(key, value)?);
            }
            "grpc_configuration" | "grpc_api_configuration" => {
                self.grpc_api_configuration = non_empty(text).map(PathBuf::from);
            }
            other => return Err(ConfigError::UnknownParameter(other.to_string())),
        }
        Ok(())
    }

    /// Go package name of the generated code.
    #[must_use]
    pub fn package_name(&self) -> String {
        match &self.package_name {
            Some(name) => go_identifier(name),
            None => go_identifier(
                self.output_path
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default(),
            ),
        }
    }

    /// Resolve where artifacts are written. See [`OutputLayout::resolve`].
    pub fn layout(&self) -> Result<OutputLayout, ConfigError> {
        OutputLayout::resolve(self)
    }

    /// Anchor relative file paths at `dir`, the directory of the config file
    /// they were read from.
    pub fn resolve_relative_to(&mut self, dir: &Path) {
        if let Some(path) = self.grpc_api_configuration.as_mut() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Registry loading options derived from this configuration. External
    /// HTTP rules are read separately by the caller.
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            import_prefix: self.import_prefix.clone(),
            import_path: self.import_path.clone(),
            go_package_map: self.go_package_map.clone(),
            allow_colon_final_segments: self.allow_colon_final_segments,
            external_rules: Vec::new(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn parse_flag(key: &str, value: Option<&str>) -> Result<bool, ConfigError> {
    match value {
        None | Some("") | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: other.to_string(),
            expected: "true or false",
        }),
    }
}

/// Load a configuration file.
///
/// Returns `Ok(None)` when the file does not exist, and an error when it
/// exists but cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read generator config: {}", config_path.display()))?;
    let mut config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse generator config: {}", config_path.display()))?;
    if let Some(dir) = config_path.parent() {
        config.resolve_relative_to(dir);
    }
    Ok(Some(config))
}

/// `gokitmux.toml` next to the descriptor document, if it exists.
pub fn auto_detect_config_path(descriptor_path: &Path) -> Option<PathBuf> {
    let config_path = descriptor_path.parent()?.join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Resolve the configuration file to use.
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected alongside the descriptor document
/// 3. None (defaults only)
pub fn resolve_config_path(explicit_path: Option<&Path>, descriptor_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    auto_detect_config_path(descriptor_path)
}
