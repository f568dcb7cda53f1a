use std::fmt;

/// Invalid or contradictory generator configuration.
///
/// Raised while the configuration is assembled, so a run that fails with one
/// of these has not produced any artifact yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `module` and `paths=source_relative` were both requested
    ConflictingPathStrategies {
        /// The configured module prefix
        module: String,
    },
    /// `output_path` does not live under the configured module
    ModuleMismatch {
        /// The configured module prefix
        module: String,
        /// The configured output path
        output_path: String,
    },
    /// A `--param` key that no option answers to
    UnknownParameter(String),
    /// An option value that cannot be parsed
    InvalidValue {
        /// Option name
        key: String,
        /// Value as given
        value: String,
        /// Accepted values
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConflictingPathStrategies { module } => write!(
                f,
                "configuration error: cannot use module={module} together with paths=source_relative"
            ),
            ConfigError::ModuleMismatch {
                module,
                output_path,
            } => write!(
                f,
                "configuration error: output path {output_path:?} does not match module prefix {module:?}"
            ),
            ConfigError::UnknownParameter(key) => {
                write!(f, "configuration error: unknown parameter {key:?}")
            }
            ConfigError::InvalidValue {
                key,
                value,
                expected,
            } => write!(
                f,
                "configuration error: invalid value {value:?} for {key}, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
