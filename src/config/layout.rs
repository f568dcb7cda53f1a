use super::{ConfigError, GeneratorConfig, PathType};

/// Where artifacts land, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory of the run-wide artifacts, and of unit artifacts with `paths=import`
    pub root: String,
    /// Put unit artifacts next to their proto file instead of under `root`
    pub source_relative: bool,
}

impl OutputLayout {
    /// Resolve the layout for `config`.
    ///
    /// Fails when `module` is combined with `paths=source_relative`, or when
    /// `output_path` is not below `module`.
    pub fn resolve(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        let output_path = config.output_path.trim_end_matches('/');
        let root = match config.module.as_deref() {
            Some(module) if config.paths == PathType::SourceRelative => {
                return Err(ConfigError::ConflictingPathStrategies {
                    module: module.to_string(),
                });
            }
            Some(module) if output_path == module.trim_end_matches('/') => String::new(),
            Some(module) => {
                let prefix = format!("{}/", module.trim_end_matches('/'));
                output_path
                    .strip_prefix(&prefix)
                    .ok_or_else(|| ConfigError::ModuleMismatch {
                        module: module.to_string(),
                        output_path: config.output_path.clone(),
                    })?
                    .to_string()
            }
            None => output_path.to_string(),
        };
        Ok(OutputLayout {
            root,
            source_relative: config.paths == PathType::SourceRelative,
        })
    }

    /// Path of the handler artifact for the proto file `file_name`.
    #[must_use]
    pub fn unit_path(&self, file_name: &str) -> String {
        let (dir, base) = match file_name.rsplit_once('/') {
            Some((dir, base)) => (dir, base),
            None => ("", file_name),
        };
        let stem = base.strip_suffix(".proto").unwrap_or(base);
        let dir = if self.source_relative { dir } else { &self.root };
        join(dir, &format!("{stem}.gm.go"))
    }

    /// Path of a run-wide artifact such as `routes.gm.go`.
    #[must_use]
    pub fn run_path(&self, name: &str) -> String {
        join(&self.root, name)
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}
