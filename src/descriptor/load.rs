use anyhow::Context;
use std::path::Path;
use tracing::info;

use super::source::{GrpcApiConfiguration, HttpRuleSource, RegistrySource};
use super::{LoadOptions, Registry};

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Parse a descriptor document. YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn parse_registry_source(path: &Path) -> anyhow::Result<RegistrySource> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor document: {}", path.display()))?;
    let source = if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse descriptor document: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse descriptor document: {}", path.display()))?
    };
    Ok(source)
}

/// Read the HTTP rules of a gRPC API configuration (`google.api.Service` YAML).
pub fn load_grpc_api_configuration(path: &Path) -> anyhow::Result<Vec<HttpRuleSource>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read gRPC API configuration: {}", path.display()))?;
    let config: GrpcApiConfiguration = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse gRPC API configuration: {}", path.display()))?;
    Ok(config.http.rules)
}

/// Load and resolve a descriptor document into a [`Registry`].
pub fn load_registry(path: &Path, opts: &LoadOptions) -> anyhow::Result<Registry> {
    let source = parse_registry_source(path)?;
    let files = source.files.len();
    let registry = Registry::from_source(source, opts)
        .with_context(|| format!("Failed to resolve descriptor document: {}", path.display()))?;
    info!(path = %path.display(), files, "loaded descriptor registry");
    Ok(registry)
}
