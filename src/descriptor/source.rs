//! Serialized shape of a descriptor document and of a gRPC API configuration.

use http::Method as HttpMethod;
use serde::{Deserialize, Serialize};

use super::{DescriptorError, FieldType};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySource {
    /// Keep `:` in the final path segment instead of splitting off a verb
    #[serde(default)]
    pub allow_colon_final_segments: bool,
    /// Files to emit artifacts for; every file when empty
    #[serde(default)]
    pub files_to_generate: Vec<String>,
    #[serde(default)]
    pub files: Vec<FileSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub name: String,
    #[serde(default)]
    pub package: String,
    /// `go_package` option: `import/path` or `import/path;name`
    #[serde(default)]
    pub go_package: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageSource>,
    #[serde(default)]
    pub enums: Vec<EnumSource>,
    #[serde(default)]
    pub services: Vec<ServiceSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSource {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSource {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub repeated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumSource {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSource {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSource {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    #[serde(default)]
    pub http: Option<HttpRuleSource>,
}

/// `google.api.HttpRule`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpRuleSource {
    /// Only used by rules coming from a gRPC API configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_bindings: Vec<HttpRuleSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPattern {
    pub kind: String,
    pub path: String,
}

impl HttpRuleSource {
    /// The HTTP verb and path template of the rule. Exactly one pattern must be set.
    pub fn pattern(&self, selector: &str) -> Result<(HttpMethod, &str), DescriptorError> {
        let mut patterns = Vec::new();
        for (method, path) in [
            (HttpMethod::GET, &self.get),
            (HttpMethod::PUT, &self.put),
            (HttpMethod::POST, &self.post),
            (HttpMethod::DELETE, &self.delete),
            (HttpMethod::PATCH, &self.patch),
        ] {
            if let Some(path) = path {
                patterns.push((method, path.as_str()));
            }
        }
        if let Some(custom) = &self.custom {
            let method = HttpMethod::from_bytes(custom.kind.as_bytes()).map_err(|_| {
                DescriptorError::InvalidHttpRule {
                    selector: selector.to_string(),
                    reason: format!("invalid custom verb {:?}", custom.kind),
                }
            })?;
            patterns.push((method, custom.path.as_str()));
        }
        match patterns.len() {
            1 => Ok(patterns.remove(0)),
            0 => Err(DescriptorError::InvalidHttpRule {
                selector: selector.to_string(),
                reason: "no pattern set".to_string(),
            }),
            n => Err(DescriptorError::InvalidHttpRule {
                selector: selector.to_string(),
                reason: format!("{n} patterns set, expected one"),
            }),
        }
    }

    /// The rule followed by its additional bindings, flattened in declaration order.
    pub fn flatten(&self) -> Vec<&HttpRuleSource> {
        let mut rules = vec![self];
        for extra in &self.additional_bindings {
            rules.extend(extra.flatten());
        }
        rules
    }
}

/// The parts of a `google.api.Service` configuration we read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrpcApiConfiguration {
    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSection {
    #[serde(default)]
    pub rules: Vec<HttpRuleSource>,
}
