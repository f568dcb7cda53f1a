//! Per-binding analysis: which request fields the URL path and the body
//! consume, and which enum packages the path parameters pull in.

use std::collections::HashSet;
use tracing::debug;

use crate::descriptor::{Binding, EnumLookup, File, Method, Registry};
use crate::imports::{GoPackage, ImportRegistry};

/// What the request body of a binding consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyConsumption {
    /// No body
    None,
    /// `body: "*"`: the whole request message
    Whole,
    /// A single field path
    Field(Vec<String>),
}

/// Field paths of the request message bound by the path and the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedFields {
    pub body: BodyConsumption,
    pub path_params: Vec<Vec<String>>,
}

impl ConsumedFields {
    /// True when the body takes the whole request, leaving nothing for the query string.
    #[must_use]
    pub fn is_whole_request(&self) -> bool {
        self.body == BodyConsumption::Whole
    }

    /// Every consumed field path, body first.
    pub fn paths(&self) -> impl Iterator<Item = &[String]> {
        let body = match &self.body {
            BodyConsumption::Field(path) => Some(path.as_slice()),
            BodyConsumption::None | BodyConsumption::Whole => None,
        };
        body.into_iter()
            .chain(self.path_params.iter().map(Vec::as_slice))
    }
}

/// Field paths consumed by `binding`.
#[must_use]
pub fn consumed_fields(binding: &Binding) -> ConsumedFields {
    let body = match &binding.body {
        None => BodyConsumption::None,
        Some(body) if body.is_wildcard() => BodyConsumption::Whole,
        Some(body) => BodyConsumption::Field(body.field_path.segments()),
    };
    ConsumedFields {
        body,
        path_params: binding
            .path_params
            .iter()
            .map(|p| p.field_path.segments())
            .collect(),
    }
}

/// Whether a path parameter of `binding` targets an enum field that is
/// (`repeated == true`) or is not repeated.
#[must_use]
pub fn has_enum_path_param(binding: &Binding, repeated: bool) -> bool {
    binding
        .path_params
        .iter()
        .any(|p| p.is_enum() && p.is_repeated() == repeated)
}

/// Shorthand for `has_enum_path_param(binding, true)`.
#[must_use]
pub fn has_repeated_enum_path_param(binding: &Binding) -> bool {
    has_enum_path_param(binding, true)
}

/// Packages of enums bound as path parameters of `method` that live outside
/// `file`'s Go package.
///
/// `seen` holds the import paths the caller already has; every package
/// returned is added to it, so the same enum referenced from several methods
/// yields one import. An enum lookup miss means the parameter is not an enum
/// and is skipped.
pub fn enum_path_param_imports(
    registry: &Registry,
    imports: &mut ImportRegistry,
    file: &File,
    method: &Method,
    seen: &mut HashSet<String>,
) -> Vec<GoPackage> {
    let mut found = Vec::new();
    for binding in &method.bindings {
        for param in &binding.path_params {
            let en = match registry.lookup_enum("", param.target.type_name()) {
                EnumLookup::Found(en) => en,
                EnumLookup::NotFound => continue,
            };
            let Ok(owner) = registry.lookup_file(&en.file) else {
                continue;
            };
            let pkg = &owner.go_pkg;
            if pkg.path == file.go_pkg.path || seen.contains(&pkg.path) {
                continue;
            }
            seen.insert(pkg.path.clone());
            debug!(method = %method.name, package = %pkg.path, "enum path parameter import");
            found.push(imports.reserve_package(pkg));
        }
    }
    found
}
