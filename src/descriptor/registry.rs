use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use super::source::{FileSource, HttpRuleSource, RegistrySource};
use super::{
    Binding, Body, DescriptorError, Enum, Field, FieldPath, FieldPathComponent, FieldType, File,
    Message, Method, Parameter, PathTemplate, Service,
};
use crate::imports::GoPackage;

/// Result of an enum lookup. A miss is an ordinary outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumLookup<'a> {
    Found(&'a Enum),
    NotFound,
}

/// How Go import paths are derived for files without a `go_package` option.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Prepended to derived import paths
    pub import_prefix: String,
    /// Import path used for every file lacking `go_package`
    pub import_path: Option<String>,
    /// Explicit file → import path mappings (protoc `M` flags)
    pub go_package_map: BTreeMap<String, String>,
    /// Overrides the document's `allow_colon_final_segments`
    pub allow_colon_final_segments: Option<bool>,
    /// Rules from a gRPC API configuration, matched by selector
    pub external_rules: Vec<HttpRuleSource>,
}

/// Read-only object graph of every file in a descriptor document.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    files: Vec<File>,
    messages: HashMap<String, Message>,
    enums: HashMap<String, Enum>,
    files_to_generate: Vec<String>,
    allow_colon_final_segments: bool,
}

impl Registry {
    /// Resolve a parsed document into a registry.
    pub fn from_source(source: RegistrySource, opts: &LoadOptions) -> Result<Self, DescriptorError> {
        let allow_colon = opts
            .allow_colon_final_segments
            .unwrap_or(source.allow_colon_final_segments);
        let mut reg = Registry {
            files_to_generate: source.files_to_generate.clone(),
            allow_colon_final_segments: allow_colon,
            ..Default::default()
        };

        // Declarations first so that fields can reference types from any file.
        let mut scopes: HashSet<String> = HashSet::new();
        for file in &source.files {
            for msg in &file.messages {
                scopes.insert(qualify(&file.package, &msg.name));
            }
            for en in &file.enums {
                scopes.insert(qualify(&file.package, &en.name));
            }
        }

        for file in &source.files {
            let mut message_names = Vec::new();
            for msg in &file.messages {
                let full_name = qualify(&file.package, &msg.name);
                let fields = msg
                    .fields
                    .iter()
                    .map(|f| {
                        let type_name = match (&f.type_name, f.ty.is_named()) {
                            (Some(name), true) => Some(resolve(&scopes, &file.package, name)?),
                            (None, true) => {
                                return Err(DescriptorError::UnknownType {
                                    name: format!("{}.{}", full_name, f.name),
                                    scope: file.package.clone(),
                                })
                            }
                            (_, false) => None,
                        };
                        Ok(Field {
                            name: f.name.clone(),
                            ty: f.ty,
                            type_name,
                            repeated: f.repeated,
                            message: full_name.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                message_names.push(full_name.clone());
                reg.messages.insert(
                    full_name.clone(),
                    Message {
                        name: msg.name.clone(),
                        full_name,
                        file: file.name.clone(),
                        fields,
                    },
                );
            }

            let mut enum_names = Vec::new();
            for en in &file.enums {
                let full_name = qualify(&file.package, &en.name);
                enum_names.push(full_name.clone());
                reg.enums.insert(
                    full_name.clone(),
                    Enum {
                        name: en.name.clone(),
                        full_name,
                        file: file.name.clone(),
                        values: en.values.clone(),
                    },
                );
            }

            reg.files.push(File {
                name: file.name.clone(),
                package: file.package.clone(),
                go_pkg: go_package_for(file, opts),
                messages: message_names,
                enums: enum_names,
                services: Vec::new(),
            });
        }

        let mut external: BTreeMap<String, Vec<&HttpRuleSource>> = BTreeMap::new();
        for rule in &opts.external_rules {
            let selector = rule.selector.clone().unwrap_or_default();
            external.entry(selector).or_default().push(rule);
        }
        let mut bound: HashSet<String> = HashSet::new();

        for (idx, file) in source.files.iter().enumerate() {
            let mut services = Vec::new();
            for svc in &file.services {
                let mut methods = Vec::new();
                for m in &svc.methods {
                    let selector = format!("{}.{}.{}", file.package, svc.name, m.name)
                        .trim_start_matches('.')
                        .to_string();
                    let request_type = resolve(&scopes, &file.package, &m.input_type)?;
                    let response_type = resolve(&scopes, &file.package, &m.output_type)?;

                    let mut rules: Vec<&HttpRuleSource> = Vec::new();
                    if let Some(rule) = &m.http {
                        rules.extend(rule.flatten());
                    }
                    if let Some(extra) = external.get(&selector) {
                        bound.insert(selector.clone());
                        for rule in extra {
                            rules.extend(rule.flatten());
                        }
                    }

                    let mut bindings = Vec::new();
                    for (index, rule) in rules.into_iter().enumerate() {
                        bindings.push(reg.binding(&selector, &request_type, &response_type, index, rule)?);
                    }
                    debug!(method = %selector, bindings = bindings.len(), "resolved method");
                    methods.push(Method {
                        name: m.name.clone(),
                        request_type,
                        response_type,
                        bindings,
                    });
                }
                services.push(Service {
                    name: svc.name.clone(),
                    file: file.name.clone(),
                    methods,
                });
            }
            reg.files[idx].services = services;
        }

        let unbound: Vec<String> = external
            .keys()
            .filter(|selector| !bound.contains(*selector))
            .cloned()
            .collect();
        if !unbound.is_empty() {
            return Err(DescriptorError::UnboundHttpRules(unbound));
        }

        Ok(reg)
    }

    fn binding(
        &self,
        selector: &str,
        request_type: &str,
        response_type: &str,
        index: usize,
        rule: &HttpRuleSource,
    ) -> Result<Binding, DescriptorError> {
        let (http_method, template) = rule.pattern(selector)?;
        let path_tmpl = PathTemplate::parse(template, self.allow_colon_final_segments)?;

        let path_params = path_tmpl
            .fields()
            .map(|path| {
                let field_path = self.resolve_field_path(request_type, path)?;
                let target = field_path
                    .0
                    .last()
                    .map(|c| c.target.clone())
                    .ok_or_else(|| DescriptorError::UnknownField {
                        message: request_type.to_string(),
                        field: path.to_string(),
                    })?;
                Ok(Parameter { field_path, target })
            })
            .collect::<Result<Vec<_>, DescriptorError>>()?;

        let body = self.body(request_type, rule.body.as_deref())?;
        let response_body = self.body(response_type, rule.response_body.as_deref())?;

        Ok(Binding {
            index,
            http_method,
            path_tmpl,
            path_params,
            body,
            response_body,
        })
    }

    fn body(&self, message: &str, body: Option<&str>) -> Result<Option<Body>, DescriptorError> {
        match body {
            None | Some("") => Ok(None),
            Some("*") => Ok(Some(Body {
                field_path: FieldPath::default(),
            })),
            Some(path) => Ok(Some(Body {
                field_path: self.resolve_field_path(message, path)?,
            })),
        }
    }

    /// Resolve a dotted field path starting at `message`.
    pub fn resolve_field_path(&self, message: &str, path: &str) -> Result<FieldPath, DescriptorError> {
        let mut components = Vec::new();
        let mut current = self.lookup_msg("", message)?;
        let names: Vec<&str> = path.split('.').collect();
        for (i, name) in names.iter().enumerate() {
            let field = current
                .field(name)
                .ok_or_else(|| DescriptorError::UnknownField {
                    message: current.full_name.clone(),
                    field: (*name).to_string(),
                })?;
            components.push(FieldPathComponent {
                name: (*name).to_string(),
                target: field.clone(),
            });
            if i + 1 < names.len() {
                if field.ty != FieldType::Message || field.repeated {
                    return Err(DescriptorError::NotAMessage {
                        field_path: path.to_string(),
                        component: (*name).to_string(),
                    });
                }
                current = self.lookup_msg("", field.type_name())?;
            }
        }
        Ok(FieldPath(components))
    }

    /// All files in document order.
    #[must_use]
    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub fn lookup_file(&self, name: &str) -> Result<&File, DescriptorError> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| DescriptorError::UnknownFile(name.to_string()))
    }

    /// The files artifacts are generated for, in request order.
    pub fn targets(&self) -> Result<Vec<&File>, DescriptorError> {
        if self.files_to_generate.is_empty() {
            return Ok(self.files.iter().collect());
        }
        self.files_to_generate
            .iter()
            .map(|name| self.lookup_file(name))
            .collect()
    }

    /// Look up a message by name, resolved from the package scope `location`.
    pub fn lookup_msg(&self, location: &str, name: &str) -> Result<&Message, DescriptorError> {
        scope_candidates(location, name)
            .iter()
            .find_map(|candidate| self.messages.get(candidate))
            .ok_or_else(|| DescriptorError::UnknownType {
                name: name.to_string(),
                scope: location.to_string(),
            })
    }

    /// Look up an enum by name, resolved from the package scope `location`.
    #[must_use]
    pub fn lookup_enum(&self, location: &str, name: &str) -> EnumLookup<'_> {
        match scope_candidates(location, name)
            .iter()
            .find_map(|candidate| self.enums.get(candidate))
        {
            Some(en) => EnumLookup::Found(en),
            None => EnumLookup::NotFound,
        }
    }

    /// Whether `:` is allowed in the final path segment.
    #[must_use]
    pub fn allow_colon_final_segments(&self) -> bool {
        self.allow_colon_final_segments
    }
}

/// `.package.Name` for a declaration in `package`.
fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        format!(".{name}")
    } else {
        format!(".{package}.{name}")
    }
}

/// Candidate fully qualified names for `name` referenced from `package`,
/// innermost scope first.
fn scope_candidates(package: &str, name: &str) -> Vec<String> {
    if name.starts_with('.') {
        return vec![name.to_string()];
    }
    let mut candidates = Vec::new();
    let mut scope: Vec<&str> = package.split('.').filter(|s| !s.is_empty()).collect();
    loop {
        candidates.push(qualify(&scope.join("."), name));
        if scope.pop().is_none() {
            break;
        }
    }
    candidates
}

fn resolve(known: &HashSet<String>, package: &str, name: &str) -> Result<String, DescriptorError> {
    scope_candidates(package, name)
        .into_iter()
        .find(|candidate| known.contains(candidate))
        .ok_or_else(|| DescriptorError::UnknownType {
            name: name.to_string(),
            scope: package.to_string(),
        })
}

fn go_package_for(file: &FileSource, opts: &LoadOptions) -> GoPackage {
    if let Some(option) = &file.go_package {
        return GoPackage::from_option(option);
    }
    if let Some(mapped) = opts.go_package_map.get(&file.name) {
        return GoPackage::from_option(mapped);
    }
    if let Some(path) = &opts.import_path {
        return GoPackage::from_path(path.clone());
    }
    let dir = match file.name.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => file
            .name
            .strip_suffix(".proto")
            .unwrap_or(&file.name)
            .to_string(),
    };
    GoPackage::from_path(format!("{}{}", opts.import_prefix, dir))
}
