use http::Method as HttpMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::PathTemplate;
use crate::casing::camel;
use crate::imports::GoPackage;

/// Protobuf scalar and composite field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    Message,
    Enum,
}

impl FieldType {
    /// Whether the field refers to another type through `type_name`.
    #[must_use]
    pub fn is_named(self) -> bool {
        matches!(self, FieldType::Message | FieldType::Enum)
    }
}

/// A message field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    /// Fully qualified name of the referenced message or enum
    pub type_name: Option<String>,
    pub repeated: bool,
    /// Fully qualified name of the enclosing message
    pub message: String,
}

impl Field {
    /// The declared type name, or an empty string for scalars.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn go_name(&self) -> String {
        camel(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    /// `.package.Name`
    pub full_name: String,
    /// Name of the file declaring the message
    pub file: String,
    pub fields: Vec<Field>,
}

impl Message {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn go_name(&self) -> String {
        camel(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    /// `.package.Name`
    pub full_name: String,
    /// Name of the file declaring the enum
    pub file: String,
    pub values: Vec<String>,
}

impl Enum {
    #[must_use]
    pub fn go_name(&self) -> String {
        camel(&self.name)
    }
}

/// A compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Path of the proto file, e.g. `greeter/v1/greeter.proto`
    pub name: String,
    /// Proto package, e.g. `greeter.v1`
    pub package: String,
    pub go_pkg: GoPackage,
    /// Fully qualified names of the messages declared here
    pub messages: Vec<String>,
    /// Fully qualified names of the enums declared here
    pub enums: Vec<String>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    /// Name of the declaring file
    pub file: String,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// Fully qualified request message name
    pub request_type: String,
    /// Fully qualified response message name
    pub response_type: String,
    pub bindings: Vec<Binding>,
}

/// One HTTP exposure of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Position among the method's bindings
    pub index: usize,
    pub http_method: HttpMethod,
    pub path_tmpl: PathTemplate,
    pub path_params: Vec<Parameter>,
    /// `None` when the request has no body, an empty field path for `*`
    pub body: Option<Body>,
    pub response_body: Option<Body>,
}

impl Binding {
    /// True when the body is declared as `*`.
    #[must_use]
    pub fn body_is_wildcard(&self) -> bool {
        self.body.as_ref().is_some_and(Body::is_wildcard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub field_path: FieldPath,
}

impl Body {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.field_path.is_empty()
    }
}

/// A path variable bound to a request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub field_path: FieldPath,
    /// The field the path ends at
    pub target: Field,
}

impl Parameter {
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.target.ty == FieldType::Enum
    }

    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.target.repeated
    }
}

/// A dotted path of fields starting at a request message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(pub Vec<FieldPathComponent>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPathComponent {
    pub name: String,
    pub target: Field,
}

impl FieldPath {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names along the path.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        self.0.iter().map(|c| c.name.clone()).collect()
    }

    /// Go selector expression below the request value, e.g. `Filter.UserName`.
    #[must_use]
    pub fn go_selector(&self) -> String {
        self.0
            .iter()
            .map(|c| camel(&c.name))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("."))
    }
}
