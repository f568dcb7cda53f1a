use askama::Template;

use super::context::ImportBlock;

/// Header of every generated file.
pub const GENERATED_BY: &str = "Code generated by gokitmux-gen. DO NOT EDIT.";

/// A service of a unit, names already in Go form.
#[derive(Debug, Clone)]
pub struct ServiceView {
    /// Fully qualified proto name, for comments
    pub full_name: String,
    /// Name of the per-unit contract interface
    pub contract: String,
    /// Every method, bound or not
    pub methods: Vec<MethodView>,
}

#[derive(Debug, Clone)]
pub struct MethodView {
    /// Go name of the method
    pub name: String,
    /// Qualified Go request type, e.g. `libraryv1.GetBookRequest`
    pub request: String,
    /// Qualified Go response type
    pub response: String,
    pub bindings: Vec<BindingView>,
}

/// One handler type.
#[derive(Debug, Clone)]
pub struct BindingView {
    /// `Method` for the first binding, `Method_<n>` for the others
    pub handler: String,
    /// Route name passed to gorilla/mux
    pub route_name: String,
    pub http_method: String,
    /// The template as declared
    pub template: String,
    /// The template in gorilla/mux syntax, as a Go string literal
    pub mux_path: String,
    pub has_body: bool,
    /// Go selector of the body field; empty when the body is the whole request
    pub body_selector: String,
    /// Go selector of the response field; empty to encode the whole response
    pub response_selector: String,
    pub path_params: Vec<PathParamView>,
    pub has_query_param: bool,
    /// Name of the filter variable, empty without query parameters
    pub filter_var: String,
    /// Go literal of the filter, empty without query parameters
    pub filter_literal: String,
}

/// A path variable of a binding.
#[derive(Debug, Clone)]
pub struct PathParamView {
    /// Dotted field path, also the gorilla/mux variable name
    pub name: String,
    /// Go selector below the request value
    pub selector: String,
    /// Qualified Go enum type; empty when the field is not an enum
    pub enum_type: String,
    pub repeated: bool,
    /// Intermediate messages to allocate before assigning an enum value
    pub parents: Vec<ParentView>,
}

#[derive(Debug, Clone)]
pub struct ParentView {
    pub selector: String,
    pub go_type: String,
}

/// Handler set and service contract of one proto file.
#[derive(Template)]
#[template(path = "unit.go.txt", escape = "none")]
pub struct UnitTemplate {
    pub generated_by: &'static str,
    pub source: String,
    pub package_name: String,
    pub imports: ImportBlock,
    pub services: Vec<ServiceView>,
    pub register_func_suffix: String,
    /// Go expression for `httptransport.ServerErrorEncoder`; empty for the default
    pub error_encoder: String,
    /// Identifier of the metrics package; empty without metrics
    pub metrics: String,
    /// Go string literal splitting repeated enum path parameters
    pub separator: &'static str,
}

/// `GatewayService`, embedding every unit contract.
#[derive(Template)]
#[template(path = "service.go.txt", escape = "none")]
pub struct ServiceTemplate {
    pub generated_by: &'static str,
    pub source: String,
    pub package_name: String,
    pub imports: ImportBlock,
    pub contracts: Vec<String>,
}

/// `Router`, mounting every registered handler.
#[derive(Template)]
#[template(path = "routes.go.txt", escape = "none")]
pub struct RoutesTemplate {
    pub generated_by: &'static str,
    pub source: String,
    pub package_name: String,
    pub imports: ImportBlock,
    pub manual_router: bool,
}

/// `Endpointer` and `Route`.
#[derive(Template)]
#[template(path = "endpoints.go.txt", escape = "none")]
pub struct EndpointsTemplate {
    pub generated_by: &'static str,
    pub source: String,
    pub package_name: String,
    pub imports: ImportBlock,
}

/// Handler registration and the query filter runtime.
#[derive(Template)]
#[template(path = "muxkit.go.txt", escape = "none")]
pub struct MuxkitTemplate {
    pub generated_by: &'static str,
    pub source: String,
    pub package_name: String,
    pub imports: ImportBlock,
}
