use askama::Template;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info};

use super::analyzer::{consumed_fields, enum_path_param_imports};
use super::context::{GenerationContext, ImportSet};
use super::output::OutputFile;
use super::query_filter::QueryParamFilter;
use super::templates::{
    BindingView, EndpointsTemplate, MethodView, MuxkitTemplate, ParentView, PathParamView,
    RoutesTemplate, ServiceTemplate, ServiceView, UnitTemplate, GENERATED_BY,
};
use super::GenerateError;
use crate::casing::{camel, camel_path};
use crate::descriptor::{Binding, Body, EnumLookup, File, Method, Parameter, Service};
use crate::imports::GoPackage;

/// Go identifiers declared by the run-wide artifacts, plus the user hook
/// `Router` may call.
const RUNTIME_DECLARATIONS: &[&str] = &[
    "GatewayService",
    "Router",
    "ManualRouter",
    "Endpointer",
    "Route",
    "Handlers",
    "RegisterHandler",
    "DoubleArray",
    "FilterQuery",
];

/// Run-wide artifact names and what they hold, in output order.
const RUN_WIDE_ARTIFACTS: &[(&str, &str)] = &[
    ("service.gm.go", "the GatewayService artifact"),
    ("routes.gm.go", "the router artifact"),
    ("endpoints.gm.go", "the endpoint registry artifact"),
    ("muxkit.gm.go", "the muxkit artifact"),
];

/// Progress of one generation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Start,
    /// Names converted to their Go form
    Normalizing,
    /// Services without a bound method dropped
    Filtering,
    /// Nothing to emit; the unit is skipped
    NoTargetService,
    /// Imports and filters computed
    Ready,
    Rendering,
    Emitted,
}

/// A service with its names in Go form.
struct Normalized<'a> {
    service: &'a Service,
    name: String,
    methods: Vec<(&'a Method, String)>,
}

impl Normalized<'_> {
    fn is_target(&self) -> bool {
        self.service.methods.iter().any(|m| !m.bindings.is_empty())
    }

    /// Name of the contract interface. Services conventionally end in
    /// `Service` already; others get the suffix.
    fn contract(&self) -> String {
        if self.name.ends_with("Service") {
            self.name.clone()
        } else {
            format!("{}Service", self.name)
        }
    }
}

/// Drives one generation run: every target unit, then the run-wide artifacts.
pub struct Assembler<'a> {
    ctx: GenerationContext<'a>,
    /// Contract interfaces of the units emitted so far
    contracts: Vec<String>,
    /// Output path -> what produces it
    outputs: HashMap<String, String>,
    /// Go identifier -> what declares it; every artifact shares one package
    declared: HashMap<String, String>,
}

impl<'a> Assembler<'a> {
    /// Create the assembler. The run-wide artifact paths and the runtime
    /// declarations are claimed up front, so no unit can shadow them.
    pub fn new(ctx: GenerationContext<'a>) -> Self {
        let outputs = RUN_WIDE_ARTIFACTS
            .iter()
            .filter(|(name, _)| *name != "service.gm.go" || ctx.config.generate_service)
            .map(|(name, origin)| (ctx.layout.run_path(name), (*origin).to_string()))
            .collect();
        let declared = RUNTIME_DECLARATIONS
            .iter()
            .map(|name| ((*name).to_string(), "the generated runtime".to_string()))
            .collect();
        Assembler {
            ctx,
            contracts: Vec::new(),
            outputs,
            declared,
        }
    }

    /// Produce every artifact of the run, in output order.
    ///
    /// Units without a bound service are skipped; any other error aborts the
    /// run and nothing produced so far is returned.
    pub fn run(mut self) -> Result<Vec<OutputFile>, GenerateError> {
        let registry = self.ctx.registry;
        let mut files = Vec::new();
        for file in registry.targets()? {
            info!(file = %file.name, "processing");
            match self.unit(file) {
                Ok(out) => {
                    info!(output = %out.name, "will emit");
                    files.push(out);
                }
                Err(err) if err.is_skip() => info!("{err}"),
                Err(err) => return Err(err),
            }
        }

        if self.ctx.config.generate_service {
            files.push(self.service()?);
        }
        files.push(self.routes()?);
        files.push(self.endpoints()?);
        files.push(self.muxkit()?);
        Ok(files)
    }

    fn claim_output(&mut self, path: &str, origin: &str) -> Result<(), GenerateError> {
        match self.outputs.entry(path.to_string()) {
            Entry::Occupied(held) => Err(GenerateError::DuplicateOutput {
                path: path.to_string(),
                first: held.get().clone(),
                second: origin.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(origin.to_string());
                Ok(())
            }
        }
    }

    fn declare(&mut self, name: &str, origin: String) -> Result<(), GenerateError> {
        match self.declared.entry(name.to_string()) {
            Entry::Occupied(held) => Err(GenerateError::DuplicateDeclaration {
                name: name.to_string(),
                first: held.get().clone(),
                second: origin,
            }),
            Entry::Vacant(slot) => {
                slot.insert(origin);
                Ok(())
            }
        }
    }

    fn transition(file: &File, state: &mut UnitState, next: UnitState) {
        debug!(file = %file.name, from = ?*state, to = ?next, "unit state");
        *state = next;
    }

    /// Render the handler set and service contract of `file`.
    pub fn unit(&mut self, file: &'a File) -> Result<OutputFile, GenerateError> {
        let mut state = UnitState::Start;

        Self::transition(file, &mut state, UnitState::Normalizing);
        let normalized: Vec<Normalized<'a>> = file
            .services
            .iter()
            .map(|service| Normalized {
                service,
                name: camel(&service.name),
                methods: service.methods.iter().map(|m| (m, camel(&m.name))).collect(),
            })
            .collect();

        Self::transition(file, &mut state, UnitState::Filtering);
        let targets: Vec<Normalized<'a>> = normalized.into_iter().filter(Normalized::is_target).collect();
        if targets.is_empty() {
            Self::transition(file, &mut state, UnitState::NoTargetService);
            return Err(GenerateError::NoTargetService {
                file: file.name.clone(),
            });
        }

        let mut imports = ImportSet::new();
        imports.add_base(
            &self.ctx,
            &[
                "context",
                "net/http",
                "github.com/go-kit/kit/endpoint",
                "github.com/go-kit/kit/transport/http",
                "github.com/grpc-ecosystem/grpc-gateway/runtime",
            ],
        );
        let services = targets
            .iter()
            .map(|target| self.service_view(file, target, &mut imports))
            .collect::<Result<Vec<_>, _>>()?;

        let path = self.ctx.layout.unit_path(&file.name);
        self.claim_output(&path, &file.name)?;
        for service in &services {
            self.declare(&service.contract, format!("service {}", service.full_name))?;
            for method in &service.methods {
                let origin = format!("method {}.{}", service.full_name, method.name);
                for binding in &method.bindings {
                    self.declare(&binding.handler, origin.clone())?;
                    if !binding.filter_var.is_empty() {
                        self.declare(&binding.filter_var, origin.clone())?;
                    }
                }
            }
        }

        let bindings = || services.iter().flat_map(|s| &s.methods).flat_map(|m| &m.bindings);
        let has_path_params = bindings().any(|b| !b.path_params.is_empty());
        let has_body = bindings().any(|b| b.has_body);
        let has_query = bindings().any(|b| b.has_query_param);
        if has_path_params {
            imports.add_base(&self.ctx, &["github.com/gorilla/mux"]);
        }
        if has_body {
            imports.add_base(&self.ctx, &["io"]);
        }
        if has_query {
            imports.add_base(&self.ctx, &["github.com/grpc-ecosystem/grpc-gateway/utilities"]);
        }
        if has_path_params || has_body || has_query {
            imports.add_base(
                &self.ctx,
                &["google.golang.org/grpc/codes", "google.golang.org/grpc/status"],
            );
        }

        let metrics = match self.ctx.config.metrics.as_deref() {
            Some(path) => {
                let pkg = self.ctx.imports.reserve_package(&GoPackage::from_path(path));
                let ident = pkg.ident().to_string();
                imports.add(pkg);
                ident
            }
            None => String::new(),
        };
        Self::transition(file, &mut state, UnitState::Ready);

        Self::transition(file, &mut state, UnitState::Rendering);
        let contracts: Vec<String> = services.iter().map(|s| s.contract.clone()).collect();
        let content = UnitTemplate {
            generated_by: GENERATED_BY,
            source: file.name.clone(),
            package_name: self.ctx.package_name.clone(),
            imports: imports.into_block(),
            services,
            register_func_suffix: self.ctx.config.register_func_suffix.clone(),
            error_encoder: self.ctx.config.error_encoder.clone().unwrap_or_default(),
            metrics,
            separator: self.ctx.config.repeated_path_param_separator.go_literal(),
        }
        .render()?;

        Self::transition(file, &mut state, UnitState::Emitted);
        self.contracts.extend(contracts);
        Ok(OutputFile {
            name: path,
            content,
        })
    }

    fn service_view(
        &mut self,
        file: &'a File,
        target: &Normalized<'a>,
        imports: &mut ImportSet,
    ) -> Result<ServiceView, GenerateError> {
        let registry = self.ctx.registry;
        let mut methods = Vec::new();
        for (method, name) in &target.methods {
            let (request_pkg, request) = self.ctx.message_type(&method.request_type)?;
            let (response_pkg, response) = self.ctx.message_type(&method.response_type)?;
            imports.add(request_pkg);
            imports.add(response_pkg);

            for pkg in enum_path_param_imports(
                registry,
                &mut self.ctx.imports,
                file,
                method,
                imports.seen_mut(),
            ) {
                imports.push_seen(pkg);
            }

            let bindings = method
                .bindings
                .iter()
                .map(|binding| self.binding_view(method, name, binding, imports))
                .collect::<Result<Vec<_>, _>>()?;
            methods.push(MethodView {
                name: name.clone(),
                request,
                response,
                bindings,
            });
        }
        Ok(ServiceView {
            full_name: format!("{}.{}", file.package, target.service.name)
                .trim_start_matches('.')
                .to_string(),
            contract: target.contract(),
            methods,
        })
    }

    fn binding_view(
        &mut self,
        method: &Method,
        name: &str,
        binding: &Binding,
        imports: &mut ImportSet,
    ) -> Result<BindingView, GenerateError> {
        let registry = self.ctx.registry;
        let handler = if binding.index == 0 {
            name.to_string()
        } else {
            format!("{name}_{}", binding.index)
        };

        let consumed = consumed_fields(binding);
        let request = registry.lookup_msg("", &method.request_type)?;
        let filter = QueryParamFilter::synthesize(registry, request, &consumed)?;
        let (filter_var, filter_literal) = match &filter {
            Some(filter) => (format!("filter_{name}_{}", binding.index), filter.to_string()),
            None => (String::new(), String::new()),
        };
        debug!(
            handler = %handler,
            has_query_param = filter.is_some(),
            "analyzed binding"
        );

        let path_params = binding
            .path_params
            .iter()
            .map(|param| self.path_param_view(param, imports))
            .collect::<Result<Vec<_>, _>>()?;

        let selector = |body: &Option<Body>| {
            body.as_ref()
                .map(|b| b.field_path.go_selector())
                .unwrap_or_default()
        };

        Ok(BindingView {
            route_name: handler.to_lowercase(),
            http_method: binding.http_method.as_str().to_string(),
            template: binding.path_tmpl.template.clone(),
            mux_path: format!("{:?}", binding.path_tmpl.mux_path()),
            has_body: binding.body.is_some(),
            body_selector: selector(&binding.body),
            response_selector: selector(&binding.response_body),
            path_params,
            has_query_param: filter.is_some(),
            filter_var,
            filter_literal,
            handler,
        })
    }

    fn path_param_view(
        &mut self,
        param: &Parameter,
        imports: &mut ImportSet,
    ) -> Result<PathParamView, GenerateError> {
        let registry = self.ctx.registry;
        let mut view = PathParamView {
            name: param.field_path.to_string(),
            selector: param.field_path.go_selector(),
            enum_type: String::new(),
            repeated: param.is_repeated(),
            parents: Vec::new(),
        };
        if !param.is_enum() {
            return Ok(view);
        }
        let en = match registry.lookup_enum("", param.target.type_name()) {
            EnumLookup::Found(en) => en,
            EnumLookup::NotFound => return Ok(view),
        };
        let owner = registry.lookup_file(&en.file)?;
        let pkg = self.ctx.imports.reserve_package(&owner.go_pkg);
        view.enum_type = format!("{}.{}", pkg.ident(), en.go_name());
        imports.add(pkg);

        let components = &param.field_path.0;
        for depth in 1..components.len() {
            let parent = &components[depth - 1];
            let (pkg, go_type) = self.ctx.message_type(parent.target.type_name())?;
            imports.add(pkg);
            let path: Vec<&str> = components[..depth].iter().map(|c| c.name.as_str()).collect();
            view.parents.push(ParentView {
                selector: camel_path(&path.join(".")),
                go_type,
            });
        }
        Ok(view)
    }

    fn service(&mut self) -> Result<OutputFile, GenerateError> {
        let content = ServiceTemplate {
            generated_by: GENERATED_BY,
            source: String::new(),
            package_name: self.ctx.package_name.clone(),
            imports: ImportSet::new().into_block(),
            contracts: self.contracts.clone(),
        }
        .render()?;
        Ok(self.run_wide("service.gm.go", content))
    }

    fn routes(&mut self) -> Result<OutputFile, GenerateError> {
        let mut imports = ImportSet::new();
        imports.add_base(&self.ctx, &["github.com/gorilla/mux"]);
        let content = RoutesTemplate {
            generated_by: GENERATED_BY,
            source: String::new(),
            package_name: self.ctx.package_name.clone(),
            imports: imports.into_block(),
            manual_router: self.ctx.config.manual_router,
        }
        .render()?;
        Ok(self.run_wide("routes.gm.go", content))
    }

    fn endpoints(&mut self) -> Result<OutputFile, GenerateError> {
        let mut imports = ImportSet::new();
        imports.add_base(
            &self.ctx,
            &["context", "net/http", "github.com/go-kit/kit/endpoint"],
        );
        let content = EndpointsTemplate {
            generated_by: GENERATED_BY,
            source: String::new(),
            package_name: self.ctx.package_name.clone(),
            imports: imports.into_block(),
        }
        .render()?;
        Ok(self.run_wide("endpoints.gm.go", content))
    }

    fn muxkit(&mut self) -> Result<OutputFile, GenerateError> {
        let mut imports = ImportSet::new();
        imports.add_base(&self.ctx, &["net/url", "strings"]);
        let content = MuxkitTemplate {
            generated_by: GENERATED_BY,
            source: String::new(),
            package_name: self.ctx.package_name.clone(),
            imports: imports.into_block(),
        }
        .render()?;
        Ok(self.run_wide("muxkit.gm.go", content))
    }

    fn run_wide(&self, name: &str, content: String) -> OutputFile {
        let name = self.ctx.layout.run_path(name);
        info!(output = %name, "will emit");
        OutputFile { name, content }
    }
}
