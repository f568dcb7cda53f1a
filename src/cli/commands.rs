use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::config::{load_config, resolve_config_path, GeneratorConfig, PathType};
use crate::descriptor::{load_grpc_api_configuration, load_registry, Registry};
use crate::generator::{
    consumed_fields, format_outputs, generate, has_enum_path_param, has_repeated_enum_path_param,
    write_outputs, BodyConsumption, QueryParamFilter,
};

/// Command-line interface of the gateway generator
#[derive(Parser)]
#[command(name = "gokitmux-gen")]
#[command(about = "Generate go-kit/gorilla-mux gateways from protobuf HTTP bindings", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the gateway sources for a descriptor document
    Generate {
        /// Descriptor document (YAML or JSON)
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Directory the artifact paths are relative to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Generator config (gokitmux.toml). Auto-detected next to the descriptor when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// protoc-style parameter string, e.g. "module=example.com/api,gen_service"
        #[arg(long)]
        param: Option<String>,

        /// Go import path of the generated package
        #[arg(long)]
        output_path: Option<String>,

        /// Go module prefix stripped from artifact paths
        #[arg(long)]
        module: Option<String>,

        /// import or source_relative
        #[arg(long)]
        paths: Option<PathType>,

        /// Also emit the aggregated GatewayService interface
        #[arg(long, default_value_t = false)]
        gen_service: bool,

        /// Go package providing ForHandler(http.Handler, string) http.Handler
        #[arg(long)]
        metrics: Option<String>,

        /// Go expression passed to httptransport.ServerErrorEncoder
        #[arg(long)]
        error_encoder: Option<String>,

        /// Show what would be written without touching the filesystem
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Write files, or print them to stdout as JSON
        #[arg(long, value_enum, default_value_t = Emit::Files)]
        emit: Emit,

        /// Run gofmt -w over the written files
        #[arg(long, default_value_t = false)]
        format: bool,
    },
    /// Print every binding with the fields it consumes and its query filter
    Inspect {
        /// Descriptor document (YAML or JSON)
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Generator config (gokitmux.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Where generated artifacts go
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// Write under --out-dir
    Files,
    /// Print `[{"name", "content"}]` to stdout
    Json,
}

/// Flag values that override the configuration file and `--param`.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub output_path: Option<String>,
    pub module: Option<String>,
    pub paths: Option<PathType>,
    pub gen_service: bool,
    pub metrics: Option<String>,
    pub error_encoder: Option<String>,
}

impl Overrides {
    fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(output_path) = &self.output_path {
            config.output_path = output_path.clone();
        }
        if let Some(module) = &self.module {
            config.module = Some(module.clone());
        }
        if let Some(paths) = self.paths {
            config.paths = paths;
        }
        if self.gen_service {
            config.generate_service = true;
        }
        if let Some(metrics) = &self.metrics {
            config.metrics = Some(metrics.clone());
        }
        if let Some(error_encoder) = &self.error_encoder {
            config.error_encoder = Some(error_encoder.clone());
        }
    }
}

/// Build the run configuration: file, then `--param`, then flags.
///
/// An explicitly named config file must exist; an auto-detected one is optional.
pub fn resolve_config(
    descriptor: &Path,
    explicit: Option<&Path>,
    param: Option<&str>,
    overrides: &Overrides,
) -> anyhow::Result<GeneratorConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Generator config not found: {}", path.display());
        }
    }
    let mut config = match resolve_config_path(explicit, descriptor) {
        Some(path) => {
            info!(path = %path.display(), "using generator config");
            load_config(&path)?.unwrap_or_default()
        }
        None => GeneratorConfig::default(),
    };
    if let Some(param) = param {
        config.apply_params(param)?;
    }
    overrides.apply(&mut config);
    Ok(config)
}

/// Load the descriptor document with the options of `config`, including the
/// HTTP rules of its gRPC API configuration.
pub fn load_descriptor(descriptor: &Path, config: &GeneratorConfig) -> anyhow::Result<Registry> {
    let mut opts = config.load_options();
    if let Some(path) = &config.grpc_api_configuration {
        opts.external_rules = load_grpc_api_configuration(path)?;
        info!(path = %path.display(), rules = opts.external_rules.len(), "loaded gRPC API configuration");
    }
    load_registry(descriptor, &opts)
}

/// One block per target file: each binding, what it consumes and what the
/// query string may still set.
pub fn inspect_report(registry: &Registry) -> anyhow::Result<String> {
    let mut out = String::new();
    for file in registry.targets()? {
        writeln!(out, "{}", file.name)?;
        for service in &file.services {
            for method in &service.methods {
                writeln!(out, "  {}.{}", service.name, method.name)?;
                if method.bindings.is_empty() {
                    writeln!(out, "    (no HTTP binding)")?;
                    continue;
                }
                let request = registry.lookup_msg("", &method.request_type)?;
                for binding in &method.bindings {
                    let consumed = consumed_fields(binding);
                    writeln!(
                        out,
                        "    [{}] {} {} -> {}",
                        binding.index,
                        binding.http_method,
                        binding.path_tmpl.template,
                        binding.path_tmpl.mux_path()
                    )?;
                    let body = match &consumed.body {
                        BodyConsumption::None => "-".to_string(),
                        BodyConsumption::Whole => "*".to_string(),
                        BodyConsumption::Field(path) => path.join("."),
                    };
                    writeln!(out, "        body:   {body}")?;
                    let params: Vec<String> =
                        consumed.path_params.iter().map(|p| p.join(".")).collect();
                    let enum_note = if has_repeated_enum_path_param(binding) {
                        " (repeated enum)"
                    } else if has_enum_path_param(binding, false) {
                        " (enum)"
                    } else {
                        ""
                    };
                    writeln!(out, "        path:   {}{enum_note}", dash_if_empty(&params))?;
                    match QueryParamFilter::synthesize(registry, request, &consumed)? {
                        Some(filter) => {
                            let free: Vec<String> =
                                filter.free_fields().iter().map(|p| p.join(".")).collect();
                            writeln!(out, "        query:  {}", free.join(", "))?;
                            writeln!(out, "        filter: {filter}")?;
                        }
                        None => writeln!(out, "        query:  -")?,
                    }
                }
            }
        }
    }
    Ok(out)
}

fn dash_if_empty(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            descriptor,
            out_dir,
            config,
            param,
            output_path,
            module,
            paths,
            gen_service,
            metrics,
            error_encoder,
            dry_run,
            emit,
            format,
        } => {
            let overrides = Overrides {
                output_path,
                module,
                paths,
                gen_service,
                metrics,
                error_encoder,
            };
            let config = resolve_config(&descriptor, config.as_deref(), param.as_deref(), &overrides)?;
            let registry = load_descriptor(&descriptor, &config)?;
            let files = generate(&registry, &config)?;

            match emit {
                Emit::Json => {
                    let json = serde_json::to_string_pretty(&files)
                        .context("Failed to serialize generated files")?;
                    println!("{json}");
                }
                Emit::Files if dry_run => {
                    for file in &files {
                        println!("📝 would write {}", out_dir.join(&file.name).display());
                    }
                }
                Emit::Files => {
                    let written = write_outputs(&out_dir, &files)?;
                    for path in &written {
                        println!("✅ wrote {}", path.display());
                    }
                    if format {
                        format_outputs(&written)?;
                        println!("🎨 formatted {} files", written.len());
                    }
                }
            }
            Ok(())
        }
        Commands::Inspect { descriptor, config } => {
            let config = resolve_config(&descriptor, config.as_deref(), None, &Overrides::default())?;
            let registry = load_descriptor(&descriptor, &config)?;
            print!("{}", inspect_report(&registry)?);
            Ok(())
        }
    }
}

/// Parse the process arguments and execute them.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}
