//! # Generator Module
//!
//! Turns a loaded [`Registry`] into the Go sources of a go-kit + gorilla/mux
//! HTTP transport.
//!
//! ## Pipeline
//!
//! ```text
//! Registry → GenerationContext (base imports reserved)
//!          → per unit: Normalizing → Filtering → Ready → Rendering → Emitted
//!                      (binding analysis, query filters, imports)
//!          → run-wide: service (optional) → routes → endpoints → muxkit
//! ```
//!
//! 1. **Context** - one [`ImportRegistry`](crate::imports::ImportRegistry) per
//!    run, seeded with the packages the templates always spell by name
//! 2. **Binding analysis** - fields consumed by the path and the body, and
//!    the enum packages path parameters need
//! 3. **Query filters** - a double-array trie over the remaining request fields
//! 4. **Assembly** - Askama templates render each artifact from view structs
//!
//! A unit whose services have no HTTP binding yields
//! [`GenerateError::NoTargetService`], which the run loop treats as a skip.
//! Two artifacts on one path, or one Go identifier declared twice, fail the
//! whole run.
//!
//! ## Generated Structure
//!
//! ```text
//! <output_path>/
//! ├── <stem>.gm.go      # per proto file: contract interface + handlers
//! ├── service.gm.go     # GatewayService (with generate_service)
//! ├── routes.gm.go      # Router(svc) *mux.Router
//! ├── endpoints.gm.go   # Endpointer, Route
//! └── muxkit.gm.go      # Handlers, RegisterHandler, DoubleArray, FilterQuery
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gokitmux::config::GeneratorConfig;
//! use gokitmux::descriptor::{load_registry, LoadOptions};
//! use gokitmux::generator::generate;
//!
//! let config = GeneratorConfig::default();
//! let registry = load_registry("api.yaml".as_ref(), &config.load_options())?;
//! for file in generate(&registry, &config)? {
//!     println!("{}", file.name);
//! }
//! ```

mod analyzer;
mod assemble;
mod context;
mod error;
mod output;
mod query_filter;
mod templates;
#[cfg(test)]
mod tests;

pub use analyzer::{
    consumed_fields, enum_path_param_imports, has_enum_path_param, has_repeated_enum_path_param,
    BodyConsumption, ConsumedFields,
};
pub use assemble::{Assembler, UnitState};
pub use context::{GenerationContext, ImportBlock, ImportSet};
pub use error::GenerateError;
pub use output::{format_outputs, write_outputs, OutputFile};
pub use query_filter::{free_field_paths, QueryParamFilter};
pub use templates::GENERATED_BY;

use crate::config::GeneratorConfig;
use crate::descriptor::Registry;

/// Generate every artifact of one run.
///
/// The output layout is resolved first, so a configuration conflict fails
/// the run before anything is rendered.
pub fn generate(registry: &Registry, config: &GeneratorConfig) -> anyhow::Result<Vec<OutputFile>> {
    let layout = config.layout()?;
    let ctx = GenerationContext::new(registry, config, layout);
    let files = Assembler::new(ctx).run()?;
    Ok(files)
}
