//! # Descriptor Registry
//!
//! The read-only object graph consumed by the generator:
//!
//! ```text
//! File ─┬─ Message ── Field
//!       ├─ Enum
//!       └─ Service ── Method ── Binding ─┬─ PathTemplate
//!                                        ├─ Parameter (path variable → FieldPath)
//!                                        └─ Body      (FieldPath, empty for `*`)
//! ```
//!
//! The graph is built from a YAML or JSON descriptor document (see
//! [`RegistrySource`]) and, optionally, the HTTP rules of a gRPC API
//! configuration. Type names are resolved to fully qualified `.package.Name`
//! form while loading, so lookups on a loaded [`Registry`] never depend on the
//! scope they are made from.

mod error;
mod load;
mod path_template;
mod registry;
mod source;
mod types;


pub use error::DescriptorError;
pub use load::{load_grpc_api_configuration, load_registry, parse_registry_source};
pub use path_template::{PathTemplate, Segment};
pub use registry::{EnumLookup, LoadOptions, Registry};
pub use source::{
    CustomPattern, EnumSource, FieldSource, FileSource, GrpcApiConfiguration, HttpRuleSource,
    MessageSource, MethodSource, RegistrySource, ServiceSource,
};
pub use types::*;
