//! # gokitmux
//!
//! **gokitmux** compiles protobuf service descriptors with `google.api.http`
//! bindings into the Go sources of an HTTP gateway built on
//! [go-kit](https://github.com/go-kit/kit) transports and a
//! [gorilla/mux](https://github.com/gorilla/mux) router.
//!
//! ## Architecture
//!
//! - **[`descriptor`]** - loads the descriptor document into a read-only [`descriptor::Registry`]
//! - **[`imports`]** - Go package aliases, unique across one generation run
//! - **[`double_array`]** - the trie behind each handler's query parameter filter
//! - **[`generator`]** - binding analysis, query filters and artifact assembly
//! - **[`config`]** - generator options from `gokitmux.toml`, `--param` and flags
//! - **[`cli`]** - the `gokitmux-gen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(gokitmux-gen)
//!     participant Config as config
//!     participant Desc as descriptor::load_registry
//!     participant Gen as generator::generate
//!     participant FS as File System
//!
//!     CLI->>Config: gokitmux.toml + --param + flags
//!     CLI->>Desc: load_registry(api.yaml, LoadOptions)
//!     Desc-->>CLI: Registry
//!     CLI->>Gen: generate(&registry, &config)
//!     Gen->>Gen: per unit: analyze bindings,<br/>synthesize filters, render
//!     Gen->>Gen: service, routes, endpoints, muxkit
//!     Gen-->>CLI: Vec<OutputFile>
//!     CLI->>FS: write_outputs + gofmt
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use gokitmux::config::GeneratorConfig;
//! use gokitmux::descriptor::load_registry;
//! use gokitmux::generator::{generate, write_outputs};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = GeneratorConfig::default();
//! let registry = load_registry("api.yaml".as_ref(), &config.load_options())?;
//! let files = generate(&registry, &config)?;
//! write_outputs(".".as_ref(), &files)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Code Generation
//!
//! ```bash
//! cargo run --bin gokitmux-gen -- generate --descriptor api.yaml --param gen_service
//! ```

pub mod casing;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod double_array;
pub mod generator;
pub mod imports;
pub mod logging;

pub use config::GeneratorConfig;
pub use descriptor::{load_registry, Registry};
pub use generator::{generate, OutputFile};
