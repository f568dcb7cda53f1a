//! # CLI Module
//!
//! Command-line interface of the `gokitmux-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! ```bash
//! gokitmux-gen generate --descriptor api.yaml --out-dir . \
//!     --param "module=github.com/acme/api,gen_service"
//! ```
//!
//! Configuration is layered: `gokitmux.toml` (from `--config`, or next to the
//! descriptor document), then `--param`, then the individual flags.
//!
//! Options:
//! - `--emit json` prints the artifacts instead of writing them
//! - `--dry-run` lists the paths that would be written
//! - `--format` runs `gofmt -w` over the written files (`GOKITMUX_GOFMT_BIN`
//!   overrides the binary)
//!
//! ### `inspect`
//!
//! ```bash
//! gokitmux-gen inspect --descriptor api.yaml
//! ```
//!
//! Prints every binding with its consumed fields, its free query fields and
//! the filter literal the handler would carry.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{
    inspect_report, load_descriptor, resolve_config, run, run_cli, Cli, Commands, Emit, Overrides,
};
