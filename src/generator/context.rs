use std::collections::HashSet;

use crate::config::{GeneratorConfig, OutputLayout};
use crate::descriptor::{DescriptorError, Registry};
use crate::imports::{GoPackage, ImportRegistry};

/// Packages every generated artifact may refer to by their plain name.
///
/// They are reserved first, in this order, into a fresh [`ImportRegistry`],
/// so the aliases below are always the ones the templates spell out.
const BASE_IMPORTS: &[(&str, Option<&str>)] = &[
    ("context", None),
    ("io", None),
    ("net/http", None),
    ("net/url", None),
    ("strings", None),
    ("github.com/go-kit/kit/endpoint", None),
    ("github.com/go-kit/kit/transport/http", Some("httptransport")),
    ("github.com/gorilla/mux", None),
    ("github.com/grpc-ecosystem/grpc-gateway/runtime", None),
    ("github.com/grpc-ecosystem/grpc-gateway/utilities", None),
    ("google.golang.org/grpc/codes", None),
    ("google.golang.org/grpc/status", None),
];

/// State shared by every unit of one generation run.
///
/// Built once per run and dropped with it; alias bookkeeping never outlives
/// the run that produced it.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    pub registry: &'a Registry,
    pub config: &'a GeneratorConfig,
    pub layout: OutputLayout,
    pub package_name: String,
    pub imports: ImportRegistry,
    base: Vec<GoPackage>,
}

impl<'a> GenerationContext<'a> {
    /// Create the run context and seed the base imports.
    pub fn new(registry: &'a Registry, config: &'a GeneratorConfig, layout: OutputLayout) -> Self {
        let mut imports = ImportRegistry::new();
        let base = BASE_IMPORTS
            .iter()
            .map(|(path, alias)| {
                let mut pkg = GoPackage::from_path(*path);
                pkg.alias = alias.map(String::from);
                imports.reserve_package(&pkg)
            })
            .collect();
        GenerationContext {
            registry,
            config,
            layout,
            package_name: config.package_name(),
            imports,
            base,
        }
    }

    /// A base import by path.
    pub fn base(&self, path: &str) -> Option<&GoPackage> {
        self.base.iter().find(|pkg| pkg.path == path)
    }

    /// Reserve the Go package declaring the message `full_name` and return
    /// it with the qualified Go type of the message.
    pub fn message_type(&mut self, full_name: &str) -> Result<(GoPackage, String), DescriptorError> {
        let registry = self.registry;
        let msg = registry.lookup_msg("", full_name)?;
        let file = registry.lookup_file(&msg.file)?;
        let pkg = self.imports.reserve_package(&file.go_pkg);
        let go_type = format!("{}.{}", pkg.ident(), msg.go_name());
        Ok((pkg, go_type))
    }
}

/// The imports of one artifact, deduplicated by path in discovery order.
#[derive(Debug, Default)]
pub struct ImportSet {
    seen: HashSet<String>,
    packages: Vec<GoPackage>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `pkg` unless its path is already present. Returns whether it was added.
    pub fn add(&mut self, pkg: GoPackage) -> bool {
        if !self.seen.insert(pkg.path.clone()) {
            return false;
        }
        self.packages.push(pkg);
        true
    }

    /// Add base imports of `ctx` by path.
    pub fn add_base(&mut self, ctx: &GenerationContext<'_>, paths: &[&str]) {
        for path in paths {
            if let Some(pkg) = ctx.base(path) {
                self.add(pkg.clone());
            }
        }
    }

    /// Paths already present; shared with the analyzer so an enum package
    /// that is also a message package is imported once.
    pub fn seen_mut(&mut self) -> &mut HashSet<String> {
        &mut self.seen
    }

    /// Push a package whose path the caller already recorded in [`Self::seen_mut`].
    pub fn push_seen(&mut self, pkg: GoPackage) {
        self.packages.push(pkg);
    }

    /// Split into the two groups of a Go import block, each sorted by path.
    #[must_use]
    pub fn into_block(self) -> ImportBlock {
        let (mut standard, mut third_party): (Vec<_>, Vec<_>) =
            self.packages.into_iter().partition(GoPackage::is_standard);
        standard.sort_by(|a, b| a.path.cmp(&b.path));
        third_party.sort_by(|a, b| a.path.cmp(&b.path));
        ImportBlock {
            standard,
            third_party,
        }
    }
}

/// A rendered import block: standard library first, then everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBlock {
    pub standard: Vec<GoPackage>,
    pub third_party: Vec<GoPackage>,
}

impl ImportBlock {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.third_party.is_empty()
    }
}
