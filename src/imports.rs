//! Go package imports and run-wide alias bookkeeping.
//!
//! Every artifact produced in one generation run shares a single
//! [`ImportRegistry`]. It guarantees that a package path is always imported
//! under the same alias and that two different paths never share one, which
//! is what keeps references like `greeterv1.Kind_value` valid across files.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::casing::go_identifier;

/// A Go package referenced by generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GoPackage {
    /// Import path, e.g. `github.com/acme/api/greeter/v1`
    pub path: String,
    /// Package name declared by the package itself
    pub name: String,
    /// Alias used in the import line when it differs from `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl GoPackage {
    /// A package whose name is the last element of its import path.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = go_identifier(path.rsplit('/').next().unwrap_or(&path));
        GoPackage {
            path,
            name,
            alias: None,
        }
    }

    /// Parse a `go_package` option value: `path` or `path;name`.
    pub fn from_option(value: &str) -> Self {
        match value.split_once(';') {
            Some((path, name)) => GoPackage {
                path: path.to_string(),
                name: go_identifier(name),
                alias: None,
            },
            None => GoPackage::from_path(value),
        }
    }

    /// Identifier used to qualify references into this package.
    #[must_use]
    pub fn ident(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Standard library packages have no dot in their first path element.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        !self.path.split('/').next().unwrap_or_default().contains('.')
    }
}

impl fmt::Display for GoPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias} {:?}", self.path),
            None => write!(f, "{:?}", self.path),
        }
    }
}

/// Returned by [`ImportRegistry::reserve`] when the alias is held by another path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConflict {
    /// The alias that was requested
    pub alias: String,
    /// The path currently holding it
    pub held_by: String,
}

impl fmt::Display for AliasConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "package alias {:?} is already taken by {:?}",
            self.alias, self.held_by
        )
    }
}

impl std::error::Error for AliasConflict {}

/// Path ↔ alias bindings for one generation run.
#[derive(Debug, Default)]
pub struct ImportRegistry {
    alias_to_path: HashMap<String, String>,
    path_to_alias: HashMap<String, String>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `alias` for `path`.
    ///
    /// A path that already has an alias keeps it and that alias is returned,
    /// whatever was requested. A free alias is bound to the path. An alias
    /// held by a different path is refused.
    pub fn reserve(&mut self, alias: &str, path: &str) -> Result<String, AliasConflict> {
        if let Some(existing) = self.path_to_alias.get(path) {
            return Ok(existing.clone());
        }
        if let Some(held_by) = self.alias_to_path.get(alias) {
            return Err(AliasConflict {
                alias: alias.to_string(),
                held_by: held_by.clone(),
            });
        }
        self.alias_to_path.insert(alias.to_string(), path.to_string());
        self.path_to_alias.insert(path.to_string(), alias.to_string());
        Ok(alias.to_string())
    }

    /// Reserve `name` for `path`, falling back to `name_0`, `name_1`, … on
    /// collision. The first successful reservation is the one returned.
    pub fn reserve_with_fallback(&mut self, name: &str, path: &str) -> String {
        if let Ok(alias) = self.reserve(name, path) {
            return alias;
        }
        let mut i = 0usize;
        loop {
            let candidate = format!("{name}_{i}");
            match self.reserve(&candidate, path) {
                Ok(alias) => {
                    tracing::debug!(%path, %alias, "package name collision resolved");
                    return alias;
                }
                Err(_) => i += 1,
            }
        }
    }

    /// Reserve an alias for `pkg` and return it with `alias` filled in when the
    /// reserved alias differs from the package name.
    pub fn reserve_package(&mut self, pkg: &GoPackage) -> GoPackage {
        let wanted = pkg.alias.as_deref().unwrap_or(&pkg.name);
        let alias = self.reserve_with_fallback(wanted, &pkg.path);
        GoPackage {
            path: pkg.path.clone(),
            name: pkg.name.clone(),
            alias: (alias != pkg.name).then_some(alias),
        }
    }

    /// Alias bound to `path`, if any.
    #[must_use]
    pub fn alias_of(&self, path: &str) -> Option<&str> {
        self.path_to_alias.get(path).map(String::as_str)
    }

    /// Number of reserved paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path_to_alias.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path_to_alias.is_empty()
    }
}
