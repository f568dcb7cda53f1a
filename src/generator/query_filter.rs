//! Query parameter filters.
//!
//! A request field that is neither bound by the URL path nor carried in the
//! body is read from the query string. The generated handler keeps only the
//! query keys that name such a free field, tested with a [`DoubleArray`]
//! embedded as a Go literal.

use std::fmt;

use super::analyzer::ConsumedFields;
use crate::descriptor::{DescriptorError, FieldType, Message, Registry};
use crate::double_array::DoubleArray;

/// The free field paths of one binding and the trie recognizing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParamFilter {
    free: Vec<Vec<String>>,
    trie: DoubleArray,
}

impl QueryParamFilter {
    /// Build the filter for `request` minus `consumed`.
    ///
    /// Returns `None` when the body takes the whole request or when nothing
    /// is left over: such a binding reads no query parameters.
    pub fn synthesize(
        registry: &Registry,
        request: &Message,
        consumed: &ConsumedFields,
    ) -> Result<Option<Self>, DescriptorError> {
        if consumed.is_whole_request() {
            return Ok(None);
        }
        let free = free_field_paths(registry, request, consumed)?;
        if free.is_empty() {
            return Ok(None);
        }
        let trie = DoubleArray::new(&free);
        Ok(Some(QueryParamFilter { free, trie }))
    }

    /// Free field paths in declaration order.
    #[must_use]
    pub fn free_fields(&self) -> &[Vec<String>] {
        &self.free
    }

    /// True when `path` is exactly one of the free fields.
    pub fn recognizes<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.trie.contains(path)
    }

    /// True when the query key `path` falls under a free field, which is
    /// what the generated handler tests.
    pub fn accepts<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.trie.has_common_prefix(path)
    }
}

/// Go literal of the runtime `DoubleArray`, `Encoding` ordered by code.
impl fmt::Display for QueryParamFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding: Vec<String> = self
            .trie
            .encoding()
            .map(|(token, code)| format!("{token:?}: {code}"))
            .collect();
        write!(
            f,
            "&DoubleArray{{Encoding: map[string]int{{{}}}, Base: []int{{{}}}, Check: []int{{{}}}}}",
            encoding.join(", "),
            join_ints(self.trie.base()),
            join_ints(self.trie.check()),
        )
    }
}

fn join_ints(values: &[usize]) -> String {
    values
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Request field paths not consumed by the path or the body.
///
/// A field consumed as a whole is dropped, a field no consumed path touches
/// is free as it is, and a message field that a consumed path only reaches
/// into is replaced by its own free sub-fields.
pub fn free_field_paths(
    registry: &Registry,
    request: &Message,
    consumed: &ConsumedFields,
) -> Result<Vec<Vec<String>>, DescriptorError> {
    let consumed: Vec<&[String]> = consumed.paths().collect();
    let mut free = Vec::new();
    collect_free(registry, request, &mut Vec::new(), &consumed, &mut free)?;
    Ok(free)
}

fn collect_free(
    registry: &Registry,
    message: &Message,
    prefix: &mut Vec<String>,
    consumed: &[&[String]],
    free: &mut Vec<Vec<String>>,
) -> Result<(), DescriptorError> {
    for field in &message.fields {
        prefix.push(field.name.clone());
        let touching: Vec<&[String]> = consumed
            .iter()
            .copied()
            .filter(|path| path.starts_with(prefix.as_slice()))
            .collect();

        if touching.is_empty() {
            free.push(prefix.clone());
        } else if touching.iter().all(|path| path.len() > prefix.len())
            && field.ty == FieldType::Message
        {
            let nested = registry.lookup_msg("", field.type_name())?;
            collect_free(registry, nested, prefix, &touching, free)?;
        }
        prefix.pop();
    }
    Ok(())
}
