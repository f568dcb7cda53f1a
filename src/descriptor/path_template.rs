//! HTTP path templates (`/v1/{name=shelves/*}/books/{book.id}:publish`).

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::DescriptorError;

static FIELD_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("field path regex should be valid")
});

/// One `/`-separated element of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches itself exactly
    Literal(String),
    /// `*`: exactly one path segment
    Wildcard,
    /// `**`: any number of trailing segments
    DeepWildcard,
    /// `{field.path=pattern}`; a bare `{field.path}` has the pattern `*`
    Variable {
        field_path: String,
        segments: Vec<Segment>,
    },
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    /// The template exactly as declared
    pub template: String,
    pub segments: Vec<Segment>,
    /// Custom verb after the final `:`
    pub verb: Option<String>,
}

impl PathTemplate {
    /// Parse `template`.
    ///
    /// Unless `allow_colon_final_segments` is set, a `:` in the final segment
    /// (outside braces) starts the custom verb. With it set the colon is kept
    /// as part of the final literal.
    pub fn parse(template: &str, allow_colon_final_segments: bool) -> Result<Self, DescriptorError> {
        let invalid = |reason: &str| DescriptorError::InvalidPathTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = template.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };

        let (body, verb) = if allow_colon_final_segments {
            (rest, None)
        } else {
            split_verb(rest)
        };
        if verb.is_some_and(str::is_empty) {
            return Err(invalid("empty verb"));
        }

        let mut segments = Vec::new();
        if !body.is_empty() {
            for raw in split_top_level(body).map_err(|r| invalid(r))? {
                segments.push(parse_segment(raw).map_err(|r| invalid(&r))?);
            }
        }

        let deep = segments
            .iter()
            .position(|s| matches!(s, Segment::DeepWildcard));
        if deep.is_some_and(|i| i + 1 != segments.len()) {
            return Err(invalid("'**' must be the last segment"));
        }

        Ok(PathTemplate {
            template: template.to_string(),
            segments,
            verb: verb.map(String::from),
        })
    }

    /// Field paths bound by variables, in template order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable { field_path, .. } => Some(field_path.as_str()),
            _ => None,
        })
    }

    /// The template in gorilla/mux route syntax.
    #[must_use]
    pub fn mux_path(&self) -> String {
        let mut anonymous = 0;
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(lit) => lit.clone(),
                Segment::Wildcard | Segment::DeepWildcard => {
                    anonymous += 1;
                    format!("{{_{anonymous}:{}}}", segment_regex(segment))
                }
                Segment::Variable {
                    field_path,
                    segments,
                } => {
                    if segments.as_slice() == [Segment::Wildcard] {
                        format!("{{{field_path}}}")
                    } else {
                        let pattern: Vec<String> = segments.iter().map(segment_regex).collect();
                        format!("{{{field_path}:{}}}", pattern.join("/"))
                    }
                }
            })
            .collect();
        let mut path = format!("/{}", parts.join("/"));
        if let Some(verb) = &self.verb {
            path.push(':');
            path.push_str(verb);
        }
        path
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn segment_regex(segment: &Segment) -> String {
    match segment {
        Segment::Literal(lit) => regex::escape(lit),
        Segment::Wildcard => "[^/]+".to_string(),
        Segment::DeepWildcard => ".*".to_string(),
        Segment::Variable { .. } => String::new(),
    }
}

/// Split off `:verb` from the last top-level segment.
fn split_verb(body: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut last_slash = None;
    let mut last_colon = None;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => last_slash = Some(i),
            ':' if depth == 0 => last_colon = Some(i),
            _ => {}
        }
    }
    match last_colon {
        Some(colon) if last_slash.map_or(true, |slash| colon > slash) => {
            (&body[..colon], Some(&body[colon + 1..]))
        }
        _ => (body, None),
    }
}

fn split_top_level(body: &str) -> Result<Vec<&str>, &'static str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '{' => {
                depth += 1;
                if depth > 1 {
                    return Err("nested variables are not allowed");
                }
            }
            '}' => {
                if depth == 0 {
                    return Err("unbalanced '}'");
                }
                depth -= 1;
            }
            '/' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '{'");
    }
    parts.push(&body[start..]);
    Ok(parts)
}

fn parse_segment(raw: &str) -> Result<Segment, String> {
    match raw {
        "" => Err("empty segment".to_string()),
        "*" => Ok(Segment::Wildcard),
        "**" => Ok(Segment::DeepWildcard),
        _ if raw.starts_with('{') && raw.ends_with('}') => {
            let inner = &raw[1..raw.len() - 1];
            let (field_path, pattern) = match inner.split_once('=') {
                Some((field, pattern)) => (field, Some(pattern)),
                None => (inner, None),
            };
            if !FIELD_PATH.is_match(field_path) {
                return Err(format!("invalid field path {field_path:?}"));
            }
            let segments = match pattern {
                None => vec![Segment::Wildcard],
                Some(pattern) => pattern
                    .split('/')
                    .map(|p| match parse_segment(p)? {
                        Segment::Variable { .. } => Err("nested variables are not allowed".to_string()),
                        s => Ok(s),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            };
            Ok(Segment::Variable {
                field_path: field_path.to_string(),
                segments,
            })
        }
        _ if raw.contains(['{', '}']) => Err(format!("malformed segment {raw:?}")),
        _ => Ok(Segment::Literal(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_variable() {
        let t = PathTemplate::parse("/v1/greetings/{name}", false).unwrap();
        assert_eq!(
            t.segments,
            vec![
                Segment::Literal("v1".into()),
                Segment::Literal("greetings".into()),
                Segment::Variable {
                    field_path: "name".into(),
                    segments: vec![Segment::Wildcard],
                },
            ]
        );
        assert_eq!(t.fields().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(t.mux_path(), "/v1/greetings/{name}");
    }

    #[test]
    fn test_pattern_variable_and_verb() {
        let t = PathTemplate::parse("/v1/{name=shelves/*}/books/{book.id}:publish", false).unwrap();
        assert_eq!(t.verb.as_deref(), Some("publish"));
        assert_eq!(t.fields().collect::<Vec<_>>(), vec!["name", "book.id"]);
        assert_eq!(
            t.mux_path(),
            "/v1/{name:shelves/[^/]+}/books/{book.id}:publish"
        );
    }

    #[test]
    fn test_colon_kept_when_final_segments_allowed() {
        let t = PathTemplate::parse("/v1/things:batchGet", true).unwrap();
        assert_eq!(t.verb, None);
        assert_eq!(t.segments.last(), Some(&Segment::Literal("things:batchGet".into())));
    }

    #[test]
    fn test_colon_inside_variable_is_not_a_verb() {
        let t = PathTemplate::parse("/v1/{name=a/*}", false).unwrap();
        assert_eq!(t.verb, None);
    }

    #[test]
    fn test_wildcards() {
        let t = PathTemplate::parse("/files/*/{path=**}", false).unwrap();
        assert_eq!(t.mux_path(), "/files/{_1:[^/]+}/{path:.*}");
        assert!(PathTemplate::parse("/files/**/x", false).is_err());
    }

    #[test]
    fn test_root_template() {
        let t = PathTemplate::parse("/", false).unwrap();
        assert!(t.segments.is_empty());
        assert_eq!(t.mux_path(), "/");
    }

    #[test]
    fn test_invalid_templates() {
        for bad in [
            "v1/x",
            "/v1//x",
            "/v1/{a.}",
            "/v1/{a",
            "/v1/a}",
            "/v1/{a={b}}",
            "/v1/x:",
            "/v1/x{y}",
        ] {
            assert!(
                PathTemplate::parse(bad, false).is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
