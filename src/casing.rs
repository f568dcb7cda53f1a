//! Identifier casing for generated Go code.
//!
//! Proto names are snake_case by convention while Go exports CamelCase. The
//! conversion follows protoc-gen-go exactly so that the type names we emit line
//! up with the ones in the generated `.pb.go` packages.

/// Convert a proto identifier to an exported Go identifier.
///
/// - a leading `_` becomes `X`
/// - an `_` followed by a lower-case letter is dropped and the letter upper-cased
/// - a lower-case letter following a digit is upper-cased
///
/// The conversion is idempotent: `camel(camel(s)) == camel(s)`.
///
/// # Example
///
/// ```rust
/// use gokitmux::casing::camel;
///
/// assert_eq!(camel("get_greeting"), "GetGreeting");
/// assert_eq!(camel("GetGreeting"), "GetGreeting");
/// ```
#[must_use]
pub fn camel(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 1);
    let mut i = 0;
    if chars.first() == Some(&'_') {
        out.push('X');
        i += 1;
    }
    while i < chars.len() {
        let c = chars[i];
        if c == '_' && chars.get(i + 1).is_some_and(char::is_ascii_lowercase) {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            out.push(c);
            i += 1;
            continue;
        }
        out.push(c.to_ascii_uppercase());
        // lower-case run following an upper-case letter is kept as is
        while chars.get(i + 1).is_some_and(char::is_ascii_lowercase) {
            i += 1;
            out.push(chars[i]);
        }
        i += 1;
    }
    out
}

/// Camel-case every element of a dotted path (`filter.user_name` → `Filter.UserName`).
#[must_use]
pub fn camel_path(path: &str) -> String {
    path.split('.').map(camel).collect::<Vec<_>>().join(".")
}

/// Make an arbitrary string usable as a Go package identifier.
///
/// Characters that cannot appear in an identifier are replaced with `_` and a
/// leading digit gets an `_` prefix.
#[must_use]
pub fn go_identifier(s: &str) -> String {
    let mut ident: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() {
        ident.push('_');
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
