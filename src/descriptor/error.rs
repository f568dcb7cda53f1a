use std::fmt;

/// Errors raised while loading or resolving a descriptor document.
///
/// All of these are fatal for the run: a dangling reference means the
/// generated code could not compile anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A type name that resolves to no message or enum
    UnknownType {
        /// The name as written
        name: String,
        /// Package scope the name was resolved from
        scope: String,
    },
    /// A field path component that does not exist on its message
    UnknownField {
        /// Fully qualified message name
        message: String,
        /// Missing field name
        field: String,
    },
    /// A field path that continues through a non-message field
    NotAMessage {
        /// The full field path
        field_path: String,
        /// Component that is not a message
        component: String,
    },
    /// A path template that cannot be parsed
    InvalidPathTemplate {
        /// Template as written
        template: String,
        /// What is wrong with it
        reason: String,
    },
    /// An HTTP rule with no or several patterns, or an unknown custom verb
    InvalidHttpRule {
        /// `package.Service.Method` the rule belongs to
        selector: String,
        /// What is wrong with it
        reason: String,
    },
    /// Rules from the gRPC API configuration that matched no method
    UnboundHttpRules(Vec<String>),
    /// A requested file that is not in the document
    UnknownFile(String),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::UnknownType { name, scope } => {
                write!(f, "no message or enum found for {name:?} in scope {scope:?}")
            }
            DescriptorError::UnknownField { message, field } => {
                write!(f, "no field {field:?} found in {message}")
            }
            DescriptorError::NotAMessage {
                field_path,
                component,
            } => write!(
                f,
                "{component:?} is not a message field and cannot be traversed in {field_path:?}"
            ),
            DescriptorError::InvalidPathTemplate { template, reason } => {
                write!(f, "invalid path template {template:?}: {reason}")
            }
            DescriptorError::InvalidHttpRule { selector, reason } => {
                write!(f, "invalid HTTP rule for {selector}: {reason}")
            }
            DescriptorError::UnboundHttpRules(selectors) => write!(
                f,
                "HTTP rules without a matching selector: {}",
                selectors.join(", ")
            ),
            DescriptorError::UnknownFile(name) => write!(f, "no such file: {name}"),
        }
    }
}

impl std::error::Error for DescriptorError {}
