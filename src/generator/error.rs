use std::fmt;

use crate::descriptor::DescriptorError;

/// Errors raised while assembling artifacts.
#[derive(Debug)]
pub enum GenerateError {
    /// The unit declares no service with a bound method. The run loop skips
    /// the unit; this never aborts a run.
    NoTargetService {
        /// Proto file of the unit
        file: String,
    },
    /// Two artifacts of the run would be written to the same path
    DuplicateOutput {
        path: String,
        /// What claimed the path first
        first: String,
        second: String,
    },
    /// Two declarations of the generated Go package share a name
    DuplicateDeclaration {
        name: String,
        /// What declared the name first
        first: String,
        second: String,
    },
    /// A registry reference that does not resolve
    Descriptor(DescriptorError),
    /// Template rendering failed
    Render(askama::Error),
}

impl GenerateError {
    /// Whether the error only means "nothing to emit for this unit".
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, GenerateError::NoTargetService { .. })
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NoTargetService { file } => {
                write!(f, "{file}: no target service defined in the file")
            }
            GenerateError::DuplicateOutput {
                path,
                first,
                second,
            } => write!(f, "output path {path} is produced by both {first} and {second}"),
            GenerateError::DuplicateDeclaration {
                name,
                first,
                second,
            } => write!(
                f,
                "Go identifier {name} is declared by both {first} and {second}"
            ),
            GenerateError::Descriptor(err) => write!(f, "{err}"),
            GenerateError::Render(err) => write!(f, "failed to render template: {err}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::NoTargetService { .. }
            | GenerateError::DuplicateOutput { .. }
            | GenerateError::DuplicateDeclaration { .. } => None,
            GenerateError::Descriptor(err) => Some(err),
            GenerateError::Render(err) => Some(err),
        }
    }
}

impl From<DescriptorError> for GenerateError {
    fn from(err: DescriptorError) -> Self {
        GenerateError::Descriptor(err)
    }
}

impl From<askama::Error> for GenerateError {
    fn from(err: askama::Error) -> Self {
        GenerateError::Render(err)
    }
}
