use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::parser::span::Location;

/// Main error type for elements-cmake operations
#[derive(Error, Diagnostic, Debug)]
pub enum CmakeError {
    #[error("IO error: {0}")]
    #[diagnostic(code(ecm::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(ecm::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Syntax error in {macro_name}() at {location}: {message}")]
    #[diagnostic(
        code(ecm::syntax),
        help("Close the delimiter; the rest of the file cannot be parsed until it is balanced")
    )]
    Syntax {
        macro_name: String,
        message: String,
        /// Byte offset of the unclosed delimiter
        offset: usize,
        location: Location,
        #[source_code]
        src: NamedSource<String>,
        #[label("opened here")]
        span: SourceSpan,
    },

    #[error("{operation} needs module context, but no elements_subdir() was found")]
    #[diagnostic(
        code(ecm::missing_context),
        help("Run the command inside an Elements module directory")
    )]
    MissingContext { operation: String },

    #[error("{kind}() has no {field} list")]
    #[diagnostic(code(ecm::field))]
    Field { kind: String, field: String },

    #[error("Extra arguments for {kind}() must start with a keyword, found `{found}`")]
    #[diagnostic(code(ecm::extra_args))]
    ExtraArgs {
        kind: String,
        found: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(ecm::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Template error: {message}")]
    #[diagnostic(code(ecm::template))]
    Template {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Rendering {path} does not reproduce its source")]
    #[diagnostic(
        code(ecm::round_trip),
        help("Please report this file to the elements-cmake maintainers")
    )]
    RoundTrip { path: std::path::PathBuf },

    #[error("Check failed: {message}")]
    #[diagnostic(code(ecm::check))]
    Check {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(ecm::scaffold))]
    Scaffold {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl CmakeError {
    /// Attach a file name to a syntax error's source so miette reports it.
    pub fn with_source_name(self, name: impl AsRef<str>) -> Self {
        match self {
            CmakeError::Syntax {
                macro_name,
                message,
                offset,
                location,
                src,
                span,
            } => CmakeError::Syntax {
                macro_name,
                message,
                offset,
                location,
                src: NamedSource::new(name, src.inner().clone()),
                span,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CmakeError>;
