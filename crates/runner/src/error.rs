use std::fmt::Display;
use std::path::PathBuf;

use wasmparser::ValType;

/// Errors that can occur while loading and running a module
#[derive(Debug)]
pub enum Error {
    /// The module file could not be read
    FileRead {
        /// The path that was read
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The module could not be parsed, validated or instantiated
    Instantiation(InstantiationError),

    /// A requested export could not be resolved to a callable integer function
    ExportLookup(LookupError),

    /// A resolved export failed while being called
    Call {
        /// The export name
        name: String,
        /// What went wrong
        source: CallError,
    },
}

/// Errors that can occur when turning bytes into a live instance
#[derive(Debug)]
pub enum InstantiationError {
    /// The engine rejected the module
    Engine(tinywasm::Error),

    /// The module's sections could not be walked
    Sections(wasmparser::BinaryReaderError),

    #[cfg(feature = "wat")]
    /// A text module could not be assembled
    Text(wat::Error),
}

/// Errors that can occur when resolving an export by name
#[derive(Debug)]
pub enum LookupError {
    /// No export with this name exists
    Missing {
        /// The export name
        name: String,
    },

    /// The export exists but is not a function
    NotAFunction {
        /// The export name
        name: String,
    },

    /// The function does not take and return a single integer of the same width
    UnsupportedSignature {
        /// The export name
        name: String,
        /// Declared parameter types
        params: Vec<ValType>,
        /// Declared result types
        results: Vec<ValType>,
    },

    /// The engine refused to hand out the function
    Engine {
        /// The export name
        name: String,
        /// The engine error
        source: tinywasm::Error,
    },
}

/// Errors that can occur while invoking a resolved function
#[derive(Debug)]
pub enum CallError {
    /// The argument does not fit the declared parameter width
    ArgumentOutOfRange(i64),

    /// The function returned a value that is not an integer of the declared width
    UnexpectedResult(String),

    /// The engine trapped or otherwise failed
    Engine(tinywasm::Error),
}

impl Error {
    /// Get the message of the error
    pub fn message(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "failed to read module file",
            Self::Instantiation(_) => "failed to instantiate module",
            Self::ExportLookup(err) => err.message(),
            Self::Call { .. } => "export call failed",
        }
    }
}

impl LookupError {
    /// Get the message of the lookup error
    pub fn message(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "export not found",
            Self::NotAFunction { .. } => "export is not a function",
            Self::UnsupportedSignature { .. } => "unsupported export signature",
            Self::Engine { .. } => "export lookup failed",
        }
    }

    /// The export name the lookup was for
    pub fn name(&self) -> &str {
        match self {
            Self::Missing { name }
            | Self::NotAFunction { name }
            | Self::UnsupportedSignature { name, .. }
            | Self::Engine { name, .. } => name,
        }
    }
}

// Wrapping variants either add context and expose the inner error through
// `source()`, or print the inner error and skip it in the chain. Never both.

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileRead { path, .. } => write!(f, "failed to read {}", path.display()),
            Self::Instantiation(_) => write!(f, "failed to instantiate module"),
            Self::ExportLookup(err) => write!(f, "{err}"),
            Self::Call { name, .. } => write!(f, "call to `{name}` failed"),
        }
    }
}

impl Display for InstantiationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Sections(_) => write!(f, "malformed section"),
            #[cfg(feature = "wat")]
            Self::Text(_) => write!(f, "invalid text module"),
        }
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { name } => write!(f, "export not found: `{name}`"),
            Self::NotAFunction { name } => write!(f, "export `{name}` is not a function"),
            Self::UnsupportedSignature { name, params, results } => {
                write!(f, "export `{name}` has unsupported signature: params={params:?}, results={results:?}")
            }
            Self::Engine { name, .. } => write!(f, "failed to look up export `{name}`"),
        }
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArgumentOutOfRange(arg) => write!(f, "argument {arg} does not fit the parameter type"),
            Self::UnexpectedResult(got) => write!(f, "unexpected result: {got}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileRead { source, .. } => Some(source),
            Self::Instantiation(err) => Some(err),
            Self::ExportLookup(err) => err.source(),
            Self::Call { source, .. } => Some(source),
        }
    }
}

impl std::error::Error for InstantiationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(err) => err.source(),
            Self::Sections(err) => Some(err),
            #[cfg(feature = "wat")]
            Self::Text(err) => Some(err),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(err) => err.source(),
            _ => None,
        }
    }
}

impl From<InstantiationError> for Error {
    fn from(value: InstantiationError) -> Self {
        Self::Instantiation(value)
    }
}

impl From<LookupError> for Error {
    fn from(value: LookupError) -> Self {
        Self::ExportLookup(value)
    }
}

impl From<tinywasm::Error> for InstantiationError {
    fn from(value: tinywasm::Error) -> Self {
        Self::Engine(value)
    }
}

impl From<wasmparser::BinaryReaderError> for InstantiationError {
    fn from(value: wasmparser::BinaryReaderError) -> Self {
        Self::Sections(value)
    }
}

#[cfg(feature = "wat")]
impl From<wat::Error> for InstantiationError {
    fn from(value: wat::Error) -> Self {
        Self::Text(value)
    }
}

/// A wrapper around [`std::result::Result`] for runner operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
