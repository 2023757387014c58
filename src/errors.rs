//! Centralized error handling for reshaper
//!
//! Every stage of the pipeline (load, classify, build, write) reports failures
//! through [`ReshapeError`]. Backend failures from the netCDF library, the
//! filesystem and ndarray are wrapped unmodified so the original cause stays
//! reachable through [`std::error::Error::source`].

use std::fmt;
use std::path::PathBuf;

/// Main error type for reshaper operations
#[derive(Debug)]
pub enum ReshapeError {
    /// A required configuration value is missing or empty
    InvalidInput { message: String },

    /// A value does not have the expected shape or element type
    TypeMismatch { message: String },

    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// The input directory holds no `*.nc` files
    NoInputFiles { directory: PathBuf },

    /// Variable not found in a dataset
    VariableNotFound { var: String },

    /// Declared dimensions disagree with an array rank or a dimension length
    DimensionMismatch { name: String, message: String },

    /// Time slices that cannot be merged into one dataset
    InconsistentSlices { message: String },

    /// NetCDF variable type without an in-memory representation
    UnsupportedType { var: String, vartype: String },

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Generic error for everything else
    Generic(String),
}

impl ReshapeError {
    /// True for errors raised by the underlying netCDF library, the
    /// filesystem or the array layer.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            ReshapeError::NetCDFError(_) | ReshapeError::IoError(_) | ReshapeError::ArrayError(_)
        )
    }
}

impl fmt::Display for ReshapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReshapeError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            ReshapeError::TypeMismatch { message } => write!(f, "Type mismatch: {}", message),
            ReshapeError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            ReshapeError::IoError(e) => write!(f, "I/O error: {}", e),
            ReshapeError::ArrayError(e) => write!(f, "Array error: {}", e),
            ReshapeError::NoInputFiles { directory } => {
                write!(f, "No *.nc files found in '{}'", directory.display())
            }
            ReshapeError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in dataset", var)
            }
            ReshapeError::DimensionMismatch { name, message } => {
                write!(f, "Dimension mismatch for '{}': {}", name, message)
            }
            ReshapeError::InconsistentSlices { message } => {
                write!(f, "Inconsistent time slices: {}", message)
            }
            ReshapeError::UnsupportedType { var, vartype } => {
                write!(f, "Variable '{}' has unsupported type {}", var, vartype)
            }
            ReshapeError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            ReshapeError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ReshapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReshapeError::NetCDFError(e) => Some(e),
            ReshapeError::IoError(e) => Some(e),
            ReshapeError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for ReshapeError {
    fn from(error: netcdf::Error) -> Self {
        ReshapeError::NetCDFError(error)
    }
}

impl From<std::io::Error> for ReshapeError {
    fn from(error: std::io::Error) -> Self {
        ReshapeError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for ReshapeError {
    fn from(error: ndarray::ShapeError) -> Self {
        ReshapeError::ArrayError(error)
    }
}

impl From<String> for ReshapeError {
    fn from(error: String) -> Self {
        ReshapeError::Generic(error)
    }
}

impl From<&str> for ReshapeError {
    fn from(error: &str) -> Self {
        ReshapeError::Generic(error.to_string())
    }
}

/// Result type alias for reshaper operations
pub type Result<T> = std::result::Result<T, ReshapeError>;
