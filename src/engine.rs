//! Output backend selection
//!
//! The engine name given on the command line picks the on-disk format used
//! when creating each time-series file.

use crate::errors::{Result, ReshapeError};
use std::fmt;
use std::str::FromStr;

/// NetCDF flavour used to encode output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// NetCDF-4 (HDF5 based)
    #[default]
    NetCdf4,
    /// NetCDF-4 restricted to the classic data model
    NetCdf4Classic,
    /// NetCDF-3 classic format
    NetCdf3Classic,
    /// NetCDF-3 with 64-bit offsets
    NetCdf3Offset64,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::NetCdf4 => "netcdf4",
            Engine::NetCdf4Classic => "netcdf4-classic",
            Engine::NetCdf3Classic => "netcdf3",
            Engine::NetCdf3Offset64 => "netcdf3-64bit",
        }
    }

    /// Create-mode flags passed to the netCDF library
    pub fn options(&self) -> netcdf::Options {
        match self {
            Engine::NetCdf4 => netcdf::Options::NETCDF4,
            Engine::NetCdf4Classic => netcdf::Options::NETCDF4 | netcdf::Options::CLASSIC,
            Engine::NetCdf3Classic => netcdf::Options::empty(),
            Engine::NetCdf3Offset64 => netcdf::Options::_64BIT_OFFSET,
        }
    }

    /// NetCDF-3 formats have no 64-bit integer type
    pub fn supports_int64(&self) -> bool {
        matches!(self, Engine::NetCdf4)
    }
}

impl FromStr for Engine {
    type Err = ReshapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "netcdf4" | "h5netcdf" => Ok(Engine::NetCdf4),
            "netcdf4-classic" | "netcdf4_classic" => Ok(Engine::NetCdf4Classic),
            "netcdf3" | "netcdf3-classic" | "netcdf3_classic" => Ok(Engine::NetCdf3Classic),
            "netcdf3-64bit" | "netcdf3_64bit" | "scipy" => Ok(Engine::NetCdf3Offset64),
            other => Err(ReshapeError::InvalidInput {
                message: format!(
                    "unknown engine '{}' (expected netcdf4, netcdf4-classic, netcdf3 or netcdf3-64bit)",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
