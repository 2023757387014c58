//! NetCDF I/O operations
//!
//! Reading one netCDF file into an in-memory [`Dataset`], and writing a
//! [`Dataset`] back out with its dimensions, variable attributes and global
//! attributes preserved.

use crate::dataset::{Dataset, Dimension, Variable, VariableData};
use crate::engine::Engine;
use crate::errors::{Result, ReshapeError};
use std::{fs, path::Path};

/// Element types with an in-memory representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Byte,
    Short,
    Int,
    Int64,
    Float,
    Double,
}

/// Map the debug name of a netCDF variable type onto an element kind.
fn element_kind(vartype: &str) -> Option<ElementKind> {
    const UNSUPPORTED: [&str; 13] = [
        "u8", "u16", "u32", "u64", "ubyte", "ushort", "uint", "char", "string", "compound",
        "opaque", "vlen", "enum",
    ];
    if UNSUPPORTED.iter().any(|t| vartype.contains(t)) {
        return None;
    }

    if vartype.contains("f64") || vartype.contains("double") {
        Some(ElementKind::Double)
    } else if vartype.contains("f32") || vartype.contains("float") {
        Some(ElementKind::Float)
    } else if vartype.contains("i64") || vartype.contains("int64") {
        Some(ElementKind::Int64)
    } else if vartype.contains("i16") || vartype.contains("short") {
        Some(ElementKind::Short)
    } else if vartype.contains("i8") || vartype.contains("byte") {
        Some(ElementKind::Byte)
    } else if vartype.contains("i32") || vartype.contains("int") {
        Some(ElementKind::Int)
    } else {
        None
    }
}

fn read_variable_data(var: &netcdf::Variable<'_>) -> Result<VariableData> {
    let vartype = format!("{:?}", var.vartype()).to_lowercase();

    let data = match element_kind(&vartype) {
        Some(ElementKind::Byte) => VariableData::Byte(var.get::<i8, _>(..)?),
        Some(ElementKind::Short) => VariableData::Short(var.get::<i16, _>(..)?),
        Some(ElementKind::Int) => VariableData::Int(var.get::<i32, _>(..)?),
        Some(ElementKind::Int64) => VariableData::Int64(var.get::<i64, _>(..)?),
        Some(ElementKind::Float) => VariableData::Float(var.get::<f32, _>(..)?),
        Some(ElementKind::Double) => VariableData::Double(var.get::<f64, _>(..)?),
        None => {
            return Err(ReshapeError::UnsupportedType {
                var: var.name().to_string(),
                vartype,
            })
        }
    };

    Ok(data)
}

/// Read every dimension, variable and attribute of a netCDF file into memory.
///
/// # Errors
///
/// Propagates netCDF open/read failures unmodified; fails with
/// `UnsupportedType` for variables that are not signed integers or floats.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let file = netcdf::open(path)?;
    let mut dataset = Dataset::new();

    for dim in file.dimensions() {
        dataset.add_dimension(Dimension {
            name: dim.name().to_string(),
            len: dim.len(),
            is_unlimited: dim.is_unlimited(),
        })?;
    }

    for attr in file.attributes() {
        dataset.set_attribute(attr.name(), attr.value()?);
    }

    for var in file.variables() {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        let data = read_variable_data(&var)?;

        let mut variable = Variable::new(var.name().to_string(), dims, data)?;
        for attr in var.attributes() {
            variable.set_attribute(attr.name(), attr.value()?);
        }
        dataset.insert_variable(variable)?;
    }

    log::debug!(
        "Read {} ({} dimensions, {} variables)",
        path.display(),
        dataset.dimensions().len(),
        dataset.variables().len()
    );

    Ok(dataset)
}

/// Writes one in-memory dataset to a netCDF file
pub struct NetCDFWriter<'a> {
    dataset: &'a Dataset,
    output_path: &'a Path,
    engine: Engine,
}

impl<'a> NetCDFWriter<'a> {
    pub fn new(dataset: &'a Dataset, output_path: &'a Path, engine: Engine) -> Self {
        Self {
            dataset,
            output_path,
            engine,
        }
    }

    /// Create the file, replacing anything already at the output path.
    ///
    /// Every dimension is written fixed-length. A length of zero would declare
    /// an unlimited dimension instead, so zero-length dimensions are rejected
    /// before anything is created.
    pub fn write(&self) -> Result<()> {
        if let Some(dim) = self.dataset.dimensions().iter().find(|d| d.len == 0) {
            return Err(ReshapeError::DimensionMismatch {
                name: dim.name.clone(),
                message: "zero-length dimensions cannot be written as fixed-size".to_string(),
            });
        }

        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }

        let mut file = netcdf::create_with(self.output_path, self.engine.options())?;

        for dim in self.dataset.dimensions() {
            file.add_dimension(&dim.name, dim.len)?;
        }

        for (name, value) in self.dataset.attributes() {
            file.add_attribute(name, value.clone())?;
        }

        for variable in self.dataset.variables() {
            let dims: Vec<&str> = variable.dimensions().iter().map(String::as_str).collect();

            macro_rules! put_variable {
                ($ty:ty, $array:expr) => {{
                    let mut nc_var = file.add_variable::<$ty>(variable.name(), &dims)?;
                    for (name, value) in variable.attributes() {
                        nc_var.put_attribute(name, value.clone())?;
                    }
                    if !$array.is_empty() {
                        nc_var.put($array.view(), ..)?;
                    }
                }};
            }

            match variable.data() {
                VariableData::Byte(a) => put_variable!(i8, a),
                VariableData::Short(a) => put_variable!(i16, a),
                VariableData::Int(a) => put_variable!(i32, a),
                VariableData::Int64(a) => put_variable!(i64, a),
                VariableData::Float(a) => put_variable!(f32, a),
                VariableData::Double(a) => put_variable!(f64, a),
            }
        }

        Ok(())
    }
}

/// Write `dataset` to `output_path` using `engine`.
pub fn write_dataset(dataset: &Dataset, output_path: &Path, engine: Engine) -> Result<()> {
    NetCDFWriter::new(dataset, output_path, engine).write()
}
