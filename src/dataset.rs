//! In-memory dataset model
//!
//! A [`Dataset`] is a set of named [`Variable`]s over shared [`Dimension`]s plus
//! ordered global attributes. Variable values live behind an `Arc`, so copying
//! a variable into another dataset shares the underlying array instead of
//! duplicating it.
//!
//! The [`DatasetView`] trait is the narrow capability the classifier needs:
//! named data variables, their dimensions, named dimensions and global
//! attributes. Both [`Dataset`] and an open `netcdf::File` provide it.

use crate::errors::{Result, ReshapeError};
use ndarray::{ArrayD, Axis};
use netcdf::AttributeValue;
use std::sync::Arc;

/// Ordered attribute list (name, value)
pub type Attributes = Vec<(String, AttributeValue)>;

/// A named axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
    pub is_unlimited: bool,
}

impl Dimension {
    /// Create a fixed-length dimension
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
            is_unlimited: false,
        }
    }
}

/// Typed values of a variable
#[derive(Debug, Clone, PartialEq)]
pub enum VariableData {
    Byte(ArrayD<i8>),
    Short(ArrayD<i16>),
    Int(ArrayD<i32>),
    Int64(ArrayD<i64>),
    Float(ArrayD<f32>),
    Double(ArrayD<f64>),
}

/// Apply the same expression to whichever array a `VariableData` holds.
macro_rules! with_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            VariableData::Byte($arr) => $body,
            VariableData::Short($arr) => $body,
            VariableData::Int($arr) => $body,
            VariableData::Int64($arr) => $body,
            VariableData::Float($arr) => $body,
            VariableData::Double($arr) => $body,
        }
    };
}

impl VariableData {
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, as used in error messages and summaries
    pub fn type_name(&self) -> &'static str {
        match self {
            VariableData::Byte(_) => "i8",
            VariableData::Short(_) => "i16",
            VariableData::Int(_) => "i32",
            VariableData::Int64(_) => "i64",
            VariableData::Float(_) => "f32",
            VariableData::Double(_) => "f64",
        }
    }

    /// First element in logical order, widened to f64
    pub fn first_as_f64(&self) -> Option<f64> {
        with_array!(self, a => a.iter().next().map(|&v| v as f64))
    }

    /// Element-wise equality where two NaNs count as equal
    pub fn same_values(&self, other: &VariableData) -> bool {
        macro_rules! floats_match {
            ($a:expr, $b:expr) => {
                $a.shape() == $b.shape()
                    && $a
                        .iter()
                        .zip($b.iter())
                        .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
            };
        }

        match (self, other) {
            (VariableData::Float(a), VariableData::Float(b)) => floats_match!(a, b),
            (VariableData::Double(a), VariableData::Double(b)) => floats_match!(a, b),
            _ => self == other,
        }
    }

    /// Concatenate arrays of the same element type along `axis`.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when the parts hold different element types, `ArrayError`
    /// when their shapes disagree off the concatenation axis.
    pub fn concatenate(var_name: &str, axis: usize, parts: &[&VariableData]) -> Result<VariableData> {
        let first = parts.first().ok_or_else(|| ReshapeError::InconsistentSlices {
            message: format!("no values to concatenate for '{}'", var_name),
        })?;

        macro_rules! concat_as {
            ($variant:ident) => {{
                let views = parts
                    .iter()
                    .map(|part| match part {
                        VariableData::$variant(a) => Ok(a.view()),
                        other => Err(ReshapeError::TypeMismatch {
                            message: format!(
                                "variable '{}' is {} in one slice and {} in another",
                                var_name,
                                first.type_name(),
                                other.type_name()
                            ),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                VariableData::$variant(ndarray::concatenate(Axis(axis), &views)?)
            }};
        }

        let merged = match first {
            VariableData::Byte(_) => concat_as!(Byte),
            VariableData::Short(_) => concat_as!(Short),
            VariableData::Int(_) => concat_as!(Int),
            VariableData::Int64(_) => concat_as!(Int64),
            VariableData::Float(_) => concat_as!(Float),
            VariableData::Double(_) => concat_as!(Double),
        };
        Ok(merged)
    }
}

macro_rules! impl_from_array {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<ArrayD<$ty>> for VariableData {
                fn from(array: ArrayD<$ty>) -> Self {
                    VariableData::$variant(array)
                }
            }
        )*
    };
}

impl_from_array!(i8 => Byte, i16 => Short, i32 => Int, i64 => Int64, f32 => Float, f64 => Double);

fn upsert_attribute(attributes: &mut Attributes, name: &str, value: AttributeValue) {
    match attributes.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => attributes.push((name.to_string(), value)),
    }
}

/// A named array over named dimensions
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    dimensions: Vec<String>,
    attributes: Attributes,
    data: Arc<VariableData>,
}

impl Variable {
    /// Create a variable, checking that the dimension list matches the array rank.
    pub fn new<I, S>(name: impl Into<String>, dimensions: I, data: impl Into<VariableData>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_shared(name, dimensions, Arc::new(data.into()))
    }

    /// Create a variable over values that are already shared.
    pub fn from_shared<I, S>(name: impl Into<String>, dimensions: I, data: Arc<VariableData>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let dimensions: Vec<String> = dimensions.into_iter().map(Into::into).collect();

        if dimensions.len() != data.ndim() {
            return Err(ReshapeError::DimensionMismatch {
                message: format!(
                    "{} dimension names declared for an array of rank {}",
                    dimensions.len(),
                    data.ndim()
                ),
                name,
            });
        }

        Ok(Self {
            name,
            dimensions,
            attributes: Vec::new(),
            data,
        })
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<AttributeValue>) {
        upsert_attribute(&mut self.attributes, name, value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn attributes(&self) -> &[(String, AttributeValue)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn data(&self) -> &VariableData {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Same name, dimensions and attributes over new values
    pub fn with_data(&self, data: impl Into<VariableData>) -> Result<Variable> {
        let mut variable = Variable::new(self.name.clone(), self.dimensions.clone(), data)?;
        variable.attributes = self.attributes.clone();
        Ok(variable)
    }

    /// True when `dim` appears in this variable's dimension list
    pub fn depends_on(&self, dim: &str) -> bool {
        self.dimensions.iter().any(|d| d == dim)
    }

    /// A coordinate variable is 1-D and named after its only dimension.
    pub fn is_coordinate(&self) -> bool {
        self.dimensions.len() == 1 && self.dimensions[0] == self.name
    }

    /// True when both variables point at the same value buffer
    pub fn shares_data_with(&self, other: &Variable) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// A collection of variables over shared dimensions, plus global attributes
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    dimensions: Vec<Dimension>,
    variables: Vec<Variable>,
    attributes: Attributes,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Declare a dimension. Re-declaring one with the same length is a no-op.
    pub fn add_dimension(&mut self, dimension: Dimension) -> Result<()> {
        match self.dimension(&dimension.name) {
            Some(existing) if existing.len == dimension.len => Ok(()),
            Some(existing) => Err(ReshapeError::DimensionMismatch {
                message: format!(
                    "already declared with length {}, got {}",
                    existing.len, dimension.len
                ),
                name: dimension.name,
            }),
            None => {
                self.dimensions.push(dimension);
                Ok(())
            }
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// Names of every variable, coordinates included, in insertion order
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name()).collect()
    }

    /// The coordinate variable for `dim`, if the dataset has one
    pub fn coordinate_variable(&self, dim: &str) -> Option<&Variable> {
        self.variable(dim).filter(|v| v.is_coordinate())
    }

    /// Insert a variable, replacing any variable of the same name in place.
    ///
    /// Every dimension the variable uses must already be declared with a
    /// length equal to the matching axis of its array.
    pub fn insert_variable(&mut self, variable: Variable) -> Result<()> {
        for (dim_name, &axis_len) in variable.dimensions.iter().zip(variable.shape()) {
            let dim = self.dimension(dim_name).ok_or_else(|| ReshapeError::DimensionMismatch {
                name: variable.name.clone(),
                message: format!("dimension '{}' is not declared", dim_name),
            })?;
            if dim.len != axis_len {
                return Err(ReshapeError::DimensionMismatch {
                    name: variable.name.clone(),
                    message: format!(
                        "axis '{}' has length {} but the dimension has length {}",
                        dim_name, axis_len, dim.len
                    ),
                });
            }
        }

        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(slot) => *slot = variable,
            None => self.variables.push(variable),
        }
        Ok(())
    }

    /// Copy variable `name` from `source`, together with the dimensions and
    /// coordinate variables it depends on. Values are shared, not copied.
    pub fn insert_from(&mut self, source: &Dataset, name: &str) -> Result<()> {
        let variable = source
            .variable(name)
            .ok_or_else(|| ReshapeError::VariableNotFound {
                var: name.to_string(),
            })?;

        for dim_name in variable.dimensions() {
            let dim = source
                .dimension(dim_name)
                .ok_or_else(|| ReshapeError::DimensionMismatch {
                    name: name.to_string(),
                    message: format!("dimension '{}' is not declared in the source", dim_name),
                })?;
            self.add_dimension(dim.clone())?;

            if dim_name != name && !self.contains_variable(dim_name) {
                if let Some(coord) = source.coordinate_variable(dim_name) {
                    self.insert_variable(coord.clone())?;
                }
            }
        }

        self.insert_variable(variable.clone())
    }

    pub fn attributes(&self) -> &[(String, AttributeValue)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<AttributeValue>) {
        upsert_attribute(&mut self.attributes, name, value.into());
    }

    /// Replace all global attributes
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

/// Read-only view of anything with named variables, dimensions and global attributes
pub trait DatasetView {
    /// Data variables (coordinate variables excluded) in iteration order
    fn data_variable_names(&self) -> Vec<String>;

    /// Dimension names of a variable, or `None` if it does not exist
    fn variable_dimensions(&self, name: &str) -> Option<Vec<String>>;

    fn dimension_names(&self) -> Vec<String>;

    fn global_attribute_names(&self) -> Vec<String>;
}

impl DatasetView for Dataset {
    fn data_variable_names(&self) -> Vec<String> {
        self.variables
            .iter()
            .filter(|v| !v.is_coordinate())
            .map(|v| v.name.clone())
            .collect()
    }

    fn variable_dimensions(&self, name: &str) -> Option<Vec<String>> {
        self.variable(name).map(|v| v.dimensions.clone())
    }

    fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }

    fn global_attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl DatasetView for netcdf::File {
    fn data_variable_names(&self) -> Vec<String> {
        self.variables()
            .filter(|var| {
                let dims = var.dimensions();
                !(dims.len() == 1 && dims[0].name() == var.name())
            })
            .map(|var| var.name().to_string())
            .collect()
    }

    fn variable_dimensions(&self, name: &str) -> Option<Vec<String>> {
        self.variable(name).map(|var| {
            var.dimensions()
                .iter()
                .map(|d| d.name().to_string())
                .collect()
        })
    }

    fn dimension_names(&self) -> Vec<String> {
        self.dimensions().map(|d| d.name().to_string()).collect()
    }

    fn global_attribute_names(&self) -> Vec<String> {
        self.attributes().map(|a| a.name().to_string()).collect()
    }
}
