//! Variable data access over an in-memory classic buffer.

use std::io::Cursor;

use netcdf3::{DataType, DataVector, FileReader};

use crate::error::{NetCdfError, NetCdfResult};

/// Name handed to the reader for in-memory buffers; only used in its messages.
const BUFFER_NAME: &str = "wind.nc";

/// A classic NetCDF buffer opened for reading.
///
/// The header is parsed up front; variable data is decoded on demand after
/// its declared size has been checked against the buffer.
pub struct NetCdfFile {
    reader: FileReader,
    available: usize,
}

impl NetCdfFile {
    /// Parse the header of `data`.
    pub fn open(data: &[u8]) -> NetCdfResult<Self> {
        if data.len() < 4 || &data[..3] != b"CDF" {
            return Err(NetCdfError::InvalidSignature(format!(
                "{:02x?}",
                &data[..data.len().min(4)]
            )));
        }

        let reader = FileReader::open_seek_read(BUFFER_NAME, Box::new(Cursor::new(data.to_vec())))
            .map_err(|e| NetCdfError::Read(format!("{:?}", e)))?;

        Ok(Self {
            reader,
            available: data.len(),
        })
    }

    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        self.reader.data_set().dim_size(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.reader.data_set().get_var(name).is_some()
    }

    /// Names of a variable's dimensions, in storage order.
    pub fn dimension_names(&self, variable: &str) -> Option<Vec<String>> {
        self.reader
            .data_set()
            .get_var(variable)
            .map(|var| var.dim_names())
    }

    /// First value of a numeric variable attribute.
    ///
    /// `Ok(None)` when the attribute is absent; text attributes are an error.
    pub fn numeric_attribute(&self, variable: &str, attribute: &str) -> NetCdfResult<Option<f64>> {
        let Some(attr) = self.reader.data_set().get_var_attr(variable, attribute) else {
            return Ok(None);
        };

        let value = match attr.data_type() {
            DataType::I8 => attr.get_i8().and_then(|v| v.first()).map(|&x| x as f64),
            DataType::I16 => attr.get_i16().and_then(|v| v.first()).map(|&x| x as f64),
            DataType::I32 => attr.get_i32().and_then(|v| v.first()).map(|&x| x as f64),
            DataType::F32 => attr.get_f32().and_then(|v| v.first()).map(|&x| x as f64),
            DataType::F64 => attr.get_f64().and_then(|v| v.first()).copied(),
            DataType::U8 => None,
        };

        value.map(Some).ok_or_else(|| {
            NetCdfError::InvalidFormat(format!(
                "attribute '{}' on variable '{}' is not numeric",
                attribute, variable
            ))
        })
    }

    /// Read a numeric variable, widening or narrowing every element to `f32`.
    ///
    /// Record variables are returned with all records back to back.
    pub fn read_f32(&mut self, name: &str) -> NetCdfResult<Vec<f32>> {
        if !self.has_variable(name) {
            return Err(NetCdfError::MissingVariable(name.to_string()));
        }
        self.check_declared_size(name)?;

        let values = self
            .reader
            .read_var(name)
            .map_err(|e| NetCdfError::Read(format!("variable '{}': {:?}", name, e)))?;

        match values {
            DataVector::I8(v) => Ok(v.into_iter().map(f32::from).collect()),
            DataVector::I16(v) => Ok(v.into_iter().map(f32::from).collect()),
            DataVector::I32(v) => Ok(v.into_iter().map(|x| x as f32).collect()),
            DataVector::F32(v) => Ok(v),
            DataVector::F64(v) => Ok(v.into_iter().map(|x| x as f32).collect()),
            DataVector::U8(_) => Err(NetCdfError::InvalidFormat(format!(
                "variable '{}' holds characters, not numbers",
                name
            ))),
        }
    }

    /// Reject variables whose declared shape cannot fit in the buffer.
    ///
    /// Dimension lengths come straight from the header, so the product is
    /// checked before the reader allocates anything for it.
    fn check_declared_size(&self, name: &str) -> NetCdfResult<()> {
        let data_set = self.reader.data_set();
        let var = data_set
            .get_var(name)
            .ok_or_else(|| NetCdfError::MissingVariable(name.to_string()))?;

        let overflow = || NetCdfError::InvalidFormat(format!("variable '{}' is too large", name));

        let mut elements = 1usize;
        for dim in var.dim_names() {
            let len = data_set.dim_size(&dim).ok_or_else(|| {
                NetCdfError::InvalidFormat(format!(
                    "variable '{}' uses unknown dimension '{}'",
                    name, dim
                ))
            })?;
            elements = elements.checked_mul(len).ok_or_else(overflow)?;
        }

        let needed = elements
            .checked_mul(element_size(var.data_type()))
            .ok_or_else(overflow)?;

        if needed > self.available {
            return Err(NetCdfError::Truncated {
                variable: name.to_string(),
                needed,
                available: self.available,
            });
        }
        Ok(())
    }
}

fn element_size(data_type: DataType) -> usize {
    match data_type {
        DataType::I8 | DataType::U8 => 1,
        DataType::I16 => 2,
        DataType::I32 | DataType::F32 => 4,
        DataType::F64 => 8,
    }
}
