//! NetCDF classic buffers for tests, written with `netcdf3`.
//!
//! Collects a data set definition plus variable payloads, writes them through
//! [`netcdf3::FileWriter`] into a scratch file and hands back the bytes, so
//! decoder and pipeline tests exercise real files without fixtures on disk.
//!
//! ```
//! use test_utils::netcdf::{AttrValue, NcValues, NetCdfBuilder};
//!
//! let bytes = NetCdfBuilder::new()
//!     .dimension("lon", 2)
//!     .variable("lon", &["lon"], NcValues::Float(vec![0.0, 1.0]))
//!     .attr("units", AttrValue::Text("degrees_east".into()))
//!     .build();
//! assert_eq!(&bytes[0..4], b"CDF\x01");
//! ```

use netcdf3::{DataSet, FileWriter};

pub use netcdf3::Version;

/// Variable payload, stored with the matching external type.
#[derive(Debug, Clone)]
pub enum NcValues {
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl NcValues {
    fn len(&self) -> usize {
        match self {
            NcValues::Short(v) => v.len(),
            NcValues::Int(v) => v.len(),
            NcValues::Float(v) => v.len(),
            NcValues::Double(v) => v.len(),
        }
    }
}

/// Attribute payload.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Text(String),
    Short(i16),
    Int(i32),
    Float(f32),
    Double(f64),
}

#[derive(Debug, Clone)]
struct VarSpec {
    name: String,
    dims: Vec<String>,
    attrs: Vec<(String, AttrValue)>,
    values: NcValues,
}

/// Builder for classic NetCDF buffers.
#[derive(Debug, Clone)]
pub struct NetCdfBuilder {
    version: Version,
    dims: Vec<(String, usize)>,
    record_dim: Option<(String, usize)>,
    global_attrs: Vec<(String, String)>,
    vars: Vec<VarSpec>,
}

impl Default for NetCdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetCdfBuilder {
    /// Start a CDF-1 (classic) file.
    pub fn new() -> Self {
        Self {
            version: Version::Classic,
            dims: Vec::new(),
            record_dim: None,
            global_attrs: Vec::new(),
            vars: Vec::new(),
        }
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn dimension(mut self, name: &str, len: usize) -> Self {
        self.dims.push((name.to_string(), len));
        self
    }

    /// Declare the unlimited dimension holding `num_records` records.
    pub fn record_dimension(mut self, name: &str, num_records: usize) -> Self {
        self.record_dim = Some((name.to_string(), num_records));
        self
    }

    pub fn global_attr(mut self, name: &str, value: &str) -> Self {
        self.global_attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a variable. For record variables, `values` holds every record back to back.
    pub fn variable(mut self, name: &str, dims: &[&str], values: NcValues) -> Self {
        self.vars.push(VarSpec {
            name: name.to_string(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            attrs: Vec::new(),
            values,
        });
        self
    }

    /// Attach an attribute to the most recently added variable.
    pub fn attr(mut self, name: &str, value: AttrValue) -> Self {
        if let Some(var) = self.vars.last_mut() {
            var.attrs.push((name.to_string(), value));
        }
        self
    }

    /// Serialize to bytes.
    ///
    /// Panics when the definition is rejected by `netcdf3`; a broken fixture
    /// should fail the test that built it.
    pub fn build(&self) -> Vec<u8> {
        let data_set = self.data_set();

        let dir = tempfile::tempdir().expect("create scratch dir");
        let path = dir.path().join("wind.nc");

        let mut writer = FileWriter::open(&path).expect("open netcdf writer");
        writer
            .set_def(&data_set, self.version.clone(), 0)
            .expect("write netcdf header");

        for var in &self.vars {
            match self.records_of(var) {
                Some(records) => write_records(&mut writer, var, records),
                None => write_fixed(&mut writer, var),
            }
        }

        writer.close().expect("close netcdf writer");
        std::fs::read(&path).expect("read back netcdf file")
    }

    fn data_set(&self) -> DataSet {
        let mut data_set = DataSet::new();

        if let Some((name, records)) = &self.record_dim {
            data_set
                .set_unlimited_dim(name, *records)
                .expect("record dimension");
        }
        for (name, len) in &self.dims {
            data_set.add_fixed_dim(name, *len).expect("fixed dimension");
        }
        for (name, value) in &self.global_attrs {
            data_set
                .add_global_attr_string(name, value)
                .expect("global attribute");
        }

        for var in &self.vars {
            let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
            match &var.values {
                NcValues::Short(_) => data_set.add_var_i16(&var.name, &dims),
                NcValues::Int(_) => data_set.add_var_i32(&var.name, &dims),
                NcValues::Float(_) => data_set.add_var_f32(&var.name, &dims),
                NcValues::Double(_) => data_set.add_var_f64(&var.name, &dims),
            }
            .expect("variable definition");

            for (attr, value) in &var.attrs {
                match value {
                    AttrValue::Text(s) => data_set.add_var_attr_string(&var.name, attr, s),
                    AttrValue::Short(v) => data_set.add_var_attr_i16(&var.name, attr, vec![*v]),
                    AttrValue::Int(v) => data_set.add_var_attr_i32(&var.name, attr, vec![*v]),
                    AttrValue::Float(v) => data_set.add_var_attr_f32(&var.name, attr, vec![*v]),
                    AttrValue::Double(v) => data_set.add_var_attr_f64(&var.name, attr, vec![*v]),
                }
                .expect("variable attribute");
            }
        }

        data_set
    }

    /// Record count when `var` is laid out along the record dimension.
    fn records_of(&self, var: &VarSpec) -> Option<usize> {
        let (name, records) = self.record_dim.as_ref()?;
        (var.dims.first() == Some(name)).then_some(*records)
    }
}

fn write_fixed(writer: &mut FileWriter, var: &VarSpec) {
    let name = var.name.as_str();
    match &var.values {
        NcValues::Short(v) => writer.write_var_i16(name, v),
        NcValues::Int(v) => writer.write_var_i32(name, v),
        NcValues::Float(v) => writer.write_var_f32(name, v),
        NcValues::Double(v) => writer.write_var_f64(name, v),
    }
    .expect("variable data");
}

fn write_records(writer: &mut FileWriter, var: &VarSpec, records: usize) {
    let name = var.name.as_str();
    let slab = var.values.len() / records.max(1);
    for record in 0..records {
        let range = record * slab..(record + 1) * slab;
        match &var.values {
            NcValues::Short(v) => writer.write_record_i16(name, record, &v[range]),
            NcValues::Int(v) => writer.write_record_i32(name, record, &v[range]),
            NcValues::Float(v) => writer.write_record_f32(name, record, &v[range]),
            NcValues::Double(v) => writer.write_record_f64(name, record, &v[range]),
        }
        .expect("record data");
    }
}
