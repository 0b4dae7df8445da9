//! Wind-field extraction from a decoded NetCDF buffer.

use tracing::{debug, warn};
use wind_common::{CoordinateAxis, Dimensions, WindComponent, WindFieldDataset};

use crate::error::{NetCdfError, NetCdfResult};
use crate::reader::NetCdfFile;

/// Decode a NetCDF classic buffer into a [`WindFieldDataset`].
///
/// Requires the `lon`, `lat` and `lev` dimensions and coordinate variables,
/// plus `U` and `V` variables carrying numeric `min`/`max` attributes. The
/// declared ranges are kept as-is; samples outside them are logged but left
/// untouched. The returned dataset has no run label.
pub fn decode(buffer: &[u8]) -> NetCdfResult<WindFieldDataset> {
    let mut file = NetCdfFile::open(buffer)?;

    let dimensions = Dimensions::new(
        dimension_len(&file, "lon")?,
        dimension_len(&file, "lat")?,
        dimension_len(&file, "lev")?,
    );

    let lon = CoordinateAxis::new(file.read_f32("lon")?);
    let lat = CoordinateAxis::new(file.read_f32("lat")?);
    let lev = CoordinateAxis::new(file.read_f32("lev")?);

    let u = read_component(&mut file, "U")?;
    let v = read_component(&mut file, "V")?;

    let dataset = WindFieldDataset::new(dimensions, lon, lat, lev, u, v)?;

    debug!(
        lon = dimensions.lon,
        lat = dimensions.lat,
        lev = dimensions.lev,
        bytes = buffer.len(),
        "Decoded wind field"
    );

    Ok(dataset)
}

fn dimension_len(file: &NetCdfFile, name: &str) -> NetCdfResult<usize> {
    file.dimension_len(name)
        .ok_or_else(|| NetCdfError::MissingDimension(name.to_string()))
}

fn read_component(file: &mut NetCdfFile, name: &str) -> NetCdfResult<WindComponent> {
    if !file.has_variable(name) {
        return Err(NetCdfError::MissingVariable(name.to_string()));
    }

    let min = declared_bound(file, name, "min")?;
    let max = declared_bound(file, name, "max")?;
    let component = WindComponent::new(file.read_f32(name)?, min, max);

    let outside = component.out_of_range_count();
    if outside > 0 {
        warn!(
            variable = name,
            dims = ?file.dimension_names(name).unwrap_or_default(),
            declared_min = min,
            declared_max = max,
            samples_outside = outside,
            "Wind samples fall outside the declared range"
        );
    }

    Ok(component)
}

fn declared_bound(file: &NetCdfFile, variable: &str, attribute: &str) -> NetCdfResult<f32> {
    file.numeric_attribute(variable, attribute)?
        .map(|v| v as f32)
        .ok_or_else(|| NetCdfError::MissingAttribute {
            variable: variable.to_string(),
            attribute: attribute.to_string(),
        })
}
