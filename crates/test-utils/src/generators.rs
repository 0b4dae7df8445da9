//! Test data generators for creating synthetic wind grids.
//!
//! Values are predictable so tests can verify that every cell lands where the
//! row-major `lev → lat → lon` layout says it should.

/// Evenly spaced coordinate values.
///
/// ```
/// use test_utils::create_axis;
///
/// assert_eq!(create_axis(0.0, 90.0, 4), vec![0.0, 90.0, 180.0, 270.0]);
/// ```
pub fn create_axis(start: f32, step: f32, count: usize) -> Vec<f32> {
    (0..count).map(|i| start + step * i as f32).collect()
}

/// U component grid where each cell encodes its own position.
///
/// Each value is `lev * 10000 + lat * 100 + lon`, so
/// `grid[lev * lat_count * lon_count + lat * lon_count + lon]` can be checked
/// directly against its indices.
///
/// ```
/// use test_utils::create_u_wind_grid;
///
/// let grid = create_u_wind_grid(3, 2, 2);
/// assert_eq!(grid.len(), 12);
/// assert_eq!(grid[1], 1.0);      // lon=1
/// assert_eq!(grid[3], 100.0);    // lat=1
/// assert_eq!(grid[6], 10000.0);  // lev=1
/// ```
pub fn create_u_wind_grid(lon_count: usize, lat_count: usize, lev_count: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(lon_count * lat_count * lev_count);
    for lev in 0..lev_count {
        for lat in 0..lat_count {
            for lon in 0..lon_count {
                data.push((lev * 10000 + lat * 100 + lon) as f32);
            }
        }
    }
    data
}

/// V component grid: the negated U grid.
pub fn create_v_wind_grid(lon_count: usize, lat_count: usize, lev_count: usize) -> Vec<f32> {
    create_u_wind_grid(lon_count, lat_count, lev_count)
        .into_iter()
        .map(|u| -u)
        .collect()
}

/// Minimum and maximum of a slice, as a source would declare them.
pub fn value_range(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v_is_negated_u() {
        let u = create_u_wind_grid(4, 3, 2);
        let v = create_v_wind_grid(4, 3, 2);
        assert!(u.iter().zip(&v).all(|(a, b)| *a == -*b));
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[3.0, -1.0, 7.5]), (-1.0, 7.5));
    }
}
