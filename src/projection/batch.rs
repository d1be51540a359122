//! Parallel point projection over slices and `(n, 2)` arrays.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::error::GeoError;
use crate::math::{DEGREES, RADIANS};

use super::Projection;

impl Projection {
    /// Project `(lon, lat)` degree pairs to plane coordinates in place.
    /// No clipping is applied.
    pub fn project_batch(&self, coords: &mut [(f64, f64)]) {
        // Build the derived state once, before the workers share it.
        self.derived();
        coords.par_iter_mut().for_each(|c| {
            *c = self.project_radians(c.0 * RADIANS, c.1 * RADIANS);
        });
    }

    /// Map plane coordinates back to `(lon, lat)` degrees in place. Points
    /// outside the projection's domain become `(NaN, NaN)`.
    pub fn invert_batch(&self, coords: &mut [(f64, f64)]) {
        self.derived();
        coords.par_iter_mut().for_each(|c| {
            *c = match self.invert_radians(c.0, c.1) {
                Some((lambda, phi)) => (lambda * DEGREES, phi * DEGREES),
                None => (f64::NAN, f64::NAN),
            };
        });
    }

    /// [`project_batch`](Self::project_batch) over an `(n, 2)` array of
    /// `[lon, lat]` rows.
    pub fn project_array(&self, points: ArrayView2<f64>) -> Result<Array2<f64>, GeoError> {
        let (rows, cols) = points.dim();
        if cols != 2 {
            return Err(GeoError::Shape(format!(
                "expected an (n, 2) array, got ({rows}, {cols})"
            )));
        }
        let mut coords: Vec<(f64, f64)> = points.rows().into_iter().map(|r| (r[0], r[1])).collect();
        self.project_batch(&mut coords);
        tracing::trace!(rows, "projected point array");

        let flat: Vec<f64> = coords.into_iter().flat_map(|(x, y)| [x, y]).collect();
        Array2::from_shape_vec((rows, 2), flat).map_err(|e| GeoError::Shape(e.to_string()))
    }
}
