use numpy::{PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::angle::{Angle, GeoPoint};
use crate::circle::CircleGenerator;
use crate::geometry::Geometry;
use crate::proj::ProjectionKind;
use crate::projection::{Projection, ProjectionConfig};

/// Register all Python-visible functions.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(project_points, m)?)?;
    m.add_function(wrap_pyfunction!(invert_points, m)?)?;
    m.add_function(wrap_pyfunction!(project_array, m)?)?;
    m.add_function(wrap_pyfunction!(geo_circle, m)?)?;
    Ok(())
}

fn value_error(e: impl ToString) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Projection of `kind`, optionally configured from a JSON options string.
fn build_projection(kind: &str, config: Option<&str>) -> PyResult<Projection> {
    let kind: ProjectionKind = kind.parse().map_err(value_error)?;
    let mut config: ProjectionConfig = match config {
        Some(json) => serde_json::from_str(json).map_err(value_error)?,
        None => ProjectionConfig::default(),
    };
    config.kind = Some(kind);
    Projection::from_config(&config).map_err(value_error)
}

fn paired(x: &PyReadonlyArray1<'_, f64>, y: &PyReadonlyArray1<'_, f64>) -> PyResult<Vec<(f64, f64)>> {
    let x_view = x.as_array();
    let y_view = y.as_array();
    if x_view.len() != y_view.len() {
        return Err(PyValueError::new_err(format!(
            "x and y must have same length, got {} and {}",
            x_view.len(),
            y_view.len()
        )));
    }
    Ok(x_view.iter().zip(y_view.iter()).map(|(&xi, &yi)| (xi, yi)).collect())
}

type XY<'py> = (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>);

fn unpaired(py: Python<'_>, coords: Vec<(f64, f64)>) -> XY<'_> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = coords.into_iter().unzip();
    (
        PyArray1::from_owned_array(py, ndarray::Array1::from(xs)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(ys)),
    )
}

/// Project longitude/latitude arrays (degrees) to plane coordinates.
///
/// Args:
///     lon: 1D array of longitudes.
///     lat: 1D array of latitudes.
///     kind: Projection name (e.g. "orthographic", "natural_earth").
///     config: Optional JSON object of projection options
///         (scale, translate, center, rotate, clip_angle, ...).
///
/// Returns:
///     Tuple of (x, y) arrays.
#[pyfunction]
#[pyo3(signature = (lon, lat, kind="orthographic", config=None))]
pub fn project_points<'py>(
    py: Python<'py>,
    lon: PyReadonlyArray1<'py, f64>,
    lat: PyReadonlyArray1<'py, f64>,
    kind: &str,
    config: Option<&str>,
) -> PyResult<XY<'py>> {
    let projection = build_projection(kind, config)?;
    let mut coords = paired(&lon, &lat)?;
    let coords = py.allow_threads(move || {
        projection.project_batch(&mut coords);
        coords
    });
    Ok(unpaired(py, coords))
}

/// Map plane coordinates back to longitude/latitude degrees. Points outside
/// the projection's domain come back as NaN.
#[pyfunction]
#[pyo3(signature = (x, y, kind="orthographic", config=None))]
pub fn invert_points<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f64>,
    y: PyReadonlyArray1<'py, f64>,
    kind: &str,
    config: Option<&str>,
) -> PyResult<XY<'py>> {
    let projection = build_projection(kind, config)?;
    let mut coords = paired(&x, &y)?;
    let coords = py.allow_threads(move || {
        projection.invert_batch(&mut coords);
        coords
    });
    Ok(unpaired(py, coords))
}

/// Ring of a circle on the sphere as an (n, 2) array of [lon, lat] degrees.
///
/// Args:
///     center: (lon, lat) of the circle center in degrees.
///     radius: Angular radius in degrees.
///     precision: Angular step between samples in degrees.
#[pyfunction]
#[pyo3(signature = (center=(0.0, 0.0), radius=90.0, precision=6.0))]
pub fn geo_circle<'py>(
    py: Python<'py>,
    center: (f64, f64),
    radius: f64,
    precision: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let geometry = CircleGenerator::fixed(
        GeoPoint::from_degrees(center.0, center.1),
        Angle::Degrees(radius),
        Angle::Degrees(precision),
    );
    let ring = match geometry {
        Geometry::Polygon { mut coordinates } => coordinates.pop().unwrap_or_default(),
        _ => Vec::new(),
    };
    let rows = ring.len();
    let flat: Vec<f64> = ring.into_iter().flatten().collect();
    let array = ndarray::Array2::from_shape_vec((rows, 2), flat).map_err(value_error)?;
    Ok(PyArray2::from_owned_array(py, array))
}

/// Project an (n, 2) array of [lon, lat] degrees.
#[pyfunction]
#[pyo3(signature = (points, kind="orthographic", config=None))]
pub fn project_array<'py>(
    py: Python<'py>,
    points: PyReadonlyArray2<'py, f64>,
    kind: &str,
    config: Option<&str>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let projection = build_projection(kind, config)?;
    let result = projection.project_array(points.as_array()).map_err(value_error)?;
    Ok(PyArray2::from_owned_array(py, result))
}
