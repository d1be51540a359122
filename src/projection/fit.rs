//! Fitting a projection's scale and translate to a target extent.

use crate::error::GeoError;
use crate::geometry::{stream_geometry, Geometry};
use crate::path::BoundsSink;

use super::{Projection, DEFAULT_SCALE};

impl Projection {
    /// Set scale and translate so `geometry`, as rendered, fills
    /// `extent = [[x0, y0], [x1, y1]]` and is centered in it.
    ///
    /// On error the previous scale and translate are kept.
    pub fn fit_extent(
        &mut self,
        extent: [[f64; 2]; 2],
        geometry: &Geometry,
    ) -> Result<&mut Self, GeoError> {
        let [[ex0, ey0], [ex1, ey1]] = extent;
        let w = ex1 - ex0;
        let h = ey1 - ey0;
        if !(w > 0.0 && h > 0.0) || !ex0.is_finite() || !ey0.is_finite() {
            return Err(GeoError::InvalidParameter(format!(
                "fit extent must have positive finite size, got {extent:?}"
            )));
        }

        let saved = (self.settings.scale, self.settings.translate);
        self.settings.scale = DEFAULT_SCALE;
        self.settings.translate = (0.0, 0.0);
        self.invalidate();

        let mut sink = BoundsSink::new();
        stream_geometry(geometry, &mut self.stream(&mut sink));

        let fitted = sink.bounds().and_then(|[[bx0, by0], [bx1, by1]]| {
            let k = (w / (bx1 - bx0)).min(h / (by1 - by0));
            let x = ex0 + (w - k * (bx1 + bx0)) / 2.0;
            let y = ey0 + (h - k * (by1 + by0)) / 2.0;
            (k.is_finite() && k > 0.0 && x.is_finite() && y.is_finite())
                .then_some((DEFAULT_SCALE * k, (x, y)))
        });

        let Some((scale, translate)) = fitted else {
            (self.settings.scale, self.settings.translate) = saved;
            self.invalidate();
            return Err(GeoError::InvalidParameter(
                "geometry has no visible extent to fit".into(),
            ));
        };

        tracing::debug!(scale, ?translate, "fitted projection to extent");
        self.settings.scale = scale;
        self.settings.translate = translate;
        Ok(self.invalidate())
    }

    /// [`fit_extent`](Self::fit_extent) with the extent's corner at the origin.
    pub fn fit_size(&mut self, size: [f64; 2], geometry: &Geometry) -> Result<&mut Self, GeoError> {
        self.fit_extent([[0.0, 0.0], size], geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bounds_of(p: &Projection, geometry: &Geometry) -> [[f64; 2]; 2] {
        let mut sink = BoundsSink::new();
        stream_geometry(geometry, &mut p.stream(&mut sink));
        sink.bounds().unwrap()
    }

    #[test]
    fn test_fit_size_sphere() {
        let mut p = Projection::orthographic();
        p.fit_size([960.0, 500.0], &Geometry::Sphere).unwrap();
        // The globe's outline is a disk: height-limited, centered.
        let [[x0, y0], [x1, y1]] = bounds_of(&p, &Geometry::Sphere);
        assert_relative_eq!(y0, 0.0, epsilon = 1e-3);
        assert_relative_eq!(y1, 500.0, epsilon = 1e-3);
        assert_relative_eq!((x0 + x1) / 2.0, 480.0, epsilon = 1e-3);
        assert_relative_eq!(p.scale(), 250.0, epsilon = 1e-2);
    }

    #[test]
    fn test_fit_extent_offset() {
        let mut p = Projection::equirectangular();
        let square = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [0.0, 10.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.0, 0.0],
        ]]);
        p.fit_extent([[100.0, 100.0], [200.0, 300.0]], &square).unwrap();
        let [[x0, y0], [x1, y1]] = bounds_of(&p, &square);
        // Width-limited: fills 100..200 horizontally, centered vertically.
        assert_relative_eq!(x0, 100.0, epsilon = 1e-6);
        assert_relative_eq!(x1, 200.0, epsilon = 1e-6);
        assert_relative_eq!((y0 + y1) / 2.0, 200.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fit_rejects_empty_geometry() {
        let mut p = Projection::orthographic();
        let hidden = Geometry::line_string(vec![[170.0, 0.0], [175.0, 0.0]]);
        let before = (p.scale(), p.translate());
        assert!(p.fit_size([100.0, 100.0], &hidden).is_err());
        assert_eq!((p.scale(), p.translate()), before);
        assert!(p.fit_size([0.0, 100.0], &Geometry::Sphere).is_err());
    }
}
