use crate::error::GeoError;

/// A 2D affine transform from the unscaled projection plane to output units.
///
///   x' = a * x + b * y + c
///   y' = d * x + e * y + f
///
/// Output follows screen convention: y grows downward, so a north-up
/// projection has a negative `e`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Scale by `k`, mirror by the signs `sx`/`sy`, rotate by `alpha` radians
    /// (counter-clockwise as drawn), flip y to point down, then move the
    /// origin to (`dx`, `dy`).
    pub fn scale_translate_rotate(k: f64, dx: f64, dy: f64, sx: f64, sy: f64, alpha: f64) -> Self {
        let (sin_alpha, cos_alpha) = if alpha == 0.0 {
            (0.0, 1.0)
        } else {
            alpha.sin_cos()
        };
        let a = cos_alpha * k;
        let b = sin_alpha * k;
        Self {
            a: a * sx,
            b: -b * sy,
            c: dx,
            d: -b * sx,
            e: -a * sy,
            f: dy,
        }
    }

    /// Apply the forward transform: plane -> output.
    pub fn forward(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    /// Compute the inverse affine transform.
    pub fn inverse(&self) -> Result<Affine, GeoError> {
        let det = self.a * self.e - self.b * self.d;
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return Err(GeoError::InvalidParameter(
                "singular planar transform (determinant is zero)".into(),
            ));
        }
        let inv_det = 1.0 / det;
        Ok(Affine {
            a: self.e * inv_det,
            b: -self.b * inv_det,
            c: (self.b * self.f - self.e * self.c) * inv_det,
            d: -self.d * inv_det,
            e: self.a * inv_det,
            f: (self.d * self.c - self.a * self.f) * inv_det,
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}
