//! The configurable projection: rotation, clipping, projector, resampling and
//! planar transform composed behind one point API and one stream API.
//!
//! Configuration lives in plain settings. Everything computed from it (the
//! rotation, the planar affine and its inverse, the clip edge) is derived
//! lazily on first use after a change and cached until the next setter
//! call. Setters take `&mut self`, so a render pass borrowing the projection
//! can never observe a half-applied change.

mod batch;
mod config;
mod fit;
mod resample;
pub mod stages;

use std::sync::{Arc, OnceLock};

use crate::affine::Affine;
use crate::angle::{Angle, GeoPoint, PlanarPoint};
use crate::clip::{Clip, PreClip};
use crate::error::GeoError;
use crate::geometry::{stream_geometry, Geometry};
use crate::math::DEGREES;
use crate::path::{Path, PathSink};
use crate::proj::{
    Equirectangular, Gnomonic, NaturalEarth, Orthographic, ProjectionKind, Projector,
};
use crate::rotation::Rotation;
use crate::stream::Stream;

pub use config::ProjectionConfig;
pub use resample::Resample;
use stages::{PlaneRotation, PostRotate, ProjectTransform, RotateRadians};

pub const DEFAULT_SCALE: f64 = 150.0;
pub const DEFAULT_TRANSLATE: (f64, f64) = (480.0, 250.0);

/// Default resampling tolerance, in output units.
pub fn default_precision() -> f64 {
    0.5_f64.sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Settings {
    scale: f64,
    translate: (f64, f64),
    center: GeoPoint,
    rotate: [Angle; 3],
    clip_angle: Option<Angle>,
    angle_pre_clip: Angle,
    angle_post_clip: Angle,
    precision: f64,
    reflect_x: bool,
    reflect_y: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            translate: DEFAULT_TRANSLATE,
            center: GeoPoint::default(),
            rotate: [Angle::ZERO; 3],
            clip_angle: None,
            angle_pre_clip: Angle::ZERO,
            angle_post_clip: Angle::ZERO,
            precision: default_precision(),
            reflect_x: false,
            reflect_y: false,
        }
    }
}

/// State computed from [`Settings`].
#[derive(Clone, Debug)]
struct Derived {
    rotation: Rotation,
    transform: Affine,
    inverse: Option<Affine>,
    post: Option<PlaneRotation>,
    preclip: PreClip,
    delta2: f64,
}

/// A spherical-to-planar projection.
#[derive(Clone, Debug)]
pub struct Projection {
    kind: Option<ProjectionKind>,
    projector: Arc<dyn Projector>,
    settings: Settings,
    /// Center, rotation and clip angle are fixed.
    locked: bool,
    derived: OnceLock<Derived>,
}

/// The stream chain of one render pass.
pub type ProjectionStream<'a, S> = RotateRadians<Clip<Resample<'a, PostRotate<S>>>>;

impl Projection {
    /// Generic defaults around a custom projector: scale 150, translate
    /// (480, 250), antimeridian clipping only.
    pub fn new(projector: impl Projector + 'static) -> Self {
        Self {
            kind: None,
            projector: Arc::new(projector),
            settings: Settings::default(),
            locked: false,
            derived: OnceLock::new(),
        }
    }

    pub fn orthographic() -> Self {
        let mut p = Self::new(Orthographic);
        p.kind = Some(ProjectionKind::Orthographic);
        p.settings.scale = Orthographic::DEFAULT_SCALE;
        p.settings.clip_angle = Some(Angle::Degrees(Orthographic::DEFAULT_CLIP_ANGLE_DEG));
        p
    }

    pub fn natural_earth() -> Self {
        let mut p = Self::new(NaturalEarth);
        p.kind = Some(ProjectionKind::NaturalEarth);
        p.settings.scale = NaturalEarth::DEFAULT_SCALE;
        p
    }

    pub fn gnomonic() -> Self {
        let mut p = Self::new(Gnomonic);
        p.kind = Some(ProjectionKind::Gnomonic);
        p.settings.scale = Gnomonic::DEFAULT_SCALE;
        p.settings.clip_angle = Some(Angle::Degrees(Gnomonic::DEFAULT_CLIP_ANGLE_DEG));
        p
    }

    pub fn equirectangular() -> Self {
        let mut p = Self::new(Equirectangular);
        p.kind = Some(ProjectionKind::Equirectangular);
        p.settings.scale = Equirectangular::DEFAULT_SCALE;
        p
    }

    /// Degrees straight through to plane units: `project(lon, lat)` returns
    /// `(lon, lat)`. Center, rotation and clip angle cannot be changed.
    pub fn identity() -> Self {
        let mut p = Self::new(Equirectangular);
        p.kind = Some(ProjectionKind::Identity);
        p.settings.scale = DEGREES;
        p.settings.translate = (0.0, 0.0);
        p.settings.precision = 0.0;
        p.settings.reflect_y = true;
        p.locked = true;
        p
    }

    pub fn from_kind(kind: ProjectionKind) -> Self {
        match kind {
            ProjectionKind::Orthographic => Self::orthographic(),
            ProjectionKind::NaturalEarth => Self::natural_earth(),
            ProjectionKind::Gnomonic => Self::gnomonic(),
            ProjectionKind::Equirectangular => Self::equirectangular(),
            ProjectionKind::Identity => Self::identity(),
        }
    }

    pub fn kind(&self) -> Option<ProjectionKind> {
        self.kind
    }

    pub fn projector(&self) -> &dyn Projector {
        self.projector.as_ref()
    }

    pub fn scale(&self) -> f64 {
        self.settings.scale
    }

    pub fn translate(&self) -> (f64, f64) {
        self.settings.translate
    }

    pub fn center(&self) -> GeoPoint {
        self.settings.center
    }

    pub fn rotate(&self) -> [Angle; 3] {
        self.settings.rotate
    }

    pub fn clip_angle(&self) -> Option<Angle> {
        self.settings.clip_angle
    }

    pub fn angle_pre_clip(&self) -> Angle {
        self.settings.angle_pre_clip
    }

    pub fn angle_post_clip(&self) -> Angle {
        self.settings.angle_post_clip
    }

    pub fn precision(&self) -> f64 {
        self.settings.precision
    }

    pub fn reflect_x(&self) -> bool {
        self.settings.reflect_x
    }

    pub fn reflect_y(&self) -> bool {
        self.settings.reflect_y
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<&mut Self, GeoError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeoError::InvalidParameter(format!(
                "scale must be positive and finite, got {scale}"
            )));
        }
        self.settings.scale = scale;
        Ok(self.invalidate())
    }

    pub fn set_translate(&mut self, x: f64, y: f64) -> Result<&mut Self, GeoError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeoError::InvalidParameter(format!(
                "translate must be finite, got ({x}, {y})"
            )));
        }
        self.settings.translate = (x, y);
        Ok(self.invalidate())
    }

    pub fn set_center(&mut self, center: GeoPoint) -> Result<&mut Self, GeoError> {
        self.check_unlocked("center")?;
        if !center.lon.is_finite() || !center.lat.is_finite() {
            return Err(GeoError::InvalidParameter("center must be finite".into()));
        }
        self.settings.center = GeoPoint::new(center.lon.wrap_turn(), center.lat.wrap_turn());
        Ok(self.invalidate())
    }

    /// Sphere rotation (Δλ, Δφ, Δγ), each reduced modulo a full turn.
    pub fn set_rotate(&mut self, rotate: [Angle; 3]) -> Result<&mut Self, GeoError> {
        self.check_unlocked("rotate")?;
        if rotate.iter().any(|a| !a.is_finite()) {
            return Err(GeoError::InvalidParameter("rotate must be finite".into()));
        }
        self.settings.rotate = rotate.map(Angle::wrap_turn);
        Ok(self.invalidate())
    }

    /// Small-circle clip radius around the native pole. `None` or zero
    /// switches back to cutting along the antimeridian only.
    pub fn set_clip_angle(&mut self, angle: Option<Angle>) -> Result<&mut Self, GeoError> {
        self.check_unlocked("clip_angle")?;
        let angle = match angle {
            Some(a) if !a.is_finite() || a.deg() < 0.0 || a.deg() > 180.0 => {
                return Err(GeoError::InvalidParameter(format!(
                    "clip angle must lie in [0°, 180°], got {}°",
                    a.deg()
                )));
            }
            Some(a) if a.deg() == 0.0 => None,
            other => other,
        };
        self.settings.clip_angle = angle;
        Ok(self.invalidate())
    }

    /// In-plane rotation applied with scale and translate, before clipping.
    pub fn set_angle_pre_clip(&mut self, angle: Angle) -> Result<&mut Self, GeoError> {
        self.settings.angle_pre_clip = Self::checked_turn("angle_pre_clip", angle)?;
        Ok(self.invalidate())
    }

    /// In-plane rotation about `translate`, applied after clipping and
    /// resampling.
    pub fn set_angle_post_clip(&mut self, angle: Angle) -> Result<&mut Self, GeoError> {
        self.settings.angle_post_clip = Self::checked_turn("angle_post_clip", angle)?;
        Ok(self.invalidate())
    }

    /// Resampling tolerance in output units; zero disables resampling.
    pub fn set_precision(&mut self, precision: f64) -> Result<&mut Self, GeoError> {
        if !precision.is_finite() || precision < 0.0 {
            return Err(GeoError::InvalidParameter(format!(
                "precision must be non-negative and finite, got {precision}"
            )));
        }
        self.settings.precision = precision;
        Ok(self.invalidate())
    }

    pub fn set_reflect_x(&mut self, reflect: bool) -> &mut Self {
        self.settings.reflect_x = reflect;
        self.invalidate()
    }

    pub fn set_reflect_y(&mut self, reflect: bool) -> &mut Self {
        self.settings.reflect_y = reflect;
        self.invalidate()
    }

    fn checked_turn(name: &str, angle: Angle) -> Result<Angle, GeoError> {
        if !angle.is_finite() {
            return Err(GeoError::InvalidParameter(format!("{name} must be finite")));
        }
        Ok(angle.wrap_turn())
    }

    fn check_unlocked(&self, field: &'static str) -> Result<(), GeoError> {
        if self.locked {
            return Err(GeoError::Immutable(field));
        }
        Ok(())
    }

    fn invalidate(&mut self) -> &mut Self {
        self.derived.take();
        self
    }

    fn derived(&self) -> &Derived {
        self.derived.get_or_init(|| self.rebuild())
    }

    fn rebuild(&self) -> Derived {
        let s = &self.settings;
        let sx = if s.reflect_x { -1.0 } else { 1.0 };
        let sy = if s.reflect_y { -1.0 } else { 1.0 };
        let alpha = s.angle_pre_clip.rad();

        // Shift so that the projected center lands on `translate`.
        let (lambda, phi) = s.center.radians();
        let (px, py) = self.projector.project(lambda, phi);
        let (cx, cy) =
            Affine::scale_translate_rotate(s.scale, 0.0, 0.0, sx, sy, alpha).forward(px, py);
        if !cx.is_finite() || !cy.is_finite() {
            tracing::warn!(center = ?s.center, "center does not project to a finite point");
        }
        let transform = Affine::scale_translate_rotate(
            s.scale,
            s.translate.0 - cx,
            s.translate.1 - cy,
            sx,
            sy,
            alpha,
        );
        let inverse = match transform.inverse() {
            Ok(inverse) => Some(inverse),
            Err(err) => {
                tracing::warn!(%err, "planar transform is not invertible");
                None
            }
        };

        let [dl, dp, dg] = s.rotate;
        let rotation = Rotation::new(dl.rad(), dp.rad(), dg.rad());
        let preclip = match s.clip_angle {
            Some(angle) => PreClip::circle(angle.rad()),
            None => PreClip::Antimeridian,
        };
        let post = PlaneRotation::new(s.angle_post_clip.rad(), s.translate);

        tracing::debug!(
            kind = ?self.kind,
            scale = s.scale,
            clip_angle = ?s.clip_angle,
            "rebuilt projection state"
        );

        Derived {
            rotation,
            transform,
            inverse,
            post,
            preclip,
            delta2: s.precision * s.precision,
        }
    }

    /// Project a location to the plane. No clipping is applied: hidden
    /// points still get coordinates.
    pub fn project(&self, point: GeoPoint) -> PlanarPoint {
        let (lambda, phi) = point.radians();
        self.project_radians(lambda, phi).into()
    }

    pub(crate) fn project_radians(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let d = self.derived();
        let (lambda, phi) = d.rotation.rotate(lambda, phi);
        let (x, y) = self.project_transform(d).apply(lambda, phi);
        match &d.post {
            Some(post) => post.apply(x, y),
            None => (x, y),
        }
    }

    /// Map a plane location back to the sphere, in degrees, or `None` when it
    /// lies outside the projection's domain.
    pub fn invert(&self, point: PlanarPoint) -> Option<GeoPoint> {
        let (lambda, phi) = self.invert_radians(point.x, point.y)?;
        Some(GeoPoint::from_degrees(lambda * DEGREES, phi * DEGREES))
    }

    pub(crate) fn invert_radians(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let d = self.derived();
        let (x, y) = match &d.post {
            Some(post) => post.invert(x, y),
            None => (x, y),
        };
        let (x, y) = d.inverse?.forward(x, y);
        let (lambda, phi) = self.projector.invert(x, y)?;
        let (lambda, phi) = d.rotation.invert(lambda, phi);
        (lambda.is_finite() && phi.is_finite()).then_some((lambda, phi))
    }

    fn project_transform<'a>(&'a self, d: &Derived) -> ProjectTransform<'a> {
        ProjectTransform {
            projector: self.projector.as_ref(),
            transform: d.transform,
        }
    }

    /// Build a fresh stream chain feeding `sink`. Points go in as
    /// (lon, lat) degrees; `sink` receives clipped, resampled plane points.
    pub fn stream<S: Stream>(&self, sink: S) -> ProjectionStream<'_, S> {
        let d = self.derived();
        let post = PostRotate::new(d.post, sink);
        let resample = Resample::new(self.project_transform(d), d.delta2, post);
        RotateRadians::new(d.rotation, d.preclip.clip(resample))
    }

    /// Render `geometry` into path commands.
    pub fn path(&self, geometry: &Geometry) -> Path {
        let mut sink = PathSink::new();
        stream_geometry(geometry, &mut self.stream(&mut sink));
        sink.finish()
    }

    /// Whether a location survives clipping.
    pub fn is_visible(&self, point: GeoPoint) -> bool {
        let d = self.derived();
        let (lambda, phi) = point.radians();
        let (lambda, phi) = d.rotation.rotate(lambda, phi);
        d.preclip.point_visible(lambda, phi)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::orthographic()
    }
}
