//! Serializable projection options.

use serde::{Deserialize, Serialize};

use crate::angle::{Angle, GeoPoint};
use crate::error::GeoError;
use crate::proj::ProjectionKind;

use super::Projection;

/// Named projection options. Every field is optional; a missing field keeps
/// the default of the chosen projection family.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Projection family (orthographic when missing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProjectionKind>,
    /// Plane units per radian.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
    /// Sphere rotation (λ, φ, γ).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<[Angle; 3]>,
    /// Small-circle clip radius. Zero switches the clip off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_angle: Option<Angle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_pre_clip: Option<Angle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_post_clip: Option<Angle>,
    /// Resampling tolerance in plane units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflect_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflect_y: Option<bool>,
}

impl Projection {
    /// Build a projection of `config.kind` and apply every option that is set.
    pub fn from_config(config: &ProjectionConfig) -> Result<Projection, GeoError> {
        let mut p = Projection::from_kind(config.kind.unwrap_or_default());
        if let Some(scale) = config.scale {
            p.set_scale(scale)?;
        }
        if let Some([x, y]) = config.translate {
            p.set_translate(x, y)?;
        }
        if let Some(center) = config.center {
            p.set_center(center)?;
        }
        if let Some(rotate) = config.rotate {
            p.set_rotate(rotate)?;
        }
        if let Some(angle) = config.clip_angle {
            p.set_clip_angle(Some(angle))?;
        }
        if let Some(angle) = config.angle_pre_clip {
            p.set_angle_pre_clip(angle)?;
        }
        if let Some(angle) = config.angle_post_clip {
            p.set_angle_post_clip(angle)?;
        }
        if let Some(precision) = config.precision {
            p.set_precision(precision)?;
        }
        if let Some(reflect) = config.reflect_x {
            p.set_reflect_x(reflect);
        }
        if let Some(reflect) = config.reflect_y {
            p.set_reflect_y(reflect);
        }
        tracing::debug!(kind = ?p.kind(), "built projection from config");
        Ok(p)
    }

    /// Snapshot of the current options. Fields a locked projection fixes are
    /// left out; an unset clip angle is written as zero.
    pub fn config(&self) -> ProjectionConfig {
        let s = &self.settings;
        let (center, rotate, clip_angle) = if self.locked {
            (None, None, None)
        } else {
            (
                Some(s.center),
                Some(s.rotate),
                Some(s.clip_angle.unwrap_or(Angle::ZERO)),
            )
        };
        ProjectionConfig {
            kind: self.kind,
            scale: Some(s.scale),
            translate: Some([s.translate.0, s.translate.1]),
            center,
            rotate,
            clip_angle,
            angle_pre_clip: Some(s.angle_pre_clip),
            angle_post_clip: Some(s.angle_post_clip),
            precision: Some(s.precision),
            reflect_x: Some(s.reflect_x),
            reflect_y: Some(s.reflect_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::NaturalEarth;

    #[test]
    fn test_empty_config_is_family_default() {
        let config: ProjectionConfig = serde_json::from_str(r#"{"kind":"natural_earth"}"#).unwrap();
        let p = Projection::from_config(&config).unwrap();
        assert_eq!(p.kind(), Some(ProjectionKind::NaturalEarth));
        assert_eq!(p.scale(), NaturalEarth::DEFAULT_SCALE);
        assert_eq!(p.clip_angle(), None);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "scale": 300.0,
            "rotate": [{"degrees": -10.0}, {"degrees": 0.0}, {"radians": 0.5}],
            "clip_angle": {"degrees": 45.0}
        }"#;
        let config: ProjectionConfig = serde_json::from_str(json).unwrap();
        let p = Projection::from_config(&config).unwrap();
        assert_eq!(p.kind(), Some(ProjectionKind::Orthographic));
        assert_eq!(p.scale(), 300.0);
        assert_eq!(p.rotate()[2], Angle::Radians(0.5));
        assert_eq!(p.clip_angle(), Some(Angle::Degrees(45.0)));
    }

    #[test]
    fn test_snapshot_restores() {
        let mut p = Projection::orthographic();
        p.set_scale(210.0)
            .unwrap()
            .set_center(GeoPoint::from_degrees(5.0, 6.0))
            .unwrap()
            .set_clip_angle(None)
            .unwrap()
            .set_reflect_x(true);
        let q = Projection::from_config(&p.config()).unwrap();
        assert_eq!(q.config(), p.config());
        assert_eq!(q.clip_angle(), None);
        let point = GeoPoint::from_degrees(30.0, 20.0);
        assert_eq!(p.project(point), q.project(point));
    }

    #[test]
    fn test_invalid_option_is_reported() {
        let config = ProjectionConfig {
            scale: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            Projection::from_config(&config),
            Err(GeoError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_identity_rejects_locked_fields() {
        let config = ProjectionConfig {
            kind: Some(ProjectionKind::Identity),
            center: Some(GeoPoint::from_degrees(1.0, 2.0)),
            ..Default::default()
        };
        assert_eq!(
            Projection::from_config(&config).unwrap_err(),
            GeoError::Immutable("center")
        );
        let snapshot = Projection::identity().config();
        assert!(snapshot.center.is_none() && snapshot.rotate.is_none());
        assert!(Projection::from_config(&snapshot).is_ok());
    }
}
