pub mod azimuthal;
pub mod equirectangular;
pub mod gnomonic;
pub mod natural_earth;
pub mod orthographic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

pub use equirectangular::Equirectangular;
pub use gnomonic::Gnomonic;
pub use natural_earth::NaturalEarth;
pub use orthographic::Orthographic;

/// Raw projection math between the sphere and the unscaled plane.
///
/// Both directions work in radians on points already rotated so that the
/// projection's native origin sits at (0, 0). Rotation, scale, translation
/// and clipping are the caller's business.
pub trait Projector: fmt::Debug + Send + Sync {
    /// (λ, φ) -> (x, y), y pointing north.
    fn project(&self, lambda: f64, phi: f64) -> (f64, f64);

    /// (x, y) -> (λ, φ), or `None` outside the projection's valid domain.
    fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)>;
}

/// The projection families this crate ships.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    Orthographic,
    NaturalEarth,
    Gnomonic,
    Equirectangular,
    Identity,
}

impl ProjectionKind {
    /// Parse from a name, ignoring case and `-`/`_` separators.
    pub fn from_name(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "orthographic" => Some(Self::Orthographic),
            "naturalearth" | "naturalearth1" => Some(Self::NaturalEarth),
            "gnomonic" => Some(Self::Gnomonic),
            "equirectangular" | "platecarree" => Some(Self::Equirectangular),
            "identity" => Some(Self::Identity),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Orthographic => "orthographic",
            Self::NaturalEarth => "natural_earth",
            Self::Gnomonic => "gnomonic",
            Self::Equirectangular => "equirectangular",
            Self::Identity => "identity",
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| GeoError::UnknownProjection(s.to_string()))
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
