use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Immutable field: `{0}` is fixed on this projection and cannot be modified")]
    Immutable(&'static str),

    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    #[error("Invalid shape: {0}")]
    Shape(String),
}
