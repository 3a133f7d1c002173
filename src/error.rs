//! Crate error type

use core::fmt;

use crate::sim::ObjectKind;

/// Errors surfaced while configuring or loading a session.
#[derive(Debug)]
pub enum Error {
    /// A tuning value is out of range or inconsistent with another one.
    InvalidTuning { field: &'static str, reason: String },
    /// A spawn pool has no entries to choose from.
    EmptyPool { kind: ObjectKind },
    /// A spawn pool entry carries a zero, negative or non-finite weight.
    NonPositiveWeight { kind: ObjectKind, index: usize, weight: f32 },
    /// A good entry that does not award points, or a hazard that does not cost any.
    WrongValueSign { kind: ObjectKind, index: usize, value: i32 },
    /// The asset manifest does not have the expected shape.
    Manifest(String),
    /// A texture could not be fetched or decoded.
    AssetLoad { path: String, reason: String },
    /// Tuning, settings or manifest JSON failed to parse.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value `{field}`: {reason}")
            }
            Self::EmptyPool { kind } => write!(f, "spawn pool for {kind:?} objects is empty"),
            Self::NonPositiveWeight {
                kind,
                index,
                weight,
            } => write!(
                f,
                "spawn pool entry {index} for {kind:?} objects has non-positive weight {weight}"
            ),
            Self::WrongValueSign { kind, index, value } => match kind {
                ObjectKind::Good => write!(
                    f,
                    "good pool entry {index} must award positive points, got {value}"
                ),
                ObjectKind::Hazard => write!(
                    f,
                    "hazard pool entry {index} must carry negative damage, got {value}"
                ),
            },
            Self::Manifest(reason) => write!(f, "malformed asset manifest: {reason}"),
            Self::AssetLoad { path, reason } => write!(f, "failed to load `{path}`: {reason}"),
            Self::Json(err) => write!(f, "json: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
