//! Error types shared by every bridge component.
//!
//! Caller mistakes fail fast with a typed error. "Not ready" conditions
//! (no map, no navigator, no waypoints) are a separate kind so callers can
//! tell them apart from bad input. Native failures carry the message the
//! native layer reported.

use thiserror::Error;

use crate::color::ColorError;
use crate::command::Arity;
use crate::options::ConfigValueError;

/// Stable error codes surfaced to the application layer
pub mod codes {
    pub const NO_MAP_ERROR_CODE: &str = "NO_MAP_ERROR_CODE";
    pub const NO_NAVIGATOR_ERROR_CODE: &str = "NO_NAVIGATOR_ERROR_CODE";
    pub const NO_WAYPOINTS_GUIDANCE_ERROR_CODE: &str = "NO_WAYPOINTS_GUIDANCE_ERROR_CODE";
    pub const VIEW_NOT_FOUND_ERROR_CODE: &str = "VIEW_NOT_FOUND_ERROR_CODE";
    pub const FAILED_TO_CREATE_MAP_OBJECT_ERROR_CODE: &str = "FAILED_TO_CREATE_MAP_OBJECT_ERROR_CODE";
    pub const INVALID_ARGUMENT_ERROR_CODE: &str = "INVALID_ARGUMENT_ERROR_CODE";
    pub const NATIVE_ERROR_CODE: &str = "NATIVE_ERROR_CODE";
}

/// A precondition on live native state did not hold
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReady {
    #[error("the map is not ready yet")]
    NoMap,
    #[error("the navigator has not been initialized")]
    NoNavigator,
    #[error("guidance requires at least one destination")]
    NoWaypoints,
}

/// Failure reported by the native SDK facade
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    /// Place id rejected by the native waypoint builder
    #[error("unsupported place id: {0}")]
    UnsupportedPlaceId(String),
    /// The native call completed with an error
    #[error("native call failed: {0}")]
    Rejected(String),
    /// A native object the call depends on no longer exists
    #[error("native object unavailable: {0}")]
    Unavailable(String),
    /// Failure crossing the language boundary
    #[error("JNI error: {0}")]
    Jni(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigValueError),

    #[error("invalid color for `{field}`: {value:?}")]
    InvalidColor {
        field: &'static str,
        value: String,
        #[source]
        source: ColorError,
    },

    #[error("{object} requires `{field}`")]
    MissingField {
        object: &'static str,
        field: &'static str,
    },

    #[error("{command} expects {expected} argument(s), got {actual}")]
    Arity {
        command: &'static str,
        expected: Arity,
        actual: usize,
    },

    #[error("{command}: argument {index} must be {expected}")]
    ArgumentType {
        command: &'static str,
        index: usize,
        expected: &'static str,
    },

    #[error(transparent)]
    NotReady(#[from] NotReady),

    #[error("no view registered for {0}")]
    ViewNotFound(String),

    #[error("failed to create {kind}: {source}")]
    OverlayCreation {
        kind: &'static str,
        #[source]
        source: NativeError,
    },

    #[error(transparent)]
    Native(#[from] NativeError),
}

impl BridgeError {
    /// Error code reported to the application layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_)
            | Self::InvalidColor { .. }
            | Self::MissingField { .. }
            | Self::Arity { .. }
            | Self::ArgumentType { .. } => codes::INVALID_ARGUMENT_ERROR_CODE,
            Self::NotReady(NotReady::NoMap) => codes::NO_MAP_ERROR_CODE,
            Self::NotReady(NotReady::NoNavigator) => codes::NO_NAVIGATOR_ERROR_CODE,
            Self::NotReady(NotReady::NoWaypoints) => codes::NO_WAYPOINTS_GUIDANCE_ERROR_CODE,
            Self::ViewNotFound(_) => codes::VIEW_NOT_FOUND_ERROR_CODE,
            Self::OverlayCreation { .. } => codes::FAILED_TO_CREATE_MAP_OBJECT_ERROR_CODE,
            Self::Native(_) => codes::NATIVE_ERROR_CODE,
        }
    }

    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }

    pub(crate) fn invalid_color(field: &'static str, value: &str, source: ColorError) -> Self {
        Self::InvalidColor {
            field,
            value: value.to_owned(),
            source,
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_is_distinct_kind() {
        let err: BridgeError = NotReady::NoWaypoints.into();
        assert!(err.is_not_ready());
        assert_eq!(err.code(), codes::NO_WAYPOINTS_GUIDANCE_ERROR_CODE);

        let err = BridgeError::MissingField {
            object: "polyline",
            field: "points",
        };
        assert!(!err.is_not_ready());
        assert_eq!(err.code(), codes::INVALID_ARGUMENT_ERROR_CODE);
    }

    #[test]
    fn test_messages() {
        let err = BridgeError::invalid_color("fillColor", "#12", ColorError::UnsupportedLength(2));
        assert_eq!(err.to_string(), "invalid color for `fillColor`: \"#12\"");

        let err = BridgeError::Arity {
            command: "setZoomLevel",
            expected: Arity::exactly(1),
            actual: 0,
        };
        assert_eq!(err.to_string(), "setZoomLevel expects 1 argument(s), got 0");
    }
}
