//! # Routing Requests
//!
//! Parsing of everything that feeds a route computation: waypoints,
//! routing and display options, simulation and speed alert settings, plus
//! the status codes the navigator reports back.
//!
//! ## Waypoint resolution
//!
//! ```text
//! placeId non-empty ──► place-id waypoint (position ignored)
//!        │
//!        ▼ (empty / absent)
//! position.lat + position.lng ──► coordinate waypoint
//!        │
//!        ▼ (either missing)
//! WaypointError::MissingLocation
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::AlternateRoutesStrategy;
use crate::error::{BridgeResult, NativeError};
use crate::model::LatLng;
use crate::options::{self, ConfigValueError, OptionMap};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaypointError {
    #[error("waypoint needs a place id or both lat and lng")]
    MissingLocation,
    #[error("preferred heading has to be between 0 and 360, got {0}")]
    HeadingOutOfRange(f64),
    #[error(transparent)]
    Config(#[from] ConfigValueError),
    #[error(transparent)]
    Rejected(#[from] NativeError),
}

/// A destination as handed to the navigator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preferred_heading: Option<i32>,
    #[serde(default)]
    pub vehicle_stopover: bool,
    #[serde(default)]
    pub prefer_same_side_of_road: bool,
}

impl Waypoint {
    pub fn from_options(map: &OptionMap) -> Result<Self, WaypointError> {
        let place_id = options::get_string("placeId", map)?.filter(|id| !id.is_empty());
        let position = match options::get_map("position", map)? {
            Some(position) => options::get_lat_lng(position)?,
            None => None,
        };

        let preferred_heading = if options::has("preferredHeading", map) {
            let heading = options::get_double("preferredHeading", map, 0.0)?;
            if !(0.0..360.0).contains(&heading) {
                return Err(WaypointError::HeadingOutOfRange(heading));
            }
            // In range, so the truncation cannot overflow
            Some(heading as i32)
        } else {
            None
        };

        let (place_id, position) = match (place_id, position) {
            (Some(id), _) => (Some(id), None),
            (None, Some(position)) => (None, Some(position)),
            (None, None) => return Err(WaypointError::MissingLocation),
        };

        Ok(Self {
            place_id,
            position,
            title: options::get_string("title", map)?,
            preferred_heading,
            vehicle_stopover: options::get_bool("vehicleStopover", map, false)?,
            prefer_same_side_of_road: options::get_bool("preferSameSideOfRoad", map, false)?,
        })
    }

    /// Label used in diagnostics
    pub fn describe(&self) -> String {
        match (&self.title, &self.place_id, &self.position) {
            (Some(title), _, _) => title.clone(),
            (None, Some(id), _) => id.clone(),
            (None, None, Some(p)) => format!("({}, {})", p.lat, p.lng),
            (None, None, None) => "<empty>".to_string(),
        }
    }
}

/// Route computation preferences. Only keys present in the request are set;
/// the rest keep the navigator's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_tolls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_highways: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_ferries: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_strategy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_routes_strategy: Option<AlternateRoutesStrategy>,
}

impl RoutingOptions {
    pub fn from_options(map: &OptionMap) -> BridgeResult<Self> {
        let flag = |key: &str, default: bool| -> BridgeResult<Option<bool>> {
            Ok(if options::has(key, map) {
                Some(options::get_bool(key, map, default)?)
            } else {
                None
            })
        };
        let int = |key: &str| -> BridgeResult<Option<i32>> {
            Ok(if options::has(key, map) {
                Some(options::get_int(key, map, 0)? as i32)
            } else {
                None
            })
        };

        Ok(Self {
            avoid_tolls: flag("avoidTolls", false)?,
            avoid_highways: flag("avoidHighways", false)?,
            avoid_ferries: flag("avoidFerries", true)?,
            travel_mode: int("travelMode")?,
            routing_strategy: int("routingStrategy")?,
            alternate_routes_strategy: int("alternateRoutesStrategy")?
                .map(|v| AlternateRoutesStrategy::from_js_value(v.into())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_destination_markers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_stop_signs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_traffic_lights: Option<bool>,
}

impl DisplayOptions {
    pub fn from_options(map: &OptionMap) -> BridgeResult<Self> {
        let flag = |key: &str| -> BridgeResult<Option<bool>> {
            Ok(if options::has(key, map) {
                Some(options::get_bool(key, map, true)?)
            } else {
                None
            })
        };

        Ok(Self {
            hide_destination_markers: flag("showDestinationMarkers")?.map(|show| !show),
            show_stop_signs: flag("showStopSigns")?,
            show_traffic_lights: flag("showTrafficLights")?,
        })
    }
}

/// Thresholds for speeding alerts. `-1` leaves a threshold at the native default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedAlertOptions {
    pub minor_speed_alert_percent_threshold: f64,
    pub major_speed_alert_percent_threshold: f64,
    pub severity_upgrade_duration_seconds: f64,
}

impl SpeedAlertOptions {
    pub fn from_options(map: &OptionMap) -> BridgeResult<Self> {
        Ok(Self {
            minor_speed_alert_percent_threshold: options::get_double("minorSpeedAlertPercentThreshold", map, -1.0)?,
            major_speed_alert_percent_threshold: options::get_double("majorSpeedAlertPercentThreshold", map, -1.0)?,
            severity_upgrade_duration_seconds: options::get_double("severityUpgradeDurationSeconds", map, -1.0)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOptions {
    pub speed_multiplier: f64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self { speed_multiplier: 1.0 }
    }
}

impl SimulationOptions {
    pub fn from_options(map: &OptionMap) -> BridgeResult<Self> {
        Ok(Self {
            speed_multiplier: options::get_double("speedMultiplier", map, 1.0)?,
        })
    }
}

/// Parameters of the native terms-of-service dialog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsDialogParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub show_only_disclaimer: bool,
}

impl TermsDialogParams {
    pub fn from_options(map: &OptionMap) -> BridgeResult<Self> {
        Ok(Self {
            company_name: options::get_string("companyName", map)?,
            title: options::get_string("title", map)?,
            show_only_disclaimer: options::get_bool("showOnlyDisclaimer", map, false)?,
        })
    }
}

/// Outcome of a route computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    Ok,
    NoRouteFound,
    NetworkError,
    QuotaCheckFailed,
    RouteCanceled,
    LocationDisabled,
    LocationUnknown,
    WaypointError,
    InvalidPlaceId,
    #[serde(other)]
    Unknown,
}

impl RouteStatus {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

/// Reasons the navigator could not be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum NavigatorErrorCode {
    NotAuthorized = 1,
    TermsNotAccepted = 2,
    NetworkError = 3,
    LocationPermissionMissing = 4,
}

impl NavigatorErrorCode {
    /// Unknown codes are reported as a missing location permission.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::NotAuthorized,
            2 => Self::TermsNotAccepted,
            3 => Self::NetworkError,
            _ => Self::LocationPermissionMissing,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NotAuthorized => {
                "Error loading Navigation API: Your API key is invalid or not authorized to use Navigation."
            }
            Self::TermsNotAccepted => {
                "Error loading Navigation API: User did not accept the Navigation Terms of Use."
            }
            Self::NetworkError => "Error loading Navigation API: Network error",
            Self::LocationPermissionMissing => {
                "Error loading Navigation API: Location permission is not granted"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn map(value: Value) -> OptionMap {
        match value {
            Value::Object(m) => m,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_place_id_wins_over_position() {
        let wp = Waypoint::from_options(&map(json!({
            "placeId": "ChIJ123",
            "position": { "lat": 1.0, "lng": 2.0 },
            "title": "Office"
        })))
        .unwrap();
        assert_eq!(wp.place_id.as_deref(), Some("ChIJ123"));
        assert_eq!(wp.position, None);
        assert_eq!(wp.title.as_deref(), Some("Office"));
    }

    #[test]
    fn test_empty_place_id_uses_position() {
        let wp = Waypoint::from_options(&map(json!({
            "placeId": "",
            "position": { "lat": 1.0, "lng": 2.0 }
        })))
        .unwrap();
        assert_eq!(wp.place_id, None);
        assert_eq!(wp.position, Some(LatLng::new(1.0, 2.0)));
    }

    #[test]
    fn test_missing_location_is_rejected() {
        let err = Waypoint::from_options(&map(json!({ "position": { "lat": 1.0 } }))).unwrap_err();
        assert_eq!(err, WaypointError::MissingLocation);
    }

    #[test]
    fn test_heading_range() {
        let ok = Waypoint::from_options(&map(json!({ "placeId": "a", "preferredHeading": 359 }))).unwrap();
        assert_eq!(ok.preferred_heading, Some(359));

        let err = Waypoint::from_options(&map(json!({ "placeId": "a", "preferredHeading": 360 }))).unwrap_err();
        assert_eq!(err, WaypointError::HeadingOutOfRange(360.0));
        let err = Waypoint::from_options(&map(json!({ "placeId": "a", "preferredHeading": -5 }))).unwrap_err();
        assert_eq!(err, WaypointError::HeadingOutOfRange(-5.0));
    }

    #[test]
    fn test_fractional_heading() {
        let err = Waypoint::from_options(&map(json!({ "placeId": "a", "preferredHeading": -0.5 }))).unwrap_err();
        assert_eq!(err, WaypointError::HeadingOutOfRange(-0.5));
        let ok = Waypoint::from_options(&map(json!({ "placeId": "a", "preferredHeading": 359.5 }))).unwrap();
        assert_eq!(ok.preferred_heading, Some(359));
    }

    #[test]
    fn test_routing_options_only_set_present_keys() {
        let options = RoutingOptions::from_options(&map(json!({
            "avoidTolls": true,
            "alternateRoutesStrategy": 2
        })))
        .unwrap();
        assert_eq!(options.avoid_tolls, Some(true));
        assert_eq!(options.avoid_ferries, None);
        assert_eq!(options.alternate_routes_strategy, Some(AlternateRoutesStrategy::ShowOne));
        let value = serde_json::to_value(&options).unwrap();
        assert!(value.get("avoidHighways").is_none());
    }

    #[test]
    fn test_display_options_invert_destination_markers() {
        let options = DisplayOptions::from_options(&map(json!({ "showDestinationMarkers": false }))).unwrap();
        assert_eq!(options.hide_destination_markers, Some(true));
        assert_eq!(options.show_stop_signs, None);
    }

    #[test]
    fn test_speed_alert_defaults() {
        let options = SpeedAlertOptions::from_options(&map(json!({ "minorSpeedAlertPercentThreshold": 5 }))).unwrap();
        assert_eq!(options.minor_speed_alert_percent_threshold, 5.0);
        assert_eq!(options.major_speed_alert_percent_threshold, -1.0);
    }

    #[test]
    fn test_route_status_from_host() {
        let status: RouteStatus = serde_json::from_value(json!("NO_ROUTE_FOUND")).unwrap();
        assert_eq!(status, RouteStatus::NoRouteFound);
        let status: RouteStatus = serde_json::from_value(json!("SOMETHING_NEW")).unwrap();
        assert_eq!(status, RouteStatus::Unknown);
    }

    #[test]
    fn test_navigator_error_codes() {
        assert_eq!(NavigatorErrorCode::from_code(2), NavigatorErrorCode::TermsNotAccepted);
        assert_eq!(NavigatorErrorCode::from_code(77), NavigatorErrorCode::LocationPermissionMissing);
        assert_eq!(NavigatorErrorCode::NetworkError.code(), 3);
    }
}
