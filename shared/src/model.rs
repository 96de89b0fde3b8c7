//! Plain data types exchanged with the application layer and the native
//! facade. Field names follow the camelCase keys the application layer
//! already uses. Optional native values are omitted when unavailable, never
//! zero-filled.

use serde::{Deserialize, Serialize};

use crate::error::BridgeResult;
use crate::options::{self, OptionMap};
use crate::routing::Waypoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parse a `{lat, lng}` map, `None` if either coordinate is missing.
    pub fn from_options(map: &OptionMap) -> BridgeResult<Option<Self>> {
        Ok(options::get_lat_lng(map)?)
    }
}

/// Camera placement. `target` is optional so that zoom/tilt-only updates
/// keep the current center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraPosition {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<LatLng>,
    pub zoom: f64,
    pub tilt: f64,
    pub bearing: f64,
}

impl CameraPosition {
    pub fn from_options(map: &OptionMap) -> BridgeResult<Self> {
        let target = match options::get_map("target", map)? {
            Some(target) => LatLng::from_options(target)?,
            None => None,
        };
        Ok(Self {
            target,
            zoom: options::get_double("zoom", map, 0.0)?,
            tilt: options::get_double("tilt", map, 0.0)?,
            bearing: options::get_double("bearing", map, 0.0)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

/// Device location as reported by the navigator's location listener
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    /// Fix time in milliseconds since the epoch
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bearing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vertical_accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAndDistance {
    pub seconds: i64,
    pub meters: i64,
    #[serde(default)]
    pub delay_severity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadStretch {
    pub length_meters: i32,
    pub offset_meters: i32,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficData {
    #[serde(default)]
    pub road_stretch_rendering_data_list: Vec<RoadStretch>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    pub destination_lat_lng: LatLng,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination_waypoint: Option<Waypoint>,
    #[serde(default)]
    pub segment_lat_lng_list: Vec<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub navigation_traffic_data: Option<TrafficData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    pub is_compass_enabled: bool,
    pub is_map_toolbar_enabled: bool,
    pub is_indoor_level_picker_enabled: bool,
    pub is_rotate_gestures_enabled: bool,
    pub is_scroll_gestures_enabled: bool,
    pub is_scroll_gestures_enabled_during_rotate_or_zoom: bool,
    pub is_tilt_gestures_enabled: bool,
    pub is_zoom_controls_enabled: bool,
    pub is_zoom_gestures_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneDirection {
    pub lane_shape: i32,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    pub lane_directions: Vec<LaneDirection>,
}

/// One maneuver of the active route
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    pub distance_from_prev_step_meters: i32,
    pub time_from_prev_step_seconds: i32,
    pub driving_side: i32,
    pub step_number: i32,
    pub maneuver: i32,
    #[serde(default)]
    pub roundabout_turn_number: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exit_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub full_road_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instruction: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub lanes: Vec<Lane>,
}

/// Turn-by-turn snapshot forwarded while guidance runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavInfo {
    pub nav_state: i32,
    pub route_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance_to_current_step_meters: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance_to_final_destination_meters: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance_to_next_destination_meters: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time_to_current_step_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time_to_final_destination_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time_to_next_destination_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_step: Option<StepInfo>,
    #[serde(default)]
    pub remaining_steps: Vec<StepInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalEvent {
    pub waypoint: Waypoint,
    pub is_final_destination: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camera_from_options() {
        let map = match json!({ "target": { "lat": 10.0, "lng": 20.0 }, "zoom": 12 }) {
            serde_json::Value::Object(m) => m,
            _ => unreachable!(),
        };
        let camera = CameraPosition::from_options(&map).unwrap();
        assert_eq!(camera.target, Some(LatLng::new(10.0, 20.0)));
        assert_eq!(camera.zoom, 12.0);
        assert_eq!(camera.tilt, 0.0);
    }

    #[test]
    fn test_location_omits_missing_fields() {
        let location = Location {
            lat: 1.0,
            lng: 2.0,
            time: 3.0,
            speed: 0.0,
            provider: Some("fused".into()),
            bearing: None,
            accuracy: Some(4.5),
            altitude: None,
            vertical_accuracy: None,
        };
        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["accuracy"], json!(4.5));
        assert!(value.get("bearing").is_none());
        assert!(value.get("altitude").is_none());
        assert!(value.get("verticalAccuracy").is_none());
    }

    #[test]
    fn test_nav_info_keeps_optional_distances_out() {
        let info = NavInfo {
            nav_state: 1,
            route_changed: false,
            time_to_final_destination_seconds: Some(600),
            ..NavInfo::default()
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["navState"], json!(1));
        assert_eq!(value["timeToFinalDestinationSeconds"], json!(600));
        assert!(value.get("distanceToCurrentStepMeters").is_none());
        assert!(value.get("currentStep").is_none());
        assert_eq!(value["remainingSteps"], json!([]));
    }

    #[test]
    fn test_nav_info_from_host_json() {
        let info: NavInfo = serde_json::from_value(json!({
            "navState": 2,
            "routeChanged": true,
            "distanceToCurrentStepMeters": 120,
            "currentStep": {
                "distanceFromPrevStepMeters": 0,
                "timeFromPrevStepSeconds": 0,
                "drivingSide": 1,
                "stepNumber": 3,
                "maneuver": 14,
                "fullRoadName": "Main St"
            }
        }))
        .unwrap();
        assert_eq!(info.distance_to_current_step_meters, Some(120));
        assert_eq!(info.current_step.unwrap().full_road_name.as_deref(), Some("Main St"));
        assert!(info.remaining_steps.is_empty());
    }
}
