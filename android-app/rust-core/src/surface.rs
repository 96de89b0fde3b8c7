//! Map surfaces backed by a Kotlin map view facade.
//!
//! One facade per phone view, plus one for the in-car screen. Options
//! travel as the JSON form of the shared option types; native overlay ids
//! come back as strings.

use serde::Serialize;
use serde_json::{json, Value};

use navsdk_shared::enums::{CameraPerspective, ForceNightMode, MapType};
use navsdk_shared::model::{CameraPosition, Location, Padding, UiSettings};
use navsdk_shared::overlay::{
    CircleOptions, GroundOverlayOptions, MarkerOptions, OverlayKind, PolygonOptions, PolylineOptions,
};
use navsdk_shared::styling::StylingOptions;
use navsdk_shared::traits::{MapFlag, NativeResult, NavFlag};
use navsdk_shared::{MapSurface, MapViewType, NativeError, NavigationSurface};

use crate::facade::JavaFacade;

pub struct JniMapSurface {
    facade: JavaFacade,
    kind: MapViewType,
}

impl JniMapSurface {
    pub fn new(facade: JavaFacade, kind: MapViewType) -> Self {
        Self { facade, kind }
    }

    fn add<O: Serialize>(&self, method: &str, options: &O) -> NativeResult<String> {
        let args = to_args(options)?;
        self.facade.call_as(method, args)
    }
}

fn to_args<T: Serialize>(value: &T) -> NativeResult<Value> {
    serde_json::to_value(value).map_err(|e| NativeError::Rejected(format!("unserializable arguments: {}", e)))
}

impl MapSurface for JniMapSurface {
    fn create(&mut self, width: i32, height: i32) -> NativeResult<()> {
        self.facade.call_unit("create", json!({ "width": width, "height": height }))
    }

    fn destroy(&mut self) -> NativeResult<()> {
        self.facade.call_unit("destroy", Value::Null)
    }

    fn add_marker(&mut self, options: &MarkerOptions) -> NativeResult<String> {
        self.add("addMarker", options)
    }

    fn add_polyline(&mut self, options: &PolylineOptions) -> NativeResult<String> {
        self.add("addPolyline", options)
    }

    fn add_polygon(&mut self, options: &PolygonOptions) -> NativeResult<String> {
        self.add("addPolygon", options)
    }

    fn add_circle(&mut self, options: &CircleOptions) -> NativeResult<String> {
        self.add("addCircle", options)
    }

    fn add_ground_overlay(&mut self, options: &GroundOverlayOptions) -> NativeResult<String> {
        self.add("addGroundOverlay", options)
    }

    fn remove_overlay(&mut self, kind: OverlayKind, native_id: &str) -> NativeResult<()> {
        self.facade
            .call_unit("removeOverlay", json!({ "kind": kind, "nativeId": native_id }))
    }

    fn clear(&mut self) -> NativeResult<()> {
        self.facade.call_unit("clear", Value::Null)
    }

    fn move_camera(&mut self, camera: &CameraPosition) -> NativeResult<()> {
        self.facade.call_unit("moveCamera", to_args(camera)?)
    }

    fn animate_camera(&mut self, camera: &CameraPosition, duration_ms: i64) -> NativeResult<()> {
        self.facade
            .call_unit("animateCamera", json!({ "camera": to_args(camera)?, "durationMs": duration_ms }))
    }

    fn zoom_to(&mut self, level: f64) -> NativeResult<()> {
        self.facade.call_unit("zoomTo", json!({ "level": level }))
    }

    fn follow_my_location(&mut self, perspective: CameraPerspective) -> NativeResult<()> {
        self.facade
            .call_unit("followMyLocation", json!({ "perspective": perspective }))
    }

    fn set_map_flag(&mut self, flag: MapFlag, enabled: bool) -> NativeResult<()> {
        self.facade
            .call_unit("setMapFlag", json!({ "flag": flag, "enabled": enabled }))
    }

    fn set_map_type(&mut self, map_type: MapType) -> NativeResult<()> {
        self.facade.call_unit("setMapType", json!({ "mapType": map_type }))
    }

    fn set_map_style(&mut self, style_json: &str) -> NativeResult<()> {
        self.facade.call_unit("setMapStyle", json!({ "style": style_json }))
    }

    fn set_padding(&mut self, padding: Padding) -> NativeResult<()> {
        self.facade.call_unit("setPadding", to_args(&padding)?)
    }

    fn set_min_zoom(&mut self, level: f64) -> NativeResult<()> {
        self.facade.call_unit("setMinZoom", json!({ "level": level }))
    }

    fn set_max_zoom(&mut self, level: f64) -> NativeResult<()> {
        self.facade.call_unit("setMaxZoom", json!({ "level": level }))
    }

    fn reset_min_max_zoom(&mut self) -> NativeResult<()> {
        self.facade.call_unit("resetMinMaxZoom", Value::Null)
    }

    fn camera_position(&mut self) -> NativeResult<CameraPosition> {
        self.facade.call_as("cameraPosition", Value::Null)
    }

    fn my_location(&mut self) -> NativeResult<Option<Location>> {
        self.facade.call_as("myLocation", Value::Null)
    }

    fn ui_settings(&mut self) -> NativeResult<UiSettings> {
        self.facade.call_as("uiSettings", Value::Null)
    }

    fn is_my_location_enabled(&mut self) -> NativeResult<bool> {
        self.facade.call_as("isMyLocationEnabled", Value::Null)
    }

    fn navigation(&mut self) -> Option<&mut dyn NavigationSurface> {
        if self.kind.is_navigation() {
            Some(self as &mut dyn NavigationSurface)
        } else {
            None
        }
    }
}

impl NavigationSurface for JniMapSurface {
    fn set_nav_flag(&mut self, flag: NavFlag, enabled: bool) -> NativeResult<()> {
        self.facade
            .call_unit("setNavFlag", json!({ "flag": flag, "enabled": enabled }))
    }

    fn set_night_mode(&mut self, mode: ForceNightMode) -> NativeResult<()> {
        self.facade.call_unit("setNightMode", json!({ "mode": mode }))
    }

    fn set_styling_options(&mut self, styling: &StylingOptions) -> NativeResult<()> {
        self.facade.call_unit("setStylingOptions", to_args(styling)?)
    }

    fn show_route_overview(&mut self) -> NativeResult<()> {
        self.facade.call_unit("showRouteOverview", Value::Null)
    }
}
