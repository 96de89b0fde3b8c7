//! # Native SDK Seams
//!
//! The bridge core never touches the navigation or map rendering SDKs
//! directly. Everything it needs from them goes through the traits in this
//! module, which the JNI crate implements on top of Kotlin facade objects
//! and the tests implement with recording mocks.
//!
//! ```text
//!               ┌──────────────────────────────┐
//!               │          NavBridge           │
//!               └──────┬──────────┬────────┬───┘
//!                      │          │        │
//!          ┌───────────▼──┐ ┌─────▼─────┐ ┌▼────────────┐
//!          │  MapSurface  │ │ Navigator │ │ EventSink   │
//!          │ (+Navigation │ │ Simulator │ │ StyleLoader │
//!          │   Surface)   │ │ NavApi    │ └─────────────┘
//!          └──────────────┘ └───────────┘
//! ```
//!
//! Flags and listener kinds serialize by name (`"TRAFFIC"`) for the facades.
//!
//! All calls happen on the main context. Results that the native side
//! produces later (map ready, route status, clicks) come back as
//! [`NativeCallback`](crate::callback::NativeCallback)s, never as return values.

use serde::Serialize;

use crate::callback::CallbackSender;
use crate::command::ViewTarget;
use crate::enums::{AudioGuidance, CameraPerspective, ForceNightMode, MapType, TaskRemovedBehavior};
use crate::error::NativeError;
use crate::events::Event;
use crate::model::{CameraPosition, LatLng, Location, Padding, RouteSegment, TimeAndDistance, UiSettings};
use crate::overlay::{
    CircleOptions, GroundOverlayOptions, MarkerOptions, OverlayKind, PolygonOptions, PolylineOptions,
};
use crate::routing::{
    DisplayOptions, RoutingOptions, SimulationOptions, SpeedAlertOptions, TermsDialogParams, Waypoint,
};
use crate::session::RouteRequestId;
use crate::styling::StylingOptions;

/// Result type alias for native calls
pub type NativeResult<T> = Result<T, NativeError>;

/// Boolean map settings toggled by view commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapFlag {
    MyLocation,
    Indoor,
    Traffic,
    Compass,
    MyLocationButton,
    RotateGestures,
    ScrollGestures,
    ScrollGesturesDuringRotateOrZoom,
    TiltGestures,
    ZoomGestures,
    ZoomControls,
    Buildings,
    MapToolbar,
}

/// Boolean settings of the navigation UI drawn over a navigation view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavFlag {
    TripProgressBar,
    NavigationUi,
    Speedometer,
    SpeedLimitIcon,
    TrafficIncidentCards,
    Footer,
    Header,
    RecenterButton,
}

/// One native map (phone view or in-car screen)
pub trait MapSurface: Send {
    /// Create the hosting fragment with the given size in pixels
    fn create(&mut self, width: i32, height: i32) -> NativeResult<()>;

    /// Tear down the hosting fragment
    fn destroy(&mut self) -> NativeResult<()>;

    fn add_marker(&mut self, options: &MarkerOptions) -> NativeResult<String>;
    fn add_polyline(&mut self, options: &PolylineOptions) -> NativeResult<String>;
    fn add_polygon(&mut self, options: &PolygonOptions) -> NativeResult<String>;
    fn add_circle(&mut self, options: &CircleOptions) -> NativeResult<String>;
    fn add_ground_overlay(&mut self, options: &GroundOverlayOptions) -> NativeResult<String>;

    /// Remove one native overlay by its native id
    fn remove_overlay(&mut self, kind: OverlayKind, native_id: &str) -> NativeResult<()>;

    /// Remove every overlay from the native map
    fn clear(&mut self) -> NativeResult<()>;

    fn move_camera(&mut self, camera: &CameraPosition) -> NativeResult<()>;
    fn animate_camera(&mut self, camera: &CameraPosition, duration_ms: i64) -> NativeResult<()>;
    fn zoom_to(&mut self, level: f64) -> NativeResult<()>;
    fn follow_my_location(&mut self, perspective: CameraPerspective) -> NativeResult<()>;

    fn set_map_flag(&mut self, flag: MapFlag, enabled: bool) -> NativeResult<()>;
    fn set_map_type(&mut self, map_type: MapType) -> NativeResult<()>;

    /// Apply a style document (JSON) fetched earlier
    fn set_map_style(&mut self, style_json: &str) -> NativeResult<()>;
    fn set_padding(&mut self, padding: Padding) -> NativeResult<()>;
    fn set_min_zoom(&mut self, level: f64) -> NativeResult<()>;
    fn set_max_zoom(&mut self, level: f64) -> NativeResult<()>;
    fn reset_min_max_zoom(&mut self) -> NativeResult<()>;

    fn camera_position(&mut self) -> NativeResult<CameraPosition>;
    fn my_location(&mut self) -> NativeResult<Option<Location>>;
    fn ui_settings(&mut self) -> NativeResult<UiSettings>;
    fn is_my_location_enabled(&mut self) -> NativeResult<bool>;

    /// Navigation UI on top of this map, if the view is a navigation view
    fn navigation(&mut self) -> Option<&mut dyn NavigationSurface> {
        None
    }
}

/// Guidance UI of a navigation view
pub trait NavigationSurface {
    fn set_nav_flag(&mut self, flag: NavFlag, enabled: bool) -> NativeResult<()>;
    fn set_night_mode(&mut self, mode: ForceNightMode) -> NativeResult<()>;
    fn set_styling_options(&mut self, styling: &StylingOptions) -> NativeResult<()>;
    fn show_route_overview(&mut self) -> NativeResult<()>;
}

/// Navigator listeners the session keeps registered while ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListenerKind {
    Arrival,
    RouteChanged,
    TrafficUpdated,
    Rerouting,
    RemainingTimeOrDistanceChanged,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 5] = [
        Self::Arrival,
        Self::RouteChanged,
        Self::TrafficUpdated,
        Self::Rerouting,
        Self::RemainingTimeOrDistanceChanged,
    ];
}

/// Opaque handle of a registered native listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Minimum change before a remaining time/distance callback fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemainingThresholds {
    pub seconds: i32,
    pub meters: i32,
}

/// A ready native navigator
pub trait Navigator: Send {
    fn set_task_removed_behavior(&mut self, behavior: TaskRemovedBehavior) -> NativeResult<()>;

    /// Check a waypoint with the native builder (place id support, heading)
    fn validate_waypoint(&mut self, waypoint: &Waypoint) -> NativeResult<()>;

    /// Start a route computation. The result arrives later as a route
    /// status callback tagged with `request`.
    fn set_destinations(
        &mut self,
        request: RouteRequestId,
        waypoints: &[Waypoint],
        routing: Option<&RoutingOptions>,
        display: Option<&DisplayOptions>,
    ) -> NativeResult<()>;

    fn clear_destinations(&mut self) -> NativeResult<()>;
    fn continue_to_next_destination(&mut self) -> NativeResult<()>;
    fn start_guidance(&mut self) -> NativeResult<()>;
    fn stop_guidance(&mut self) -> NativeResult<()>;
    fn cleanup(&mut self) -> NativeResult<()>;

    fn add_listener(&mut self, kind: ListenerKind, thresholds: RemainingThresholds) -> NativeResult<ListenerHandle>;
    fn remove_listener(&mut self, handle: ListenerHandle) -> NativeResult<()>;

    /// Road-snapped location updates
    fn add_location_listener(&mut self) -> NativeResult<ListenerHandle>;
    fn remove_location_listener(&mut self, handle: ListenerHandle) -> NativeResult<()>;

    fn simulator(&mut self) -> &mut dyn Simulator;

    fn set_audio_guidance(&mut self, guidance: AudioGuidance) -> NativeResult<()>;

    /// `None` restores the native defaults
    fn set_speed_alert_options(&mut self, options: Option<&SpeedAlertOptions>) -> NativeResult<()>;

    fn current_time_and_distance(&mut self) -> NativeResult<Option<TimeAndDistance>>;
    fn current_route_segment(&mut self) -> NativeResult<Option<RouteSegment>>;
    fn route_segments(&mut self) -> NativeResult<Vec<RouteSegment>>;
    fn traveled_route(&mut self) -> NativeResult<Vec<LatLng>>;

    /// Start or stop forwarding turn-by-turn updates as nav info callbacks
    fn set_nav_info_forwarding(&mut self, enabled: bool) -> NativeResult<()>;
}

/// Location simulator of a navigator
pub trait Simulator {
    fn simulate_along_route(&mut self, options: &SimulationOptions) -> NativeResult<()>;
    fn set_user_location(&mut self, location: LatLng) -> NativeResult<()>;
    fn unset_user_location(&mut self) -> NativeResult<()>;
    fn pause(&mut self) -> NativeResult<()>;
    fn resume(&mut self) -> NativeResult<()>;
}

/// Process-wide navigation API entry points
pub trait NavigationApi: Send {
    fn are_terms_accepted(&mut self) -> NativeResult<bool>;

    /// Show the terms dialog. The answer arrives as a terms response callback.
    fn show_terms_dialog(&mut self, params: &TermsDialogParams) -> NativeResult<()>;
    fn reset_terms_accepted(&mut self) -> NativeResult<()>;

    /// Ask for a navigator. Completion arrives as a navigator ready or
    /// navigator error callback.
    fn request_navigator(&mut self) -> NativeResult<()>;

    /// Take the navigator after a navigator ready callback
    fn navigator(&mut self) -> NativeResult<Box<dyn Navigator>>;

    fn sdk_version(&mut self) -> NativeResult<String>;
    fn set_abnormal_termination_reporting_enabled(&mut self, enabled: bool) -> NativeResult<()>;
}

/// A style fetch handed to a [`StyleLoader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRequest {
    pub target: ViewTarget,
    pub generation: u64,
    pub url: String,
}

/// Fetches remote map styles off the main context and posts the result back
/// as a style loaded callback through `sender`.
pub trait StyleLoader: Send {
    fn load(&self, request: StyleRequest, sender: CallbackSender);
}

/// Receiver of outgoing events (the application layer)
pub trait EventSink: Send {
    fn emit(&mut self, event: &Event);
}
