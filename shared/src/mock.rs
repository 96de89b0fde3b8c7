//! In-memory native layer for tests.
//!
//! Every mock is a cheap `Clone` over shared state so a test can hand one
//! copy to the bridge and keep another to inspect recorded calls.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::callback::CallbackSender;
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
use crate::traits::{
    EventSink, ListenerHandle, ListenerKind, MapFlag, MapSurface, NativeResult, NavFlag, NavigationApi,
    NavigationSurface, Navigator, RemainingThresholds, Simulator, StyleLoader, StyleRequest,
};

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---- map surface -------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Create(i32, i32),
    Destroy,
    Add(OverlayKind),
    RemoveOverlay(OverlayKind, String),
    Clear,
    MoveCamera(CameraPosition),
    AnimateCamera(CameraPosition, i64),
    ZoomTo(f64),
    FollowMyLocation(CameraPerspective),
    MapFlag(MapFlag, bool),
    MapType(MapType),
    MapStyle(String),
    Padding(Padding),
    MinZoom(f64),
    MaxZoom(f64),
    ResetMinMaxZoom,
    NavFlag(NavFlag, bool),
    NightMode(ForceNightMode),
    Styling(StylingOptions),
    RouteOverview,
}

#[derive(Debug, Default)]
struct SurfaceState {
    calls: Vec<SurfaceCall>,
    counters: HashMap<OverlayKind, u32>,
    fail_adds: bool,
    camera: CameraPosition,
    location: Option<Location>,
    my_location_enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    state: Arc<Mutex<SurfaceState>>,
    navigation: bool,
}

impl MockSurface {
    /// Plain map view
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigation view with guidance UI
    pub fn navigation_view() -> Self {
        Self {
            navigation: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        lock(&self.state).calls.clone()
    }

    pub fn fail_adds(&mut self) {
        lock(&self.state).fail_adds = true;
    }

    pub fn set_my_location(&self, location: Location) {
        lock(&self.state).location = Some(location);
    }

    fn record(&self, call: SurfaceCall) -> NativeResult<()> {
        lock(&self.state).calls.push(call);
        Ok(())
    }

    fn add(&self, kind: OverlayKind) -> NativeResult<String> {
        let mut state = lock(&self.state);
        if state.fail_adds {
            return Err(NativeError::Rejected(format!("{} rejected", kind.name())));
        }
        let counter = state.counters.entry(kind).or_insert(0);
        *counter += 1;
        let prefix = match kind {
            OverlayKind::Marker => "marker",
            OverlayKind::Polyline => "polyline",
            OverlayKind::Polygon => "polygon",
            OverlayKind::Circle => "circle",
            OverlayKind::GroundOverlay => "ground-overlay",
        };
        let native_id = format!("{}-{}", prefix, counter);
        state.calls.push(SurfaceCall::Add(kind));
        Ok(native_id)
    }
}

impl MapSurface for MockSurface {
    fn create(&mut self, width: i32, height: i32) -> NativeResult<()> {
        self.record(SurfaceCall::Create(width, height))
    }

    fn destroy(&mut self) -> NativeResult<()> {
        self.record(SurfaceCall::Destroy)
    }

    fn add_marker(&mut self, _options: &MarkerOptions) -> NativeResult<String> {
        self.add(OverlayKind::Marker)
    }

    fn add_polyline(&mut self, _options: &PolylineOptions) -> NativeResult<String> {
        self.add(OverlayKind::Polyline)
    }

    fn add_polygon(&mut self, _options: &PolygonOptions) -> NativeResult<String> {
        self.add(OverlayKind::Polygon)
    }

    fn add_circle(&mut self, _options: &CircleOptions) -> NativeResult<String> {
        self.add(OverlayKind::Circle)
    }

    fn add_ground_overlay(&mut self, _options: &GroundOverlayOptions) -> NativeResult<String> {
        self.add(OverlayKind::GroundOverlay)
    }

    fn remove_overlay(&mut self, kind: OverlayKind, native_id: &str) -> NativeResult<()> {
        self.record(SurfaceCall::RemoveOverlay(kind, native_id.to_string()))
    }

    fn clear(&mut self) -> NativeResult<()> {
        self.record(SurfaceCall::Clear)
    }

    fn move_camera(&mut self, camera: &CameraPosition) -> NativeResult<()> {
        lock(&self.state).camera = *camera;
        self.record(SurfaceCall::MoveCamera(*camera))
    }

    fn animate_camera(&mut self, camera: &CameraPosition, duration_ms: i64) -> NativeResult<()> {
        lock(&self.state).camera = *camera;
        self.record(SurfaceCall::AnimateCamera(*camera, duration_ms))
    }

    fn zoom_to(&mut self, level: f64) -> NativeResult<()> {
        lock(&self.state).camera.zoom = level;
        self.record(SurfaceCall::ZoomTo(level))
    }

    fn follow_my_location(&mut self, perspective: CameraPerspective) -> NativeResult<()> {
        self.record(SurfaceCall::FollowMyLocation(perspective))
    }

    fn set_map_flag(&mut self, flag: MapFlag, enabled: bool) -> NativeResult<()> {
        if flag == MapFlag::MyLocation {
            lock(&self.state).my_location_enabled = enabled;
        }
        self.record(SurfaceCall::MapFlag(flag, enabled))
    }

    fn set_map_type(&mut self, map_type: MapType) -> NativeResult<()> {
        self.record(SurfaceCall::MapType(map_type))
    }

    fn set_map_style(&mut self, style_json: &str) -> NativeResult<()> {
        self.record(SurfaceCall::MapStyle(style_json.to_string()))
    }

    fn set_padding(&mut self, padding: Padding) -> NativeResult<()> {
        self.record(SurfaceCall::Padding(padding))
    }

    fn set_min_zoom(&mut self, level: f64) -> NativeResult<()> {
        self.record(SurfaceCall::MinZoom(level))
    }

    fn set_max_zoom(&mut self, level: f64) -> NativeResult<()> {
        self.record(SurfaceCall::MaxZoom(level))
    }

    fn reset_min_max_zoom(&mut self) -> NativeResult<()> {
        self.record(SurfaceCall::ResetMinMaxZoom)
    }

    fn camera_position(&mut self) -> NativeResult<CameraPosition> {
        Ok(lock(&self.state).camera)
    }

    fn my_location(&mut self) -> NativeResult<Option<Location>> {
        Ok(lock(&self.state).location.clone())
    }

    fn ui_settings(&mut self) -> NativeResult<UiSettings> {
        Ok(UiSettings::default())
    }

    fn is_my_location_enabled(&mut self) -> NativeResult<bool> {
        Ok(lock(&self.state).my_location_enabled)
    }

    fn navigation(&mut self) -> Option<&mut dyn NavigationSurface> {
        if self.navigation {
            Some(self as &mut dyn NavigationSurface)
        } else {
            None
        }
    }
}

impl NavigationSurface for MockSurface {
    fn set_nav_flag(&mut self, flag: NavFlag, enabled: bool) -> NativeResult<()> {
        self.record(SurfaceCall::NavFlag(flag, enabled))
    }

    fn set_night_mode(&mut self, mode: ForceNightMode) -> NativeResult<()> {
        self.record(SurfaceCall::NightMode(mode))
    }

    fn set_styling_options(&mut self, styling: &StylingOptions) -> NativeResult<()> {
        self.record(SurfaceCall::Styling(styling.clone()))
    }

    fn show_route_overview(&mut self) -> NativeResult<()> {
        self.record(SurfaceCall::RouteOverview)
    }
}

// ---- event sink --------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        lock(&self.events).clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        lock(&self.events).iter().map(Event::name).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &Event) {
        lock(&self.events).push(event.clone());
    }
}

// ---- navigator ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NavCall {
    SetTaskRemovedBehavior(TaskRemovedBehavior),
    SetDestinations(RouteRequestId, usize),
    ClearDestinations,
    ContinueToNextDestination,
    StartGuidance,
    StopGuidance,
    Cleanup,
    Simulate(SimulationOptions),
    SetUserLocation(LatLng),
    UnsetUserLocation,
    PauseSimulation,
    ResumeSimulation,
    AudioGuidance(AudioGuidance),
    SpeedAlert(Option<SpeedAlertOptions>),
    NavInfoForwarding(bool),
}

#[derive(Debug, Default)]
struct NavigatorState {
    calls: Vec<NavCall>,
    next_handle: u64,
    listeners: HashMap<ListenerHandle, ListenerKind>,
    location_listeners: HashSet<ListenerHandle>,
    rejected_place_ids: HashSet<String>,
    time_and_distance: Option<TimeAndDistance>,
}

#[derive(Debug, Clone, Default)]
pub struct MockNavigator {
    state: Arc<Mutex<NavigatorState>>,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NavCall> {
        lock(&self.state).calls.clone()
    }

    pub fn active_listeners(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    pub fn active_location_listeners(&self) -> usize {
        lock(&self.state).location_listeners.len()
    }

    pub fn reject_place_id(&self, place_id: &str) {
        lock(&self.state).rejected_place_ids.insert(place_id.to_string());
    }

    pub fn set_time_and_distance(&self, value: TimeAndDistance) {
        lock(&self.state).time_and_distance = Some(value);
    }

    fn record(&self, call: NavCall) -> NativeResult<()> {
        lock(&self.state).calls.push(call);
        Ok(())
    }

    fn next_handle(state: &mut NavigatorState) -> ListenerHandle {
        state.next_handle += 1;
        ListenerHandle(state.next_handle)
    }
}

impl Navigator for MockNavigator {
    fn set_task_removed_behavior(&mut self, behavior: TaskRemovedBehavior) -> NativeResult<()> {
        self.record(NavCall::SetTaskRemovedBehavior(behavior))
    }

    fn validate_waypoint(&mut self, waypoint: &Waypoint) -> NativeResult<()> {
        match &waypoint.place_id {
            Some(id) if lock(&self.state).rejected_place_ids.contains(id) => {
                Err(NativeError::UnsupportedPlaceId(id.clone()))
            }
            _ => Ok(()),
        }
    }

    fn set_destinations(
        &mut self,
        request: RouteRequestId,
        waypoints: &[Waypoint],
        _routing: Option<&RoutingOptions>,
        _display: Option<&DisplayOptions>,
    ) -> NativeResult<()> {
        self.record(NavCall::SetDestinations(request, waypoints.len()))
    }

    fn clear_destinations(&mut self) -> NativeResult<()> {
        self.record(NavCall::ClearDestinations)
    }

    fn continue_to_next_destination(&mut self) -> NativeResult<()> {
        self.record(NavCall::ContinueToNextDestination)
    }

    fn start_guidance(&mut self) -> NativeResult<()> {
        self.record(NavCall::StartGuidance)
    }

    fn stop_guidance(&mut self) -> NativeResult<()> {
        self.record(NavCall::StopGuidance)
    }

    fn cleanup(&mut self) -> NativeResult<()> {
        self.record(NavCall::Cleanup)
    }

    fn add_listener(&mut self, kind: ListenerKind, _thresholds: RemainingThresholds) -> NativeResult<ListenerHandle> {
        let mut state = lock(&self.state);
        let handle = Self::next_handle(&mut state);
        state.listeners.insert(handle, kind);
        Ok(handle)
    }

    fn remove_listener(&mut self, handle: ListenerHandle) -> NativeResult<()> {
        lock(&self.state).listeners.remove(&handle);
        Ok(())
    }

    fn add_location_listener(&mut self) -> NativeResult<ListenerHandle> {
        let mut state = lock(&self.state);
        let handle = Self::next_handle(&mut state);
        state.location_listeners.insert(handle);
        Ok(handle)
    }

    fn remove_location_listener(&mut self, handle: ListenerHandle) -> NativeResult<()> {
        lock(&self.state).location_listeners.remove(&handle);
        Ok(())
    }

    fn simulator(&mut self) -> &mut dyn Simulator {
        self
    }

    fn set_audio_guidance(&mut self, guidance: AudioGuidance) -> NativeResult<()> {
        self.record(NavCall::AudioGuidance(guidance))
    }

    fn set_speed_alert_options(&mut self, options: Option<&SpeedAlertOptions>) -> NativeResult<()> {
        self.record(NavCall::SpeedAlert(options.copied()))
    }

    fn current_time_and_distance(&mut self) -> NativeResult<Option<TimeAndDistance>> {
        Ok(lock(&self.state).time_and_distance)
    }

    fn current_route_segment(&mut self) -> NativeResult<Option<RouteSegment>> {
        Ok(None)
    }

    fn route_segments(&mut self) -> NativeResult<Vec<RouteSegment>> {
        Ok(Vec::new())
    }

    fn traveled_route(&mut self) -> NativeResult<Vec<LatLng>> {
        Ok(vec![LatLng::new(1.0, 2.0), LatLng::new(1.5, 2.5)])
    }

    fn set_nav_info_forwarding(&mut self, enabled: bool) -> NativeResult<()> {
        self.record(NavCall::NavInfoForwarding(enabled))
    }
}

impl Simulator for MockNavigator {
    fn simulate_along_route(&mut self, options: &SimulationOptions) -> NativeResult<()> {
        self.record(NavCall::Simulate(*options))
    }

    fn set_user_location(&mut self, location: LatLng) -> NativeResult<()> {
        self.record(NavCall::SetUserLocation(location))
    }

    fn unset_user_location(&mut self) -> NativeResult<()> {
        self.record(NavCall::UnsetUserLocation)
    }

    fn pause(&mut self) -> NativeResult<()> {
        self.record(NavCall::PauseSimulation)
    }

    fn resume(&mut self) -> NativeResult<()> {
        self.record(NavCall::ResumeSimulation)
    }
}

// ---- navigation api ----------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ShowTerms(TermsDialogParams),
    ResetTerms,
    RequestNavigator,
    AbnormalReporting(bool),
}

#[derive(Debug)]
struct ApiState {
    terms_accepted: bool,
    calls: Vec<ApiCall>,
}

#[derive(Debug, Clone)]
pub struct MockApi {
    state: Arc<Mutex<ApiState>>,
    navigator: MockNavigator,
}

impl MockApi {
    pub fn new(terms_accepted: bool, navigator: MockNavigator) -> Self {
        Self {
            state: Arc::new(Mutex::new(ApiState {
                terms_accepted,
                calls: Vec::new(),
            })),
            navigator,
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.state).calls.clone()
    }
}

impl NavigationApi for MockApi {
    fn are_terms_accepted(&mut self) -> NativeResult<bool> {
        Ok(lock(&self.state).terms_accepted)
    }

    fn show_terms_dialog(&mut self, params: &TermsDialogParams) -> NativeResult<()> {
        lock(&self.state).calls.push(ApiCall::ShowTerms(params.clone()));
        Ok(())
    }

    fn reset_terms_accepted(&mut self) -> NativeResult<()> {
        let mut state = lock(&self.state);
        state.terms_accepted = false;
        state.calls.push(ApiCall::ResetTerms);
        Ok(())
    }

    fn request_navigator(&mut self) -> NativeResult<()> {
        lock(&self.state).calls.push(ApiCall::RequestNavigator);
        Ok(())
    }

    fn navigator(&mut self) -> NativeResult<Box<dyn Navigator>> {
        Ok(Box::new(self.navigator.clone()))
    }

    fn sdk_version(&mut self) -> NativeResult<String> {
        Ok("mock-sdk".to_string())
    }

    fn set_abnormal_termination_reporting_enabled(&mut self, enabled: bool) -> NativeResult<()> {
        lock(&self.state).calls.push(ApiCall::AbnormalReporting(enabled));
        Ok(())
    }
}

// ---- style loader ------------------------------------------------------

/// Records style requests. Tests answer them by posting a style loaded
/// callback themselves.
#[derive(Debug, Clone, Default)]
pub struct MockStyleLoader {
    requests: Arc<Mutex<Vec<StyleRequest>>>,
}

impl MockStyleLoader {
    pub fn requests(&self) -> Vec<StyleRequest> {
        lock(&self.requests).clone()
    }
}

impl StyleLoader for MockStyleLoader {
    fn load(&self, request: StyleRequest, _callbacks: CallbackSender) {
        lock(&self.requests).push(request);
    }
}
