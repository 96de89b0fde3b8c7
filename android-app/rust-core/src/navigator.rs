//! Navigation API and navigator backed by Kotlin facades.
//!
//! The API facade owns terms handling and navigator creation. Once the
//! navigator is ready, every navigator call goes through a second facade
//! that forwards to the live native navigator (and its simulator).

use serde_json::{json, Value};

use navsdk_shared::enums::{AudioGuidance, TaskRemovedBehavior};
use navsdk_shared::model::{LatLng, RouteSegment, TimeAndDistance};
use navsdk_shared::routing::{
    DisplayOptions, RoutingOptions, SimulationOptions, SpeedAlertOptions, TermsDialogParams, Waypoint,
};
use navsdk_shared::traits::{ListenerHandle, ListenerKind, NativeResult, RemainingThresholds};
use navsdk_shared::{NativeError, NavigationApi, Navigator, RouteRequestId, Simulator};

use crate::facade::JavaFacade;

pub struct JniNavigationApi {
    api: JavaFacade,
    navigator: JavaFacade,
}

impl JniNavigationApi {
    pub fn new(api: JavaFacade, navigator: JavaFacade) -> Self {
        Self { api, navigator }
    }
}

impl NavigationApi for JniNavigationApi {
    fn are_terms_accepted(&mut self) -> NativeResult<bool> {
        self.api.call_as("areTermsAccepted", Value::Null)
    }

    fn show_terms_dialog(&mut self, params: &TermsDialogParams) -> NativeResult<()> {
        self.api.call_unit("showTermsDialog", to_args(params)?)
    }

    fn reset_terms_accepted(&mut self) -> NativeResult<()> {
        self.api.call_unit("resetTermsAccepted", Value::Null)
    }

    fn request_navigator(&mut self) -> NativeResult<()> {
        self.api.call_unit("requestNavigator", Value::Null)
    }

    fn navigator(&mut self) -> NativeResult<Box<dyn Navigator>> {
        self.api.call_unit("acquireNavigator", Value::Null)?;
        Ok(Box::new(JniNavigator {
            facade: self.navigator.clone(),
        }))
    }

    fn sdk_version(&mut self) -> NativeResult<String> {
        self.api.call_as("sdkVersion", Value::Null)
    }

    fn set_abnormal_termination_reporting_enabled(&mut self, enabled: bool) -> NativeResult<()> {
        self.api
            .call_unit("setAbnormalTerminationReportingEnabled", json!({ "enabled": enabled }))
    }
}

pub struct JniNavigator {
    facade: JavaFacade,
}

fn to_args<T: serde::Serialize>(value: &T) -> NativeResult<Value> {
    serde_json::to_value(value).map_err(|e| NativeError::Rejected(format!("unserializable arguments: {}", e)))
}

impl Navigator for JniNavigator {
    fn set_task_removed_behavior(&mut self, behavior: TaskRemovedBehavior) -> NativeResult<()> {
        self.facade
            .call_unit("setTaskRemovedBehavior", json!({ "behavior": behavior }))
    }

    fn validate_waypoint(&mut self, waypoint: &Waypoint) -> NativeResult<()> {
        self.facade.call_unit("validateWaypoint", to_args(waypoint)?)
    }

    fn set_destinations(
        &mut self,
        request: RouteRequestId,
        waypoints: &[Waypoint],
        routing: Option<&RoutingOptions>,
        display: Option<&DisplayOptions>,
    ) -> NativeResult<()> {
        self.facade.call_unit(
            "setDestinations",
            json!({
                "request": request,
                "waypoints": to_args(&waypoints)?,
                "routingOptions": to_args(&routing)?,
                "displayOptions": to_args(&display)?,
            }),
        )
    }

    fn clear_destinations(&mut self) -> NativeResult<()> {
        self.facade.call_unit("clearDestinations", Value::Null)
    }

    fn continue_to_next_destination(&mut self) -> NativeResult<()> {
        self.facade.call_unit("continueToNextDestination", Value::Null)
    }

    fn start_guidance(&mut self) -> NativeResult<()> {
        self.facade.call_unit("startGuidance", Value::Null)
    }

    fn stop_guidance(&mut self) -> NativeResult<()> {
        self.facade.call_unit("stopGuidance", Value::Null)
    }

    fn cleanup(&mut self) -> NativeResult<()> {
        self.facade.call_unit("cleanup", Value::Null)
    }

    fn add_listener(&mut self, kind: ListenerKind, thresholds: RemainingThresholds) -> NativeResult<ListenerHandle> {
        let handle: u64 = self.facade.call_as(
            "addListener",
            json!({
                "kind": kind,
                "seconds": thresholds.seconds,
                "meters": thresholds.meters,
            }),
        )?;
        Ok(ListenerHandle(handle))
    }

    fn remove_listener(&mut self, handle: ListenerHandle) -> NativeResult<()> {
        self.facade.call_unit("removeListener", json!({ "handle": handle.0 }))
    }

    fn add_location_listener(&mut self) -> NativeResult<ListenerHandle> {
        let handle: u64 = self.facade.call_as("addLocationListener", Value::Null)?;
        Ok(ListenerHandle(handle))
    }

    fn remove_location_listener(&mut self, handle: ListenerHandle) -> NativeResult<()> {
        self.facade
            .call_unit("removeLocationListener", json!({ "handle": handle.0 }))
    }

    fn simulator(&mut self) -> &mut dyn Simulator {
        self
    }

    fn set_audio_guidance(&mut self, guidance: AudioGuidance) -> NativeResult<()> {
        self.facade
            .call_unit("setAudioGuidance", json!({ "guidance": guidance }))
    }

    fn set_speed_alert_options(&mut self, options: Option<&SpeedAlertOptions>) -> NativeResult<()> {
        self.facade.call_unit("setSpeedAlertOptions", to_args(&options)?)
    }

    fn current_time_and_distance(&mut self) -> NativeResult<Option<TimeAndDistance>> {
        self.facade.call_as("currentTimeAndDistance", Value::Null)
    }

    fn current_route_segment(&mut self) -> NativeResult<Option<RouteSegment>> {
        self.facade.call_as("currentRouteSegment", Value::Null)
    }

    fn route_segments(&mut self) -> NativeResult<Vec<RouteSegment>> {
        self.facade.call_as("routeSegments", Value::Null)
    }

    fn traveled_route(&mut self) -> NativeResult<Vec<LatLng>> {
        self.facade.call_as("traveledRoute", Value::Null)
    }

    fn set_nav_info_forwarding(&mut self, enabled: bool) -> NativeResult<()> {
        self.facade
            .call_unit("setNavInfoForwarding", json!({ "enabled": enabled }))
    }
}

impl Simulator for JniNavigator {
    fn simulate_along_route(&mut self, options: &SimulationOptions) -> NativeResult<()> {
        self.facade.call_unit("simulateAlongRoute", to_args(options)?)
    }

    fn set_user_location(&mut self, location: LatLng) -> NativeResult<()> {
        self.facade.call_unit("setUserLocation", to_args(&location)?)
    }

    fn unset_user_location(&mut self) -> NativeResult<()> {
        self.facade.call_unit("unsetUserLocation", Value::Null)
    }

    fn pause(&mut self) -> NativeResult<()> {
        self.facade.call_unit("pauseSimulation", Value::Null)
    }

    fn resume(&mut self) -> NativeResult<()> {
        self.facade.call_unit("resumeSimulation", Value::Null)
    }
}
