//! # Command Router
//!
//! Maps an integer command id to its handler and runs it against the
//! addressed view or the navigation session.
//!
//! ```text
//!  dispatch(target, 11, [15])
//!        │
//!        ├─ Command::from_id(11) ──► SetZoomLevel   (unknown id: Ok(Done))
//!        ├─ Args::new(..)        ──► arity 1..=1     (mismatch: Arity error)
//!        └─ ROUTES[SetZoomLevel] ──► view(target).set_zoom_level(15.0)
//! ```
//!
//! The table is plain data. Boolean toggles map straight to a [`MapFlag`]
//! or [`NavFlag`]; everything else has a handler function.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::bridge::{lookup_view, BridgeContext};
use crate::command::{Args, Command, ViewTarget};
use crate::enums::{AudioGuidance, CameraPerspective, ForceNightMode, MapType, TaskRemovedBehavior};
use crate::error::{BridgeError, BridgeResult, NotReady};
use crate::model::{CameraPosition, LatLng, Padding};
use crate::overlay::{
    CircleOptions, GroundOverlayOptions, MarkerOptions, OverlayKind, PolygonOptions, PolylineOptions,
};
use crate::registry::Registered;
use crate::routing::{
    DisplayOptions, RoutingOptions, SimulationOptions, SpeedAlertOptions, TermsDialogParams,
};
use crate::session::RouteRequestId;
use crate::styling::StylingOptions;
use crate::traits::{MapFlag, NavFlag};
use crate::view::MapViewController;

/// Successful outcome of a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Done,
    Value(Value),
    /// A route computation was started; its status arrives as an event
    Pending(RouteRequestId),
}

impl Reply {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Done => Value::Null,
            Self::Value(value) => value.clone(),
            Self::Pending(request) => json!({ "requestId": request.0 }),
        }
    }

    fn of<T: Serialize>(value: &T) -> Self {
        Self::Value(serde_json::to_value(value).unwrap_or(Value::Null))
    }
}

pub type Handler = fn(&mut BridgeContext, ViewTarget, &Args<'_>) -> BridgeResult<Reply>;

#[derive(Clone, Copy)]
enum Route {
    Map(MapFlag),
    Nav(NavFlag),
    Call(Handler),
}

const ROUTES: &[(Command, Route)] = &[
    (Command::CreateFragment, Route::Call(create_fragment)),
    (Command::MoveCamera, Route::Call(move_camera)),
    (Command::SetMyLocationEnabled, Route::Map(MapFlag::MyLocation)),
    (Command::SetTripProgressBarEnabled, Route::Nav(NavFlag::TripProgressBar)),
    (Command::SetNavigationUiEnabled, Route::Nav(NavFlag::NavigationUi)),
    (Command::SetFollowingPerspective, Route::Call(set_following_perspective)),
    (Command::SetNightMode, Route::Call(set_night_mode)),
    (Command::DeleteFragment, Route::Call(delete_fragment)),
    (Command::SetSpeedometerEnabled, Route::Nav(NavFlag::Speedometer)),
    (Command::SetSpeedLimitIconEnabled, Route::Nav(NavFlag::SpeedLimitIcon)),
    (Command::SetZoomLevel, Route::Call(set_zoom_level)),
    (Command::SetIndoorEnabled, Route::Map(MapFlag::Indoor)),
    (Command::SetTrafficEnabled, Route::Map(MapFlag::Traffic)),
    (Command::SetCompassEnabled, Route::Map(MapFlag::Compass)),
    (Command::SetMyLocationButtonEnabled, Route::Map(MapFlag::MyLocationButton)),
    (Command::SetRotateGesturesEnabled, Route::Map(MapFlag::RotateGestures)),
    (Command::SetScrollGesturesEnabled, Route::Map(MapFlag::ScrollGestures)),
    (
        Command::SetScrollGesturesEnabledDuringRotateOrZoom,
        Route::Map(MapFlag::ScrollGesturesDuringRotateOrZoom),
    ),
    (Command::SetTiltGesturesEnabled, Route::Map(MapFlag::TiltGestures)),
    (Command::SetZoomGesturesEnabled, Route::Map(MapFlag::ZoomGestures)),
    (Command::SetBuildingsEnabled, Route::Map(MapFlag::Buildings)),
    (Command::SetMapType, Route::Call(set_map_type)),
    (Command::SetMapToolbarEnabled, Route::Map(MapFlag::MapToolbar)),
    (Command::ClearMapView, Route::Call(clear_map_view)),
    (Command::ResetMinMaxZoomLevel, Route::Call(reset_min_max_zoom)),
    (Command::SetMapStyle, Route::Call(set_map_style)),
    (Command::AnimateCamera, Route::Call(animate_camera)),
    (Command::ShowRouteOverview, Route::Call(show_route_overview)),
    (Command::SetTrafficIncidentCardsEnabled, Route::Nav(NavFlag::TrafficIncidentCards)),
    (Command::SetFooterEnabled, Route::Nav(NavFlag::Footer)),
    (Command::SetHeaderEnabled, Route::Nav(NavFlag::Header)),
    (Command::RemoveMarker, Route::Call(remove_marker)),
    (Command::RemovePolyline, Route::Call(remove_polyline)),
    (Command::RemovePolygon, Route::Call(remove_polygon)),
    (Command::RemoveCircle, Route::Call(remove_circle)),
    (Command::RemoveGroundOverlay, Route::Call(remove_ground_overlay)),
    (Command::SetZoomControlsEnabled, Route::Map(MapFlag::ZoomControls)),
    (Command::SetRecenterButtonEnabled, Route::Nav(NavFlag::RecenterButton)),
    (Command::SetPadding, Route::Call(set_padding)),
    (Command::AddMarker, Route::Call(add_overlay::<MarkerOptions>)),
    (Command::AddPolyline, Route::Call(add_overlay::<PolylineOptions>)),
    (Command::AddPolygon, Route::Call(add_overlay::<PolygonOptions>)),
    (Command::AddCircle, Route::Call(add_overlay::<CircleOptions>)),
    (Command::AddGroundOverlay, Route::Call(add_overlay::<GroundOverlayOptions>)),
    (Command::GetCameraPosition, Route::Call(get_camera_position)),
    (Command::GetMyLocation, Route::Call(get_my_location)),
    (Command::GetUiSettings, Route::Call(get_ui_settings)),
    (Command::IsMyLocationEnabled, Route::Call(is_my_location_enabled)),
    (Command::SetMinZoomLevel, Route::Call(set_min_zoom_level)),
    (Command::SetMaxZoomLevel, Route::Call(set_max_zoom_level)),
    (Command::SetStylingOptions, Route::Call(set_styling_options)),
    (Command::IsAutoScreenAvailable, Route::Call(is_auto_screen_available)),
    (Command::InitializeNavigator, Route::Call(initialize_navigator)),
    (Command::Cleanup, Route::Call(cleanup)),
    (Command::SetDestinations, Route::Call(set_destinations)),
    (Command::ClearDestinations, Route::Call(clear_destinations)),
    (Command::ContinueToNextDestination, Route::Call(continue_to_next_destination)),
    (Command::StartGuidance, Route::Call(start_guidance)),
    (Command::StopGuidance, Route::Call(stop_guidance)),
    (Command::SimulateLocationsAlongExistingRoute, Route::Call(simulate_along_route)),
    (Command::StopLocationSimulation, Route::Call(stop_location_simulation)),
    (Command::PauseLocationSimulation, Route::Call(pause_location_simulation)),
    (Command::ResumeLocationSimulation, Route::Call(resume_location_simulation)),
    (Command::SimulateLocation, Route::Call(simulate_location)),
    (Command::SetAudioGuidanceType, Route::Call(set_audio_guidance_type)),
    (Command::SetSpeedAlertOptions, Route::Call(set_speed_alert_options)),
    (Command::SetAbnormalTerminatingReportingEnabled, Route::Call(set_abnormal_reporting)),
    (Command::GetCurrentTimeAndDistance, Route::Call(get_current_time_and_distance)),
    (Command::GetCurrentRouteSegment, Route::Call(get_current_route_segment)),
    (Command::GetRouteSegments, Route::Call(get_route_segments)),
    (Command::GetTraveledPath, Route::Call(get_traveled_path)),
    (Command::AreTermsAccepted, Route::Call(are_terms_accepted)),
    (Command::ResetTermsAccepted, Route::Call(reset_terms_accepted)),
    (Command::GetNavSdkVersion, Route::Call(get_nav_sdk_version)),
    (Command::StartUpdatingLocation, Route::Call(start_updating_location)),
    (Command::StopUpdatingLocation, Route::Call(stop_updating_location)),
    (Command::SetTurnByTurnLoggingEnabled, Route::Call(set_turn_by_turn_logging)),
];

pub struct CommandRouter {
    routes: HashMap<Command, Route>,
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRouter {
    pub fn new() -> Self {
        Self {
            routes: ROUTES.iter().copied().collect(),
        }
    }

    /// Whether `command` has a route
    pub fn handles(&self, command: Command) -> bool {
        self.routes.contains_key(&command)
    }

    pub fn dispatch(
        &self,
        ctx: &mut BridgeContext,
        target: ViewTarget,
        command_id: i64,
        values: &[Value],
    ) -> BridgeResult<Reply> {
        let Some(command) = Command::from_id(command_id) else {
            warn!("Ignoring unknown command id {}", command_id);
            return Ok(Reply::Done);
        };
        let args = Args::new(command, values)?;
        debug!("dispatch {} ({}) to {}", command.name(), command.id(), target);

        match self.routes.get(&command) {
            Some(Route::Map(flag)) => {
                let enabled = args.bool(0)?;
                with_view(ctx, target, |view| view.set_map_flag(*flag, enabled))
            }
            Some(Route::Nav(flag)) => {
                let enabled = args.bool(0)?;
                with_view(ctx, target, |view| view.set_nav_flag(*flag, enabled))
            }
            Some(Route::Call(handler)) => handler(ctx, target, &args),
            None => {
                warn!("No route for {}", command.name());
                Ok(Reply::Done)
            }
        }
    }
}

// ---- view helpers ------------------------------------------------------

/// Run a setter on the addressed view. A missing in-car screen makes the
/// setter a no-op.
fn with_view<F>(ctx: &mut BridgeContext, target: ViewTarget, f: F) -> BridgeResult<Reply>
where
    F: FnOnce(&mut MapViewController) -> BridgeResult<()>,
{
    match lookup_view(&mut ctx.views, &mut ctx.auto, target)? {
        Some(view) => {
            f(view)?;
            Ok(Reply::Done)
        }
        None => {
            debug!("{} not available, ignoring command", target);
            Ok(Reply::Done)
        }
    }
}

/// Run a query on the addressed view. A missing in-car screen is `NO_MAP`.
fn query_view<F>(ctx: &mut BridgeContext, target: ViewTarget, f: F) -> BridgeResult<Reply>
where
    F: FnOnce(&mut MapViewController) -> BridgeResult<Reply>,
{
    match lookup_view(&mut ctx.views, &mut ctx.auto, target)? {
        Some(view) => f(view),
        None => Err(NotReady::NoMap.into()),
    }
}

fn create_fragment(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let height = args.int32(0)?;
    let width = args.int32(1)?;
    let styling = args.opt_map(2)?.map(StylingOptions::from_options).transpose()?;
    if target == ViewTarget::Auto {
        debug!("The in-car screen is created by the car host");
        return Ok(Reply::Done);
    }
    with_view(ctx, target, |view| view.create(height, width, styling))
}

fn delete_fragment(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    with_view(ctx, target, MapViewController::destroy)
}

fn move_camera(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let camera = CameraPosition::from_options(args.map(0)?)?;
    with_view(ctx, target, |view| view.move_camera(&camera))
}

fn animate_camera(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let map = args.map(0)?;
    let camera = CameraPosition::from_options(map)?;
    let duration_ms = match args.opt_int(1)? {
        Some(duration) => duration,
        None => crate::options::get_int("duration", map, 0)?,
    };
    with_view(ctx, target, |view| view.animate_camera(&camera, duration_ms))
}

fn set_zoom_level(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let level = args.int(0)? as f64;
    with_view(ctx, target, |view| view.set_zoom_level(level))
}

fn set_following_perspective(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let perspective = CameraPerspective::from_js_value(args.int(0)?);
    with_view(ctx, target, |view| view.set_following_perspective(perspective))
}

fn set_night_mode(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let mode = ForceNightMode::from_js_value(args.int(0)?);
    with_view(ctx, target, |view| view.set_night_mode(mode))
}

fn set_map_type(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let map_type = MapType::from_js_value(args.int(0)?);
    with_view(ctx, target, |view| view.set_map_type(map_type))
}

fn clear_map_view(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    with_view(ctx, target, MapViewController::clear)
}

fn reset_min_max_zoom(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    with_view(ctx, target, MapViewController::reset_min_max_zoom)
}

fn set_map_style(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let url = args.string(0)?;
    let sender = ctx.callbacks.clone();
    if let Some(view) = lookup_view(&mut ctx.views, &mut ctx.auto, target)? {
        view.request_style(url, &*ctx.style_loader, sender);
    }
    Ok(Reply::Done)
}

fn show_route_overview(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    with_view(ctx, target, MapViewController::show_route_overview)
}

fn remove(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>, kind: OverlayKind) -> BridgeResult<Reply> {
    let key = args.string(0)?;
    with_view(ctx, target, |view| {
        view.remove_overlay(kind, key);
        Ok(())
    })
}

fn remove_marker(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    remove(ctx, target, args, OverlayKind::Marker)
}

fn remove_polyline(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    remove(ctx, target, args, OverlayKind::Polyline)
}

fn remove_polygon(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    remove(ctx, target, args, OverlayKind::Polygon)
}

fn remove_circle(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    remove(ctx, target, args, OverlayKind::Circle)
}

fn remove_ground_overlay(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    remove(ctx, target, args, OverlayKind::GroundOverlay)
}

fn set_padding(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let padding = Padding {
        top: args.int32(0)?,
        left: args.int32(1)?,
        bottom: args.int32(2)?,
        right: args.int32(3)?,
    };
    with_view(ctx, target, |view| view.set_padding(padding))
}

fn add_overlay<O: Registered>(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let map = args.map(0)?;
    query_view(ctx, target, |view| view.add_overlay::<O>(map).map(Reply::Value))
}

fn get_camera_position(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    query_view(ctx, target, |view| view.camera_position().map(|c| Reply::of(&c)))
}

fn get_my_location(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    query_view(ctx, target, |view| view.my_location().map(|l| Reply::of(&l)))
}

fn get_ui_settings(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    query_view(ctx, target, |view| view.ui_settings().map(|s| Reply::of(&s)))
}

fn is_my_location_enabled(ctx: &mut BridgeContext, target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    query_view(ctx, target, |view| view.is_my_location_enabled().map(|b| Reply::Value(b.into())))
}

fn set_min_zoom_level(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let level = args.float(0)?;
    with_view(ctx, target, |view| view.set_min_zoom(level))
}

fn set_max_zoom_level(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let level = args.float(0)?;
    with_view(ctx, target, |view| view.set_max_zoom(level))
}

fn set_styling_options(ctx: &mut BridgeContext, target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let styling = StylingOptions::from_options(args.map(0)?)?;
    match target {
        ViewTarget::Auto => {
            ctx.auto.set_styling(styling)?;
            Ok(Reply::Done)
        }
        ViewTarget::View(_) => with_view(ctx, target, |view| view.set_styling(styling)),
    }
}

fn is_auto_screen_available(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    Ok(Reply::Value(ctx.auto.is_available().into()))
}

// ---- session commands --------------------------------------------------

fn initialize_navigator(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let terms = TermsDialogParams::from_options(args.map(0)?)?;
    let behavior = TaskRemovedBehavior::from_js_value(args.opt_int(1)?.unwrap_or(0));
    ctx.session.initialize(terms, behavior, &mut ctx.relay)?;
    Ok(Reply::Done)
}

fn cleanup(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.cleanup();
    Ok(Reply::Done)
}

fn set_destinations(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let waypoints = args.array(0)?;
    let routing = args.opt_map(1)?.map(RoutingOptions::from_options).transpose()?;
    let display = args.opt_map(2)?.map(DisplayOptions::from_options).transpose()?;
    let request = ctx.session.set_destinations(waypoints, routing, display, &mut ctx.relay)?;
    Ok(Reply::Pending(request))
}

fn clear_destinations(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.clear_destinations()?;
    Ok(Reply::Done)
}

fn continue_to_next_destination(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.continue_to_next_destination()?;
    Ok(Reply::Done)
}

fn start_guidance(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.start_guidance(&mut ctx.relay)?;
    Ok(Reply::Done)
}

fn stop_guidance(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.stop_guidance()?;
    Ok(Reply::Done)
}

fn simulate_along_route(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let options = SimulationOptions::from_options(args.map(0)?)?;
    ctx.session.simulate_along_route(options)?;
    Ok(Reply::Done)
}

fn stop_location_simulation(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.stop_simulation()?;
    Ok(Reply::Done)
}

fn pause_location_simulation(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.pause_simulation()?;
    Ok(Reply::Done)
}

fn resume_location_simulation(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.resume_simulation()?;
    Ok(Reply::Done)
}

fn simulate_location(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let location = LatLng::from_options(args.map(0)?)?.ok_or(BridgeError::MissingField {
        object: "simulated location",
        field: "lat/lng",
    })?;
    ctx.session.simulate_location(location)?;
    Ok(Reply::Done)
}

fn set_audio_guidance_type(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.set_audio_guidance(AudioGuidance::from_js_value(args.int(0)?))?;
    Ok(Reply::Done)
}

fn set_speed_alert_options(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    let options = args.opt_map(0)?.map(SpeedAlertOptions::from_options).transpose()?;
    ctx.session.set_speed_alert_options(options)?;
    Ok(Reply::Done)
}

fn set_abnormal_reporting(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.set_abnormal_termination_reporting(args.bool(0)?)?;
    Ok(Reply::Done)
}

fn get_current_time_and_distance(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    Ok(Reply::of(&ctx.session.current_time_and_distance()?))
}

fn get_current_route_segment(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    Ok(Reply::of(&ctx.session.current_route_segment()?))
}

fn get_route_segments(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    Ok(Reply::of(&ctx.session.route_segments()?))
}

fn get_traveled_path(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    Ok(Reply::of(&ctx.session.traveled_path()?))
}

fn are_terms_accepted(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    Ok(Reply::Value(ctx.session.are_terms_accepted()?.into()))
}

fn reset_terms_accepted(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.reset_terms_accepted()?;
    Ok(Reply::Done)
}

fn get_nav_sdk_version(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    Ok(Reply::Value(ctx.session.sdk_version()?.into()))
}

fn start_updating_location(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.start_updating_location();
    Ok(Reply::Done)
}

fn stop_updating_location(ctx: &mut BridgeContext, _target: ViewTarget, _args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.stop_updating_location();
    Ok(Reply::Done)
}

fn set_turn_by_turn_logging(ctx: &mut BridgeContext, _target: ViewTarget, args: &Args<'_>) -> BridgeResult<Reply> {
    ctx.session.set_turn_by_turn_logging(args.bool(0)?, &mut ctx.relay);
    Ok(Reply::Done)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_has_a_route() {
        let router = CommandRouter::new();
        for command in Command::ALL {
            assert!(router.handles(*command), "{} has no route", command.name());
        }
        assert_eq!(ROUTES.len(), Command::ALL.len());
    }

    #[test]
    fn test_reply_values() {
        assert_eq!(Reply::Done.to_value(), Value::Null);
        assert_eq!(Reply::Pending(RouteRequestId(3)).to_value(), json!({ "requestId": 3 }));
        assert_eq!(Reply::of(&Padding::default()).to_value()["top"], json!(0));
    }
}
