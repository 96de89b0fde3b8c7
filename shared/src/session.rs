//! # Navigation Session Controller
//!
//! Owns the navigator handle and everything tied to its lifetime: the
//! waypoint list, the outstanding route request, the registered native
//! listeners and the navigation-ready observers.
//!
//! ## State Machine
//!
//! ```text
//!                 initialize (terms accepted)
//!  Uninitialized ─────────────────────────────────► Initializing
//!       │  ▲                                           │    │
//!       │  │ terms rejected / navigator error          │    │ navigator ready
//!       │  └───────────────────────────────────────────┘    ▼
//!       │ initialize (terms pending)                       Ready ◄─────┐
//!       ▼                                                    │         │ stop guidance
//!  AwaitingTerms ── terms accepted ──► Initializing          │ start   │
//!                                                            ▼         │
//!                                                          Guiding ────┘
//!
//!  Ready / Guiding ── cleanup ──► CleanedUp ── initialize ──► ...
//! ```
//!
//! Route requests carry a generation number. A route status callback only
//! counts when its id matches the request still outstanding, so a slow
//! answer to an earlier request can never overwrite a newer one.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{AudioGuidance, TaskRemovedBehavior};
use crate::error::{BridgeResult, NotReady};
use crate::events::Event;
use crate::model::{LatLng, Location, NavInfo, RouteSegment, TimeAndDistance};
use crate::relay::EventRelay;
use crate::routing::{
    DisplayOptions, NavigatorErrorCode, RouteStatus, RoutingOptions, SimulationOptions, SpeedAlertOptions,
    TermsDialogParams, Waypoint, WaypointError,
};
use crate::traits::{ListenerHandle, ListenerKind, NavigationApi, Navigator, RemainingThresholds};

const NO_NAVIGATOR_MESSAGE: &str = "Make sure to initialize the navigator is ready before executing.";

/// Generation number of a route computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteRequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    AwaitingTerms,
    Initializing,
    Ready,
    Guiding,
    CleanedUp,
}

impl SessionState {
    pub fn has_navigator(self) -> bool {
        matches!(self, Self::Ready | Self::Guiding)
    }
}

/// Callback told whether the navigator is usable
pub type ReadyObserver = Box<dyn FnMut(bool) + Send>;

/// Subscription handle, opaque to callers apart from its raw form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

pub struct NavigationSession {
    api: Box<dyn NavigationApi>,
    navigator: Option<Box<dyn Navigator>>,
    state: SessionState,
    task_removed_behavior: TaskRemovedBehavior,
    thresholds: RemainingThresholds,
    waypoints: Vec<Waypoint>,
    route_generation: u64,
    pending_route: Option<RouteRequestId>,
    listeners: HashMap<ListenerKind, ListenerHandle>,
    location_listener: Option<ListenerHandle>,
    location_requested: bool,
    turn_by_turn: bool,
    observers: Vec<(ObserverId, ReadyObserver)>,
    next_observer: u64,
}

impl NavigationSession {
    pub fn new(api: Box<dyn NavigationApi>, thresholds: RemainingThresholds) -> Self {
        Self {
            api,
            navigator: None,
            state: SessionState::Uninitialized,
            task_removed_behavior: TaskRemovedBehavior::default(),
            thresholds,
            waypoints: Vec::new(),
            route_generation: 0,
            pending_route: None,
            listeners: HashMap::new(),
            location_listener: None,
            location_requested: false,
            turn_by_turn: false,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.navigator.is_some()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn pending_route(&self) -> Option<RouteRequestId> {
        self.pending_route
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn navigator(&mut self) -> BridgeResult<&mut (dyn Navigator + 'static)> {
        match self.navigator.as_deref_mut() {
            Some(navigator) => Ok(navigator),
            None => Err(NotReady::NoNavigator.into()),
        }
    }

    // ---- initialization ------------------------------------------------

    /// Start navigator creation, showing the terms dialog first if the
    /// user has not accepted the terms yet.
    pub fn initialize(
        &mut self,
        terms: TermsDialogParams,
        behavior: TaskRemovedBehavior,
        relay: &mut EventRelay,
    ) -> BridgeResult<()> {
        self.task_removed_behavior = behavior;

        match self.state {
            SessionState::Ready | SessionState::Guiding => {
                info!("Navigator already initialized");
                return Ok(());
            }
            SessionState::AwaitingTerms | SessionState::Initializing => {
                debug!("Initialization already in progress ({:?})", self.state);
                return Ok(());
            }
            SessionState::Uninitialized | SessionState::CleanedUp => {}
        }

        if self.api.are_terms_accepted()? {
            self.request_navigator(relay)
        } else {
            info!("Terms not accepted yet, showing dialog");
            self.api.show_terms_dialog(&terms)?;
            self.state = SessionState::AwaitingTerms;
            Ok(())
        }
    }

    fn request_navigator(&mut self, relay: &mut EventRelay) -> BridgeResult<()> {
        if let Err(e) = self.api.request_navigator() {
            self.state = SessionState::Uninitialized;
            relay.debug_info(format!("Failed to request navigator: {}", e));
            return Err(e.into());
        }
        self.state = SessionState::Initializing;
        Ok(())
    }

    pub fn on_terms_response(&mut self, accepted: bool, relay: &mut EventRelay) {
        if self.state != SessionState::AwaitingTerms {
            debug!("Ignoring terms response in state {:?}", self.state);
            return;
        }
        if accepted {
            // Failure is already reported through the relay
            let _ = self.request_navigator(relay);
        } else {
            self.state = SessionState::Uninitialized;
            relay.emit(Event::NavigationInitError {
                error_code: NavigatorErrorCode::TermsNotAccepted.code(),
            });
        }
    }

    /// Returns `true` when the session became ready.
    pub fn on_navigator_ready(&mut self, relay: &mut EventRelay) -> bool {
        if self.state != SessionState::Initializing {
            debug!("Ignoring navigator ready in state {:?}", self.state);
            return false;
        }

        let mut navigator = match self.api.navigator() {
            Ok(navigator) => navigator,
            Err(e) => {
                self.state = SessionState::Uninitialized;
                relay.debug_info(format!("Navigator reported ready but is unavailable: {}", e));
                return false;
            }
        };
        if let Err(e) = navigator.set_task_removed_behavior(self.task_removed_behavior) {
            warn!("Failed to set task removed behavior: {}", e);
        }
        self.navigator = Some(navigator);
        self.state = SessionState::Ready;

        self.register_listeners();
        if self.location_requested {
            self.register_location_listener();
        }
        if self.turn_by_turn {
            self.forward_nav_info(true);
        }

        info!("Navigator ready");
        relay.emit(Event::NavigationReady);
        self.notify_observers(true);
        true
    }

    /// Only an error while the navigator is being created resets the
    /// session. A held navigator stays until cleanup.
    pub fn on_navigator_error(&mut self, error_code: i32, relay: &mut EventRelay) {
        if !matches!(self.state, SessionState::Initializing | SessionState::AwaitingTerms) {
            debug!("Ignoring navigator error {} in state {:?}", error_code, self.state);
            return;
        }
        let code = NavigatorErrorCode::from_code(error_code);
        self.state = SessionState::Uninitialized;
        relay.debug_info(code.message());
        relay.emit(Event::NavigationInitError { error_code });
    }

    // ---- observers -----------------------------------------------------

    /// Register a ready observer. It is told `true` right away when the
    /// navigator is already usable.
    pub fn subscribe(&mut self, mut observer: ReadyObserver) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        if self.is_ready() {
            observer(true);
        }
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn notify_observers(&mut self, ready: bool) {
        for (_, observer) in self.observers.iter_mut() {
            observer(ready);
        }
    }

    // ---- listeners -----------------------------------------------------

    /// Remove-then-add of the standard listener set
    fn register_listeners(&mut self) {
        self.remove_listeners();
        let thresholds = self.thresholds;
        let Some(navigator) = self.navigator.as_deref_mut() else {
            return;
        };
        for kind in ListenerKind::ALL {
            match navigator.add_listener(kind, thresholds) {
                Ok(handle) => {
                    self.listeners.insert(kind, handle);
                }
                Err(e) => warn!("Failed to add {:?} listener: {}", kind, e),
            }
        }
    }

    fn remove_listeners(&mut self) {
        let handles: Vec<ListenerHandle> = self.listeners.drain().map(|(_, handle)| handle).collect();
        if let Some(navigator) = self.navigator.as_deref_mut() {
            for handle in handles {
                if let Err(e) = navigator.remove_listener(handle) {
                    warn!("Failed to remove listener {:?}: {}", handle, e);
                }
            }
        }
    }

    fn register_location_listener(&mut self) {
        self.remove_location_listener();
        if let Some(navigator) = self.navigator.as_deref_mut() {
            match navigator.add_location_listener() {
                Ok(handle) => self.location_listener = Some(handle),
                Err(e) => warn!("Failed to add location listener: {}", e),
            }
        }
    }

    fn remove_location_listener(&mut self) {
        if let (Some(handle), Some(navigator)) = (self.location_listener.take(), self.navigator.as_deref_mut()) {
            if let Err(e) = navigator.remove_location_listener(handle) {
                warn!("Failed to remove location listener: {}", e);
            }
        }
    }

    fn forward_nav_info(&mut self, enabled: bool) {
        if let Some(navigator) = self.navigator.as_deref_mut() {
            if let Err(e) = navigator.set_nav_info_forwarding(enabled) {
                warn!("Failed to toggle turn-by-turn forwarding: {}", e);
            }
        }
    }

    /// Host came back to the foreground: listeners may have been dropped.
    pub fn on_host_resume(&mut self) {
        if !self.state.has_navigator() {
            return;
        }
        debug!("Host resumed, re-registering navigator listeners");
        self.register_listeners();
        if self.location_requested {
            self.register_location_listener();
        }
    }

    pub fn on_host_pause(&mut self) {
        debug!("Host paused");
    }

    // ---- routing -------------------------------------------------------

    /// Rebuild the waypoint list and start a route computation. Invalid
    /// waypoints are reported through `logDebugInfo` and skipped.
    pub fn set_destinations(
        &mut self,
        waypoints: &[Value],
        routing: Option<RoutingOptions>,
        display: Option<DisplayOptions>,
        relay: &mut EventRelay,
    ) -> BridgeResult<RouteRequestId> {
        let navigator = match self.navigator.as_deref_mut() {
            Some(navigator) => navigator,
            None => return Err(NotReady::NoNavigator.into()),
        };

        self.pending_route = None;
        self.waypoints.clear();

        for value in waypoints {
            let parsed = match value {
                Value::Object(map) => Waypoint::from_options(map),
                _ => Err(WaypointError::MissingLocation),
            };
            let waypoint = parsed.and_then(|wp| {
                navigator.validate_waypoint(&wp)?;
                Ok(wp)
            });
            match waypoint {
                Ok(wp) => self.waypoints.push(wp),
                Err(e) => {
                    relay.debug_info(format!("Error starting navigation: {}", e));
                }
            }
        }

        self.route_generation += 1;
        let request = RouteRequestId(self.route_generation);
        navigator.set_destinations(request, &self.waypoints, routing.as_ref(), display.as_ref())?;
        self.pending_route = Some(request);
        debug!("Route request {:?} with {} waypoint(s)", request, self.waypoints.len());
        Ok(request)
    }

    /// Returns `false` for a stale or unexpected status, which is dropped.
    pub fn on_route_status(&mut self, request: RouteRequestId, code: RouteStatus, relay: &mut EventRelay) -> bool {
        if self.pending_route != Some(request) {
            debug!(
                "Dropping stale route status {:?} for {:?} (outstanding {:?})",
                code, request, self.pending_route
            );
            return false;
        }
        self.pending_route = None;
        relay.emit(Event::RouteStatusResult { code });
        true
    }

    pub fn clear_destinations(&mut self) -> BridgeResult<()> {
        self.navigator()?.clear_destinations()?;
        self.waypoints.clear();
        self.pending_route = None;
        Ok(())
    }

    pub fn continue_to_next_destination(&mut self) -> BridgeResult<()> {
        self.navigator()?.continue_to_next_destination()?;
        Ok(())
    }

    // ---- guidance ------------------------------------------------------

    pub fn start_guidance(&mut self, relay: &mut EventRelay) -> BridgeResult<()> {
        if self.navigator.is_none() {
            return Err(NotReady::NoNavigator.into());
        }
        if self.waypoints.is_empty() {
            return Err(NotReady::NoWaypoints.into());
        }
        self.navigator()?.start_guidance()?;
        self.state = SessionState::Guiding;
        relay.emit(Event::StartGuidance);
        Ok(())
    }

    pub fn stop_guidance(&mut self) -> BridgeResult<()> {
        self.navigator()?.stop_guidance()?;
        if self.state == SessionState::Guiding {
            self.state = SessionState::Ready;
        }
        Ok(())
    }

    // ---- simulation ----------------------------------------------------

    /// No-op while there are no destinations to simulate along.
    pub fn simulate_along_route(&mut self, options: SimulationOptions) -> BridgeResult<()> {
        if self.navigator.is_some() && self.waypoints.is_empty() {
            debug!("No route to simulate along");
            return Ok(());
        }
        self.navigator()?.simulator().simulate_along_route(&options)?;
        Ok(())
    }

    pub fn simulate_location(&mut self, location: LatLng) -> BridgeResult<()> {
        self.navigator()?.simulator().set_user_location(location)?;
        Ok(())
    }

    pub fn stop_simulation(&mut self) -> BridgeResult<()> {
        self.navigator()?.simulator().unset_user_location()?;
        Ok(())
    }

    pub fn pause_simulation(&mut self) -> BridgeResult<()> {
        self.navigator()?.simulator().pause()?;
        Ok(())
    }

    pub fn resume_simulation(&mut self) -> BridgeResult<()> {
        self.navigator()?.simulator().resume()?;
        Ok(())
    }

    // ---- settings ------------------------------------------------------

    pub fn set_audio_guidance(&mut self, guidance: AudioGuidance) -> BridgeResult<()> {
        self.navigator()?.set_audio_guidance(guidance)?;
        Ok(())
    }

    pub fn set_speed_alert_options(&mut self, options: Option<SpeedAlertOptions>) -> BridgeResult<()> {
        self.navigator()?.set_speed_alert_options(options.as_ref())?;
        Ok(())
    }

    pub fn set_abnormal_termination_reporting(&mut self, enabled: bool) -> BridgeResult<()> {
        self.api.set_abnormal_termination_reporting_enabled(enabled)?;
        Ok(())
    }

    /// Turn-by-turn forwarding. Remembered and re-applied when a navigator
    /// becomes ready later.
    pub fn set_turn_by_turn_logging(&mut self, enabled: bool, relay: &mut EventRelay) {
        self.turn_by_turn = enabled;
        if self.navigator.is_none() {
            relay.debug_info(NO_NAVIGATOR_MESSAGE);
            return;
        }
        self.forward_nav_info(enabled);
    }

    pub fn start_updating_location(&mut self) {
        self.location_requested = true;
        self.register_location_listener();
    }

    pub fn stop_updating_location(&mut self) {
        self.location_requested = false;
        self.remove_location_listener();
    }

    pub fn is_updating_location(&self) -> bool {
        self.location_requested
    }

    // ---- queries -------------------------------------------------------

    pub fn current_time_and_distance(&mut self) -> BridgeResult<Option<TimeAndDistance>> {
        Ok(self.navigator()?.current_time_and_distance()?)
    }

    pub fn current_route_segment(&mut self) -> BridgeResult<Option<RouteSegment>> {
        Ok(self.navigator()?.current_route_segment()?)
    }

    pub fn route_segments(&mut self) -> BridgeResult<Vec<RouteSegment>> {
        Ok(self.navigator()?.route_segments()?)
    }

    pub fn traveled_path(&mut self) -> BridgeResult<Vec<LatLng>> {
        Ok(self.navigator()?.traveled_route()?)
    }

    pub fn are_terms_accepted(&mut self) -> BridgeResult<bool> {
        Ok(self.api.are_terms_accepted()?)
    }

    pub fn reset_terms_accepted(&mut self) -> BridgeResult<()> {
        Ok(self.api.reset_terms_accepted()?)
    }

    pub fn sdk_version(&mut self) -> BridgeResult<String> {
        Ok(self.api.sdk_version()?)
    }

    // ---- navigator events ----------------------------------------------

    /// Location update from the road-snapped provider. Dropped unless
    /// location updates were requested.
    pub fn on_location(&mut self, location: Location, raw: bool, relay: &mut EventRelay) {
        if !self.location_requested {
            return;
        }
        relay.emit(if raw {
            Event::RawLocationChanged(location)
        } else {
            Event::LocationChanged(location)
        });
    }

    pub fn on_nav_info(&mut self, info: NavInfo, relay: &mut EventRelay) {
        if self.turn_by_turn {
            relay.emit(Event::TurnByTurn(info));
        }
    }

    // ---- teardown ------------------------------------------------------

    /// Release the navigator. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if self.navigator.is_none() {
            debug!("Cleanup without navigator");
            self.location_requested = false;
            self.turn_by_turn = false;
            if self.state != SessionState::Uninitialized {
                self.state = SessionState::CleanedUp;
            }
            return;
        }

        self.stop_updating_location();
        self.remove_listeners();
        if self.turn_by_turn {
            self.forward_nav_info(false);
            self.turn_by_turn = false;
        }
        self.waypoints.clear();
        self.pending_route = None;
        self.notify_observers(false);

        if let Some(mut navigator) = self.navigator.take() {
            if let Err(e) = navigator.clear_destinations() {
                warn!("Failed to clear destinations during cleanup: {}", e);
            }
            if let Err(e) = navigator.cleanup() {
                warn!("Navigator cleanup failed: {}", e);
            }
        }
        self.state = SessionState::CleanedUp;
        info!("Navigation session cleaned up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::mock::{ApiCall, MockApi, MockNavigator, NavCall, RecordingSink};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct Fixture {
        session: NavigationSession,
        relay: EventRelay,
        api: MockApi,
        navigator: MockNavigator,
        sink: RecordingSink,
    }

    fn fixture(terms_accepted: bool) -> Fixture {
        let navigator = MockNavigator::new();
        let api = MockApi::new(terms_accepted, navigator.clone());
        let sink = RecordingSink::default();
        let mut relay = EventRelay::new();
        relay.attach(Box::new(sink.clone()));
        Fixture {
            session: NavigationSession::new(Box::new(api.clone()), RemainingThresholds::default()),
            relay,
            api,
            navigator,
            sink,
        }
    }

    fn ready(terms_accepted: bool) -> Fixture {
        let mut f = fixture(terms_accepted);
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        if !terms_accepted {
            f.session.on_terms_response(true, &mut f.relay);
        }
        assert!(f.session.on_navigator_ready(&mut f.relay));
        f
    }

    fn destination() -> Value {
        json!({ "placeId": "ChIJ-destination" })
    }

    #[test]
    fn test_initialize_with_accepted_terms() {
        let mut f = fixture(true);
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::QuitService, &mut f.relay)
            .unwrap();
        assert_eq!(f.session.state(), SessionState::Initializing);
        assert_eq!(f.api.calls(), vec![ApiCall::RequestNavigator]);

        assert!(f.session.on_navigator_ready(&mut f.relay));
        assert_eq!(f.session.state(), SessionState::Ready);
        assert_eq!(f.session.listener_count(), ListenerKind::ALL.len());
        assert!(f
            .navigator
            .calls()
            .contains(&NavCall::SetTaskRemovedBehavior(TaskRemovedBehavior::QuitService)));
        assert_eq!(f.sink.names(), vec!["onNavigationReady"]);
    }

    #[test]
    fn test_terms_dialog_then_accept() {
        let mut f = fixture(false);
        let terms = TermsDialogParams {
            company_name: Some("Acme".into()),
            title: Some("Terms".into()),
            show_only_disclaimer: true,
        };
        f.session
            .initialize(terms.clone(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        assert_eq!(f.session.state(), SessionState::AwaitingTerms);
        assert_eq!(f.api.calls(), vec![ApiCall::ShowTerms(terms)]);

        f.session.on_terms_response(true, &mut f.relay);
        assert_eq!(f.session.state(), SessionState::Initializing);
    }

    #[test]
    fn test_terms_rejected() {
        let mut f = fixture(false);
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        f.session.on_terms_response(false, &mut f.relay);

        assert_eq!(f.session.state(), SessionState::Uninitialized);
        assert_eq!(f.sink.events(), vec![Event::NavigationInitError { error_code: 2 }]);
        assert!(!f.api.calls().contains(&ApiCall::RequestNavigator));
    }

    #[test]
    fn test_navigator_error_is_reported_without_retry() {
        let mut f = fixture(true);
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        f.session.on_navigator_error(3, &mut f.relay);

        assert_eq!(f.session.state(), SessionState::Uninitialized);
        assert_eq!(f.sink.names(), vec!["logDebugInfo", "onNavigationInitError"]);
        let requests = f.api.calls().iter().filter(|c| **c == ApiCall::RequestNavigator).count();
        assert_eq!(requests, 1);
    }

    #[test]
    fn test_navigator_error_after_ready_is_ignored() {
        let mut f = ready(true);
        f.session.on_navigator_error(3, &mut f.relay);

        assert_eq!(f.session.state(), SessionState::Ready);
        assert!(f.session.is_ready());
        assert_eq!(f.sink.names(), vec!["onNavigationReady"]);

        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        let requests = f.api.calls().iter().filter(|c| **c == ApiCall::RequestNavigator).count();
        assert_eq!(requests, 1);
        assert_eq!(f.session.listener_count(), ListenerKind::ALL.len());
    }

    #[test]
    fn test_navigator_error_while_guiding_keeps_guidance() {
        let mut f = ready(true);
        f.session.set_destinations(&[destination()], None, None, &mut f.relay).unwrap();
        f.session.start_guidance(&mut f.relay).unwrap();

        f.session.on_navigator_error(1, &mut f.relay);
        assert_eq!(f.session.state(), SessionState::Guiding);
        assert!(f.session.state().has_navigator());
        assert!(!f.sink.names().contains(&"onNavigationInitError"));
    }

    #[test]
    fn test_navigator_error_while_awaiting_terms() {
        let mut f = fixture(false);
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        f.session.on_navigator_error(3, &mut f.relay);

        assert_eq!(f.session.state(), SessionState::Uninitialized);
        assert_eq!(f.sink.events().last(), Some(&Event::NavigationInitError { error_code: 3 }));
        // The dialog answer no longer starts anything
        f.session.on_terms_response(true, &mut f.relay);
        assert!(!f.api.calls().contains(&ApiCall::RequestNavigator));
    }

    #[test]
    fn test_navigator_ready_after_cleanup_is_ignored() {
        let mut f = fixture(true);
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        f.session.cleanup();
        assert_eq!(f.session.state(), SessionState::CleanedUp);

        assert!(!f.session.on_navigator_ready(&mut f.relay));
        assert!(!f.session.is_ready());
        assert_eq!(f.session.listener_count(), 0);
        assert!(f.sink.names().is_empty());
    }

    #[test]
    fn test_terms_response_while_ready_is_ignored() {
        let mut f = ready(false);
        let calls_before = f.api.calls();

        f.session.on_terms_response(false, &mut f.relay);
        assert_eq!(f.session.state(), SessionState::Ready);
        f.session.on_terms_response(true, &mut f.relay);
        assert_eq!(f.session.state(), SessionState::Ready);

        assert_eq!(f.api.calls(), calls_before);
        assert!(!f.sink.names().contains(&"onNavigationInitError"));
    }

    #[test]
    fn test_cleanup_forgets_location_and_turn_by_turn() {
        let mut f = ready(true);
        f.session.start_updating_location();
        f.session.set_turn_by_turn_logging(true, &mut f.relay);
        f.session.cleanup();
        assert!(!f.session.is_updating_location());

        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        assert!(f.session.on_navigator_ready(&mut f.relay));

        assert_eq!(f.navigator.active_location_listeners(), 0);
        let enables = f
            .navigator
            .calls()
            .iter()
            .filter(|c| **c == NavCall::NavInfoForwarding(true))
            .count();
        assert_eq!(enables, 1);
        f.session.on_nav_info(NavInfo::default(), &mut f.relay);
        assert!(!f.sink.names().contains(&"onTurnByTurn"));
    }

    #[test]
    fn test_cleanup_without_navigator_forgets_requests() {
        let mut f = fixture(true);
        f.session.start_updating_location();
        f.session.set_turn_by_turn_logging(true, &mut f.relay);
        f.session.cleanup();

        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        assert!(f.session.on_navigator_ready(&mut f.relay));
        assert_eq!(f.navigator.active_location_listeners(), 0);
        assert!(!f.navigator.calls().contains(&NavCall::NavInfoForwarding(true)));
    }

    #[test]
    fn test_observers_notified_once_per_transition() {
        let mut f = fixture(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let id = f.session.subscribe(Box::new(move |ready| recorder.lock().unwrap().push(ready)));

        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        f.session.on_navigator_ready(&mut f.relay);
        // A duplicate ready callback is ignored
        f.session.on_navigator_ready(&mut f.relay);
        f.session.cleanup();
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);

        assert!(f.session.unsubscribe(id));
        assert!(!f.session.unsubscribe(id));
    }

    #[test]
    fn test_late_subscriber_is_told_immediately() {
        let mut f = ready(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        f.session.subscribe(Box::new(move |ready| recorder.lock().unwrap().push(ready)));
        assert_eq!(*seen.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_guidance_requires_navigator_and_waypoints() {
        let mut f = fixture(true);
        let err = f.session.start_guidance(&mut f.relay).unwrap_err();
        assert_eq!(err, BridgeError::NotReady(NotReady::NoNavigator));

        let mut f = ready(true);
        let err = f.session.start_guidance(&mut f.relay).unwrap_err();
        assert_eq!(err, BridgeError::NotReady(NotReady::NoWaypoints));
        assert!(!f.navigator.calls().contains(&NavCall::StartGuidance));

        f.session.set_destinations(&[destination()], None, None, &mut f.relay).unwrap();
        f.session.start_guidance(&mut f.relay).unwrap();
        assert_eq!(f.session.state(), SessionState::Guiding);
        assert!(f.navigator.calls().contains(&NavCall::StartGuidance));
        assert!(f.sink.names().contains(&"onStartGuidance"));

        f.session.stop_guidance().unwrap();
        assert_eq!(f.session.state(), SessionState::Ready);
    }

    #[test]
    fn test_invalid_waypoints_are_skipped() {
        let mut f = ready(true);
        f.navigator.reject_place_id("bad-place");
        let request = f
            .session
            .set_destinations(
                &[
                    json!({ "placeId": "bad-place" }),
                    json!({ "position": { "lat": 1.0 } }),
                    json!({ "placeId": "ok", "preferredHeading": 400 }),
                    json!("not a map"),
                    json!({ "position": { "lat": 1.0, "lng": 2.0 } }),
                ],
                None,
                None,
                &mut f.relay,
            )
            .unwrap();

        assert_eq!(f.session.waypoints().len(), 1);
        assert_eq!(f.navigator.calls().last(), Some(&NavCall::SetDestinations(request, 1)));
        let debug_count = f.sink.names().iter().filter(|n| **n == "logDebugInfo").count();
        assert_eq!(debug_count, 4);
    }

    #[test]
    fn test_stale_route_status_is_dropped() {
        let mut f = ready(true);
        let first = f.session.set_destinations(&[destination()], None, None, &mut f.relay).unwrap();
        let second = f.session.set_destinations(&[destination()], None, None, &mut f.relay).unwrap();
        assert!(second > first);

        assert!(!f.session.on_route_status(first, RouteStatus::Ok, &mut f.relay));
        assert_eq!(f.session.pending_route(), Some(second));
        assert!(!f.sink.names().contains(&"onRouteStatusResult"));

        assert!(f.session.on_route_status(second, RouteStatus::NoRouteFound, &mut f.relay));
        assert_eq!(f.session.pending_route(), None);
        assert_eq!(
            f.sink.events().last(),
            Some(&Event::RouteStatusResult {
                code: RouteStatus::NoRouteFound
            })
        );
        // Delivered once only
        assert!(!f.session.on_route_status(second, RouteStatus::Ok, &mut f.relay));
    }

    #[test]
    fn test_listener_registration_is_idempotent() {
        let mut f = ready(true);
        f.session.on_host_resume();
        f.session.on_host_resume();
        assert_eq!(f.session.listener_count(), ListenerKind::ALL.len());
        assert_eq!(f.navigator.active_listeners(), ListenerKind::ALL.len());
    }

    #[test]
    fn test_resume_restores_location_listener() {
        let mut f = ready(true);
        f.session.start_updating_location();
        assert_eq!(f.navigator.active_location_listeners(), 1);
        f.session.on_host_resume();
        assert_eq!(f.navigator.active_location_listeners(), 1);

        f.session.stop_updating_location();
        f.session.on_host_resume();
        assert_eq!(f.navigator.active_location_listeners(), 0);
    }

    #[test]
    fn test_location_requested_before_ready() {
        let mut f = fixture(true);
        f.session.start_updating_location();
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        f.session.on_navigator_ready(&mut f.relay);
        assert_eq!(f.navigator.active_location_listeners(), 1);

        let location = Location {
            lat: 1.0,
            lng: 2.0,
            ..Location::default()
        };
        f.session.on_location(location.clone(), false, &mut f.relay);
        f.session.stop_updating_location();
        f.session.on_location(location, true, &mut f.relay);
        let names = f.sink.names();
        assert!(names.contains(&"onLocationChanged"));
        assert!(!names.contains(&"onRawLocationChanged"));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mut f = ready(true);
        f.session.set_destinations(&[destination()], None, None, &mut f.relay).unwrap();
        f.session.start_updating_location();

        f.session.cleanup();
        assert_eq!(f.session.state(), SessionState::CleanedUp);
        assert!(f.session.waypoints().is_empty());
        assert_eq!(f.session.listener_count(), 0);
        assert_eq!(f.navigator.active_listeners(), 0);
        assert_eq!(f.navigator.active_location_listeners(), 0);
        assert!(f.navigator.calls().contains(&NavCall::Cleanup));

        let calls_before = f.navigator.calls().len();
        f.session.cleanup();
        assert_eq!(f.navigator.calls().len(), calls_before);
        assert_eq!(f.session.state(), SessionState::CleanedUp);
    }

    #[test]
    fn test_reinitialize_after_cleanup() {
        let mut f = ready(true);
        f.session.cleanup();
        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        assert_eq!(f.session.state(), SessionState::Initializing);
        assert!(f.session.on_navigator_ready(&mut f.relay));
    }

    #[test]
    fn test_turn_by_turn_forwarding() {
        let mut f = fixture(true);
        f.session.set_turn_by_turn_logging(true, &mut f.relay);
        assert_eq!(f.sink.names(), vec!["logDebugInfo"]);

        f.session
            .initialize(TermsDialogParams::default(), TaskRemovedBehavior::default(), &mut f.relay)
            .unwrap();
        f.session.on_navigator_ready(&mut f.relay);
        assert!(f.navigator.calls().contains(&NavCall::NavInfoForwarding(true)));

        f.session.on_nav_info(NavInfo::default(), &mut f.relay);
        assert_eq!(f.sink.names().last(), Some(&"onTurnByTurn"));
    }

    #[test]
    fn test_simulation_needs_route() {
        let mut f = ready(true);
        f.session.simulate_along_route(SimulationOptions::default()).unwrap();
        assert!(!f.navigator.calls().iter().any(|c| matches!(c, NavCall::Simulate(_))));

        f.session.set_destinations(&[destination()], None, None, &mut f.relay).unwrap();
        let options = SimulationOptions { speed_multiplier: 2.0 };
        f.session.simulate_along_route(options).unwrap();
        assert!(f.navigator.calls().contains(&NavCall::Simulate(options)));
    }

    #[test]
    fn test_commands_without_navigator() {
        let mut f = fixture(true);
        assert_eq!(
            f.session.clear_destinations().unwrap_err(),
            BridgeError::NotReady(NotReady::NoNavigator)
        );
        assert!(f.session.simulate_location(LatLng::new(1.0, 2.0)).is_err());
        assert!(f
            .session
            .set_destinations(&[destination()], None, None, &mut f.relay)
            .is_err());
        assert!(f.session.current_time_and_distance().is_err());
        // Terms and version go to the API directly
        assert!(f.session.are_terms_accepted().unwrap());
        assert_eq!(f.session.sdk_version().unwrap(), "mock-sdk");
    }
}
