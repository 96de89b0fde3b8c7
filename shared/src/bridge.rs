//! # Navigation Bridge
//!
//! Top-level object owned by the host's main context. It holds every live
//! view, the in-car screen, the navigation session and the event relay,
//! and is the only place where native callbacks are applied.
//!
//! ```text
//!             dispatch(view, id, args)              callback_sender()
//!  host ───────────────┐                 native ─────────────┐
//!                      ▼                                      ▼
//!               ┌─────────────┐                       ┌──────────────┐
//!               │CommandRouter│                       │CallbackQueue │
//!               └──────┬──────┘                       └──────┬───────┘
//!                      │          ┌──────────────┐           │ pump()
//!                      └────────► │BridgeContext │ ◄─────────┘
//!                                 │ views, auto  │
//!                                 │ session      │ ──► EventRelay ──► app
//!                                 └──────────────┘
//! ```

use std::collections::HashMap;

use log::{debug, info, warn};
use serde_json::{json, Value};

use crate::auto::AutoScreen;
use crate::callback::{CallbackQueue, CallbackSender, NativeCallback};
use crate::command::ViewTarget;
use crate::config::BridgeConfig;
use crate::enums::MapViewType;
use crate::error::{codes, BridgeError, BridgeResult};
use crate::events::Event;
use crate::overlay::OverlayKind;
use crate::relay::EventRelay;
use crate::router::{CommandRouter, Reply};
use crate::session::{NavigationSession, ObserverId, ReadyObserver};
use crate::traits::{EventSink, MapSurface, NavigationApi, StyleLoader};
use crate::view::MapViewController;

/// Everything commands and callbacks operate on
pub struct BridgeContext {
    pub(crate) views: HashMap<i32, MapViewController>,
    pub(crate) auto: AutoScreen,
    pub(crate) session: NavigationSession,
    pub(crate) relay: EventRelay,
    pub(crate) style_loader: Box<dyn StyleLoader>,
    pub(crate) callbacks: CallbackSender,
}

/// Find the controller for `target`. An unknown phone view is an error;
/// a missing in-car screen is `None`.
pub(crate) fn lookup_view<'a>(
    views: &'a mut HashMap<i32, MapViewController>,
    auto: &'a mut AutoScreen,
    target: ViewTarget,
) -> BridgeResult<Option<&'a mut MapViewController>> {
    match target {
        ViewTarget::View(id) => match views.get_mut(&id) {
            Some(view) => Ok(Some(view)),
            None => Err(BridgeError::ViewNotFound(target.to_string())),
        },
        ViewTarget::Auto => Ok(auto.view_mut()),
    }
}

pub struct NavBridge {
    ctx: BridgeContext,
    router: CommandRouter,
    queue: CallbackQueue,
    config: BridgeConfig,
}

impl NavBridge {
    pub fn new(config: BridgeConfig, api: Box<dyn NavigationApi>, style_loader: Box<dyn StyleLoader>) -> Self {
        let queue = CallbackQueue::new();
        let ctx = BridgeContext {
            views: HashMap::new(),
            auto: AutoScreen::new(),
            session: NavigationSession::new(api, config.thresholds()),
            relay: EventRelay::new(),
            style_loader,
            callbacks: queue.sender(),
        };
        Self {
            ctx,
            router: CommandRouter::new(),
            queue,
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Handle for native listeners on other threads
    pub fn callback_sender(&self) -> CallbackSender {
        self.queue.sender()
    }

    pub fn attach_sink(&mut self, sink: Box<dyn EventSink>) {
        self.ctx.relay.attach(sink);
    }

    pub fn detach_sink(&mut self) {
        self.ctx.relay.detach();
    }

    pub fn session(&self) -> &NavigationSession {
        &self.ctx.session
    }

    pub fn view(&self, target: ViewTarget) -> Option<&MapViewController> {
        match target {
            ViewTarget::View(id) => self.ctx.views.get(&id),
            ViewTarget::Auto => self.ctx.auto.view(),
        }
    }

    // ---- views ---------------------------------------------------------

    /// Register a phone view. Re-registering an id replaces the old view.
    pub fn register_view(&mut self, view_id: i32, kind: MapViewType, surface: Box<dyn MapSurface>) {
        let target = ViewTarget::from(view_id);
        if target == ViewTarget::Auto {
            warn!("View id {} is reserved for the auto screen", view_id);
            return;
        }
        let view = MapViewController::new(target, kind, surface);
        if let Some(mut old) = self.ctx.views.insert(view_id, view) {
            warn!("Replacing {}", target);
            if let Err(e) = old.destroy() {
                warn!("Failed to destroy replaced {}: {}", target, e);
            }
        }
        debug!("Registered {} ({:?})", target, kind);
    }

    pub fn unregister_view(&mut self, view_id: i32) -> bool {
        match self.ctx.views.remove(&view_id) {
            Some(mut view) => {
                if let Err(e) = view.destroy() {
                    warn!("Failed to destroy {}: {}", view.target(), e);
                }
                true
            }
            None => false,
        }
    }

    pub fn attach_auto_screen(&mut self, surface: Box<dyn MapSurface>) {
        self.ctx.auto.attach(surface, &mut self.ctx.relay);
    }

    pub fn detach_auto_screen(&mut self) {
        self.ctx.auto.detach(&mut self.ctx.relay);
    }

    // ---- commands ------------------------------------------------------

    pub fn dispatch(&mut self, target: ViewTarget, command_id: i64, args: &[Value]) -> BridgeResult<Reply> {
        self.router.dispatch(&mut self.ctx, target, command_id, args)
    }

    /// JSON in, JSON out: `{"result": ...}` or `{"error": {"code", "message"}}`
    pub fn dispatch_json(&mut self, view_id: i32, command_id: i64, args_json: &str) -> Value {
        let args: Vec<Value> = if args_json.trim().is_empty() {
            Vec::new()
        } else {
            match serde_json::from_str(args_json) {
                Ok(args) => args,
                Err(e) => {
                    return error_reply(codes::INVALID_ARGUMENT_ERROR_CODE, &format!("malformed arguments: {}", e))
                }
            }
        };

        match self.dispatch(ViewTarget::from(view_id), command_id, &args) {
            Ok(reply) => json!({ "result": reply.to_value() }),
            Err(e) => {
                debug!("Command {} failed: {}", command_id, e);
                error_reply(e.code(), &e.to_string())
            }
        }
    }

    // ---- lifecycle -----------------------------------------------------

    pub fn on_host_resume(&mut self) {
        self.ctx.session.on_host_resume();
    }

    pub fn on_host_pause(&mut self) {
        self.ctx.session.on_host_pause();
    }

    pub fn add_ready_observer(&mut self, observer: ReadyObserver) -> ObserverId {
        self.ctx.session.subscribe(observer)
    }

    pub fn remove_ready_observer(&mut self, id: ObserverId) -> bool {
        self.ctx.session.unsubscribe(id)
    }

    // ---- callbacks -----------------------------------------------------

    /// Apply every queued callback. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(callback) = self.queue.try_next() {
            self.handle_callback(callback);
            handled += 1;
        }
        handled
    }

    /// Wait for one callback and apply it
    pub async fn next_callback(&mut self) -> bool {
        match self.queue.next().await {
            Some(callback) => {
                self.handle_callback(callback);
                true
            }
            None => false,
        }
    }

    pub fn handle_callback(&mut self, callback: NativeCallback) {
        let ctx = &mut self.ctx;
        match callback {
            NativeCallback::MapReady { view_id } => {
                if let Some(view) = find_view(ctx, view_id) {
                    view.on_map_ready();
                    ctx.relay.emit(Event::MapReady { view_id });
                }
            }
            NativeCallback::OverlayClick {
                view_id,
                kind,
                native_id,
            } => {
                let overlay = find_view(ctx, view_id).and_then(|view| view.resolve_click(kind, &native_id));
                match overlay {
                    Some(overlay) => {
                        ctx.relay.emit(click_event(kind, view_id, overlay));
                    }
                    None => debug!("Click on unknown {} {} in {}", kind.name(), native_id, view_id),
                }
            }
            NativeCallback::InfoWindowClick { view_id, native_id } => {
                let overlay =
                    find_view(ctx, view_id).and_then(|view| view.resolve_click(OverlayKind::Marker, &native_id));
                match overlay {
                    Some(overlay) => {
                        ctx.relay.emit(Event::MarkerInfoWindowTapped { view_id, overlay });
                    }
                    None => debug!("Info window tap on unknown marker {} in {}", native_id, view_id),
                }
            }
            NativeCallback::MapClick { view_id, position } => {
                ctx.relay.emit(Event::MapClick { view_id, position });
            }
            NativeCallback::RecenterButtonClick { view_id } => {
                ctx.relay.emit(Event::RecenterButtonClick { view_id });
            }
            NativeCallback::TermsResponse { accepted } => {
                ctx.session.on_terms_response(accepted, &mut ctx.relay);
            }
            NativeCallback::NavigatorReady => {
                if ctx.session.on_navigator_ready(&mut ctx.relay) {
                    for view in ctx.views.values_mut() {
                        view.reapply_styling();
                    }
                    if let Some(view) = ctx.auto.view_mut() {
                        view.reapply_styling();
                    }
                }
            }
            NativeCallback::NavigatorError { error_code } => {
                ctx.session.on_navigator_error(error_code, &mut ctx.relay);
            }
            NativeCallback::RouteStatusResult { request, code } => {
                ctx.session.on_route_status(request, code, &mut ctx.relay);
            }
            NativeCallback::Arrival(arrival) => {
                ctx.relay.emit(Event::Arrival(arrival));
            }
            NativeCallback::RouteChanged => {
                ctx.relay.emit(Event::RouteChanged);
            }
            NativeCallback::TrafficUpdated => {
                ctx.relay.emit(Event::TrafficUpdated);
            }
            NativeCallback::ReroutingRequestedByOffRoute => {
                ctx.relay.emit(Event::ReroutingRequestedByOffRoute);
            }
            NativeCallback::RemainingTimeOrDistanceChanged => {
                ctx.relay.emit(Event::RemainingTimeOrDistanceChanged);
            }
            NativeCallback::Location(location) => {
                ctx.session.on_location(location, false, &mut ctx.relay);
            }
            NativeCallback::RawLocation(location) => {
                ctx.session.on_location(location, true, &mut ctx.relay);
            }
            NativeCallback::NavInfo(info) => {
                ctx.session.on_nav_info(info, &mut ctx.relay);
            }
            NativeCallback::StyleLoaded {
                view_id,
                generation,
                style,
                error,
            } => match lookup_view(&mut ctx.views, &mut ctx.auto, view_id) {
                Ok(Some(view)) => {
                    view.apply_style(generation, style, error, &mut ctx.relay);
                }
                _ => debug!("Style loaded for {} which is gone", view_id),
            },
            NativeCallback::CustomAutoEvent { event_type, data } => {
                ctx.auto.custom_event(event_type, data, &mut ctx.relay);
            }
        }
    }

    /// Release the navigator and every view
    pub fn shutdown(&mut self) {
        self.ctx.session.cleanup();
        for (_, mut view) in self.ctx.views.drain() {
            if let Err(e) = view.destroy() {
                warn!("Failed to destroy {}: {}", view.target(), e);
            }
        }
        self.ctx.auto.detach(&mut self.ctx.relay);
        info!(
            "Bridge shut down ({} events delivered, {} dropped)",
            self.ctx.relay.delivered(),
            self.ctx.relay.dropped()
        );
    }
}

fn find_view(ctx: &mut BridgeContext, target: ViewTarget) -> Option<&mut MapViewController> {
    match lookup_view(&mut ctx.views, &mut ctx.auto, target) {
        Ok(view) => view,
        Err(_) => {
            debug!("Callback for unknown {}", target);
            None
        }
    }
}

fn click_event(kind: OverlayKind, view_id: ViewTarget, overlay: Value) -> Event {
    match kind {
        OverlayKind::Marker => Event::MarkerClick { view_id, overlay },
        OverlayKind::Polyline => Event::PolylineClick { view_id, overlay },
        OverlayKind::Polygon => Event::PolygonClick { view_id, overlay },
        OverlayKind::Circle => Event::CircleClick { view_id, overlay },
        OverlayKind::GroundOverlay => Event::GroundOverlayClick { view_id, overlay },
    }
}

pub fn error_reply(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}
